pub mod error;
pub mod validity;

pub use error::{SafeError, SafeResult, SampleError};
pub use validity::{Validity, ValidityCache};
