use safeload_core::SampleError;

/// A single step applied to every retrieved sample.
///
/// Returning `Ok(None)` filters the sample out; the safe wrappers treat it the
/// same as a failed retrieval.
pub trait Transform<T> {
    fn apply(&self, sample: T) -> Result<Option<T>, SampleError>;
}

impl<T, F> Transform<T> for F
where
    F: Fn(T) -> Result<Option<T>, SampleError>,
{
    fn apply(&self, sample: T) -> Result<Option<T>, SampleError> {
        self(sample)
    }
}

/// Ordered sequence of transforms.
pub struct TransformChain<T> {
    steps: Vec<Box<dyn Transform<T>>>,
}

impl<T> TransformChain<T> {
    pub fn new() -> Self {
        TransformChain { steps: Vec::new() }
    }

    /// Append a transform step.
    pub fn add<Tr: Transform<T> + 'static>(mut self, step: Tr) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append a closure step.
    pub fn add_fn<F>(self, step: F) -> Self
    where
        F: Fn(T) -> Result<Option<T>, SampleError> + 'static,
    {
        self.add(step)
    }

    /// Append a step that keeps only samples matching `keep`.
    pub fn filter<P>(self, keep: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.add_fn(move |sample| Ok(if keep(&sample) { Some(sample) } else { None }))
    }

    /// Append an infallible mapping step.
    pub fn map<M>(self, f: M) -> Self
    where
        M: Fn(T) -> T + 'static,
    {
        self.add_fn(move |sample| Ok(Some(f(sample))))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the sample through every step, stopping at the first filter or error.
    pub fn apply(&self, sample: T) -> Result<Option<T>, SampleError> {
        let mut current = sample;
        for step in &self.steps {
            match step.apply(current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

impl<T> Default for TransformChain<T> {
    fn default() -> Self {
        Self::new()
    }
}
