use crate::dataset::Dataset;
use crate::safe::SafeDataset;

/// Produces the order in which dataset indices are visited.
pub trait Sampler {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
}

/// Visits `0..len` in order.
#[derive(Debug, Clone, Copy)]
pub struct SequentialSampler {
    len: usize,
}

impl SequentialSampler {
    pub fn new(len: usize) -> Self {
        SequentialSampler { len }
    }
}

impl Sampler for SequentialSampler {
    fn len(&self) -> usize {
        self.len
    }

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(0..self.len)
    }
}

/// Visits an explicit, caller-supplied sequence of indices, such as a
/// shuffled order produced elsewhere.
#[derive(Debug, Clone)]
pub struct IndexSampler {
    indices: Vec<usize>,
}

impl IndexSampler {
    pub fn new(indices: Vec<usize>) -> Self {
        IndexSampler { indices }
    }
}

impl From<Vec<usize>> for IndexSampler {
    fn from(indices: Vec<usize>) -> Self {
        IndexSampler::new(indices)
    }
}

impl Sampler for IndexSampler {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.indices.iter().copied())
    }
}

/// Maps `(num_valid, num_examined)` to the next position in the wrapped order.
pub type StepFn = Box<dyn Fn(usize, usize) -> usize>;

/// Yields only those indices of a wrapped sampler whose sample is valid.
///
/// The next position is chosen by a step function; by default it is the
/// number of positions already examined, so the wrapped order is walked
/// front to back. Iteration ends once the step function points past the end
/// of the order or at an index outside the dataset.
pub struct SafeSampler<'a, D: Dataset> {
    dataset: &'a mut SafeDataset<D>,
    order: Vec<usize>,
    step: StepFn,
    num_valid: usize,
    num_examined: usize,
}

impl<'a, D: Dataset> SafeSampler<'a, D> {
    /// Sample directly over the dataset in index order.
    pub fn new(dataset: &'a mut SafeDataset<D>) -> Self {
        let order = SequentialSampler::new(dataset.len()).indices().collect();
        Self::from_order(dataset, order)
    }

    /// Sample over the order produced by `sampler`.
    pub fn wrap<S: Sampler + ?Sized>(dataset: &'a mut SafeDataset<D>, sampler: &S) -> Self {
        let order = sampler.indices().collect();
        Self::from_order(dataset, order)
    }

    fn from_order(dataset: &'a mut SafeDataset<D>, order: Vec<usize>) -> Self {
        SafeSampler {
            dataset,
            order,
            step: Box::new(|_valid: usize, examined: usize| examined),
            num_valid: 0,
            num_examined: 0,
        }
    }

    pub fn with_step_fn<F>(mut self, step: F) -> Self
    where
        F: Fn(usize, usize) -> usize + 'static,
    {
        self.step = Box::new(step);
        self
    }

    pub fn num_valid(&self) -> usize {
        self.num_valid
    }

    pub fn num_examined(&self) -> usize {
        self.num_examined
    }

    /// Restart from the beginning of the wrapped order.
    pub fn reset(&mut self) {
        self.num_valid = 0;
        self.num_examined = 0;
    }

    pub fn dataset(&mut self) -> &mut SafeDataset<D> {
        &mut *self.dataset
    }
}

impl<'a, D: Dataset> Iterator for SafeSampler<'a, D> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let position = (self.step)(self.num_valid, self.num_examined);
            let index = *self.order.get(position)?;
            self.num_examined += 1;
            match self.dataset.check(index) {
                Ok(true) => {
                    self.num_valid += 1;
                    return Some(index);
                }
                Ok(false) => continue,
                Err(_) => return None,
            }
        }
    }
}
