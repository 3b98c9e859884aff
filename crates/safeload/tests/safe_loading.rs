use std::cell::Cell;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use safeload::{
    Dataset, FailurePolicy, FnDataset, SafeConfig, SafeDataLoader, SafeDataset, SafeError,
    SafeResult, SafeSampler, SampleError, TransformChain, Validity, VecDataset,
};

const DATASET_SIZE: usize = 17;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Collection whose odd indices fail, counting retrievals per index.
struct Flaky {
    len: usize,
    calls: Vec<Cell<usize>>,
}

impl Flaky {
    fn new(len: usize) -> Self {
        Flaky {
            len,
            calls: (0..len).map(|_| Cell::new(0)).collect(),
        }
    }
}

impl Dataset for Flaky {
    type Item = String;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, idx: usize) -> Result<String, SampleError> {
        self.calls[idx].set(self.calls[idx].get() + 1);
        if idx % 2 == 1 {
            Err(SampleError::load(idx, "odd index"))
        } else {
            Ok(format!("sample-{}", idx))
        }
    }
}

#[test]
fn test_five_items_two_failing() {
    init_logging();
    let mut safe = SafeDataset::new(Flaky::new(5));
    assert_eq!(safe.get(1).unwrap(), "sample-2");
    assert_eq!(safe.validity(1), Validity::Invalid);
    assert_eq!(safe.validity(2), Validity::Valid);
    for i in [0, 2, 4] {
        assert_eq!(safe.get(i).unwrap(), format!("sample-{}", i));
    }
}

#[test]
fn test_all_invalid_is_exhausted() {
    init_logging();
    let calls = Cell::new(0);
    let ds = FnDataset::new(5, |i| -> Result<u32, SampleError> {
        calls.set(calls.get() + 1);
        Err(SampleError::load(i, "broken"))
    });
    let mut safe = SafeDataset::new(ds);
    assert_eq!(safe.get(0), Err(SafeError::Exhausted { index: 0, len: 5 }));
    assert_eq!(calls.get(), 5);
    assert_eq!(safe.num_invalid(), 5);
}

#[test]
fn test_invalid_indices_are_retrieved_once() {
    init_logging();
    let mut safe = SafeDataset::new(Flaky::new(9));
    for round in 0..3 {
        for i in 0..9 {
            safe.get(i).unwrap();
        }
        assert!(safe.is_index_built(), "round {}", round);
    }
    for i in (1..9).step_by(2) {
        assert_eq!(safe.dataset().calls[i].get(), 1);
    }
}

#[test]
fn test_termination_bound() {
    let mut safe = SafeDataset::new(Flaky::new(DATASET_SIZE));
    for i in 0..DATASET_SIZE {
        safe.get(i).unwrap();
    }
    let total: usize = safe.dataset().calls.iter().map(Cell::get).sum();
    // Valid indices are retrieved once per request; invalid ones once overall.
    assert!(total <= DATASET_SIZE * 2);
}

#[test]
fn test_skip_loader_with_random_holes() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(42);
    for num_missing in 1..DATASET_SIZE {
        let mut slots: Vec<Option<usize>> = (0..DATASET_SIZE).map(Some).collect();
        let mut positions: Vec<usize> = (0..DATASET_SIZE).collect();
        positions.shuffle(&mut rng);
        for &p in &positions[..num_missing] {
            slots[p] = None;
        }

        let config = SafeConfig::new().policy(FailurePolicy::Skip);
        let mut safe = SafeDataset::with_config(VecDataset::from_options(slots), config).unwrap();
        let seen: Vec<usize> = SafeDataLoader::new(&mut safe)
            .collect::<SafeResult<_>>()
            .unwrap();
        assert_eq!(seen.len(), DATASET_SIZE - num_missing);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(safe.valid_len(), Some(DATASET_SIZE - num_missing));
    }
}

#[test]
fn test_substitute_loader_fills_every_slot() {
    let mut slots: Vec<Option<usize>> = (0..DATASET_SIZE).map(Some).collect();
    slots[5] = None;
    let mut safe = SafeDataset::new(VecDataset::from_options(slots));
    let seen: Vec<usize> = SafeDataLoader::new(&mut safe)
        .collect::<SafeResult<_>>()
        .unwrap();
    assert_eq!(seen.len(), DATASET_SIZE);
    assert_eq!(seen[5], 6);
}

#[test]
fn test_transform_filter_through_loader() {
    let chain = TransformChain::new()
        .filter(|s: &String| !s.ends_with('4'))
        .map(|s| s.to_uppercase());
    let config = SafeConfig::new().policy(FailurePolicy::Skip).eager(true);
    let mut safe = SafeDataset::with_transforms(Flaky::new(6), chain, config).unwrap();
    assert_eq!(safe.valid_len(), Some(2));
    let seen: Vec<String> = SafeDataLoader::new(&mut safe)
        .collect::<SafeResult<_>>()
        .unwrap();
    assert_eq!(seen, vec!["SAMPLE-0", "SAMPLE-2"]);
}

#[test]
fn test_sampler_then_compact_access() {
    let mut safe = SafeDataset::new(Flaky::new(7));
    let valid: Vec<usize> = SafeSampler::new(&mut safe).collect();
    assert_eq!(valid, vec![0, 2, 4, 6]);
    assert!(safe.is_index_built());
    assert_eq!(safe.get_compact(3).unwrap(), "sample-6");
}

#[test]
fn test_config_from_json_drives_wrapper() {
    let config = SafeConfig::from_json_str(r#"{"eager": true, "memoize": true}"#).unwrap();
    let mut safe = SafeDataset::with_config(Flaky::new(4), config).unwrap();
    safe.build_sample_cache();
    assert_eq!(safe.num_memoized(), 2);
    assert_eq!(safe.get_memoized(3).unwrap(), "sample-0");
    assert_eq!(safe.dataset().calls[0].get(), 2);
}
