//! Batch plans for parallel trials.
//!
//! A trial's samples are cut into contiguous batches; each batch runs as one Rayon
//! task with its own generator, and the per-batch histograms are merged in batch order.

/// One slice of a trial's samples and the seed its generator starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBatch {
    pub index: usize,
    pub samples: usize,
    pub seed: u64,
}

/// Cut `total` samples into at most `num_batches` batches whose sizes differ by at most one
/// (earlier batches take the remainder). Batch `i` is seeded `base_seed + i`.
///
/// # Example
/// ```
/// # use blu::parallel::plan_batches;
/// let plan = plan_batches(10, 3, 100);
/// let sizes: Vec<_> = plan.iter().map(|b| b.samples).collect();
/// assert_eq!(sizes, vec![4, 3, 3]);
/// assert_eq!(plan[2].seed, 102);
/// ```
pub fn plan_batches(total: usize, num_batches: usize, base_seed: u64) -> Vec<SampleBatch> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let count = num_batches.min(total);
    let (base, remainder) = (total / count, total % count);
    (0..count)
        .map(|index| SampleBatch {
            index,
            samples: base + usize::from(index < remainder),
            seed: base_seed.wrapping_add(index as u64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(plan: &[SampleBatch]) -> Vec<usize> {
        plan.iter().map(|b| b.samples).collect()
    }

    #[test]
    fn even_split() {
        assert_eq!(sizes(&plan_batches(100, 4, 0)), vec![25, 25, 25, 25]);
    }

    #[test]
    fn remainder_goes_to_leading_batches() {
        let plan = plan_batches(10, 3, 7);
        assert_eq!(sizes(&plan), vec![4, 3, 3]);
        assert_eq!(plan.iter().map(|b| b.samples).sum::<usize>(), 10);
    }

    #[test]
    fn more_batches_than_samples() {
        let plan = plan_batches(3, 10, 0);
        assert_eq!(sizes(&plan), vec![1, 1, 1]);
    }

    #[test]
    fn empty_inputs_give_no_batches() {
        assert!(plan_batches(0, 5, 1).is_empty());
        assert!(plan_batches(10, 0, 1).is_empty());
    }

    #[test]
    fn seeds_are_consecutive_and_wrap() {
        let plan = plan_batches(4, 4, u64::MAX - 1);
        let seeds: Vec<_> = plan.iter().map(|b| b.seed).collect();
        assert_eq!(seeds, vec![u64::MAX - 1, u64::MAX, 0, 1]);
    }
}
