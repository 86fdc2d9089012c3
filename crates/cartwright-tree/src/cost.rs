//! Incremental squared-error cost of a left/right bipartition.

/// Running sums for a bipartition of a fixed multiset of response values.
///
/// Every value starts in the right partition. [`CostTracker::move_right_to_left`]
/// shifts one value across in O(1), so sweeping a sorted column costs O(N)
/// after the sort instead of O(N²).
#[derive(Debug, Clone, PartialEq)]
pub struct CostTracker {
    right_sum: f64,
    right_sum_sq: f64,
    left_sum: f64,
    left_sum_sq: f64,
    right_count: usize,
    left_count: usize,
}

impl CostTracker {
    /// Create a tracker with every value in the right partition.
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let (right_sum, right_sum_sq) = values
            .iter()
            .fold((0.0, 0.0), |(sum, sum_sq), &v| (sum + v, sum_sq + v * v));
        Self {
            right_sum,
            right_sum_sq,
            left_sum: 0.0,
            left_sum_sq: 0.0,
            right_count: values.len(),
            left_count: 0,
        }
    }

    /// Move one value from the right partition to the left.
    ///
    /// The caller must not move more values than the tracker was built with.
    pub fn move_right_to_left(&mut self, value: f64) {
        debug_assert!(self.right_count > 0, "right partition is already empty");
        let sq = value * value;
        self.right_sum -= value;
        self.right_sum_sq -= sq;
        self.left_sum += value;
        self.left_sum_sq += sq;
        self.right_count -= 1;
        self.left_count += 1;
    }

    /// Number of values in the right partition.
    #[must_use]
    pub fn right_count(&self) -> usize {
        self.right_count
    }

    /// Number of values in the left partition.
    #[must_use]
    pub fn left_count(&self) -> usize {
        self.left_count
    }

    /// Sum of squared deviations from the mean of the right partition.
    #[must_use]
    pub fn right_cost(&self) -> f64 {
        partition_cost(self.right_sum, self.right_sum_sq, self.right_count)
    }

    /// Sum of squared deviations from the mean of the left partition.
    #[must_use]
    pub fn left_cost(&self) -> f64 {
        partition_cost(self.left_sum, self.left_sum_sq, self.left_count)
    }

    /// Mean of the right partition. The right partition must be non-empty.
    #[must_use]
    pub fn right_mean(&self) -> f64 {
        self.right_sum / self.right_count as f64
    }

    /// Mean of the left partition, or `None` while it is empty.
    #[must_use]
    pub fn left_mean(&self) -> Option<f64> {
        (self.left_count > 0).then(|| self.left_sum / self.left_count as f64)
    }

    /// Combined cost of both partitions, or `None` once every value has moved left.
    #[must_use]
    pub fn total_cost(&self) -> Option<f64> {
        (self.right_count > 0).then(|| self.left_cost() + self.right_cost())
    }
}

fn partition_cost(sum: f64, sum_sq: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum_sq - sum * sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::CostTracker;

    /// Two-pass squared error of a slice, the non-incremental reference.
    fn direct_cost(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        values.iter().map(|v| (v - mean).powi(2)).sum()
    }

    #[test]
    fn new_tracker_has_everything_on_the_right() {
        let ct = CostTracker::new(&[1.0, 2.0, 3.0]);
        assert_eq!(ct.left_count(), 0);
        assert_eq!(ct.right_count(), 3);
        assert_eq!(ct.left_mean(), None);
        assert!((ct.right_mean() - 2.0).abs() < f64::EPSILON);
        assert!(ct.left_cost().abs() < f64::EPSILON);
        assert!((ct.right_cost() - 2.0).abs() < 1e-12);
        assert_eq!(ct.total_cost(), Some(ct.right_cost()));
    }

    #[test]
    fn move_one() {
        let mut ct = CostTracker::new(&[1.0, 2.0, 3.0]);
        ct.move_right_to_left(1.0);
        assert_eq!(ct.left_count(), 1);
        assert_eq!(ct.right_count(), 2);
        assert_eq!(ct.left_mean(), Some(1.0));
        assert!((ct.right_mean() - 2.5).abs() < f64::EPSILON);
        assert!(ct.left_cost().abs() < f64::EPSILON);
        assert!((ct.right_cost() - 0.5).abs() < 1e-12);
        assert!((ct.total_cost().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn move_two() {
        let mut ct = CostTracker::new(&[1.0, 2.0, 3.0]);
        ct.move_right_to_left(1.0);
        ct.move_right_to_left(2.0);
        assert_eq!(ct.left_count(), 2);
        assert_eq!(ct.right_count(), 1);
        assert_eq!(ct.left_mean(), Some(1.5));
        assert!((ct.right_mean() - 3.0).abs() < f64::EPSILON);
        assert!((ct.left_cost() - 0.5).abs() < 1e-12);
        assert!(ct.right_cost().abs() < 1e-12);
        assert!((ct.total_cost().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn total_cost_undefined_once_right_is_empty() {
        let mut ct = CostTracker::new(&[4.0, 6.0]);
        ct.move_right_to_left(4.0);
        ct.move_right_to_left(6.0);
        assert_eq!(ct.right_count(), 0);
        assert_eq!(ct.total_cost(), None);
        assert!(ct.right_cost().abs() < f64::EPSILON);
        assert_eq!(ct.left_mean(), Some(5.0));
    }

    #[test]
    fn empty_tracker_costs_nothing() {
        let ct = CostTracker::new(&[]);
        assert_eq!(ct.right_count(), 0);
        assert!(ct.left_cost().abs() < f64::EPSILON);
        assert!(ct.right_cost().abs() < f64::EPSILON);
        assert_eq!(ct.total_cost(), None);
    }

    #[test]
    fn incremental_matches_direct_computation() {
        let values = [3.5, -1.25, 0.0, 8.0, 2.0, 2.0, -4.5, 10.125];
        let mut ct = CostTracker::new(&values);
        for split in 1..values.len() {
            ct.move_right_to_left(values[split - 1]);
            let (left, right) = values.split_at(split);
            let expected = direct_cost(left) + direct_cost(right);
            let got = ct.total_cost().expect("right side is non-empty");
            assert!(
                (got - expected).abs() < 1e-9,
                "split at {split}: incremental {got} != direct {expected}"
            );
        }
    }
}
