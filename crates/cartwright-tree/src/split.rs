use crate::cost::CostTracker;
use crate::node::Side;

/// Best split found on one predictor of one node.
///
/// When no threshold improves on the unsplit cost, `cost` is the unsplit cost
/// as seen by the tracker, every row is assigned [`Side::Right`] and both
/// [`threshold`](Self::threshold) and [`prediction_pair`](Self::prediction_pair)
/// are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate {
    cost: f64,
    assignment: Vec<Side>,
    threshold: Option<f64>,
    prediction_pair: Option<(f64, f64)>,
}

impl SplitCandidate {
    /// Combined squared-error cost of both sides of the split.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Side assigned to each of the node's rows, in row order.
    #[must_use]
    pub fn assignment(&self) -> &[Side] {
        &self.assignment
    }

    /// Midpoint between the last value sent left and the first value sent right.
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Mean response of the left and right sides.
    #[must_use]
    pub fn prediction_pair(&self) -> Option<(f64, f64)> {
        self.prediction_pair
    }

    /// Number of rows assigned to the left side.
    #[must_use]
    pub fn n_left(&self) -> usize {
        self.assignment.iter().filter(|&&s| s == Side::Left).count()
    }
}

/// Find the threshold on `column` minimizing the squared-error cost of `responses`.
///
/// Sorts `(value, row)` pairs stably, groups runs of equal values so that ties
/// always land on the same side, then sweeps the groups left to right moving
/// each whole group across a [`CostTracker`]. A candidate is scored after each
/// group except the last; the first strictly lowest cost wins.
pub(crate) fn search_predictor(column: &[f64], responses: &[f64]) -> SplitCandidate {
    debug_assert_eq!(column.len(), responses.len());
    let n_rows = responses.len();

    let mut sorted: Vec<(f64, usize)> = column.iter().copied().zip(0..n_rows).collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let groups: Vec<&[(f64, usize)]> = sorted.chunk_by(|a, b| a.0 == b.0).collect();

    let mut tracker = CostTracker::new(responses);
    let mut best_cost = tracker.total_cost().unwrap_or(0.0);
    let mut best_move_time = 0usize;
    let mut threshold = None;
    let mut prediction_pair = None;

    // Rows never moved keep usize::MAX and therefore stay right.
    let mut move_times = vec![usize::MAX; n_rows];

    for (move_time, window) in groups.windows(2).enumerate() {
        let (current, next) = (window[0], window[1]);
        for &(_, row) in current {
            tracker.move_right_to_left(responses[row]);
            move_times[row] = move_time;
        }

        let (Some(cost), Some(left_mean)) = (tracker.total_cost(), tracker.left_mean()) else {
            continue;
        };
        if cost < best_cost {
            best_cost = cost;
            best_move_time = move_time + 1;
            threshold = Some(midpoint(current[0].0, next[0].0));
            prediction_pair = Some((left_mean, tracker.right_mean()));
        }
    }

    let assignment = move_times
        .iter()
        .map(|&t| if t < best_move_time { Side::Left } else { Side::Right })
        .collect();

    SplitCandidate {
        cost: best_cost,
        assignment,
        threshold,
        prediction_pair,
    }
}

/// A threshold `t` with `low < t <= high`, so `low` routes left and `high` right.
///
/// Halves before adding so large magnitudes cannot overflow; when rounding
/// lands the midpoint on `low` (adjacent floats), `high` itself is used.
fn midpoint(low: f64, high: f64) -> f64 {
    let t = 0.5 * low + 0.5 * high;
    if t > low && t <= high { t } else { high }
}
