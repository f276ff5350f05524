use serde::{Deserialize, Serialize};

/// How a numeric column folds into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reducer {
    Sum,
    Count,
    Average,
    Min,
    Max,
}

impl Reducer {
    /// Fold `values`. An empty input reduces to 0 for every reducer.
    pub fn reduce<I: IntoIterator<Item = f64>>(self, values: I) -> f64 {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
        if count == 0 {
            return 0.0;
        }
        match self {
            Reducer::Sum => sum,
            Reducer::Count => count as f64,
            Reducer::Average => sum / count as f64,
            Reducer::Min => min,
            Reducer::Max => max,
        }
    }
}

/// Per-partition statistics from a grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub count: usize,
    pub sum: f64,
}

impl GroupStats {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// `part / whole * 100`, rounded to one decimal place.
///
/// Returns 0 when `whole` is 0 or the ratio is not finite, so an emptied
/// subset renders as "0%" rather than `NaN%`.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let ratio = part / whole * 100.0;
    if !ratio.is_finite() {
        return 0.0;
    }
    round_to_tenth(ratio)
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
