//! Summary statistics over per-leaf values.

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub stdev: f64,
}

impl Summary {
    /// Summarize `values`; `None` for an empty set.
    ///
    /// A single value has a standard deviation of 0.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        Some(Self {
            mean,
            stdev: variance.sqrt(),
        })
    }

    /// Summarize the defined values of `values`.
    pub fn of_defined(values: impl IntoIterator<Item = Option<f64>>) -> Option<Self> {
        let defined: Vec<f64> = values.into_iter().flatten().collect();
        Self::of(&defined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(Summary::of(&[]), None);
        assert_eq!(Summary::of_defined([None, None]), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(
            Summary::of(&[105.0]),
            Some(Summary {
                mean: 105.0,
                stdev: 0.0
            })
        );
    }

    #[test]
    fn test_population_stdev() {
        let summary = Summary::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.stdev, 2.0);
    }

    #[test]
    fn test_of_defined_skips_undefined() {
        let summary = Summary::of_defined([Some(90.0), None, Some(110.0)]).unwrap();
        assert_eq!(summary.mean, 100.0);
        assert_eq!(summary.stdev, 10.0);
    }
}
