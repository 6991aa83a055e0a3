//! Recorded expectation at one coordinate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;

/// Target and tolerance band as recorded in the document.
///
/// A value that is present but not a finite number is kept as `None`: the
/// comparison engine reports such leaves as undefined instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafValues {
    /// Expected mean (percent of basis or absolute units, per test family)
    pub target: Option<f64>,
    /// Acceptable deviation around the target, percent
    pub delta_percentage: Option<f64>,
}

impl LeafValues {
    pub fn new(target: f64, delta_percentage: f64) -> Self {
        Self {
            target: Some(target),
            delta_percentage: Some(delta_percentage),
        }
    }

    /// Read `target` and `delta_percentage` from a JSON object.
    ///
    /// Both keys are required; their values may be non-numeric.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, ExtractError> {
        let field = |name: &str| {
            object
                .get(name)
                .map(numeric)
                .ok_or_else(|| ExtractError::shape(format!("missing `{}`", name)))
        };

        Ok(Self {
            target: field("target")?,
            delta_percentage: field("delta_percentage")?,
        })
    }
}

fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// One leaf of a [`crate::BaselineTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineLeaf {
    /// Statistic kind key the values were recorded under (e.g. "Avg")
    pub stat_kind: String,
    pub values: LeafValues,
}

impl BaselineLeaf {
    pub fn new(stat_kind: impl Into<String>, values: LeafValues) -> Self {
        Self {
            stat_kind: stat_kind.into(),
            values,
        }
    }

    pub fn target(&self) -> Option<f64> {
        self.values.target
    }

    pub fn delta_percentage(&self) -> Option<f64> {
        self.values.delta_percentage
    }
}
