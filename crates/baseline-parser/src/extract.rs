//! Statistic-object extraction per test family.
//!
//! The innermost object of a baseline document differs between families:
//! throughput families key it by `<workload>-<direction>`, scalar families
//! store a single `target`/`delta_percentage` pair directly.

use baseline_types::{FamilyShape, TestCase, TestFamily};
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::leaf::LeafValues;

/// Values extracted from one statistic object.
pub type Extracted = Vec<(TestCase, LeafValues)>;

/// Turns the statistic object found under a statistic-kind key into
/// per-test-case values.
pub trait LeafExtractor {
    fn extract(&self, statistic: &Map<String, Value>) -> Result<Extracted, ExtractError>;
}

impl LeafExtractor for TestFamily {
    fn extract(&self, statistic: &Map<String, Value>) -> Result<Extracted, ExtractError> {
        match self.shape() {
            FamilyShape::Scalar(workload) => {
                let values = LeafValues::from_object(statistic)?;
                Ok(vec![(TestCase::new(workload, None)?, values)])
            }
            FamilyShape::Directional => {
                if statistic.is_empty() {
                    return Err(ExtractError::shape("statistic object has no test cases"));
                }

                statistic
                    .iter()
                    .map(|(token, entry)| {
                        let test_case: TestCase = token.parse()?;
                        if test_case.family() != *self {
                            return Err(ExtractError::shape(format!(
                                "test case `{}` does not belong to {}",
                                token, self
                            )));
                        }
                        let object = entry.as_object().ok_or_else(|| {
                            ExtractError::shape(format!("test case `{}` is not an object", token))
                        })?;
                        Ok((test_case, LeafValues::from_object(object)?))
                    })
                    .collect()
            }
        }
    }
}

impl<F> LeafExtractor for F
where
    F: Fn(&Map<String, Value>) -> Result<Extracted, ExtractError>,
{
    fn extract(&self, statistic: &Map<String, Value>) -> Result<Extracted, ExtractError> {
        self(statistic)
    }
}
