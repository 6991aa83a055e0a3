//! Alignment of two CPU views leaf by leaf.
//!
//! Both comparison variants reduce to the same step: take the union of the
//! leaf keys of a basis view and a comparison view, emit a record where both
//! sides have a leaf and a coverage gap where only one does.

use std::collections::BTreeSet;
use std::fmt;

use baseline_parser::{BaselineLeaf, CpuView, LeafValues};
use baseline_types::{CpuModel, LeafKey};
use serde::{Deserialize, Serialize};

/// Comparison of one leaf present on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub key: LeafKey,
    /// `comparison / basis × 100`; 100 means no change
    pub target_diff_percentage: Option<f64>,
    /// `comparison − basis` of the tolerance bands
    pub delta_percentage_diff: Option<f64>,
    pub basis: LeafValues,
    pub comparison: LeafValues,
}

impl ComparisonRecord {
    pub fn new(key: LeafKey, basis: &BaselineLeaf, comparison: &BaselineLeaf) -> Self {
        Self {
            key,
            target_diff_percentage: target_ratio(basis.target(), comparison.target()),
            delta_percentage_diff: finite_difference(
                basis.delta_percentage(),
                comparison.delta_percentage(),
            ),
            basis: basis.values,
            comparison: comparison.values,
        }
    }
}

fn target_ratio(basis: Option<f64>, comparison: Option<f64>) -> Option<f64> {
    match (basis, comparison) {
        (Some(basis), Some(comparison)) if basis != 0.0 => {
            Some(comparison / basis * 100.0).filter(|ratio| ratio.is_finite())
        }
        _ => None,
    }
}

fn finite_difference(basis: Option<f64>, comparison: Option<f64>) -> Option<f64> {
    match (basis, comparison) {
        (Some(basis), Some(comparison)) => {
            Some(comparison - basis).filter(|diff| diff.is_finite())
        }
        _ => None,
    }
}

/// Side of an alignment that holds a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Basis,
    Comparison,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Basis => "basis",
            Side::Comparison => "comparison",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coordinate present on only one side of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// CPU whose comparison has the gap
    pub model: CpuModel,
    #[serde(flatten)]
    pub key: LeafKey,
    pub present_in: Side,
}

/// Result of aligning two views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub records: Vec<ComparisonRecord>,
    pub gaps: Vec<CoverageGap>,
}

/// Align `comparison` against `basis`, in leaf key order.
///
/// `model` labels the gaps; it is the CPU being compared.
pub fn align(model: CpuModel, basis: &CpuView<'_>, comparison: &CpuView<'_>) -> Alignment {
    let keys: BTreeSet<&LeafKey> = basis.keys().chain(comparison.keys()).collect();

    let mut alignment = Alignment::default();
    for key in keys {
        match (basis.get(key), comparison.get(key)) {
            (Some(basis_leaf), Some(comparison_leaf)) => alignment
                .records
                .push(ComparisonRecord::new(*key, basis_leaf, comparison_leaf)),
            (Some(_), None) => alignment.gaps.push(CoverageGap {
                model,
                key: *key,
                present_in: Side::Basis,
            }),
            (None, Some(_)) => alignment.gaps.push(CoverageGap {
                model,
                key: *key,
                present_in: Side::Comparison,
            }),
            (None, None) => {}
        }
    }
    alignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use baseline_parser::BaselineTree;
    use baseline_types::{GuestOs, KernelVersion, MachineConfig, Metric};

    fn key(test_case: &str) -> LeafKey {
        LeafKey {
            metric: Metric::Throughput,
            guest_kernel: KernelVersion::Kernel5_10,
            guest_os: GuestOs::Ubuntu18_04,
            machine_config: MachineConfig::Vcpu2Mem1024,
            test_case: test_case.parse().unwrap(),
        }
    }

    fn leaf(target: Option<f64>, delta: Option<f64>) -> BaselineLeaf {
        BaselineLeaf::new(
            "Avg",
            LeafValues {
                target,
                delta_percentage: delta,
            },
        )
    }

    fn tree(entries: Vec<(CpuModel, &str, BaselineLeaf)>) -> BaselineTree {
        BaselineTree::from_leaves(
            entries
                .into_iter()
                .map(|(cpu, case, leaf)| (key(case).on(cpu), leaf)),
        )
        .unwrap()
    }

    #[test]
    fn test_record_ratio_and_delta() {
        let record = ComparisonRecord::new(
            key("tcp-p1024K-ws16k-g2h"),
            &leaf(Some(100.0), Some(10.0)),
            &leaf(Some(105.0), Some(12.0)),
        );
        assert_eq!(record.target_diff_percentage, Some(105.0));
        assert_eq!(record.delta_percentage_diff, Some(2.0));
    }

    #[test]
    fn test_self_comparison_is_reference() {
        let basis = leaf(Some(37.5), Some(4.0));
        let record = ComparisonRecord::new(key("tcp-p1024K-ws16k-bd"), &basis, &basis);
        assert_eq!(record.target_diff_percentage, Some(100.0));
        assert_eq!(record.delta_percentage_diff, Some(0.0));
    }

    #[test]
    fn test_zero_basis_is_undefined() {
        let record = ComparisonRecord::new(
            key("tcp-p1024K-ws16k-g2h"),
            &leaf(Some(0.0), Some(1.0)),
            &leaf(Some(5.0), Some(1.0)),
        );
        assert_eq!(record.target_diff_percentage, None);
        assert_eq!(record.delta_percentage_diff, Some(0.0));
    }

    #[test]
    fn test_non_numeric_is_undefined() {
        let record = ComparisonRecord::new(
            key("tcp-p1024K-ws16k-g2h"),
            &leaf(None, Some(1.0)),
            &leaf(Some(5.0), None),
        );
        assert_eq!(record.target_diff_percentage, None);
        assert_eq!(record.delta_percentage_diff, None);
    }

    #[test]
    fn test_overflow_is_undefined() {
        assert_eq!(target_ratio(Some(f64::MIN_POSITIVE), Some(f64::MAX)), None);
    }

    #[test]
    fn test_symmetry() {
        let a = leaf(Some(80.0), Some(5.0));
        let b = leaf(Some(120.0), Some(5.0));
        let k = key("tcp-pDEFAULT-ws256k-h2g");
        let forward = ComparisonRecord::new(k, &a, &b).target_diff_percentage.unwrap();
        let reverse = ComparisonRecord::new(k, &b, &a).target_diff_percentage.unwrap();
        assert!((100.0 / forward * 100.0 - reverse).abs() < 1e-9);
    }

    #[test]
    fn test_align_reports_gaps() {
        let tree = tree(vec![
            (CpuModel::CascadeLake, "tcp-p1024K-ws16k-g2h", leaf(Some(100.0), Some(10.0))),
            (CpuModel::CascadeLake, "tcp-p1024K-ws16k-h2g", leaf(Some(50.0), Some(10.0))),
            (CpuModel::Milan, "tcp-p1024K-ws16k-g2h", leaf(Some(105.0), Some(12.0))),
            (CpuModel::Milan, "tcp-p1024K-ws16k-bd", leaf(Some(70.0), Some(12.0))),
        ]);

        let alignment = align(
            CpuModel::Milan,
            &tree.for_cpu(CpuModel::CascadeLake),
            &tree.for_cpu(CpuModel::Milan),
        );

        assert_eq!(alignment.records.len(), 1);
        assert_eq!(alignment.records[0].target_diff_percentage, Some(105.0));
        assert_eq!(
            alignment.gaps,
            vec![
                CoverageGap {
                    model: CpuModel::Milan,
                    key: key("tcp-p1024K-ws16k-h2g"),
                    present_in: Side::Basis,
                },
                CoverageGap {
                    model: CpuModel::Milan,
                    key: key("tcp-p1024K-ws16k-bd"),
                    present_in: Side::Comparison,
                },
            ]
        );
    }

    #[test]
    fn test_gap_serializes_flat() {
        let gap = CoverageGap {
            model: CpuModel::Graviton2,
            key: key("tcp-p1024K-ws16k-g2h"),
            present_in: Side::Comparison,
        };
        let json = serde_json::to_value(&gap).unwrap();
        assert_eq!(json["model"], "Graviton2");
        assert_eq!(json["test_case"], "tcp-p1024K-ws16k-g2h");
        assert_eq!(json["present_in"], "comparison");
    }
}
