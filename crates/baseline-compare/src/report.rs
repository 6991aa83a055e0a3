//! Comparison report assembly.
//!
//! Serialized shape:
//!
//! ```text
//! {
//!   "<test>_<kernel>": {
//!     "test": ..., "kernel": ..., "basis": ...,
//!     "stats": {
//!       "<metric>": {
//!         "target_diff_percentage": [{"model": ..., "value": {"mean", "stdev"}, ...}],
//!         "delta_percentage_diff":  [...]
//!       }
//!     },
//!     "gaps": [...],
//!     "undefined": [...]
//!   }
//! }
//! ```
//!
//! Entries keep request order; metrics follow enum order. Every list item
//! carries a `value`: a codename without defined values for a metric is
//! reported under `gaps` or `undefined` instead.

use std::collections::BTreeMap;

use baseline_parser::{BaselineDocument, LeafValues};
use baseline_types::{CpuModel, KernelVersion, LeafKey, Metric, TestFamily};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::align::{Alignment, ComparisonRecord, CoverageGap};
use crate::error::CompareError;
use crate::stats::Summary;

/// Full comparison report, one entry per requested test × kernel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    entries: Vec<TestKernelReport>,
}

impl ComparisonReport {
    pub(crate) fn push(&mut self, entry: TestKernelReport) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TestKernelReport] {
        &self.entries
    }

    pub fn get(&self, test: TestFamily, kernel: KernelVersion) -> Option<&TestKernelReport> {
        self.entries
            .iter()
            .find(|entry| entry.test == test && entry.kernel == kernel)
    }

    pub fn to_json_pretty(&self) -> Result<String, CompareError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for ComparisonReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key(), entry)?;
        }
        map.end()
    }
}

/// Comparison results of one test family on one host kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestKernelReport {
    pub test: TestFamily,
    pub kernel: KernelVersion,
    /// Label of the reference side (basis codename or source label)
    pub basis: String,
    pub stats: BTreeMap<Metric, MetricStats>,
    pub gaps: Vec<CoverageGap>,
    /// Compared leaf sets whose ratios were all undefined
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub undefined: Vec<UndefinedEntry>,
    /// Labels of sides that have no document for this test and kernel
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<DocumentMetadata>>,
}

impl TestKernelReport {
    pub fn new(test: TestFamily, kernel: KernelVersion, basis: impl Into<String>) -> Self {
        Self {
            test,
            kernel,
            basis: basis.into(),
            stats: BTreeMap::new(),
            gaps: Vec::new(),
            undefined: Vec::new(),
            missing_documents: Vec::new(),
            metadata: None,
        }
    }

    /// Top-level report key, e.g. `network_tcp_throughput_5.10`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.test, self.kernel)
    }

    /// Fold one alignment into the per-metric lists.
    ///
    /// Alignments must be added in codename order; list order follows call order.
    pub(crate) fn add_alignment(
        &mut self,
        model: CpuModel,
        source: Option<&str>,
        alignment: Alignment,
        auxiliary: bool,
    ) {
        let mut by_metric: BTreeMap<Metric, Vec<&ComparisonRecord>> = BTreeMap::new();
        for record in &alignment.records {
            by_metric.entry(record.key.metric).or_default().push(record);
        }

        for (metric, records) in by_metric {
            for quantity in [Quantity::Target, Quantity::DeltaPercentage] {
                match ReportEntry::build(quantity, model, source, &records, auxiliary) {
                    Some(entry) => self
                        .stats
                        .entry(metric)
                        .or_default()
                        .list_mut(quantity)
                        .push(entry),
                    None => self.undefined.push(UndefinedEntry {
                        model,
                        source: source.map(str::to_string),
                        metric,
                        quantity,
                        count: records.len(),
                    }),
                }
            }
        }
        self.gaps.extend(alignment.gaps);
    }

    pub(crate) fn add_metadata(&mut self, label: &str, document: &BaselineDocument) {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push(DocumentMetadata {
                label: label.to_string(),
                origin: document.origin().to_string(),
                fields: document.metadata().clone(),
            });
    }
}

/// Both per-metric lists of a report entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricStats {
    pub target_diff_percentage: Vec<ReportEntry>,
    pub delta_percentage_diff: Vec<ReportEntry>,
}

impl MetricStats {
    fn list_mut(&mut self, quantity: Quantity) -> &mut Vec<ReportEntry> {
        match quantity {
            Quantity::Target => &mut self.target_diff_percentage,
            Quantity::DeltaPercentage => &mut self.delta_percentage_diff,
        }
    }
}

/// Summary of one codename (and source, for cross-source reports) for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub model: CpuModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub value: Summary,
    /// Defined values summarized into `value`
    pub samples: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub undefined: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<EntryAuxiliary>,
}

fn is_zero(count: &usize) -> bool {
    *count == 0
}

impl ReportEntry {
    /// `None` when no record has a defined value for `quantity`.
    fn build(
        quantity: Quantity,
        model: CpuModel,
        source: Option<&str>,
        records: &[&ComparisonRecord],
        auxiliary: bool,
    ) -> Option<Self> {
        let diffs: Vec<Option<f64>> = records.iter().map(|r| quantity.diff(r)).collect();
        let value = Summary::of_defined(diffs.iter().copied())?;
        let undefined = diffs.iter().filter(|diff| diff.is_none()).count();

        let auxiliary = auxiliary.then(|| EntryAuxiliary {
            basis: Summary::of_defined(records.iter().map(|r| quantity.raw(&r.basis))),
            comparison: Summary::of_defined(records.iter().map(|r| quantity.raw(&r.comparison))),
            leaves: records
                .iter()
                .map(|r| LeafDetail {
                    key: r.key,
                    basis: quantity.raw(&r.basis),
                    comparison: quantity.raw(&r.comparison),
                    diff: quantity.diff(r),
                })
                .collect(),
        });

        Some(Self {
            model,
            source: source.map(str::to_string),
            value,
            samples: diffs.len() - undefined,
            undefined,
            auxiliary,
        })
    }
}

/// A codename and metric whose compared leaves all had undefined values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UndefinedEntry {
    pub model: CpuModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub metric: Metric,
    pub quantity: Quantity,
    pub count: usize,
}

/// Raw per-side detail behind a report entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryAuxiliary {
    pub basis: Option<Summary>,
    pub comparison: Option<Summary>,
    pub leaves: Vec<LeafDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafDetail {
    #[serde(flatten)]
    pub key: LeafKey,
    pub basis: Option<f64>,
    pub comparison: Option<f64>,
    pub diff: Option<f64>,
}

/// Top-level metadata of a compared document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub label: String,
    pub origin: String,
    pub fields: Map<String, Value>,
}

/// Which per-leaf comparison a list summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantity {
    #[serde(rename = "target_diff_percentage")]
    Target,
    #[serde(rename = "delta_percentage_diff")]
    DeltaPercentage,
}

impl Quantity {
    fn diff(self, record: &ComparisonRecord) -> Option<f64> {
        match self {
            Quantity::Target => record.target_diff_percentage,
            Quantity::DeltaPercentage => record.delta_percentage_diff,
        }
    }

    fn raw(self, values: &LeafValues) -> Option<f64> {
        match self {
            Quantity::Target => values.target,
            Quantity::DeltaPercentage => values.delta_percentage,
        }
    }
}
