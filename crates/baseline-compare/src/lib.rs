//! # baseline-compare
//!
//! Comparison engine and report assembly for performance baselines.
//!
//! Two comparisons share one alignment step:
//! - [`CpuComparator`]: every requested codename against the basis codename
//!   (the first one) within the same documents.
//! - [`SourceComparator`]: each codename of a target directory against the
//!   same codename in a source directory.
//!
//! Per leaf, `target_diff_percentage` is `comparison / basis × 100` (100
//! means unchanged) and `delta_percentage_diff` is `comparison − basis`.
//! Undefined ratios are left out of the summaries (a codename with none
//! defined is listed as an [`UndefinedEntry`]), and leaves found on one side
//! only are listed as [`CoverageGap`]s.
//!
//! [`TrendCollector`] gathers the targets of one configuration across
//! revisions.

pub mod align;
pub mod engine;
pub mod error;
pub mod report;
pub mod request;
pub mod stats;
pub mod trend;

pub use align::{align, Alignment, ComparisonRecord, CoverageGap, Side};
pub use engine::{compare_cpus, compare_sources, CpuComparator, LabeledSource, SourceComparator};
pub use error::CompareError;
pub use report::{
    ComparisonReport, DocumentMetadata, EntryAuxiliary, LeafDetail, MetricStats, Quantity,
    ReportEntry, TestKernelReport, UndefinedEntry,
};
pub use request::ComparisonRequest;
pub use stats::Summary;
pub use trend::{TrendCollector, TrendPoint, TrendQuery, TrendReport, TrendStatus};
