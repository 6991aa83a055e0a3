//! Cross-CPU and cross-source comparators.

use baseline_parser::{BaselineDirectory, BaselineDocument, BaselineTree};
use baseline_types::{KernelVersion, TestFamily};
use tracing::{debug, info, warn};

use crate::align::align;
use crate::error::CompareError;
use crate::report::{ComparisonReport, TestKernelReport};
use crate::request::ComparisonRequest;

/// Compares every requested codename against the basis codename, within
/// the documents of one baseline directory.
pub struct CpuComparator<'a> {
    directory: &'a BaselineDirectory,
}

impl<'a> CpuComparator<'a> {
    pub fn new(directory: &'a BaselineDirectory) -> Self {
        Self { directory }
    }

    pub fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonReport, CompareError> {
        info!(
            directory = %self.directory.root().display(),
            basis = %request.basis(),
            "Comparing CPU models"
        );

        let label = self.directory.root().display().to_string();
        let mut report = ComparisonReport::default();
        for &test in request.tests() {
            for &kernel in request.kernels() {
                let document = self.directory.load(test, kernel)?;
                report.push(compare_cpus(
                    test,
                    kernel,
                    LabeledSource {
                        label: &label,
                        document: document.as_ref(),
                    },
                    request,
                ));
            }
        }
        Ok(report)
    }
}

/// Cross-CPU comparison of one document.
///
/// The basis codename is compared against itself as well, which yields the
/// reference entry (100 / 0) at the head of every list.
pub fn compare_cpus(
    test: TestFamily,
    kernel: KernelVersion,
    document: LabeledSource<'_>,
    request: &ComparisonRequest,
) -> TestKernelReport {
    let basis = request.basis();
    let mut entry = TestKernelReport::new(test, kernel, basis.to_string());

    let empty = BaselineTree::default();
    let tree = side_tree(&mut entry, document, &empty, request.auxiliary());

    let basis_view = tree.for_cpu(basis);
    for &model in request.codenames() {
        let alignment = align(model, &basis_view, &tree.for_cpu(model));
        debug!(
            %test,
            %kernel,
            %model,
            records = alignment.records.len(),
            gaps = alignment.gaps.len(),
            "Aligned CPU against basis"
        );
        if !alignment.gaps.is_empty() {
            warn!(%test, %kernel, %model, gaps = alignment.gaps.len(), "Coverage gaps against basis");
        }
        entry.add_alignment(model, None, alignment, request.auxiliary());
    }
    entry
}

/// Tree of one side; a missing document is recorded and reads as empty.
fn side_tree<'t>(
    entry: &mut TestKernelReport,
    side: LabeledSource<'t>,
    empty: &'t BaselineTree,
    auxiliary: bool,
) -> &'t BaselineTree {
    match side.document {
        Some(document) => {
            if auxiliary {
                entry.add_metadata(side.label, document);
            }
            document.tree()
        }
        None => {
            warn!(
                test = %entry.test,
                kernel = %entry.kernel,
                side = side.label,
                "No baseline document"
            );
            entry.missing_documents.push(side.label.to_string());
            empty
        }
    }
}

/// Compares two baseline directories (or two checkouts of one directory)
/// codename by codename: the target side against the source side.
pub struct SourceComparator<'a> {
    source: &'a BaselineDirectory,
    target: &'a BaselineDirectory,
    source_label: String,
    target_label: String,
}

impl<'a> SourceComparator<'a> {
    /// Sides are labelled with their directory paths.
    pub fn new(source: &'a BaselineDirectory, target: &'a BaselineDirectory) -> Self {
        Self {
            source,
            target,
            source_label: source.root().display().to_string(),
            target_label: target.root().display().to_string(),
        }
    }

    /// Replace the side labels (e.g. with revision names).
    pub fn with_labels(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_label = source.into();
        self.target_label = target.into();
        self
    }

    pub fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonReport, CompareError> {
        info!(
            source = %self.source_label,
            target = %self.target_label,
            "Comparing baseline sources"
        );

        let mut report = ComparisonReport::default();
        for &test in request.tests() {
            for &kernel in request.kernels() {
                let source = self.source.load(test, kernel)?;
                let target = self.target.load(test, kernel)?;
                report.push(compare_sources(
                    test,
                    kernel,
                    LabeledSource {
                        label: &self.source_label,
                        document: source.as_ref(),
                    },
                    LabeledSource {
                        label: &self.target_label,
                        document: target.as_ref(),
                    },
                    request,
                ));
            }
        }
        Ok(report)
    }
}

/// A baseline document (if any) together with the label of its side.
#[derive(Debug, Clone, Copy)]
pub struct LabeledSource<'a> {
    pub label: &'a str,
    pub document: Option<&'a BaselineDocument>,
}

/// Cross-source comparison of one test and kernel.
///
/// A side without a document contributes no leaves, so every leaf of the
/// other side becomes a coverage gap.
pub fn compare_sources(
    test: TestFamily,
    kernel: KernelVersion,
    source: LabeledSource<'_>,
    target: LabeledSource<'_>,
    request: &ComparisonRequest,
) -> TestKernelReport {
    let mut entry = TestKernelReport::new(test, kernel, source.label);

    let empty = BaselineTree::default();
    let source_tree = side_tree(&mut entry, source, &empty, request.auxiliary());
    let target_tree = side_tree(&mut entry, target, &empty, request.auxiliary());

    for &model in request.codenames() {
        let alignment = align(model, &source_tree.for_cpu(model), &target_tree.for_cpu(model));
        debug!(
            %test,
            %kernel,
            %model,
            records = alignment.records.len(),
            gaps = alignment.gaps.len(),
            "Aligned target against source"
        );
        if !alignment.gaps.is_empty() {
            warn!(%test, %kernel, %model, gaps = alignment.gaps.len(), "Coverage gaps against source");
        }
        entry.add_alignment(model, Some(target.label), alignment, request.auxiliary());
    }
    entry
}
