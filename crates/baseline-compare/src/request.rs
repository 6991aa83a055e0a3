//! Validated comparison selections.

use std::collections::BTreeSet;

use baseline_types::{CpuModel, Dimension, KernelVersion, TestFamily};

use crate::error::CompareError;

/// What to compare: tests × kernels × codenames, in the caller's order.
///
/// For cross-CPU comparisons the first codename is the basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    tests: Vec<TestFamily>,
    kernels: Vec<KernelVersion>,
    codenames: Vec<CpuModel>,
    auxiliary: bool,
}

impl ComparisonRequest {
    /// Build a request; empty or duplicated selections are rejected.
    pub fn new(
        tests: Vec<TestFamily>,
        kernels: Vec<KernelVersion>,
        codenames: Vec<CpuModel>,
    ) -> Result<Self, CompareError> {
        Ok(Self {
            tests: distinct("tests", tests)?,
            kernels: distinct("kernels", kernels)?,
            codenames: distinct("codenames", codenames)?,
            auxiliary: false,
        })
    }

    /// Build a request from external tokens (e.g. `vmlinux-5.10.bin`, `milan`).
    pub fn from_tokens<S: AsRef<str>>(
        tests: &[S],
        kernels: &[S],
        codenames: &[S],
    ) -> Result<Self, CompareError> {
        Self::new(parse_all(tests)?, parse_all(kernels)?, parse_all(codenames)?)
    }

    /// Attach raw per-side values and document metadata to the report.
    pub fn with_auxiliary(mut self, auxiliary: bool) -> Self {
        self.auxiliary = auxiliary;
        self
    }

    pub fn tests(&self) -> &[TestFamily] {
        &self.tests
    }

    pub fn kernels(&self) -> &[KernelVersion] {
        &self.kernels
    }

    pub fn codenames(&self) -> &[CpuModel] {
        &self.codenames
    }

    pub fn auxiliary(&self) -> bool {
        self.auxiliary
    }

    /// Basis CPU of a cross-CPU comparison.
    pub fn basis(&self) -> CpuModel {
        self.codenames[0]
    }
}

fn parse_all<D: Dimension, S: AsRef<str>>(tokens: &[S]) -> Result<Vec<D>, CompareError> {
    tokens
        .iter()
        .map(|token| D::to_canonical(token.as_ref()).map_err(CompareError::from))
        .collect()
}

fn distinct<D: Dimension>(field: &str, values: Vec<D>) -> Result<Vec<D>, CompareError> {
    if values.is_empty() {
        return Err(CompareError::invalid(format!("no {} selected", field)));
    }

    let mut seen = BTreeSet::new();
    if let Some(duplicate) = values.iter().find(|value| !seen.insert(**value)) {
        return Err(CompareError::invalid(format!(
            "{} selected more than once: {}",
            D::KIND,
            duplicate
        )));
    }
    Ok(values)
}
