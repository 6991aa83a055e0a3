//! Baseline targets across revisions.
//!
//! Collects, for one CPU and guest configuration, how the recorded targets
//! of a test family evolve over an ordered list of revisions.

use std::collections::BTreeMap;

use baseline_parser::BaselineDocument;
use baseline_types::{
    CpuModel, Direction, FamilyShape, GuestOs, KernelVersion, MachineConfig, Metric, Selector,
    TestCase, TestFamily,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CompareError;

/// Which slice of each revision's baselines to collect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendQuery {
    pub test: TestFamily,
    pub host_kernel: KernelVersion,
    pub cpu_model: CpuModel,
    pub guest_kernel: KernelVersion,
    pub guest_os: GuestOs,
    pub machine_config: MachineConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub metrics: Vec<Metric>,
}

impl TrendQuery {
    /// Query every metric of `test` on Ubuntu 18.04 with 2 vCPUs.
    pub fn new(
        test: TestFamily,
        host_kernel: KernelVersion,
        cpu_model: CpuModel,
        guest_kernel: KernelVersion,
    ) -> Self {
        Self {
            test,
            host_kernel,
            cpu_model,
            guest_kernel,
            guest_os: GuestOs::Ubuntu18_04,
            machine_config: MachineConfig::Vcpu2Mem1024,
            direction: None,
            metrics: Metric::ALL.to_vec(),
        }
    }

    pub fn with_guest_os(mut self, guest_os: GuestOs) -> Self {
        self.guest_os = guest_os;
        self
    }

    pub fn with_machine_config(mut self, machine_config: MachineConfig) -> Self {
        self.machine_config = machine_config;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    fn validate(&self) -> Result<(), CompareError> {
        if self.metrics.is_empty() {
            return Err(CompareError::invalid("no metrics selected"));
        }
        if self.direction.is_some() && self.test.shape() != FamilyShape::Directional {
            return Err(CompareError::invalid(format!(
                "{} has no directional test cases",
                self.test
            )));
        }
        Ok(())
    }

    fn selector(&self, metric: Metric) -> Selector {
        Selector::any()
            .cpu_model(self.cpu_model)
            .metric(metric)
            .guest_kernel(self.guest_kernel)
            .guest_os(self.guest_os)
            .machine_config(self.machine_config)
    }
}

/// Outcome of looking a revision up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Found,
    MissingDocument,
    MissingCpu,
    MissingGuestKernel,
}

/// Targets of one revision, keyed by metric then test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub revision: String,
    pub status: TrendStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<Metric, BTreeMap<TestCase, Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub query: TrendQuery,
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    /// Revisions that had data for the query.
    pub fn found(&self) -> impl Iterator<Item = &TrendPoint> {
        self.points
            .iter()
            .filter(|point| point.status == TrendStatus::Found)
    }
}

/// Accumulates trend points revision by revision.
pub struct TrendCollector {
    query: TrendQuery,
    points: Vec<TrendPoint>,
}

impl TrendCollector {
    pub fn new(query: TrendQuery) -> Result<Self, CompareError> {
        query.validate()?;
        Ok(Self {
            query,
            points: Vec::new(),
        })
    }

    pub fn query(&self) -> &TrendQuery {
        &self.query
    }

    /// Record the document of `revision` (or its absence).
    pub fn record(&mut self, revision: impl Into<String>, document: Option<&BaselineDocument>) {
        let revision = revision.into();
        let (status, values) = match document {
            None => (TrendStatus::MissingDocument, BTreeMap::new()),
            Some(document) => self.collect(document),
        };

        if status == TrendStatus::Found {
            debug!(%revision, metrics = values.len(), "Collected revision targets");
        } else {
            warn!(%revision, ?status, "No data for revision");
        }
        self.points.push(TrendPoint {
            revision,
            status,
            values,
        });
    }

    fn collect(
        &self,
        document: &BaselineDocument,
    ) -> (TrendStatus, BTreeMap<Metric, BTreeMap<TestCase, Option<f64>>>) {
        let tree = document.tree();
        let query = &self.query;

        if !tree.cpu_models().contains(&query.cpu_model) {
            return (TrendStatus::MissingCpu, BTreeMap::new());
        }
        let cpu_and_kernel = Selector::any()
            .cpu_model(query.cpu_model)
            .guest_kernel(query.guest_kernel);
        if tree.select(cpu_and_kernel).next().is_none() {
            return (TrendStatus::MissingGuestKernel, BTreeMap::new());
        }

        let values = query
            .metrics
            .iter()
            .map(|&metric| {
                let targets = tree
                    .select(query.selector(metric))
                    .filter(|(coordinate, _)| {
                        query.direction.is_none()
                            || coordinate.test_case.direction() == query.direction
                    })
                    .map(|(coordinate, leaf)| (coordinate.test_case, leaf.target()))
                    .collect();
                (metric, targets)
            })
            .collect();
        (TrendStatus::Found, values)
    }

    pub fn finish(self) -> TrendReport {
        TrendReport {
            query: self.query,
            points: self.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baseline_types::Workload;
    use serde_json::json;

    fn tcp_document(target: f64) -> BaselineDocument {
        let value = json!({
            "hosts": {"instances": {"m5d.metal": {"cpus": [{
                "model": "Intel(R) Xeon(R) Platinum 8259CL CPU @ 2.50GHz",
                "baselines": {"throughput": {"vmlinux-5.10.bin": {"ubuntu-18.04.ext4": {
                    "2vcpu_1024mb.json": {"Avg": {
                        "tcp-p1024K-ws16k-g2h": {"target": target, "delta_percentage": 5},
                        "tcp-p1024K-ws16k-h2g": {"target": target * 2.0, "delta_percentage": 5}
                    }}
                }}}}
            }]}}}
        });
        BaselineDocument::from_value(value, &TestFamily::NetworkTcpThroughput).unwrap()
    }

    fn query() -> TrendQuery {
        TrendQuery::new(
            TestFamily::NetworkTcpThroughput,
            KernelVersion::Kernel5_10,
            CpuModel::CascadeLake,
            KernelVersion::Kernel5_10,
        )
        .with_metrics(vec![Metric::Throughput])
    }

    #[test]
    fn test_collects_targets_per_revision() {
        let mut collector = TrendCollector::new(query()).unwrap();
        collector.record("v1.4", Some(&tcp_document(100.0)));
        collector.record("v1.5", None);
        collector.record("main", Some(&tcp_document(120.0)));
        let report = collector.finish();

        let statuses: Vec<_> = report.points.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                TrendStatus::Found,
                TrendStatus::MissingDocument,
                TrendStatus::Found
            ]
        );
        assert_eq!(report.found().count(), 2);

        let g2h = TestCase::new(Workload::TcpP1024KWs16K, Some(Direction::GuestToHost)).unwrap();
        assert_eq!(report.points[2].values[&Metric::Throughput][&g2h], Some(120.0));
        assert_eq!(report.points[0].values[&Metric::Throughput].len(), 2);
    }

    #[test]
    fn test_direction_filter() {
        let mut collector =
            TrendCollector::new(query().with_direction(Direction::HostToGuest)).unwrap();
        collector.record("main", Some(&tcp_document(10.0)));
        let report = collector.finish();

        let targets = &report.points[0].values[&Metric::Throughput];
        assert_eq!(targets.len(), 1);
        assert_eq!(targets.values().next(), Some(&Some(20.0)));
    }

    #[test]
    fn test_missing_cpu_and_kernel() {
        let mut other_cpu = query();
        other_cpu.cpu_model = CpuModel::Milan;
        let mut collector = TrendCollector::new(other_cpu).unwrap();
        collector.record("main", Some(&tcp_document(1.0)));
        assert_eq!(collector.finish().points[0].status, TrendStatus::MissingCpu);

        let mut other_kernel = query();
        other_kernel.guest_kernel = KernelVersion::Kernel6_1;
        let mut collector = TrendCollector::new(other_kernel).unwrap();
        collector.record("main", Some(&tcp_document(1.0)));
        assert_eq!(
            collector.finish().points[0].status,
            TrendStatus::MissingGuestKernel
        );
    }

    #[test]
    fn test_invalid_queries() {
        assert!(TrendCollector::new(query().with_metrics(vec![])).is_err());

        let latency = TrendQuery::new(
            TestFamily::NetworkLatency,
            KernelVersion::Kernel5_10,
            CpuModel::Milan,
            KernelVersion::Kernel5_10,
        )
        .with_direction(Direction::Bidirectional);
        assert!(TrendCollector::new(latency).is_err());
    }

    #[test]
    fn test_serialized_point() {
        let mut collector = TrendCollector::new(query()).unwrap();
        collector.record("v1.4", None);
        collector.record("main", Some(&tcp_document(5.0)));
        let json = serde_json::to_value(collector.finish()).unwrap();

        assert_eq!(json["query"]["cpu_model"], "CascadeLake");
        assert_eq!(json["points"][0]["status"], "missing_document");
        assert!(json["points"][0].get("values").is_none());
        assert_eq!(
            json["points"][1]["values"]["throughput"]["tcp-p1024K-ws16k-g2h"],
            5.0
        );
    }
}
