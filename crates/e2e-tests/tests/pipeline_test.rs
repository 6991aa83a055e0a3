//! End-to-end pipeline tests for perf-baselines.
//!
//! Fixture directories -> document loading -> comparison -> JSON report,
//! driven through the same handlers the `compare-baselines` binary uses.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use baseline_cli::{compare_cpu_models, compare_directories, FilterArgs};
use baseline_types::{
    CpuModel, Direction, GuestOs, KernelVersion, MachineConfig, Metric, Settings, TestCase,
    TestFamily, Workload,
};
use e2e_tests::{read_report, write_baseline, BaselineBuilder, TestHarness};

fn tcp(direction: Direction) -> TestCase {
    TestCase::new(Workload::TcpP1024KWs16K, Some(direction)).unwrap()
}

fn ping() -> TestCase {
    TestCase::new(Workload::Ping, None).unwrap()
}

fn filters(tests: Vec<TestFamily>, codenames: Vec<CpuModel>, output: String) -> FilterArgs {
    FilterArgs {
        tests,
        kernels: vec![KernelVersion::Kernel5_10],
        codenames,
        output: Some(output),
        auxiliary: false,
    }
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("Expected a number, got: {value}"));
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {expected}, got {actual}"
    );
}

fn throughput_fixture() -> Value {
    BaselineBuilder::new()
        .leaf(CpuModel::CascadeLake, Metric::Throughput, tcp(Direction::GuestToHost), 1000.0, 5.0)
        .leaf(CpuModel::CascadeLake, Metric::Throughput, tcp(Direction::HostToGuest), 800.0, 5.0)
        .leaf(CpuModel::CascadeLake, Metric::CpuUtilizationVmm, tcp(Direction::GuestToHost), 50.0, 10.0)
        .leaf(CpuModel::Milan, Metric::Throughput, tcp(Direction::GuestToHost), 1100.0, 7.0)
        .leaf(CpuModel::Milan, Metric::Throughput, tcp(Direction::HostToGuest), 1000.0, 3.0)
        .leaf(CpuModel::Milan, Metric::CpuUtilizationVmm, tcp(Direction::GuestToHost), 40.0, 10.0)
        .build()
}

fn latency_fixture() -> Value {
    BaselineBuilder::new()
        .leaf(CpuModel::CascadeLake, Metric::Latency, ping(), 0.050, 10.0)
        .leaf(CpuModel::Milan, Metric::Latency, ping(), 0.040, 20.0)
        .build()
}

/// Cross-CPU: throughput and latency families through the `cpu` handler.
#[test]
fn test_cross_cpu_pipeline() {
    let harness = TestHarness::new();
    let configs = harness.directory("configs");
    write_baseline(&configs, TestFamily::NetworkTcpThroughput, KernelVersion::Kernel5_10, &throughput_fixture());
    write_baseline(&configs, TestFamily::NetworkLatency, KernelVersion::Kernel5_10, &latency_fixture());
    let output = harness.output("report.json");

    compare_cpu_models(
        &Settings::default(),
        Some(configs.to_str().unwrap()),
        &filters(
            vec![TestFamily::NetworkTcpThroughput, TestFamily::NetworkLatency],
            vec![CpuModel::CascadeLake, CpuModel::Milan],
            output.to_string_lossy().into_owned(),
        ),
    )
    .unwrap();

    let report = read_report(&output);
    let keys: Vec<&String> = report.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["network_tcp_throughput_5.10", "network_latency_5.10"]);

    // Milan: g2h 110%, h2g 125% of CascadeLake
    let throughput = &report["network_tcp_throughput_5.10"]["stats"]["throughput"];
    let milan = &throughput["target_diff_percentage"][1];
    assert_eq!(milan["model"], "Milan");
    assert_close(&milan["value"]["mean"], 117.5);
    assert_close(&milan["value"]["stdev"], 7.5);
    assert_eq!(milan["samples"], 2);

    let milan_delta = &throughput["delta_percentage_diff"][1];
    assert_close(&milan_delta["value"]["mean"], 0.0);
    assert_close(&milan_delta["value"]["stdev"], 2.0);

    let vmm = &report["network_tcp_throughput_5.10"]["stats"]["cpu_utilization_vmm"];
    assert_close(&vmm["target_diff_percentage"][1]["value"]["mean"], 80.0);

    let latency = &report["network_latency_5.10"]["stats"]["latency"];
    assert_close(&latency["target_diff_percentage"][1]["value"]["mean"], 80.0);
    assert_close(&latency["delta_percentage_diff"][1]["value"]["mean"], 10.0);

    assert_eq!(report["network_tcp_throughput_5.10"]["gaps"], json!([]));
}

/// Basis listed first; the basis entry compares against itself.
#[test]
fn test_basis_self_entry() {
    let harness = TestHarness::new();
    let configs = harness.directory("configs");
    write_baseline(&configs, TestFamily::NetworkLatency, KernelVersion::Kernel5_10, &latency_fixture());
    let output = harness.output("report.json");

    compare_cpu_models(
        &Settings::default(),
        Some(configs.to_str().unwrap()),
        &filters(
            vec![TestFamily::NetworkLatency],
            vec![CpuModel::Milan, CpuModel::CascadeLake],
            output.to_string_lossy().into_owned(),
        ),
    )
    .unwrap();

    let report = read_report(&output);
    let entry = &report["network_latency_5.10"];
    assert_eq!(entry["basis"], "Milan");
    let targets = &entry["stats"]["latency"]["target_diff_percentage"];
    assert_eq!(targets[0]["model"], "Milan");
    assert_eq!(targets[0]["value"], json!({"mean": 100.0, "stdev": 0.0}));
    assert_eq!(targets[1]["model"], "CascadeLake");
    assert_close(&targets[1]["value"]["mean"], 125.0);
}

/// Codenames without baselines only show up as gaps; every list item has a value.
#[test]
fn test_cross_cpu_all_codenames_renderable() {
    let harness = TestHarness::new();
    let configs = harness.directory("configs");
    write_baseline(&configs, TestFamily::NetworkTcpThroughput, KernelVersion::Kernel5_10, &throughput_fixture());
    let output = harness.output("report.json");

    let mut codenames = vec![CpuModel::CascadeLake];
    codenames.extend(CpuModel::ALL.into_iter().filter(|m| *m != CpuModel::CascadeLake));
    compare_cpu_models(
        &Settings::default(),
        Some(configs.to_str().unwrap()),
        &filters(
            vec![TestFamily::NetworkTcpThroughput],
            codenames,
            output.to_string_lossy().into_owned(),
        ),
    )
    .unwrap();

    let report = read_report(&output);
    let entry = &report["network_tcp_throughput_5.10"];
    for lists in entry["stats"].as_object().unwrap().values() {
        for items in lists.as_object().unwrap().values() {
            let models: Vec<&Value> = items
                .as_array()
                .unwrap()
                .iter()
                .inspect(|item| assert!(item["value"]["mean"].is_f64(), "item without value: {item}"))
                .map(|item| &item["model"])
                .collect();
            assert_eq!(models, vec!["CascadeLake", "Milan"]);
        }
    }
    // 3 CascadeLake leaves missing on each of the 5 absent codenames
    assert_eq!(entry["gaps"].as_array().unwrap().len(), 15);
}

/// Leaves recorded under a different guest configuration are gaps, not matches.
#[test]
fn test_cross_source_pipeline_with_gaps() {
    let harness = TestHarness::new();
    let before = harness.directory("before");
    let after = harness.directory("after");

    write_baseline(
        &before,
        TestFamily::NetworkLatency,
        KernelVersion::Kernel5_10,
        &BaselineBuilder::new()
            .leaf(CpuModel::IceLake, Metric::Latency, ping(), 0.1, 10.0)
            .build(),
    );
    write_baseline(
        &after,
        TestFamily::NetworkLatency,
        KernelVersion::Kernel5_10,
        &BaselineBuilder::new()
            .leaf(CpuModel::IceLake, Metric::Latency, ping(), 0.2, 15.0)
            .guest(KernelVersion::Kernel6_1, GuestOs::Ubuntu22_04, MachineConfig::Vcpu1Mem1024)
            .leaf(CpuModel::IceLake, Metric::Latency, ping(), 0.3, 15.0)
            .build(),
    );
    let output = harness.output("report.json");

    compare_directories(
        &Settings::default(),
        before.to_str().unwrap(),
        after.to_str().unwrap(),
        &filters(
            vec![TestFamily::NetworkLatency],
            vec![CpuModel::IceLake],
            output.to_string_lossy().into_owned(),
        ),
    )
    .unwrap();

    let report = read_report(&output);
    let entry = &report["network_latency_5.10"];
    assert_eq!(entry["basis"], before.display().to_string());
    let item = &entry["stats"]["latency"]["target_diff_percentage"][0];
    assert_eq!(item["source"], after.display().to_string());
    assert_close(&item["value"]["mean"], 200.0);

    let gaps = entry["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["model"], "IceLake");
    assert_eq!(gaps[0]["guest_kernel"], "6.1");
    assert_eq!(gaps[0]["present_in"], "comparison");
}

/// A missing file becomes a listed gap in the report instead of an error.
#[test]
fn test_missing_document_is_reported() {
    let harness = TestHarness::new();
    let configs = harness.directory("configs");
    write_baseline(&configs, TestFamily::NetworkLatency, KernelVersion::Kernel5_10, &latency_fixture());
    let output = harness.output("report.json");

    let mut args = filters(
        vec![TestFamily::NetworkLatency],
        vec![CpuModel::CascadeLake, CpuModel::Milan],
        output.to_string_lossy().into_owned(),
    );
    args.kernels = vec![KernelVersion::Kernel5_10, KernelVersion::Kernel6_1];
    compare_cpu_models(&Settings::default(), Some(configs.to_str().unwrap()), &args).unwrap();

    let report = read_report(&output);
    let missing = &report["network_latency_6.1"];
    assert_eq!(missing["missing_documents"], json!([configs.display().to_string()]));
    assert_eq!(missing["stats"], json!({}));
    assert!(report["network_latency_5.10"].get("missing_documents").is_none());
}

/// Auxiliary output carries raw values and document metadata.
#[test]
fn test_auxiliary_pipeline() {
    let harness = TestHarness::new();
    let configs = harness.directory("configs");
    write_baseline(&configs, TestFamily::NetworkLatency, KernelVersion::Kernel5_10, &latency_fixture());
    let output = harness.output("report.json");

    let mut args = filters(
        vec![TestFamily::NetworkLatency],
        vec![CpuModel::CascadeLake, CpuModel::Milan],
        output.to_string_lossy().into_owned(),
    );
    args.auxiliary = true;
    compare_cpu_models(&Settings::default(), Some(configs.to_str().unwrap()), &args).unwrap();

    let report = read_report(&output);
    let entry = &report["network_latency_5.10"];
    let metadata = entry["metadata"].as_array().unwrap();
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0]["fields"]["dimensions"][0], "instance");

    let auxiliary = &entry["stats"]["latency"]["target_diff_percentage"][1]["auxiliary"];
    assert_eq!(auxiliary["leaves"].as_array().unwrap().len(), 1);
}

/// Two runs over the same inputs produce byte-identical reports.
#[test]
fn test_reports_are_deterministic() {
    let harness = TestHarness::new();
    let configs = harness.directory("configs");
    write_baseline(&configs, TestFamily::NetworkTcpThroughput, KernelVersion::Kernel5_10, &throughput_fixture());
    write_baseline(&configs, TestFamily::NetworkLatency, KernelVersion::Kernel5_10, &latency_fixture());

    let run = |name: &str| {
        let output = harness.output(name);
        let mut args = filters(
            TestFamily::ALL.to_vec(),
            vec![CpuModel::Milan, CpuModel::CascadeLake, CpuModel::Graviton2],
            output.to_string_lossy().into_owned(),
        );
        args.auxiliary = true;
        compare_cpu_models(&Settings::default(), Some(configs.to_str().unwrap()), &args).unwrap();
        std::fs::read_to_string(output).unwrap()
    };

    let first = run("first.json");
    let second = run("second.json");
    assert_eq!(first, second);
    assert!(!first.contains("NaN"));
}
