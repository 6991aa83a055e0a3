//! End-to-end test infrastructure for perf-baselines.
//!
//! Provides a shared TestHarness and a fluent builder for baseline
//! documents, so tests can lay out fixture directories and run the full
//! load-compare-report pipeline against them.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use baseline_parser::directory::file_name;
use baseline_types::{
    CpuModel, FamilyShape, GuestOs, KernelVersion, MachineConfig, Metric, TestCase, TestFamily,
};

/// Shared test harness for E2E tests.
///
/// Owns a temp dir with named baseline directories beneath it.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Root of the temp dir
    pub root: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with an empty temp directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Create (if needed) and return the baseline directory `name`.
    pub fn directory(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::create_dir_all(&path).expect("Failed to create baseline dir");
        path
    }

    /// Path for a report file beneath the harness root.
    pub fn output(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `document` as the `(test, kernel)` baseline file of `dir`.
pub fn write_baseline(dir: &Path, test: TestFamily, kernel: KernelVersion, document: &Value) {
    let contents = serde_json::to_string_pretty(document).expect("Failed to serialize document");
    fs::write(dir.join(file_name(test, kernel)), contents).expect("Failed to write baseline");
}

/// Read a report written by one of the commands.
pub fn read_report(path: &Path) -> Value {
    let contents = fs::read_to_string(path).expect("Failed to read report");
    serde_json::from_str(&contents).expect("Report is not valid JSON")
}

/// Builds baseline documents in the on-disk layout.
///
/// Leaves are placed under the current guest placement, which starts as
/// the 5.10 guest kernel on Ubuntu 18.04 with 2 vCPUs.
pub struct BaselineBuilder {
    instances: Map<String, Value>,
    guest_kernel: KernelVersion,
    guest_os: GuestOs,
    machine_config: MachineConfig,
    statistic: String,
}

impl BaselineBuilder {
    pub fn new() -> Self {
        Self {
            instances: Map::new(),
            guest_kernel: KernelVersion::Kernel5_10,
            guest_os: GuestOs::Ubuntu18_04,
            machine_config: MachineConfig::Vcpu2Mem1024,
            statistic: "Avg".to_string(),
        }
    }

    /// Place subsequent leaves under another guest configuration.
    pub fn guest(
        mut self,
        guest_kernel: KernelVersion,
        guest_os: GuestOs,
        machine_config: MachineConfig,
    ) -> Self {
        self.guest_kernel = guest_kernel;
        self.guest_os = guest_os;
        self.machine_config = machine_config;
        self
    }

    /// Record subsequent leaves under another statistic kind.
    pub fn statistic(mut self, statistic: &str) -> Self {
        self.statistic = statistic.to_string();
        self
    }

    /// Add one leaf.
    pub fn leaf(
        mut self,
        cpu: CpuModel,
        metric: Metric,
        test_case: TestCase,
        target: f64,
        delta_percentage: f64,
    ) -> Self {
        let values = json!({"target": target, "delta_percentage": delta_percentage});
        let statistic = self.statistic_object(cpu, metric);
        match test_case.family().shape() {
            FamilyShape::Scalar(_) => *statistic = values,
            FamilyShape::Directional => {
                if !statistic.is_object() {
                    *statistic = json!({});
                }
                statistic[test_case.to_string()] = values;
            }
        }
        self
    }

    pub fn build(self) -> Value {
        json!({
            "hosts": {"instances": Value::Object(self.instances)},
            "dimensions": ["instance", "cpu", "metric", "kernel", "os", "config"],
        })
    }

    fn cpu_entry(&mut self, cpu: CpuModel) -> &mut Value {
        let instance = self
            .instances
            .entry(cpu.instance_type().as_str())
            .or_insert_with(|| json!({"cpus": []}));
        let cpus = instance["cpus"]
            .as_array_mut()
            .expect("cpus is always an array");
        let position = cpus
            .iter()
            .position(|entry| entry["model"] == cpu.description());
        let index = match position {
            Some(index) => index,
            None => {
                cpus.push(json!({"model": cpu.description(), "baselines": {}}));
                cpus.len() - 1
            }
        };
        &mut cpus[index]
    }

    fn statistic_object(&mut self, cpu: CpuModel, metric: Metric) -> &mut Value {
        let kernel = self.guest_kernel.binary_name();
        let os = self.guest_os.rootfs_name();
        let config = format!("{}.json", self.machine_config.as_str());
        let statistic = self.statistic.clone();

        let entry = self.cpu_entry(cpu);
        &mut entry["baselines"][metric.as_str()][kernel.as_str()][os][config.as_str()]
            [statistic.as_str()]
    }
}

impl Default for BaselineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
