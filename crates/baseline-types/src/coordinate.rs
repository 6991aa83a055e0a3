//! Canonical coordinates of baseline leaves.
//!
//! A [`Coordinate`] is the full tuple identifying one recorded expectation:
//!
//! ```text
//! (instance type, cpu model, metric, guest kernel, guest os, machine config, test case)
//! ```
//!
//! Field order is the ordering of the tuple, so sorting coordinates groups
//! leaves by host first and test case last. [`LeafKey`] drops the host
//! dimensions; it is what two CPUs (or two revisions of one CPU) are aligned on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::guest::{GuestOs, KernelVersion, MachineConfig};
use crate::hardware::{CpuModel, InstanceType};
use crate::metric::Metric;
use crate::test_case::TestCase;

/// Full coordinate of one baseline leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub instance_type: InstanceType,
    pub cpu_model: CpuModel,
    pub metric: Metric,
    pub guest_kernel: KernelVersion,
    pub guest_os: GuestOs,
    pub machine_config: MachineConfig,
    pub test_case: TestCase,
}

impl Coordinate {
    /// Host-independent part of the coordinate.
    pub fn leaf_key(&self) -> LeafKey {
        LeafKey {
            metric: self.metric,
            guest_kernel: self.guest_kernel,
            guest_os: self.guest_os,
            machine_config: self.machine_config,
            test_case: self.test_case,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.instance_type,
            self.cpu_model,
            self.leaf_key()
        )
    }
}

/// Coordinate without the host dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeafKey {
    pub metric: Metric,
    pub guest_kernel: KernelVersion,
    pub guest_os: GuestOs,
    pub machine_config: MachineConfig,
    pub test_case: TestCase,
}

impl LeafKey {
    /// Re-attach host dimensions for the given CPU.
    pub fn on(&self, cpu_model: CpuModel) -> Coordinate {
        Coordinate {
            instance_type: cpu_model.instance_type(),
            cpu_model,
            metric: self.metric,
            guest_kernel: self.guest_kernel,
            guest_os: self.guest_os,
            machine_config: self.machine_config,
            test_case: self.test_case,
        }
    }
}

impl fmt::Display for LeafKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.metric, self.guest_kernel, self.guest_os, self.machine_config, self.test_case
        )
    }
}

/// Partial coordinate: every unset dimension matches any value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    pub instance_type: Option<InstanceType>,
    pub cpu_model: Option<CpuModel>,
    pub metric: Option<Metric>,
    pub guest_kernel: Option<KernelVersion>,
    pub guest_os: Option<GuestOs>,
    pub machine_config: Option<MachineConfig>,
    pub test_case: Option<TestCase>,
}

impl Selector {
    /// Selector matching every coordinate.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn instance_type(mut self, instance_type: InstanceType) -> Self {
        self.instance_type = Some(instance_type);
        self
    }

    pub fn cpu_model(mut self, cpu_model: CpuModel) -> Self {
        self.cpu_model = Some(cpu_model);
        self
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn guest_kernel(mut self, guest_kernel: KernelVersion) -> Self {
        self.guest_kernel = Some(guest_kernel);
        self
    }

    pub fn guest_os(mut self, guest_os: GuestOs) -> Self {
        self.guest_os = Some(guest_os);
        self
    }

    pub fn machine_config(mut self, machine_config: MachineConfig) -> Self {
        self.machine_config = Some(machine_config);
        self
    }

    pub fn test_case(mut self, test_case: TestCase) -> Self {
        self.test_case = Some(test_case);
        self
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        fn accepts<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
            wanted.as_ref().map_or(true, |wanted| wanted == actual)
        }

        accepts(&self.instance_type, &coordinate.instance_type)
            && accepts(&self.cpu_model, &coordinate.cpu_model)
            && accepts(&self.metric, &coordinate.metric)
            && accepts(&self.guest_kernel, &coordinate.guest_kernel)
            && accepts(&self.guest_os, &coordinate.guest_os)
            && accepts(&self.machine_config, &coordinate.machine_config)
            && accepts(&self.test_case, &coordinate.test_case)
    }
}
