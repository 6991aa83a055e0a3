//! Measured quantity recorded per baseline leaf.

use std::fmt;
use std::str::FromStr;

use crate::dimension::{token_serde, Dimension};
use crate::error::UnknownTokenError;

/// Metric a baseline target is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// Total vCPU utilization, percent
    CpuUtilizationVcpusTotal,
    /// VMM thread utilization, percent
    CpuUtilizationVmm,
    /// Throughput, Mbps
    Throughput,
    /// Latency, milliseconds
    Latency,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CpuUtilizationVcpusTotal,
        Metric::CpuUtilizationVmm,
        Metric::Throughput,
        Metric::Latency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CpuUtilizationVcpusTotal => "cpu_utilization_vcpus_total",
            Metric::CpuUtilizationVmm => "cpu_utilization_vmm",
            Metric::Throughput => "throughput",
            Metric::Latency => "latency",
        }
    }

    /// Returns true if targets are utilization percentages rather than
    /// absolute units.
    pub fn is_utilization(&self) -> bool {
        matches!(
            self,
            Metric::CpuUtilizationVcpusTotal | Metric::CpuUtilizationVmm
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu_utilization_vcpus_total" => Ok(Metric::CpuUtilizationVcpusTotal),
            "cpu_utilization_vmm" => Ok(Metric::CpuUtilizationVmm),
            "throughput" => Ok(Metric::Throughput),
            "latency" => Ok(Metric::Latency),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for Metric {
    const KIND: &'static str = "metric";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

token_serde!(Metric);
