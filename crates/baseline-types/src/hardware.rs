//! Host hardware dimensions: instance type and CPU model.
//!
//! The same instance type can host different physical CPUs, so a
//! [`CpuModel`] is resolved from the pair (instance type, CPU description
//! string) recorded in the baseline document.

use std::fmt;
use std::str::FromStr;

use crate::dimension::{token_serde, Dimension};
use crate::error::UnknownTokenError;

/// Bare-metal host instance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstanceType {
    M5dMetal,
    M6iMetal,
    M6aMetal,
    M6gMetal,
    C7gMetal,
}

impl InstanceType {
    pub const ALL: [InstanceType; 5] = [
        InstanceType::M5dMetal,
        InstanceType::M6iMetal,
        InstanceType::M6aMetal,
        InstanceType::M6gMetal,
        InstanceType::C7gMetal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::M5dMetal => "m5d.metal",
            InstanceType::M6iMetal => "m6i.metal",
            InstanceType::M6aMetal => "m6a.metal",
            InstanceType::M6gMetal => "m6g.metal",
            InstanceType::C7gMetal => "c7g.metal",
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceType {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m5d.metal" => Ok(InstanceType::M5dMetal),
            "m6i.metal" => Ok(InstanceType::M6iMetal),
            "m6a.metal" => Ok(InstanceType::M6aMetal),
            "m6g.metal" => Ok(InstanceType::M6gMetal),
            "c7g.metal" => Ok(InstanceType::C7gMetal),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for InstanceType {
    const KIND: &'static str = "instance type";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

/// Physical CPU model, identified by its codename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CpuModel {
    SkyLake,
    CascadeLake,
    IceLake,
    Milan,
    Graviton2,
    Graviton3,
    Graviton4,
}

impl CpuModel {
    pub const ALL: [CpuModel; 7] = [
        CpuModel::SkyLake,
        CpuModel::CascadeLake,
        CpuModel::IceLake,
        CpuModel::Milan,
        CpuModel::Graviton2,
        CpuModel::Graviton3,
        CpuModel::Graviton4,
    ];

    /// Codename spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            CpuModel::SkyLake => "SkyLake",
            CpuModel::CascadeLake => "CascadeLake",
            CpuModel::IceLake => "IceLake",
            CpuModel::Milan => "Milan",
            CpuModel::Graviton2 => "Graviton2",
            CpuModel::Graviton3 => "Graviton3",
            CpuModel::Graviton4 => "Graviton4",
        }
    }

    /// Resolve the model from the pair recorded in a baseline document.
    pub fn resolve(instance_type: InstanceType, description: &str) -> Result<Self, UnknownTokenError> {
        Self::ALL
            .into_iter()
            .find(|model| {
                model.instance_type() == instance_type && model.description() == description
            })
            .ok_or_else(|| {
                UnknownTokenError::new(
                    Self::KIND,
                    format!("{} on {}", description, instance_type),
                )
            })
    }

    /// Instance type this model is benchmarked on.
    pub fn instance_type(&self) -> InstanceType {
        match self {
            CpuModel::SkyLake | CpuModel::CascadeLake => InstanceType::M5dMetal,
            CpuModel::IceLake => InstanceType::M6iMetal,
            CpuModel::Milan => InstanceType::M6aMetal,
            CpuModel::Graviton2 | CpuModel::Graviton3 => InstanceType::M6gMetal,
            CpuModel::Graviton4 => InstanceType::C7gMetal,
        }
    }

    /// CPU description string as reported by the host.
    pub fn description(&self) -> &'static str {
        match self {
            CpuModel::SkyLake => "Intel(R) Xeon(R) Platinum 8175M CPU @ 2.50GHz",
            CpuModel::CascadeLake => "Intel(R) Xeon(R) Platinum 8259CL CPU @ 2.50GHz",
            CpuModel::IceLake => "Intel(R) Xeon(R) Platinum 8375C CPU @ 2.90GHz",
            CpuModel::Milan => "AMD EPYC 7R13 48-Core Processor",
            CpuModel::Graviton2 => "ARM_NEOVERSE_N1",
            CpuModel::Graviton3 | CpuModel::Graviton4 => "ARM_NEOVERSE_V1",
        }
    }
}

impl fmt::Display for CpuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codenames are matched case-insensitively ("cascadelake", "CascadeLake").
impl FromStr for CpuModel {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skylake" => Ok(CpuModel::SkyLake),
            "cascadelake" => Ok(CpuModel::CascadeLake),
            "icelake" => Ok(CpuModel::IceLake),
            "milan" => Ok(CpuModel::Milan),
            "graviton2" => Ok(CpuModel::Graviton2),
            "graviton3" => Ok(CpuModel::Graviton3),
            "graviton4" => Ok(CpuModel::Graviton4),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for CpuModel {
    const KIND: &'static str = "cpu model";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

token_serde!(InstanceType, CpuModel);
