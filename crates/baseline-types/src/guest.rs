//! Guest-side dimensions: kernel version, guest OS image and machine config.
//!
//! Baseline documents spell these as artifact file names
//! (`vmlinux-5.10.bin`, `ubuntu-18.04.ext4`, `2vcpu_1024mb.json`) while the
//! CLI and reports use the short forms (`5.10`, `Ubuntu 18.04`,
//! `2vcpu_1024mb`). Both spellings resolve to the same value.

use std::fmt;
use std::str::FromStr;

use crate::dimension::{token_serde, Dimension};
use crate::error::UnknownTokenError;

/// Linux kernel version, used both for host kernels (one baseline file per
/// host kernel) and guest kernels (a coordinate dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KernelVersion {
    Kernel4_14,
    Kernel5_10,
    Kernel6_1,
}

impl KernelVersion {
    pub const ALL: [KernelVersion; 3] = [
        KernelVersion::Kernel4_14,
        KernelVersion::Kernel5_10,
        KernelVersion::Kernel6_1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KernelVersion::Kernel4_14 => "4.14",
            KernelVersion::Kernel5_10 => "5.10",
            KernelVersion::Kernel6_1 => "6.1",
        }
    }

    /// Guest kernel image file name.
    pub fn binary_name(&self) -> String {
        format!("vmlinux-{}.bin", self.as_str())
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelVersion {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4.14" | "vmlinux-4.14.bin" => Ok(KernelVersion::Kernel4_14),
            "5.10" | "vmlinux-5.10.bin" => Ok(KernelVersion::Kernel5_10),
            "6.1" | "vmlinux-6.1.bin" => Ok(KernelVersion::Kernel6_1),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for KernelVersion {
    const KIND: &'static str = "kernel version";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

/// Guest root filesystem image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GuestOs {
    Ubuntu18_04,
    Ubuntu22_04,
}

impl GuestOs {
    pub const ALL: [GuestOs; 2] = [GuestOs::Ubuntu18_04, GuestOs::Ubuntu22_04];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuestOs::Ubuntu18_04 => "Ubuntu 18.04",
            GuestOs::Ubuntu22_04 => "Ubuntu 22.04",
        }
    }

    /// Root filesystem image file name.
    pub fn rootfs_name(&self) -> &'static str {
        match self {
            GuestOs::Ubuntu18_04 => "ubuntu-18.04.ext4",
            GuestOs::Ubuntu22_04 => "ubuntu-22.04.ext4",
        }
    }
}

impl fmt::Display for GuestOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuestOs {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ubuntu 18.04" | "Ubuntu18.04" | "ubuntu-18.04" | "ubuntu-18.04.ext4" => {
                Ok(GuestOs::Ubuntu18_04)
            }
            "Ubuntu 22.04" | "Ubuntu22.04" | "ubuntu-22.04" | "ubuntu-22.04.ext4" => {
                Ok(GuestOs::Ubuntu22_04)
            }
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for GuestOs {
    const KIND: &'static str = "guest os";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

/// Guest machine configuration (vCPU count and memory size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MachineConfig {
    Vcpu1Mem1024,
    Vcpu2Mem1024,
}

impl MachineConfig {
    pub const ALL: [MachineConfig; 2] = [MachineConfig::Vcpu1Mem1024, MachineConfig::Vcpu2Mem1024];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineConfig::Vcpu1Mem1024 => "1vcpu_1024mb",
            MachineConfig::Vcpu2Mem1024 => "2vcpu_1024mb",
        }
    }

    pub fn vcpus(&self) -> u8 {
        match self {
            MachineConfig::Vcpu1Mem1024 => 1,
            MachineConfig::Vcpu2Mem1024 => 2,
        }
    }

    pub fn memory_mib(&self) -> u32 {
        1024
    }
}

impl fmt::Display for MachineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineConfig {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1vcpu_1024mb" | "1vcpu_1024mb.json" => Ok(MachineConfig::Vcpu1Mem1024),
            "2vcpu_1024mb" | "2vcpu_1024mb.json" => Ok(MachineConfig::Vcpu2Mem1024),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for MachineConfig {
    const KIND: &'static str = "machine config";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

token_serde!(KernelVersion, GuestOs, MachineConfig);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::assert_round_trip;

    #[test]
    fn test_round_trip() {
        assert_round_trip::<KernelVersion>();
        assert_round_trip::<GuestOs>();
        assert_round_trip::<MachineConfig>();
    }

    #[test]
    fn test_kernel_aliases() {
        assert_eq!(KernelVersion::to_canonical("5.10").unwrap(), KernelVersion::Kernel5_10);
        assert_eq!(
            KernelVersion::to_canonical("vmlinux-5.10.bin").unwrap(),
            KernelVersion::Kernel5_10
        );
        for kernel in KernelVersion::ALL {
            assert_eq!(KernelVersion::to_canonical(&kernel.binary_name()).unwrap(), kernel);
        }
        assert!(KernelVersion::to_canonical("5.15").is_err());
    }

    #[test]
    fn test_guest_os_aliases() {
        assert_eq!(
            GuestOs::to_canonical("ubuntu-18.04.ext4").unwrap(),
            GuestOs::Ubuntu18_04
        );
        assert_eq!(GuestOs::to_canonical("Ubuntu18.04").unwrap(), GuestOs::Ubuntu18_04);
        for os in GuestOs::ALL {
            assert_eq!(GuestOs::to_canonical(os.rootfs_name()).unwrap(), os);
        }
        let err = GuestOs::to_canonical("debian-12.ext4").unwrap_err();
        assert_eq!(err.kind, "guest os");
    }

    #[test]
    fn test_machine_config_aliases() {
        assert_eq!(
            MachineConfig::to_canonical("2vcpu_1024mb.json").unwrap(),
            MachineConfig::Vcpu2Mem1024
        );
        assert_eq!(MachineConfig::Vcpu2Mem1024.vcpus(), 2);
        assert_eq!(MachineConfig::Vcpu1Mem1024.memory_mib(), 1024);
        assert!(MachineConfig::to_canonical("4vcpu_2048mb.json").is_err());
    }

    #[test]
    fn test_display_is_short_form() {
        assert_eq!(KernelVersion::Kernel4_14.to_external(), "4.14");
        assert_eq!(GuestOs::Ubuntu22_04.to_external(), "Ubuntu 22.04");
        assert_eq!(MachineConfig::Vcpu1Mem1024.to_external(), "1vcpu_1024mb");
    }
}
