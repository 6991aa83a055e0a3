//! # baseline-types
//!
//! Coordinate model for performance baselines.
//!
//! Every recorded expectation is addressed by a [`Coordinate`]:
//! `(InstanceType, CpuModel, Metric, GuestKernelVersion, GuestOs, MachineConfig, TestCase)`.
//! Each axis is a closed enumeration implementing [`Dimension`]: a total
//! display spelling and a partial parse that rejects unknown tokens with
//! [`UnknownTokenError`].
//!
//! ## Usage
//!
//! ```rust
//! use baseline_types::{Dimension, KernelVersion};
//!
//! let kernel = KernelVersion::to_canonical("vmlinux-5.10.bin").unwrap();
//! assert_eq!(kernel.to_external(), "5.10");
//! ```

mod dimension;

pub mod config;
pub mod coordinate;
pub mod error;
pub mod guest;
pub mod hardware;
pub mod metric;
pub mod test_case;

pub use config::Settings;
pub use coordinate::{Coordinate, LeafKey, Selector};
pub use dimension::Dimension;
pub use error::{SettingsError, UnknownTokenError};
pub use guest::{GuestOs, KernelVersion, MachineConfig};
pub use hardware::{CpuModel, InstanceType};
pub use metric::Metric;
pub use test_case::{Direction, FamilyShape, TestCase, TestFamily, Workload};
