//! Baseline document loading.
//!
//! Layout of a baseline document:
//!
//! ```text
//! hosts.instances.<instance type>.cpus[]
//!     .model                      CPU description
//!     .baselines.<metric>.<guest kernel>.<guest os>.<machine config>
//!         .<statistic kind>       exactly one key
//!             <statistic object>  handed to the LeafExtractor
//! ```
//!
//! Every other top-level key is metadata and is kept verbatim.

use std::fmt;
use std::fs;
use std::path::Path;

use baseline_types::{
    Coordinate, CpuModel, Dimension, GuestOs, InstanceType, KernelVersion, MachineConfig, Metric,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::BaselineError;
use crate::extract::LeafExtractor;
use crate::leaf::BaselineLeaf;
use crate::tree::BaselineTree;

const INLINE_ORIGIN: &str = "inline document";

/// A parsed baseline document: metadata plus the leaf tree.
#[derive(Debug, Clone)]
pub struct BaselineDocument {
    origin: String,
    metadata: Map<String, Value>,
    tree: BaselineTree,
}

impl BaselineDocument {
    /// Read and parse the document at `path`.
    pub fn load(path: &Path, extractor: &impl LeafExtractor) -> Result<Self, BaselineError> {
        let raw = fs::read_to_string(path).map_err(|source| BaselineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = path.display().to_string();
        let value: Value = serde_json::from_str(&raw).map_err(|source| BaselineError::Json {
            origin: origin.clone(),
            source,
        })?;

        let mut document = Self::from_value(value, extractor)?;
        document.origin = origin;
        debug!(
            origin = %document.origin,
            leaves = document.tree.len(),
            "Loaded baseline document"
        );
        Ok(document)
    }

    /// Parse a document held in memory.
    pub fn parse_str(raw: &str, extractor: &impl LeafExtractor) -> Result<Self, BaselineError> {
        let value: Value = serde_json::from_str(raw).map_err(|source| BaselineError::Json {
            origin: INLINE_ORIGIN.to_string(),
            source,
        })?;
        Self::from_value(value, extractor)
    }

    /// Build a document from an already decoded JSON value.
    pub fn from_value(value: Value, extractor: &impl LeafExtractor) -> Result<Self, BaselineError> {
        let root = Location::root();
        let Value::Object(mut metadata) = value else {
            return Err(BaselineError::malformed(root, "document is not an object"));
        };

        let hosts = metadata
            .remove("hosts")
            .ok_or_else(|| BaselineError::malformed(&root, "missing `hosts`"))?;
        let hosts_at = root.key("hosts");
        let instances_at = hosts_at.key("instances");
        let instances = hosts
            .get("instances")
            .ok_or_else(|| BaselineError::malformed(&hosts_at, "missing `instances`"))
            .and_then(|instances| as_object(instances, &instances_at))?;

        let mut descent = Descent {
            extractor,
            tree: BaselineTree::default(),
        };
        for (token, instance) in instances {
            descent.instance(token, instance, instances_at.key(token))?;
        }

        Ok(Self {
            origin: INLINE_ORIGIN.to_string(),
            metadata,
            tree: descent.tree,
        })
    }

    /// Path the document was loaded from, or a placeholder for in-memory input.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Top-level keys other than `hosts`.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn tree(&self) -> &BaselineTree {
        &self.tree
    }

    pub fn into_tree(self) -> BaselineTree {
        self.tree
    }
}

/// Dotted JSON location used in error messages.
#[derive(Debug, Clone)]
struct Location(String);

impl Location {
    fn root() -> Self {
        Location("$".to_string())
    }

    fn key(&self, key: &str) -> Self {
        Location(format!("{}.{}", self.0, key))
    }

    fn index(&self, index: usize) -> Self {
        Location(format!("{}[{}]", self.0, index))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl From<&Location> for String {
    fn from(location: &Location) -> Self {
        location.0.clone()
    }
}

fn as_object<'v>(value: &'v Value, at: &Location) -> Result<&'v Map<String, Value>, BaselineError> {
    value
        .as_object()
        .ok_or_else(|| BaselineError::malformed(at, "expected an object"))
}

fn resolve<D: Dimension>(token: &str, at: &Location) -> Result<D, BaselineError> {
    D::to_canonical(token).map_err(|source| BaselineError::unknown_token(at, source))
}

/// Host part of a coordinate, resolved while descending.
#[derive(Clone, Copy)]
struct Host {
    instance_type: InstanceType,
    cpu_model: CpuModel,
}

/// Guest part of a coordinate, resolved while descending.
#[derive(Clone, Copy)]
struct Guest {
    metric: Metric,
    guest_kernel: KernelVersion,
    guest_os: GuestOs,
    machine_config: MachineConfig,
}

struct Descent<'e, E: ?Sized> {
    extractor: &'e E,
    tree: BaselineTree,
}

impl<E: LeafExtractor + ?Sized> Descent<'_, E> {
    fn instance(&mut self, token: &str, value: &Value, at: Location) -> Result<(), BaselineError> {
        let instance_type: InstanceType = resolve(token, &at)?;
        let cpus_at = at.key("cpus");
        let cpus = as_object(value, &at)?
            .get("cpus")
            .and_then(Value::as_array)
            .ok_or_else(|| BaselineError::malformed(&at, "missing array `cpus`"))?;

        for (index, cpu) in cpus.iter().enumerate() {
            self.cpu(instance_type, cpu, cpus_at.index(index))?;
        }
        Ok(())
    }

    fn cpu(
        &mut self,
        instance_type: InstanceType,
        value: &Value,
        at: Location,
    ) -> Result<(), BaselineError> {
        let cpu = as_object(value, &at)?;
        let model_at = at.key("model");
        let description = cpu
            .get("model")
            .and_then(Value::as_str)
            .ok_or_else(|| BaselineError::malformed(&at, "missing string `model`"))?;
        let cpu_model = CpuModel::resolve(instance_type, description)
            .map_err(|source| BaselineError::unknown_token(&model_at, source))?;

        let baselines_at = at.key("baselines");
        let baselines = cpu
            .get("baselines")
            .ok_or_else(|| BaselineError::malformed(&at, "missing `baselines`"))
            .and_then(|baselines| as_object(baselines, &baselines_at))?;

        let host = Host {
            instance_type,
            cpu_model,
        };
        for (metric_token, kernels) in baselines {
            let metric_at = baselines_at.key(metric_token);
            let metric: Metric = resolve(metric_token, &metric_at)?;

            for (kernel_token, oses) in as_object(kernels, &metric_at)? {
                let kernel_at = metric_at.key(kernel_token);
                let guest_kernel: KernelVersion = resolve(kernel_token, &kernel_at)?;

                for (os_token, configs) in as_object(oses, &kernel_at)? {
                    let os_at = kernel_at.key(os_token);
                    let guest_os: GuestOs = resolve(os_token, &os_at)?;

                    for (config_token, statistics) in as_object(configs, &os_at)? {
                        let config_at = os_at.key(config_token);
                        let guest = Guest {
                            metric,
                            guest_kernel,
                            guest_os,
                            machine_config: resolve(config_token, &config_at)?,
                        };
                        self.configuration(host, guest, statistics, config_at)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn configuration(
        &mut self,
        host: Host,
        guest: Guest,
        value: &Value,
        at: Location,
    ) -> Result<(), BaselineError> {
        let statistics = as_object(value, &at)?;
        let mut kinds = statistics.iter();
        let (stat_kind, statistic) = match (kinds.next(), kinds.next()) {
            (Some(entry), None) => entry,
            (None, _) => {
                return Err(BaselineError::malformed(&at, "no statistic kind"));
            }
            (Some(_), Some(_)) => {
                let keys: Vec<&str> = statistics.keys().map(String::as_str).collect();
                return Err(BaselineError::malformed(
                    &at,
                    format!("ambiguous statistic kind: {}", keys.join(", ")),
                ));
            }
        };

        let stat_at = at.key(stat_kind);
        let statistic = as_object(statistic, &stat_at)?;
        let extracted = self
            .extractor
            .extract(statistic)
            .map_err(|err| err.at(&stat_at.0))?;

        for (test_case, values) in extracted {
            let coordinate = Coordinate {
                instance_type: host.instance_type,
                cpu_model: host.cpu_model,
                metric: guest.metric,
                guest_kernel: guest.guest_kernel,
                guest_os: guest.guest_os,
                machine_config: guest.machine_config,
                test_case,
            };
            let leaf = BaselineLeaf::new(stat_kind.as_str(), values);
            self.tree
                .insert(coordinate, leaf, &stat_at.key(&test_case.to_string()).0)?;
        }
        Ok(())
    }
}
