//! Coordinate-ordered leaf container.

use std::collections::{BTreeMap, BTreeSet};

use baseline_types::{
    Coordinate, CpuModel, GuestOs, KernelVersion, LeafKey, MachineConfig, Metric, Selector,
};

use crate::error::BaselineError;
use crate::leaf::BaselineLeaf;

/// All leaves of one baseline document, keyed by full coordinate.
///
/// Built once by the loader (or [`BaselineTree::from_leaves`]) and read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineTree {
    leaves: BTreeMap<Coordinate, BaselineLeaf>,
}

impl BaselineTree {
    /// Build a tree, rejecting duplicate coordinates.
    pub fn from_leaves(
        leaves: impl IntoIterator<Item = (Coordinate, BaselineLeaf)>,
    ) -> Result<Self, BaselineError> {
        let mut tree = Self::default();
        for (coordinate, leaf) in leaves {
            tree.insert(coordinate, leaf, &coordinate.to_string())?;
        }
        Ok(tree)
    }

    pub(crate) fn insert(
        &mut self,
        coordinate: Coordinate,
        leaf: BaselineLeaf,
        location: &str,
    ) -> Result<(), BaselineError> {
        if self.leaves.contains_key(&coordinate) {
            return Err(BaselineError::malformed(
                location,
                format!("duplicate leaf for {}", coordinate),
            ));
        }
        self.leaves.insert(coordinate, leaf);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<&BaselineLeaf> {
        self.leaves.get(coordinate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &BaselineLeaf)> {
        self.leaves.iter()
    }

    /// Leaves whose coordinate matches every set dimension of `selector`.
    pub fn select(&self, selector: Selector) -> impl Iterator<Item = (&Coordinate, &BaselineLeaf)> {
        self.leaves
            .iter()
            .filter(move |(coordinate, _)| selector.matches(coordinate))
    }

    fn distinct<T: Ord>(&self, selector: Selector, f: impl Fn(&Coordinate) -> T) -> BTreeSet<T> {
        self.select(selector).map(|(coordinate, _)| f(coordinate)).collect()
    }

    pub fn cpu_models(&self) -> BTreeSet<CpuModel> {
        self.distinct(Selector::any(), |c| c.cpu_model)
    }

    pub fn metrics(&self, cpu_model: CpuModel) -> BTreeSet<Metric> {
        self.distinct(Selector::any().cpu_model(cpu_model), |c| c.metric)
    }

    pub fn guest_kernels(&self, cpu_model: CpuModel, metric: Metric) -> BTreeSet<KernelVersion> {
        let selector = Selector::any().cpu_model(cpu_model).metric(metric);
        self.distinct(selector, |c| c.guest_kernel)
    }

    pub fn guest_oses(
        &self,
        cpu_model: CpuModel,
        metric: Metric,
        guest_kernel: KernelVersion,
    ) -> BTreeSet<GuestOs> {
        let selector = Selector::any()
            .cpu_model(cpu_model)
            .metric(metric)
            .guest_kernel(guest_kernel);
        self.distinct(selector, |c| c.guest_os)
    }

    pub fn machine_configs(
        &self,
        cpu_model: CpuModel,
        metric: Metric,
        guest_kernel: KernelVersion,
        guest_os: GuestOs,
    ) -> BTreeSet<MachineConfig> {
        let selector = Selector::any()
            .cpu_model(cpu_model)
            .metric(metric)
            .guest_kernel(guest_kernel)
            .guest_os(guest_os);
        self.distinct(selector, |c| c.machine_config)
    }

    /// Leaves recorded for one CPU, keyed by host-independent coordinate.
    pub fn for_cpu(&self, cpu_model: CpuModel) -> CpuView<'_> {
        let leaves = self
            .select(Selector::any().cpu_model(cpu_model))
            .map(|(coordinate, leaf)| (coordinate.leaf_key(), leaf))
            .collect();
        CpuView { cpu_model, leaves }
    }
}

/// Borrowed view of the leaves of one CPU model.
#[derive(Debug, Clone)]
pub struct CpuView<'a> {
    cpu_model: CpuModel,
    leaves: BTreeMap<LeafKey, &'a BaselineLeaf>,
}

impl<'a> CpuView<'a> {
    pub fn cpu_model(&self) -> CpuModel {
        self.cpu_model
    }

    pub fn get(&self, key: &LeafKey) -> Option<&'a BaselineLeaf> {
        self.leaves.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &LeafKey> {
        self.leaves.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LeafKey, &'a BaselineLeaf)> + '_ {
        self.leaves.iter().map(|(key, leaf)| (key, *leaf))
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}
