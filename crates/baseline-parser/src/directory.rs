//! Scanning a directory of baseline files.
//!
//! Baseline files follow the `test_<family>_config_<host kernel>.json`
//! naming convention. Files that do not match it are ignored; two files
//! naming the same test and kernel are rejected.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use baseline_types::{KernelVersion, TestFamily};
use tracing::debug;
use walkdir::WalkDir;

use crate::document::BaselineDocument;
use crate::error::BaselineError;

/// Index of the baseline files found in one directory.
#[derive(Debug, Clone)]
pub struct BaselineDirectory {
    root: PathBuf,
    files: BTreeMap<(TestFamily, KernelVersion), PathBuf>,
}

impl BaselineDirectory {
    /// Scan `root` (non-recursively) for baseline files.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BaselineError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(BaselineError::Io {
                path: root,
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let mut files: BTreeMap<(TestFamily, KernelVersion), PathBuf> = BTreeMap::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| BaselineError::Io {
                path: root.clone(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(key) = parse_file_name(&name) else {
                debug!(file = %name, "Skipping non-baseline file");
                continue;
            };
            if let Some(existing) = files.get(&key) {
                let (test, kernel) = key;
                return Err(BaselineError::malformed(
                    root.display().to_string(),
                    format!(
                        "duplicate baseline file for {} on {}: {} and {}",
                        test,
                        kernel,
                        existing.display(),
                        entry.path().display()
                    ),
                ));
            }
            files.insert(key, entry.into_path());
        }

        debug!(root = %root.display(), files = files.len(), "Scanned baseline directory");
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `(test, kernel)` pairs with a baseline file, in order.
    pub fn available(&self) -> impl Iterator<Item = (TestFamily, KernelVersion)> + '_ {
        self.files.keys().copied()
    }

    pub fn path_for(&self, test: TestFamily, kernel: KernelVersion) -> Option<&Path> {
        self.files.get(&(test, kernel)).map(PathBuf::as_path)
    }

    /// Load the document for `(test, kernel)`; `None` when the directory has no such file.
    pub fn load(
        &self,
        test: TestFamily,
        kernel: KernelVersion,
    ) -> Result<Option<BaselineDocument>, BaselineError> {
        match self.path_for(test, kernel) {
            Some(path) => BaselineDocument::load(path, &test).map(Some),
            None => Ok(None),
        }
    }
}

/// File name of the baseline for `(test, kernel)`.
pub fn file_name(test: TestFamily, kernel: KernelVersion) -> String {
    format!("test_{}_config_{}.json", test, kernel)
}

fn parse_file_name(name: &str) -> Option<(TestFamily, KernelVersion)> {
    let stem = name.strip_prefix("test_")?.strip_suffix(".json")?;
    let (test, kernel) = stem.rsplit_once("_config_")?;
    Some((test.parse().ok()?, kernel.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LATENCY: &str = r#"{
        "hosts": {"instances": {"m6a.metal": {"cpus": [{
            "model": "AMD EPYC 7R13 48-Core Processor",
            "baselines": {"latency": {"vmlinux-5.10.bin": {"ubuntu-18.04.ext4": {
                "2vcpu_1024mb.json": {"Avg": {"target": 0.05, "delta_percentage": 8}}
            }}}}
        }]}}}
    }"#;

    #[test]
    fn test_file_name_round_trip() {
        let name = file_name(TestFamily::NetworkLatency, KernelVersion::Kernel6_1);
        assert_eq!(name, "test_network_latency_config_6.1.json");
        assert_eq!(
            parse_file_name(&name),
            Some((TestFamily::NetworkLatency, KernelVersion::Kernel6_1))
        );
        assert_eq!(
            parse_file_name("test_snapshot_restore_performance_config_4.14.json"),
            Some((TestFamily::SnapshotRestore, KernelVersion::Kernel4_14))
        );
        assert_eq!(parse_file_name("test_block_performance_config_5.10.json"), None);
        assert_eq!(parse_file_name("README.md"), None);
    }

    #[test]
    fn test_open_and_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test_network_latency_config_5.10.json"), LATENCY).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a baseline").unwrap();
        fs::create_dir(dir.path().join("test_vsock_throughput_config_5.10.json")).unwrap();

        let baselines = BaselineDirectory::open(dir.path()).unwrap();
        assert_eq!(baselines.root(), dir.path());
        assert_eq!(
            baselines.available().collect::<Vec<_>>(),
            vec![(TestFamily::NetworkLatency, KernelVersion::Kernel5_10)]
        );

        let document = baselines
            .load(TestFamily::NetworkLatency, KernelVersion::Kernel5_10)
            .unwrap()
            .unwrap();
        assert_eq!(document.tree().len(), 1);

        // absent file is a gap, not an error
        assert!(baselines
            .load(TestFamily::NetworkLatency, KernelVersion::Kernel6_1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_kernel_spelling_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test_network_latency_config_5.10.json"), LATENCY).unwrap();
        fs::write(
            dir.path().join("test_network_latency_config_vmlinux-5.10.bin.json"),
            LATENCY,
        )
        .unwrap();

        let err = BaselineDirectory::open(dir.path()).unwrap_err();
        assert!(err.is_malformed());
        let message = err.to_string();
        assert!(message.contains("duplicate baseline file"), "{message}");
        assert!(message.contains("test_network_latency_config_5.10.json"), "{message}");
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = BaselineDirectory::open(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, BaselineError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("test_network_latency_config_5.10.json"),
            r#"{"dimensions": []}"#,
        )
        .unwrap();

        let baselines = BaselineDirectory::open(dir.path()).unwrap();
        let err = baselines
            .load(TestFamily::NetworkLatency, KernelVersion::Kernel5_10)
            .unwrap_err();
        assert!(err.is_malformed());
    }
}
