//! Temporary git worktrees for comparing committed baselines.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git: {0}")]
    Spawn(#[from] io::Error),

    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// A detached checkout of one revision, removed again on drop.
#[derive(Debug)]
pub struct GitWorktree {
    repository: PathBuf,
    revision: String,
    commit: String,
    path: PathBuf,
    // Dropped after the worktree has been unregistered.
    _root: TempDir,
}

impl GitWorktree {
    /// Resolve `revision` in `repository` and check it out into a temporary directory.
    pub fn checkout(repository: impl AsRef<Path>, revision: &str) -> Result<Self, GitError> {
        let repository = repository.as_ref().to_path_buf();
        let commitish = format!("{revision}^{{commit}}");
        let commit = git(&repository, ["rev-parse", "--verify", commitish.as_str()])?;

        let root = tempfile::Builder::new().prefix("baselines-").tempdir()?;
        let path = root.path().join(&commit);
        git(
            &repository,
            [
                OsStr::new("worktree"),
                OsStr::new("add"),
                OsStr::new("--detach"),
                path.as_os_str(),
                OsStr::new(&commit),
            ],
        )?;
        info!(%revision, %commit, path = %path.display(), "Checked out revision");

        Ok(Self {
            repository,
            revision: revision.to_string(),
            commit,
            path,
            _root: root,
        })
    }

    /// Root of the checkout.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Revision as given by the caller.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Full commit hash the revision resolved to.
    pub fn commit(&self) -> &str {
        &self.commit
    }
}

impl Drop for GitWorktree {
    fn drop(&mut self) {
        let removed = git(
            &self.repository,
            [
                OsStr::new("worktree"),
                OsStr::new("remove"),
                OsStr::new("--force"),
                self.path.as_os_str(),
            ],
        );
        match removed {
            Ok(_) => debug!(path = %self.path.display(), "Removed worktree"),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to remove worktree");
                if let Err(err) = git(&self.repository, ["worktree", "prune"]) {
                    warn!(error = %err, "Failed to prune worktrees");
                }
            }
        }
    }
}

/// Run git inside `repository` and return its trimmed stdout.
fn git<I, S>(repository: &Path, args: I) -> Result<String, GitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let output = Command::new("git")
        .arg("-C")
        .arg(repository)
        .args(&args)
        .output()?;

    if !output.status.success() {
        let command = args
            .iter()
            .map(|arg| arg.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        return Err(GitError::Failed {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
