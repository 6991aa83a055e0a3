//! compare-baselines library
//!
//! Exposes the CLI definition, command handlers and git worktree support
//! so they can be exercised from integration tests.

pub mod cli;
pub mod commands;
pub mod worktree;

pub use cli::{Cli, Commands, FilterArgs, HistoryArgs};
pub use commands::{
    compare_commits, compare_cpu_models, compare_directories, compare_latest, init_logging,
    load_settings, show_history, write_report, DEFAULT_HISTORY_OUTPUT,
};
pub use worktree::{GitError, GitWorktree};
