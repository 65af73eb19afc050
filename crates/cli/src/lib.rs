pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fields;
pub mod index;
pub mod manual;
pub mod planner;
pub mod record;
pub mod rewriter;
pub mod sanitize;
pub mod scanner;
pub mod sync;
pub mod walker;

pub use cli::Cli;
pub use config::Config;
pub use error::{Error, ExitCode, Result};
pub use index::{TestcaseIndex, load_testcases};
pub use rewriter::{FileRewriter, Rewrite};
pub use sync::{SyncOptions, SyncSummary};
pub use walker::{FileWalker, WalkStats, WalkedFile, WalkerConfig};

#[cfg(test)]
pub mod test_utils;
