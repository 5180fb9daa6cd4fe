//! Error taxonomy for the scaffolding pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Failure classes of one scaffolding run.
///
/// Not every variant is fatal: `InvalidTarget` is resolved by
/// re-prompting, `Fetch` is tolerated by policy, and `Substitution`
/// degrades per file but taints the final status. Only `Install` and
/// `Defect` terminate the run on the spot.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("{path} is not usable as a target directory: {reason}")]
    InvalidTarget { path: PathBuf, reason: String },

    #[error("failed to fetch template {origin}#{ref_name}: {message}")]
    Fetch {
        origin: String,
        ref_name: String,
        message: String,
    },

    #[error("failed to rewrite {path}: {message}")]
    Substitution { path: PathBuf, message: String },

    #[error("`{command}` exited with code {code}")]
    Install { command: String, code: i32 },

    /// A selection leaf with no mapped origin/ref. This is a defect in
    /// the variant tables, not a runtime condition to recover from.
    #[error("no template mapped for selection '{choice}'")]
    Defect { choice: String },
}
