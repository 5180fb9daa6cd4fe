//! daisy-core - Scaffolding pipeline for daisy projects
//!
//! Initializes a project directory from a remotely hosted template:
//! resolves and validates the target directory, turns flags or prompts
//! into a template reference, fetches the template archive (through an
//! env-configured proxy when present), rewrites the placeholder project
//! identifier in the generated manifests, and runs dependency
//! installation.
//!
//! The interactive layer lives behind the `tui` feature (default); the
//! remaining modules are plain functions and types usable without it.

pub mod config;
pub mod error;
pub mod install;
pub mod substitute;
pub mod target;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{RunConfig, RunOptions};
pub use error::ScaffoldError;
pub use install::InstallOutcome;
pub use target::{DirectoryResolver, ResolveState, TargetDirState};
pub use templates::{TemplateFetcher, TemplateSpec};

#[cfg(feature = "tui")]
pub use tui::run;

/// Stable prefix identifying the tool in user-facing messages
pub const TOOL_NAME: &str = "daisy-init";
