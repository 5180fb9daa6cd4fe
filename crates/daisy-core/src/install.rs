//! Dependency installation inside the generated project

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Default package-manager invocation for generated projects
pub const DEFAULT_COMMAND: &str = "npm";
pub const DEFAULT_ARGS: &[&str] = &["install"];

/// Terminal outcome of the install step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOutcome {
    pub exit_code: i32,
    pub succeeded: bool,
}

/// Render a command line for user-facing messages
pub fn command_line(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

/// Run the package-manager command inside `dir` and wait for it.
///
/// Stdio is inherited so the operator sees install progress and can
/// answer any prompts the installer itself issues. Resolution is driven
/// purely by the exit code; a command that cannot be spawned at all is
/// an error rather than an outcome.
pub async fn install(dir: &Path, command: &str, args: &[&str]) -> Result<InstallOutcome> {
    println!();
    println!(
        "{} {}",
        "Running:".dimmed(),
        command_line(command, args).yellow()
    );
    println!();

    let status = Command::new(command)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to run `{}`", command_line(command, args)))?;

    let exit_code = status.code().unwrap_or(-1);
    Ok(InstallOutcome {
        exit_code,
        succeeded: status.success(),
    })
}
