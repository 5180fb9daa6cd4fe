//! The scaffolding pipeline with interactive prompts
//!
//! Strictly linear: resolve directory -> project name -> template ->
//! fetch -> substitute -> install -> cleanup. The only loops are the
//! re-prompt on an invalid target directory and whatever the installer
//! itself asks on the inherited terminal.

use crate::config::{RunConfig, RunOptions};
use crate::error::ScaffoldError;
use crate::install;
use crate::substitute;
use crate::target::{DirectoryResolver, ResolveState};
use crate::templates::{self, TemplateFamily, TemplateFetcher, TemplateSpec};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Default project name offered by the name prompt
const DEFAULT_PROJECT_NAME: &str = "console";

/// Run one scaffolding pipeline from CLI options to a generated project.
pub async fn run(opts: RunOptions) -> Result<()> {
    cliclack::intro(crate::TOOL_NAME)?;

    let config =
        RunConfig::from_options(opts).context("Failed to read the working directory")?;

    if let Some(proxy) = &config.proxy {
        cliclack::log::info(format!("Using http_proxy: {}", proxy))?;
    }

    // Step 1: resolve the target directory (re-prompts while invalid)
    let target_dir = resolve_directory(&config)?;
    cliclack::log::success(format!("Target directory: {}", target_dir.display()))?;

    // Step 2: project name
    let project_name = prompt_project_name(&config)?;

    // Step 3: template selection
    let spec = select_template(&config)?;

    // Step 4: fetch. Failure is logged and tolerated by policy: the
    // pipeline continues, and steps that depend on specific files fail
    // later at that more specific point.
    fetch_template(&config, &target_dir, &spec).await?;

    // Step 5: token substitution across the fixed target list
    let report = substitute::apply_all(&target_dir, substitute::PLACEHOLDER, &project_name);
    for failure in &report.failures {
        cliclack::log::error(format!("{}", failure))?;
    }
    if !report.rewritten.is_empty() {
        cliclack::log::success(format!(
            "Rewrote {} file(s) for project '{}'",
            report.rewritten.len(),
            project_name
        ))?;
    }

    // Step 6: dependency installation; the only step whose failure is
    // guaranteed to end the run with a non-zero outcome
    let outcome =
        install_and_cleanup(&target_dir, install::DEFAULT_COMMAND, install::DEFAULT_ARGS).await?;
    if !outcome.succeeded {
        cliclack::outro_cancel("Dependency installation failed")?;
        return Err(ScaffoldError::Install {
            command: install::command_line(install::DEFAULT_COMMAND, install::DEFAULT_ARGS),
            code: outcome.exit_code,
        }
        .into());
    }

    if !report.succeeded() {
        cliclack::outro_cancel("Project generated with errors")?;
        anyhow::bail!(
            "{} substitution target(s) could not be rewritten; see messages above",
            report.failures.len()
        );
    }

    print_next_steps(&target_dir);
    cliclack::outro("Happy coding!")?;

    Ok(())
}

/// Drive the directory resolver until a path is accepted.
///
/// In silent mode there is nobody to re-prompt, so the first rejection
/// is fatal instead.
fn resolve_directory(config: &RunConfig) -> Result<PathBuf> {
    let mut resolver = DirectoryResolver::new(config.force);
    let mut candidate = config
        .requested_dir
        .clone()
        .unwrap_or_else(|| config.cwd.clone());

    loop {
        let state = resolver
            .offer(&candidate)
            .with_context(|| format!("Failed to inspect {}", candidate.display()))?;

        match state {
            ResolveState::Accepted { path, overriding } => {
                if *overriding {
                    cliclack::log::warning(format!(
                        "{} is not empty and will be overridden due to --force",
                        path.display()
                    ))?;
                }
                return Ok(path.clone());
            }
            ResolveState::Invalid { reason } => {
                cliclack::log::warning(reason.clone())?;
                if config.silent {
                    return Err(ScaffoldError::InvalidTarget {
                        path: candidate,
                        reason: reason.clone(),
                    }
                    .into());
                }

                let input: String = cliclack::input("Please enter a target directory")
                    .placeholder(".")
                    .default_input(".")
                    .interact()?;
                let next = PathBuf::from(input);
                candidate = if next.is_absolute() {
                    next
                } else {
                    config.cwd.join(next)
                };
            }
            ResolveState::Unvalidated => unreachable!("offer() always transitions"),
        }
    }
}

fn prompt_project_name(config: &RunConfig) -> Result<String> {
    if config.silent {
        return Ok(DEFAULT_PROJECT_NAME.to_string());
    }

    let name: String = cliclack::input("Please enter a project name")
        .placeholder(DEFAULT_PROJECT_NAME)
        .default_input(DEFAULT_PROJECT_NAME)
        .interact()?;

    Ok(name)
}

/// Turn flags or interactive choices into a concrete template spec.
fn select_template(config: &RunConfig) -> Result<TemplateSpec> {
    // An explicit origin short-circuits the whole choice tree
    if let Some(origin) = &config.origin_override {
        let spec = TemplateSpec::from_origin(origin, config.ref_override.as_deref());
        cliclack::log::info(format!("Template: {}#{}", spec.origin, spec.ref_name))?;
        return Ok(spec);
    }

    if config.silent {
        let spec =
            TemplateSpec::from_variant(templates::DEFAULT_VARIANT, config.ref_override.as_deref())?;
        cliclack::log::info(format!("Template: {}#{}", spec.origin, spec.ref_name))?;
        return Ok(spec);
    }

    let family: TemplateFamily = cliclack::select("Which template family?")
        .item(
            TemplateFamily::Common,
            "Common",
            "framework starters shared across teams",
        )
        .item(
            TemplateFamily::ProjectSpecific,
            "Project-specific",
            "daisy project layouts",
        )
        .interact()?;

    let variants = family.variants();
    let mut select = cliclack::select("Select a template");
    for (idx, variant) in variants.iter().enumerate() {
        select = select.item(idx, variant.key, variant.label);
    }
    let selected_idx: usize = select.interact()?;

    let spec = TemplateSpec::from_variant(&variants[selected_idx], config.ref_override.as_deref())?;
    cliclack::log::success(format!("Template: {}#{}", spec.origin, spec.ref_name))?;

    Ok(spec)
}

async fn fetch_template(
    config: &RunConfig,
    target_dir: &PathBuf,
    spec: &TemplateSpec,
) -> Result<()> {
    let fetcher = TemplateFetcher::new(config.proxy.as_deref())?;

    let spinner = cliclack::spinner();
    spinner.start("Downloading template...");

    match fetcher.fetch(target_dir, spec).await {
        Ok(count) => {
            spinner.stop(format!("Downloaded template ({} files)", count));
        }
        Err(e) => {
            spinner.stop("Template download failed");
            // Tolerated: later steps that need specific files will fail
            // there, with a more specific message.
            let failure = ScaffoldError::Fetch {
                origin: spec.origin.clone(),
                ref_name: spec.ref_name.clone(),
                message: format!("{:#}", e),
            };
            cliclack::log::warning(format!("{}", failure))?;
            cliclack::log::info("Continuing with the directory as it is")?;
        }
    }

    Ok(())
}

/// Run dependency installation, then remove incidental version-control
/// metadata. Cleanup happens whatever the installer did, so a failed
/// install never leaves fetched `.git` metadata behind.
async fn install_and_cleanup(
    target_dir: &std::path::Path,
    command: &str,
    args: &[&str],
) -> Result<install::InstallOutcome> {
    let outcome = install::install(target_dir, command, args).await;
    templates::remove_vcs_metadata(target_dir)?;
    outcome
}

fn print_next_steps(target_dir: &PathBuf) {
    println!();
    println!("  {}", "Next steps".bold());
    println!();
    println!("  {}  cd {}", "1.".dimmed(), target_dir.display());
    println!("  {}  npm start / npm run dev / npm test", "2.".dimmed());
    println!();
}
