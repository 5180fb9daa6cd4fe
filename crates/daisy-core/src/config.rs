//! Run configuration built once at entry

use std::path::PathBuf;

/// Raw options handed over by the CLI layer
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Target directory (positional arg or --dir)
    pub dir: Option<PathBuf>,

    /// Accept a non-empty target directory and let the fetch wipe it
    pub force: bool,

    /// Never prompt; use defaults everywhere
    pub silent: bool,

    /// Explicit template origin, skips the template choice tree
    pub origin: Option<String>,

    /// Explicit template ref, wins over the ref implied by a variant
    pub branch: Option<String>,
}

/// Immutable snapshot of everything one run needs.
///
/// Built exactly once before the pipeline starts; the proxy is the only
/// value read from the environment, and only here. Components receive
/// this by reference and never consult ambient state themselves.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Process working directory at startup
    pub cwd: PathBuf,

    /// Requested target directory, resolved against `cwd` if relative
    pub requested_dir: Option<PathBuf>,

    pub force: bool,
    pub silent: bool,

    pub origin_override: Option<String>,
    pub ref_override: Option<String>,

    /// HTTP proxy endpoint for the template fetch, if configured
    pub proxy: Option<String>,
}

impl RunConfig {
    /// Build the config from CLI options plus the environment.
    pub fn from_options(opts: RunOptions) -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self {
            requested_dir: opts.dir.map(|d| {
                if d.is_absolute() {
                    d
                } else {
                    cwd.join(d)
                }
            }),
            cwd,
            force: opts.force,
            silent: opts.silent,
            origin_override: opts.origin,
            ref_override: opts.branch,
            proxy: proxy_from_env(),
        })
    }
}

/// Read the conventional proxy variable, lowercase name first.
fn proxy_from_env() -> Option<String> {
    proxy_from(|name| std::env::var(name).ok())
}

fn proxy_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("http_proxy")
        .filter(|v| !v.is_empty())
        .or_else(|| lookup("HTTP_PROXY").filter(|v| !v.is_empty()))
}
