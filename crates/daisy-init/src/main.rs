//! daisy-init - initialize a daisy project from a remote template

use anyhow::Result;
use clap::Parser;
use daisy_core::RunOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "daisy-init")]
#[command(about = "Initialize a daisy project from a remote template")]
#[command(version)]
pub struct Args {
    /// Target directory to generate into
    pub dir: Option<PathBuf>,

    /// Target directory (same as the positional argument)
    #[arg(long = "dir", value_name = "DIR")]
    pub dir_flag: Option<PathBuf>,

    /// Force override of a non-empty target directory
    #[arg(short, long)]
    pub force: bool,

    /// Don't ask, just use default values
    #[arg(long)]
    pub silent: bool,

    /// Remote origin of the template (skips the template choice)
    #[arg(long)]
    pub origin: Option<String>,

    /// Branch or tag of the template
    #[arg(long)]
    pub branch: Option<String>,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        RunOptions {
            dir: args.dir.or(args.dir_flag),
            force: args.force,
            silent: args.silent,
            origin: args.origin,
            branch: args.branch,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    let result = daisy_core::run(args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        eprintln!("[{}] {:#}", daisy_core::TOOL_NAME, e);
        std::process::exit(1);
    }

    Ok(())
}
