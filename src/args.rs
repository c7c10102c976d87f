use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hoor",
    version,
    about = "Add Shamsi dates to static-site content files",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Site configuration file (default is <source>/config.toml|yaml|yml|json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Filesystem path to read files relative from
    #[arg(short, long, default_value = ".")]
    pub source: PathBuf,

    /// Filesystem path to the content directory
    #[arg(short = 'c', long = "contentDir")]
    pub content_dir: Option<PathBuf>,

    /// Convert only this file instead of the whole site
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Date format, e.g. "dd MM yyyy" or "E d MMM yyyy"
    #[arg(short, long)]
    pub format: Option<String>,

    /// Parallelism factor (overrides HOOR_MAXPROCS)
    #[arg(short, long)]
    pub procs: Option<usize>,

    /// Log every file, not just problems and the summary
    #[arg(short, long)]
    pub verbose: bool,
}
