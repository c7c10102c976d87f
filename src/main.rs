use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use hoor::config::PROCS_ENV;
use hoor::{convert_single, Config, ConversionOutcome, FsSite, Pipeline, RunOutcome};

mod args;

use args::{Cli, Commands, RunArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.run.verbose);

    match cli.command {
        Some(Commands::Version) => {
            println!("hoor {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => run(cli.run),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_module("hoor", LevelFilter::Debug);
    }
    builder.init();
}

fn run(args: RunArgs) -> Result<()> {
    let config = Config::builder()
        .source(&args.source)
        .config_file(args.config)
        .content_dir(args.content_dir)
        .date_format(args.format)
        .parallelism(args.procs)
        .procs_env(std::env::var(PROCS_ENV).ok())
        .build()
        .context("failed to load site configuration")?;

    if let Some(input) = &args.input {
        let outcome = convert_single(input, &config)
            .with_context(|| format!("failed to convert {}", input.display()))?;
        match outcome {
            ConversionOutcome::Converted(value) => info!("{}: {}", input.display(), value),
            ConversionOutcome::NoDate => info!("{}: no publish date, left unchanged", input.display()),
            ConversionOutcome::Unrenderable => {
                info!("{}: date format rendered nothing, left unchanged", input.display())
            }
        }
        return Ok(());
    }

    let site = FsSite::new(&config.content_dir);
    match Pipeline::new(&site, &config)
        .run()
        .context("failed to process site content")?
    {
        RunOutcome::NoFiles => info!("No files to process in {}", site.content_dir().display()),
        RunOutcome::Completed(_) => {}
    }
    Ok(())
}
