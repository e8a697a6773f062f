use anyhow::Result;
use clap::Parser;
use mediamover::mediamover_core::{
    Cli, DispatchOptions, Engine, FilterCriteria, RunError, check_source_dir, confirm,
    extractor_for,
};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;
use std::io;
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("mediamover.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let started = Instant::now();

    // Nothing is touched until the configuration is known to be sound.
    let criteria = FilterCriteria::new(cli.media, cli.camera.clone(), cli.before, cli.after)?;

    if cli.rmcrptpic && !cli.dryrun {
        let confirmed = confirm(
            "Are you sure you want to delete corrupted files? (y/N)",
            &mut io::stdin().lock(),
            &mut io::stdout(),
        )?;
        if !confirmed {
            return Err(RunError::Cancelled.into());
        }
    }

    check_source_dir(&cli.source_dir)?;

    let extractor = extractor_for(cli.media)?;
    let options = DispatchOptions {
        action: cli.action,
        target_dir: cli.target_dir.clone(),
        dry_run: cli.dryrun,
        remove_corrupted: cli.rmcrptpic,
    };

    log::info!(
        "{} {} files from {} to {}",
        cli.action,
        cli.media,
        cli.source_dir.display(),
        cli.target_dir.display()
    );

    let mut engine = Engine::new(criteria, options, extractor);
    let stats = engine.run(&cli.source_dir, cli.recursive)?;

    println!("{}", stats.summary());
    if cli.time {
        println!("Time elapsed: {:.3} secs.", started.elapsed().as_secs_f64());
    }

    Ok(())
}
