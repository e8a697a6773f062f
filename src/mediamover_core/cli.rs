use crate::mediamover_core::date::parse_bound;
use crate::mediamover_core::dispatch::Action;
use crate::mediamover_core::media::MediaKind;
use clap::Parser;
use simplelog::LevelFilter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use time::Date;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Filter media files by type, camera and capture date, then copy or move them",
    disable_version_flag = true
)]
pub struct Cli {
    /// Command to execute
    #[arg(value_enum)]
    pub action: Action,

    /// Media type to handle
    #[arg(value_enum)]
    pub media: MediaKind,

    /// Folder to scan, e.g. "/Path/to/the/source/folder"
    pub source_dir: PathBuf,

    /// Folder files are copied or moved to, e.g. "/Path/to/the/target/folder"
    pub target_dir: PathBuf,

    /// Scan the source folder recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Report what would be done without touching any file
    #[arg(short, long)]
    pub dryrun: bool,

    /// Camera model to match (case-sensitive substring), e.g. "iPhone XS"
    #[arg(short, long, value_name = "MODEL")]
    pub camera: Option<String>,

    /// Only files taken before this date, at 0:00 (the date itself excluded)
    #[arg(short, long, value_name = "YYYY-M-D", value_parser = parse_bound)]
    pub before: Option<Date>,

    /// Only files taken on or after this date, at 0:00
    #[arg(short, long, value_name = "YYYY-M-D", value_parser = parse_bound)]
    pub after: Option<Date>,

    /// Delete corrupted pictures from the source folder
    #[arg(long)]
    pub rmcrptpic: bool,

    /// Show time elapsed
    #[arg(short, long)]
    pub time: bool,

    /// Enable file logging to mediamover.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,
}

/// Ask a yes/no question. Anything but `y` is a no.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{} ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
