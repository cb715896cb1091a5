/*
 * Small application that extracts the header metadata of the first scan
 * of every E57 file in a folder into reports.
 *
 * With the CSV sink a single `metadata_extraction.csv` is created in the folder.
 * It contains one row per file with file name, scan position, point count,
 * rotation matrix and translation.
 *
 * With the text sink a `<name>_metadata.txt` file is created next to every E57 file.
 * It additionally contains a dump of all header fields of the scan.
 *
 * If no folder argument is given, the folder is asked for interactively.
 * By default the run stops at the first file that cannot be read,
 * use `--keep-going` to skip such files instead.
 */

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use e57_metadata::{
    extract_with, Config, Console, E57ScanReader, ErrorPolicy, Extraction, RunSummary, SinkKind,
};
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Sink {
    Csv,
    Text,
}

impl From<Sink> for SinkKind {
    fn from(sink: Sink) -> Self {
        match sink {
            Sink::Csv => SinkKind::Csv,
            Sink::Text => SinkKind::Text,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Extracts scan metadata from E57 files into reports")]
struct Args {
    /// Folder with E57 files, asked for interactively if missing
    folder: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Sink::Csv)]
    sink: Sink,

    /// Skip unreadable files instead of aborting the run
    #[arg(long)]
    keep_going: bool,

    /// Validate all checksums of a file before reading it
    #[arg(long)]
    validate_crc: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    let settings = config.extract;
    debug!("Extraction settings: {settings:?}");

    let folder = args.folder.or(settings.folder);
    let policy = if args.keep_going || settings.keep_going {
        ErrorPolicy::Continue
    } else {
        ErrorPolicy::Abort
    };
    let reader = E57ScanReader::new().validate_crc(args.validate_crc || settings.validate_crc);
    let sink = SinkKind::from(args.sink).create(&settings.csv_file_name, &settings.text_suffix);
    let mut extraction = Extraction::new(reader, sink)
        .extension(&settings.extension)
        .policy(policy);

    let mut console = Console::new(folder);
    let result = extract_with(&mut console, &mut extraction);
    Ok(ExitCode::from(exit_status(&result)))
}

/// A folder without scan files is not an error, skipped or failed files are.
fn exit_status(result: &e57_metadata::Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) if summary.failures.is_empty() => 0,
        Ok(_) => 1,
        Err(err) if err.is_not_found() => 0,
        Err(_) => 1,
    }
}
