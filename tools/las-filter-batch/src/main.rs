/*
 * Small application that filters a list of LAS files with CloudCompare.
 *
 * The manifest is a text file with one LAS file name per line.
 * For each name the output name is built by replacing `_Scanner1_`
 * with `_Scanner1_output_`. Then CloudCompare is started in silent mode to
 * keep only points whose last scalar field is within [3, 5] and to save
 * the result as LAS file in the output folder.
 *
 * Files are processed one after another. Failed runs of CloudCompare are
 * reported at the end but do not stop the batch.
 * All settings can be changed with a TOML configuration file.
 */

use anyhow::{Context, Result};
use clap::Parser;
use e57_metadata::{run_batch, Config, DryRunRunner, FilterRunner, ProcessRunner};
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(version, about = "Filters LAS files listed in a manifest with CloudCompare")]
struct Args {
    /// Text file with one LAS file name per line
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Folder containing the input files
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Folder for the filtered files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Path of the CloudCompare executable
    #[arg(long)]
    executable: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long)]
    dry_run: bool,

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
    let mut settings = config.batch;
    if let Some(manifest) = args.manifest {
        settings.manifest = manifest;
    }
    if let Some(input_dir) = args.input_dir {
        settings.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        settings.output_dir = output_dir;
    }
    if let Some(executable) = args.executable {
        settings.executable = executable;
    }
    debug!("Batch settings: {settings:?}");

    let mut runner: Box<dyn FilterRunner> = if args.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(ProcessRunner)
    };
    let summary = run_batch(&settings, runner.as_mut()).context("Batch processing failed")?;

    let failed = summary.failed();
    let collisions = summary.collisions();
    if collisions > 0 {
        eprintln!(
            "{collisions} file name(s) did not contain '{}', their output uses the input name",
            settings.pattern
        );
    }
    if failed > 0 {
        for result in summary.results.iter().filter(|r| !r.succeeded()) {
            eprintln!(
                "Failed: {} (exit code {:?})",
                result.job.input.display(),
                result.exit_code
            );
        }
        println!(
            "Batch processing completed: {} succeeded, {failed} failed.",
            summary.results.len() - failed
        );
        return Ok(ExitCode::FAILURE);
    }

    println!("Batch processing completed.");
    Ok(ExitCode::SUCCESS)
}
