use crate::config::BatchConfig;
use crate::error::Converter;
use crate::manifest::{derive_output_name, read_manifest};
use crate::Result;
use log::{debug, info, warn};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// One invocation of the external filter tool.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// The output name could not be derived and equals the input name.
    pub collides: bool,
}

impl BatchJob {
    /// Creates the job for one manifest entry, deriving the output name from the config pattern.
    pub fn new(name: &str, config: &BatchConfig) -> Self {
        let (output_name, replaced) = derive_output_name(name, &config.pattern, &config.replacement);
        Self {
            input: config.input_dir.join(name),
            output: config.output_dir.join(output_name),
            collides: !replaced,
        }
    }

    /// Command line arguments for the filter tool: open the input silently,
    /// activate the scalar field, filter by its range and save as the export format.
    pub fn args(&self, config: &BatchConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(13);
        args.push("-SILENT".into());
        args.push("-O".into());
        args.push(self.input.clone().into_os_string());
        args.push("-SET_ACTIVE_SF".into());
        args.push(config.scalar_field.clone().into());
        args.push("-FILTER_SF".into());
        args.push(config.filter_min.to_string().into());
        args.push(config.filter_max.to_string().into());
        args.push("-C_EXPORT_FMT".into());
        args.push(config.export_format.clone().into());
        args.push("-SAVE_CLOUDS".into());
        args.push("FILE".into());
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Creates one job per manifest entry.
pub fn plan(names: &[String], config: &BatchConfig) -> Vec<BatchJob> {
    names.iter().map(|n| BatchJob::new(n, config)).collect()
}

/// Runs an external program and waits for it to finish.
pub trait FilterRunner {
    /// Returns the exit code, or `None` if the process was terminated by a signal.
    fn invoke(&mut self, program: &Path, args: &[OsString]) -> Result<Option<i32>>;
}

/// Spawns the program as child process with inherited stdio.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl FilterRunner for ProcessRunner {
    fn invoke(&mut self, program: &Path, args: &[OsString]) -> Result<Option<i32>> {
        let status = Command::new(program)
            .args(args)
            .status()
            .invoke_err(format!("Cannot start {}", program.display()))?;
        Ok(status.code())
    }
}

/// Only logs the command lines that would be executed.
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunRunner;

impl FilterRunner for DryRunRunner {
    fn invoke(&mut self, program: &Path, args: &[OsString]) -> Result<Option<i32>> {
        info!("Would run: {}", command_line(program, args));
        Ok(Some(0))
    }
}

/// Program and arguments joined by spaces, for display.
pub fn command_line(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A finished job and the exit code of its process.
#[derive(Clone, Debug)]
pub struct JobResult {
    pub job: BatchJob,
    pub exit_code: Option<i32>,
}

impl JobResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<JobResult>,
}

impl BatchSummary {
    /// Number of jobs that did not exit successfully.
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.succeeded()).count()
    }

    /// Number of jobs whose output name could not be derived from the pattern.
    pub fn collisions(&self) -> usize {
        self.results.iter().filter(|r| r.job.collides).count()
    }
}

/// Runs the filter tool for every job, one after another.
///
/// Non-zero exit codes are logged and recorded but do not stop the batch.
/// Failing to start the program aborts.
pub fn run_jobs<F: FilterRunner + ?Sized>(
    jobs: Vec<BatchJob>,
    config: &BatchConfig,
    runner: &mut F,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    let total = jobs.len();
    for (index, job) in jobs.into_iter().enumerate() {
        if job.collides {
            warn!(
                "Name of {} does not contain '{}', output would overwrite the input",
                job.input.display(),
                config.pattern
            );
        }
        let args = job.args(config);
        debug!("Running {}", command_line(&config.executable, &args));
        info!(
            "Filtering file {}/{total}: {}",
            index + 1,
            job.input.display()
        );
        let exit_code = runner.invoke(&config.executable, &args)?;
        let result = JobResult { job, exit_code };
        if !result.succeeded() {
            warn!(
                "Filter tool failed for {} with exit code {exit_code:?}",
                result.job.input.display()
            );
        }
        summary.results.push(result);
    }
    Ok(summary)
}

/// Reads the manifest from the config and runs all jobs.
pub fn run_batch<F: FilterRunner + ?Sized>(
    config: &BatchConfig,
    runner: &mut F,
) -> Result<BatchSummary> {
    let names = read_manifest(&config.manifest)?;
    info!(
        "Read {} entries from {}",
        names.len(),
        config.manifest.display()
    );
    run_jobs(plan(&names, config), config, runner)
}
