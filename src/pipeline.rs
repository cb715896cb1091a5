use crate::scanner::list_scan_files;
use crate::{ReportSink, Result, ScanReader};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Decides what happens when a single scan file cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the whole run at the first unreadable file.
    #[default]
    Abort,
    /// Record the failure and continue with the next file.
    Continue,
}

/// A scan file that could not be processed.
#[derive(Clone, Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one extraction run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Scan files that were extracted and reported, in processing order.
    pub processed: Vec<PathBuf>,
    /// Scan files that failed and were skipped.
    /// Always empty unless the error policy is [`ErrorPolicy::Continue`].
    pub failures: Vec<Failure>,
    /// Report files created by the sink.
    pub outputs: Vec<PathBuf>,
}

/// Metadata extraction for all scan files of a folder.
pub struct Extraction<R: ScanReader, S: ReportSink> {
    reader: R,
    sink: S,
    extension: String,
    policy: ErrorPolicy,
}

impl<R: ScanReader, S: ReportSink> Extraction<R, S> {
    /// Creates a new extraction for `.e57` files that aborts on the first error.
    pub fn new(reader: R, sink: S) -> Self {
        Self {
            reader,
            sink,
            extension: String::from("e57"),
            policy: ErrorPolicy::Abort,
        }
    }

    /// Sets the file extension (without dot) of the scan files to process.
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Sets what happens when a scan file cannot be read.
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extracts metadata from all matching files in the folder.
    ///
    /// The sink is only opened after at least one matching file was found,
    /// so an empty folder produces no report.
    pub fn run(&mut self, folder: &Path) -> Result<RunSummary> {
        let files = list_scan_files(folder, &self.extension)?;
        info!("Found {} scan file(s) in {}", files.len(), folder.display());

        self.sink.open(folder)?;
        let mut summary = RunSummary::default();
        for path in files {
            let scan = match self.reader.open(&path) {
                Ok(scan) => scan,
                Err(err) if self.policy == ErrorPolicy::Continue => {
                    warn!("Skipping {}: {err}", path.display());
                    summary.failures.push(Failure {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
                Err(err) => {
                    if let Err(close_err) = self.sink.close() {
                        warn!("Failed to close report after error: {close_err}");
                    }
                    return Err(err);
                }
            };
            self.sink.write(&scan)?;
            info!("Metadata extracted for {}", scan.file_name());
            summary.processed.push(path);
        }
        summary.outputs = self.sink.close()?;
        Ok(summary)
    }
}
