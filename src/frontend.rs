use crate::{Error, Extraction, ReportSink, Result, RunSummary, ScanReader};
use log::warn;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Final state of an extraction run as shown to the user.
#[derive(Debug)]
pub enum Status<'a> {
    /// No folder was chosen.
    NoFolder,
    /// The folder contains no scan files.
    NoFiles(&'a Path),
    /// All files were processed.
    Completed(&'a RunSummary),
    /// The run was aborted.
    Failed(&'a Error),
}

/// User facing side of the extraction: where the folder comes from
/// and where status messages go.
pub trait FrontEnd {
    /// Folder to process, `None` if the user chose nothing.
    fn folder(&mut self) -> Option<PathBuf>;
    /// Shows the final status of a run.
    fn report(&mut self, status: &Status);
}

/// Asks the front end for a folder, runs the extraction and reports exactly one status.
pub fn extract_with<F, R, S>(front: &mut F, extraction: &mut Extraction<R, S>) -> Result<RunSummary>
where
    F: FrontEnd + ?Sized,
    R: ScanReader,
    S: ReportSink,
{
    let folder = match front.folder() {
        Some(folder) if !folder.as_os_str().is_empty() => folder,
        _ => {
            front.report(&Status::NoFolder);
            return Error::input("No folder selected");
        }
    };
    match extraction.run(&folder) {
        Ok(summary) => {
            front.report(&Status::Completed(&summary));
            Ok(summary)
        }
        Err(err) if err.is_not_found() => {
            front.report(&Status::NoFiles(&folder));
            Err(err)
        }
        Err(err) => {
            front.report(&Status::Failed(&err));
            Err(err)
        }
    }
}

/// Terminal front end.
///
/// Uses the folder given on construction or asks for one on stdin.
/// Messages go to stdout, warnings and errors to stderr.
#[derive(Debug, Default)]
pub struct Console {
    folder: Option<PathBuf>,
}

impl Console {
    /// Creates a console that asks on stdin if `folder` is `None`.
    pub fn new(folder: Option<PathBuf>) -> Self {
        Self { folder }
    }

    fn prompt(&self) -> Option<PathBuf> {
        print!("Folder with E57 files: ");
        std::io::stdout().flush().ok()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(PathBuf::from(line))
        }
    }
}

impl FrontEnd for Console {
    fn folder(&mut self) -> Option<PathBuf> {
        match self.folder.take() {
            Some(folder) => Some(folder),
            None => self.prompt(),
        }
    }

    fn report(&mut self, status: &Status) {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        if write_status(&mut stdout.lock(), &mut stderr.lock(), status).is_err() {
            warn!("Failed to print status message");
        }
    }
}

/// Writes the message for a status, warnings and errors go to `err`.
fn write_status(
    out: &mut impl Write,
    err: &mut impl Write,
    status: &Status,
) -> std::io::Result<()> {
    match status {
        Status::NoFolder => writeln!(err, "No folder selected."),
        Status::NoFiles(folder) => writeln!(out, "No scan files found in {}.", folder.display()),
        Status::Completed(summary) => {
            for output in &summary.outputs {
                writeln!(out, "Created {}", output.display())?;
            }
            if summary.failures.is_empty() {
                return writeln!(
                    out,
                    "Metadata extraction completed successfully for {} file(s).",
                    summary.processed.len()
                );
            }
            for failure in &summary.failures {
                writeln!(err, "Failed {}: {}", failure.path.display(), failure.message)?;
            }
            writeln!(
                out,
                "Metadata extraction completed: {} succeeded, {} failed.",
                summary.processed.len(),
                summary.failures.len()
            )
        }
        Status::Failed(error) => writeln!(err, "An error occurred: {}", error_chain(*error)),
    }
}

/// Error message followed by all of its sources.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Failure;

    fn render(status: &Status) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_status(&mut out, &mut err, status).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn completed_run_lists_created_reports() {
        let summary = RunSummary {
            processed: vec![PathBuf::from("a.e57"), PathBuf::from("b.e57")],
            failures: Vec::new(),
            outputs: vec![PathBuf::from("scans/metadata_extraction.csv")],
        };
        let (out, err) = render(&Status::Completed(&summary));
        assert_eq!(
            out,
            "Created scans/metadata_extraction.csv\n\
             Metadata extraction completed successfully for 2 file(s).\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn failed_files_go_to_stderr() {
        let summary = RunSummary {
            processed: vec![PathBuf::from("a.e57")],
            failures: vec![Failure {
                path: PathBuf::from("b.e57"),
                message: String::from("broken"),
            }],
            outputs: Vec::new(),
        };
        let (out, err) = render(&Status::Completed(&summary));
        assert_eq!(out, "Metadata extraction completed: 1 succeeded, 1 failed.\n");
        assert_eq!(err, "Failed b.e57: broken\n");
    }

    #[test]
    fn missing_folder_and_files() {
        let (out, err) = render(&Status::NoFolder);
        assert!(out.is_empty());
        assert_eq!(err, "No folder selected.\n");

        let (out, err) = render(&Status::NoFiles(Path::new("scans")));
        assert_eq!(out, "No scan files found in scans.\n");
        assert!(err.is_empty());
    }

    #[test]
    fn aborted_run_prints_error_chain() {
        let error = Error::Extraction {
            reason: String::from("Cannot open b.e57"),
            source: Some(Box::new(std::io::Error::other("unexpected end of file"))),
        };
        let (out, err) = render(&Status::Failed(&error));
        assert!(out.is_empty());
        assert_eq!(
            err,
            "An error occurred: Failed to extract metadata: Cannot open b.e57: unexpected end of file\n"
        );
    }
}
