use crate::error::Converter;
use crate::{format, Result, ScanFile};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default name of the aggregate CSV report.
pub const CSV_FILE_NAME: &str = "metadata_extraction.csv";

/// Default suffix of per-file text reports.
pub const TEXT_SUFFIX: &str = "_metadata.txt";

const CSV_HEADER: [&str; 5] = [
    "File",
    "Scan Position",
    "Point Count",
    "Rotation Matrix",
    "Translation",
];

/// Destination for extracted scan metadata.
///
/// A sink is opened once per run, receives every extracted scan
/// and is closed at the end. Closing returns all written files.
pub trait ReportSink {
    /// Prepares the reports for the scan files of `folder`.
    fn open(&mut self, folder: &Path) -> Result<()>;
    /// Adds the metadata of one scan.
    fn write(&mut self, scan: &ScanFile) -> Result<()>;
    /// Flushes all pending output and returns the report files that were created.
    fn close(&mut self) -> Result<Vec<PathBuf>>;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn open(&mut self, folder: &Path) -> Result<()> {
        (**self).open(folder)
    }

    fn write(&mut self, scan: &ScanFile) -> Result<()> {
        (**self).write(scan)
    }

    fn close(&mut self) -> Result<Vec<PathBuf>> {
        (**self).close()
    }
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn open(&mut self, folder: &Path) -> Result<()> {
        (**self).open(folder)
    }

    fn write(&mut self, scan: &ScanFile) -> Result<()> {
        (**self).write(scan)
    }

    fn close(&mut self) -> Result<Vec<PathBuf>> {
        (**self).close()
    }
}

/// Available report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkKind {
    /// One CSV file with a row per scan.
    Csv,
    /// One text file per scan.
    Text,
}

impl SinkKind {
    /// Creates a boxed sink using the given output names.
    pub fn create(self, csv_file_name: &str, text_suffix: &str) -> Box<dyn ReportSink> {
        match self {
            SinkKind::Csv => Box::new(CsvSink::new(csv_file_name)),
            SinkKind::Text => Box::new(TextSink::new(text_suffix)),
        }
    }
}

/// Writes all scans as rows into a single CSV file inside the scanned folder.
#[derive(Debug)]
pub struct CsvSink {
    file_name: String,
    path: Option<PathBuf>,
    writer: Option<csv::Writer<File>>,
}

impl CsvSink {
    /// Creates a sink that writes a single report with the given name into the folder.
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            path: None,
            writer: None,
        }
    }
}

impl Default for CsvSink {
    fn default() -> Self {
        Self::new(CSV_FILE_NAME)
    }
}

impl ReportSink for CsvSink {
    fn open(&mut self, folder: &Path) -> Result<()> {
        let path = folder.join(&self.file_name);
        let mut writer = csv::Writer::from_path(&path)
            .report_err(format!("Cannot create CSV file {}", path.display()))?;
        writer
            .write_record(CSV_HEADER)
            .report_err("Failed to write CSV header")?;
        self.writer = Some(writer);
        self.path = Some(path);
        Ok(())
    }

    fn write(&mut self, scan: &ScanFile) -> Result<()> {
        let writer = self.writer.as_mut().report_err("CSV file is not open")?;
        let row = [
            scan.file_name(),
            format::join(&scan.scan_position, ", "),
            scan.point_count.to_string(),
            format::matrix_cell(&scan.rotation),
            format::join(&scan.translation, ", "),
        ];
        writer
            .write_record(&row)
            .report_err(format!("Failed to write CSV row for {}", row[0]))
    }

    fn close(&mut self) -> Result<Vec<PathBuf>> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().report_err("Failed to flush CSV file")?;
        }
        Ok(self.path.take().into_iter().collect())
    }
}

/// Writes one text file per scan next to the scan file.
///
/// Existing reports with the same name are overwritten.
#[derive(Debug)]
pub struct TextSink {
    suffix: String,
    written: Vec<PathBuf>,
}

impl TextSink {
    /// Creates a sink that writes one report per scan, named by file stem plus `suffix`.
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            written: Vec::new(),
        }
    }

    /// Report path for a scan file: same folder, file stem plus suffix.
    pub fn report_path(&self, scan_path: &Path) -> PathBuf {
        let stem = scan_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        scan_path.with_file_name(format!("{stem}{}", self.suffix))
    }
}

impl Default for TextSink {
    fn default() -> Self {
        Self::new(TEXT_SUFFIX)
    }
}

/// Text report content in fixed field order.
pub fn text_report(scan: &ScanFile) -> String {
    let mut lines = vec![
        format!("File: {}", scan.file_name()),
        format!("Scan Position: [{}]", format::join(&scan.scan_position, ", ")),
        format!("Point Count: {}", scan.point_count),
        String::from("Rotation Matrix:"),
    ];
    lines.extend(format::matrix_lines(&scan.rotation));
    lines.push(String::from("Translation:"));
    lines.push(format::bracketed(&scan.translation));
    lines.push(String::from("Header Information:"));
    lines.extend(scan.header_text.iter().cloned());
    lines.join("\n")
}

impl ReportSink for TextSink {
    fn open(&mut self, _folder: &Path) -> Result<()> {
        self.written.clear();
        Ok(())
    }

    fn write(&mut self, scan: &ScanFile) -> Result<()> {
        let path = self.report_path(&scan.path);
        let display = path.display();
        let file = File::create(&path).report_err(format!("Cannot create {display}"))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(text_report(scan).as_bytes())
            .report_err(format!("Failed to write {display}"))?;
        writer
            .flush()
            .report_err(format!("Failed to flush {display}"))?;
        self.written.push(path);
        Ok(())
    }

    fn close(&mut self) -> Result<Vec<PathBuf>> {
        Ok(std::mem::take(&mut self.written))
    }
}
