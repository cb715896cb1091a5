//! Extracts scan metadata from E57 files and batch-filters LAS files.
//!
//! The extraction pipeline lists all E57 files of a folder, reads the header
//! of the first scan in each file and writes it into a report.
//! Reports are either a single CSV file for the whole folder or one text file per scan.
//! Decoding E57 files is done by the [`e57`](https://docs.rs/e57) crate.
//!
//! The batch invoker reads a manifest of LAS file names and runs an external
//! point cloud tool once per file to filter it by a scalar field range.
//!
//! # Example
//! ```no_run
//! use e57_metadata::{CsvSink, E57ScanReader, Extraction};
//! use std::path::Path;
//!
//! let reader = E57ScanReader::new();
//! let sink = CsvSink::default();
//! let mut extraction = Extraction::new(reader, sink);
//! let summary = extraction.run(Path::new("scans/")).unwrap();
//! println!("Extracted {} files", summary.processed.len());
//! ```

#![forbid(unsafe_code)]

mod batch;
mod config;
mod error;
mod format;
mod frontend;
mod header_dump;
mod manifest;
mod pipeline;
mod reader;
mod scan;
mod scanner;
mod sink;

pub use batch::{
    command_line, plan, run_batch, run_jobs, BatchJob, BatchSummary, DryRunRunner, FilterRunner,
    JobResult, ProcessRunner,
};
pub use config::{BatchConfig, Config, ExtractConfig};
pub use error::{Error, Result};
pub use format::{join, matrix_cell, number};
pub use frontend::{error_chain, extract_with, Console, FrontEnd, Status};
pub use header_dump::dump_scan_header;
pub use manifest::{derive_output_name, parse_manifest, read_manifest};
pub use pipeline::{ErrorPolicy, Extraction, Failure, RunSummary};
pub use reader::{E57ScanReader, ScanReader};
pub use scan::{Pose, ScanFile};
pub use scanner::list_scan_files;
pub use sink::{text_report, CsvSink, ReportSink, SinkKind, TextSink, CSV_FILE_NAME, TEXT_SUFFIX};
