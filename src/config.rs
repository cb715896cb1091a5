use crate::error::Converter;
use crate::sink::{CSV_FILE_NAME, TEXT_SUFFIX};
use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for both tools, usually loaded from a TOML file.
///
/// Missing sections and keys fall back to their defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub extract: ExtractConfig,
    pub batch: BatchConfig,
}

impl Config {
    /// Reads and parses a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .config_err(format!("Cannot read config file {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Parses a config from TOML text, missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).config_err("Failed to parse TOML config")
    }
}

/// Settings of the metadata extraction.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Folder to scan, if not given on the command line.
    pub folder: Option<PathBuf>,
    /// Extension of scan files without dot. Matched case-sensitive.
    pub extension: String,
    pub csv_file_name: String,
    pub text_suffix: String,
    /// Continue with the next file when a scan file cannot be read.
    pub keep_going: bool,
    pub validate_crc: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            folder: None,
            extension: String::from("e57"),
            csv_file_name: String::from(CSV_FILE_NAME),
            text_suffix: String::from(TEXT_SUFFIX),
            keep_going: false,
            validate_crc: false,
        }
    }
}

/// Settings of the batch filter invocation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Point cloud executable, either a full path or a name on the `PATH`.
    pub executable: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Text file with one input file name per line.
    pub manifest: PathBuf,
    /// Substring of input names that is replaced to build output names.
    pub pattern: String,
    pub replacement: String,
    /// Scalar field made active before filtering.
    pub scalar_field: String,
    pub filter_min: f64,
    pub filter_max: f64,
    pub export_format: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("CloudCompare"),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            manifest: PathBuf::from("input.txt"),
            pattern: String::from("_Scanner1_"),
            replacement: String::from("_Scanner1_output_"),
            scalar_field: String::from("LAST"),
            filter_min: 3.0,
            filter_max: 5.0,
            export_format: String::from("LAS"),
        }
    }
}
