use crate::error::Converter;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Lists all files directly inside a folder whose name ends with `.<extension>`.
///
/// The suffix match is case-sensitive and subfolders are not searched.
/// Results are sorted by file name.
/// Fails with a not found error if nothing matches.
pub fn list_scan_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if folder.as_os_str().is_empty() {
        Error::input("No folder selected")?
    }

    let suffix = format!(".{extension}");
    let entries = folder
        .read_dir()
        .input_err(format!("Cannot read folder {}", folder.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.input_err(format!("Cannot list folder {}", folder.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .is_some_and(|n| n.as_encoded_bytes().ends_with(suffix.as_bytes()));
        if matches {
            files.push(path);
        }
    }

    if files.is_empty() {
        Error::not_found(&format!("No {suffix} files found in the selected folder"))?
    }
    files.sort();
    Ok(files)
}
