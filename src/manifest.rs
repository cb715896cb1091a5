use crate::error::Converter;
use crate::Result;
use std::path::Path;

/// Reads a manifest file with one file name per line.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .input_err(format!("Cannot read manifest {}", path.display()))?;
    Ok(parse_manifest(&text))
}

/// Splits manifest text into trimmed file names, skipping blank lines.
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Builds the output file name by replacing every occurrence of `pattern`.
///
/// Returns the new name and whether anything was replaced.
/// Without a match the output name equals the input name.
pub fn derive_output_name(name: &str, pattern: &str, replacement: &str) -> (String, bool) {
    if pattern.is_empty() || !name.contains(pattern) {
        return (name.to_string(), false);
    }
    (name.replace(pattern, replacement), true)
}
