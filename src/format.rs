/// Shortest decimal representation that parses back to the same value.
///
/// Exponents have no plus sign and no zero padding, so `1e21` and `1e-7`
/// come out instead of `1e+21` and `1e-07`.
pub fn number(value: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_owned()
}

/// Joins values with the given separator.
pub fn join(values: &[f64], separator: &str) -> String {
    values
        .iter()
        .map(|v| number(*v))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Wraps space separated values in brackets, like `[1.0 2.0 3.0]`.
pub fn bracketed(values: &[f64]) -> String {
    format!("[{}]", join(values, " "))
}

/// Renders a matrix for a single CSV cell.
/// Columns are separated by tabs and rows by line breaks.
pub fn matrix_cell(matrix: &[[f64; 3]; 3]) -> String {
    matrix
        .iter()
        .map(|row| join(row, "\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a matrix as one bracketed line per row.
pub fn matrix_lines(matrix: &[[f64; 3]; 3]) -> Vec<String> {
    matrix.iter().map(|row| bracketed(row)).collect()
}
