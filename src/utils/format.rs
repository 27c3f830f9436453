//! Plain-text rendering of matrices for terminal output.

use faer::MatRef;

/// Renders a matrix row by row with `precision` digits after the decimal point.
///
/// Columns are right-aligned to the widest entry. Negative zeros print as `0`.
pub fn format_matrix(m: MatRef<'_, f64>, precision: usize) -> String {
    let cells: Vec<Vec<String>> = (0..m.nrows())
        .map(|i| {
            (0..m.ncols())
                .map(|j| {
                    // Adding 0.0 turns -0.0 into 0.0.
                    format!("{:.precision$}", m[(i, j)] + 0.0)
                })
                .collect()
        })
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

    cells
        .iter()
        .map(|row| {
            let line = row
                .iter()
                .map(|cell| format!("{cell:>width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            format!("{line}\n")
        })
        .collect()
}
