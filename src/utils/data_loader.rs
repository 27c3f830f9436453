//! This module provides utilities for loading dense matrices from text files.
//!
//! The format is deliberately plain: one matrix row per line, entries separated by
//! whitespace (commas are accepted as separators too). Blank lines and lines starting
//! with `#` are ignored.
//!
//! ```text
//! # 3x3 symmetric test matrix
//! 6 4 1
//! 4 6 1
//! 1 1 5
//! ```

use faer::Mat;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use thiserror::Error;

/// Represents all possible errors that can occur during data loading and parsing.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Occurs when a token cannot be parsed into a float.
    #[error("Parse error on line {line}: Failed to parse float from '{token}'")]
    ParseFloat { line: usize, token: String },
    /// Occurs when a row has a different number of entries than the first row.
    #[error("Format error on line {line}: expected {expected} entries but found {found}.")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Occurs when the input holds no data rows at all.
    #[error("Format error: The input contains no matrix rows.")]
    Empty,
}

/// Parses a dense matrix from any buffered reader.
///
/// # Returns
/// The matrix with as many rows as data lines and as many columns as entries per line.
/// The matrix is not required to be square; that is checked by the solver.
pub fn parse_dense_matrix(reader: impl BufRead) -> Result<Mat<f64>, DataLoaderError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let row = content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|_| DataLoaderError::ParseFloat {
                    line: line_number,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(DataLoaderError::RaggedRow {
                    line: line_number,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataLoaderError::Empty);
    }

    let ncols = rows[0].len();
    Ok(Mat::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

/// Loads a dense matrix from a text file.
///
/// # Arguments
/// * `path`: The path to the matrix file.
pub fn load_dense_matrix(path: impl AsRef<Path>) -> Result<Mat<f64>, DataLoaderError> {
    let file = File::open(path)?;
    parse_dense_matrix(BufReader::new(file))
}
