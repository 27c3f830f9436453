//! Common utilities for the command-line binaries.
//!
//! - **`data_loader`**: Parses dense matrices from whitespace-separated text files.
//! - **`format`**: Renders matrices with a fixed precision for terminal output.

pub mod data_loader;
pub mod format;
