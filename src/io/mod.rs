//! Command-line driver, data files and shared error types

/// Command-line interface and batch fitting
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Data file parsing and report output
pub mod data;
/// Error types
pub mod error;
/// Terminal progress display
pub mod progress;
