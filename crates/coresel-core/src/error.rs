//! Error types shared by every coresel crate.
//!
//! Three tiers are distinguished:
//! - `Validation`: an in-memory constructor rejected its arguments.
//! - `Format`: a file could not be read or does not follow the expected layout.
//! - `Domain`: an objective was evaluated against data lacking what it needs.
//!
//! Missing cells are never errors; they are carried as `None` values.

use std::fmt;
use thiserror::Error;

/// Zero-based file coordinates of a faulty cell, when known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub row: Option<usize>,
    pub column: Option<usize>,
}

impl Location {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn row(row: usize) -> Self {
        Self {
            row: Some(row),
            column: None,
        }
    }

    pub fn cell(row: usize, column: usize) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.column) {
            (Some(r), Some(c)) => write!(f, " at row {}, column {}", r, c),
            (Some(r), None) => write!(f, " at row {}", r),
            (None, Some(c)) => write!(f, " at column {}", c),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreselError {
    /// Malformed dimensions, out-of-domain values or header mismatches
    /// passed to an in-memory constructor.
    #[error("Invalid data: {message}")]
    Validation { message: String },

    /// I/O failures and structural problems found while parsing a file.
    #[error("Format error{location}: {message}")]
    Format { location: Location, message: String },

    /// An objective was requested against a dataset without the required modality.
    #[error("Domain error: {message}")]
    Domain { message: String },
}

pub type Result<T> = std::result::Result<T, CoreselError>;

impl CoreselError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            location: Location::none(),
            message: message.into(),
        }
    }

    pub fn format_at(location: Location, message: impl Into<String>) -> Self {
        Self::Format {
            location,
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// Rewrap a validation failure as a format error.
    ///
    /// Loaders build datasets through the in-memory constructors; a file load
    /// only ever reports `Format` errors.
    pub fn into_format(self) -> Self {
        match self {
            Self::Validation { message } => Self::format(message),
            other => other,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
}
