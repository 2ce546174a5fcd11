//! Error types

use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure to read a quantity from text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No number was found
    #[error("no number found in {0:?}")]
    NoNumber(String),

    /// A number was found but nothing followed it
    #[error("no unit follows the number in {0:?}")]
    MissingUnit(String),
}

/// The typed unit matched no unit exactly or roughly
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unit not recognized: {0:?}")]
pub struct UnitNotRecognized(pub String);

/// Errors that make a unit or comparison table unusable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A row's `equivalent_to` is not `<number> <unit>`
    #[error("{table} row {row} ({name:?}): malformed equivalent_to {value:?}: {source}")]
    MalformedEquivalent {
        table: &'static str,
        row: usize,
        name: String,
        value: String,
        #[source]
        source: ParseError,
    },

    /// A row has no name
    #[error("{table} row {row}: name is empty")]
    EmptyName { table: &'static str, row: usize },

    /// The header row lacks a required column
    #[error("{table} table has no {column:?} column")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A row could not be read into its record type
    #[error("{table} row {row}: {message}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        message: String,
    },

    /// Following `equivalent_to` links came back to a unit already visited
    #[error("circular unit definition for {name:?}: {}", chain.join(" -> "))]
    CircularDefinition { name: String, chain: Vec<String> },
}
