//! Tab-separated unit and comparison tables
//!
//! The first line names the columns. Columns may appear in any order and
//! unknown columns are ignored; optional columns that are absent read as
//! empty strings. A field wrapped in double quotes may contain tabs, with
//! `""` standing for a literal quote.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};

pub const UNITS_TABLE: &str = "units";
pub const COMPARISONS_TABLE: &str = "comparisons";

/// One row of the units table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UnitRow {
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    /// Comma-separated alternate spellings
    #[serde(default)]
    pub aliases: String,
    pub equivalent_to: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exclude_from_results: String,
}

/// One row of the comparisons table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub equivalent_to: String,
    #[serde(default)]
    pub description: String,
}

/// Read the units table
pub fn parse_units(text: &str) -> Result<Vec<UnitRow>> {
    parse_tsv(UNITS_TABLE, text)
}

/// Read the comparisons table
pub fn parse_comparisons(text: &str) -> Result<Vec<ComparisonRow>> {
    parse_tsv(COMPARISONS_TABLE, text)
}

/// Read a table with `name` and `equivalent_to` columns into records of type `T`.
///
/// Blank lines are skipped. Rows are numbered from 1, not counting the
/// header or blank lines, the same numbering catalog errors use.
pub fn parse_tsv<T: DeserializeOwned>(table: &'static str, text: &str) -> Result<Vec<T>> {
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        return Err(CatalogError::MissingColumn {
            table,
            column: "name",
        });
    };
    let columns: Vec<String> = split_fields(header)
        .into_iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    for required in ["name", "equivalent_to"] {
        if !columns.iter().any(|c| c == required) {
            return Err(CatalogError::MissingColumn {
                table,
                column: required,
            });
        }
    }

    lines
        .enumerate()
        .map(|(i, line)| {
            let mut record = Map::new();
            for (column, field) in columns.iter().zip(split_fields(line)) {
                record.insert(column.clone(), Value::String(field));
            }
            let row = serde_json::from_value(Value::Object(record)).map_err(|e| {
                CatalogError::InvalidRow {
                    table,
                    row: i + 1,
                    message: e.to_string(),
                }
            })?;
            Ok(row)
        })
        .collect()
}

/// Split one line on tabs, honouring double-quoted fields
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;
    let mut at_field_start = true;

    while let Some(c) = chars.next() {
        match c {
            '"' if at_field_start => quoted = true,
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '\t' if !quoted => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                continue;
            }
            _ => field.push(c),
        }
        at_field_start = false;
    }
    fields.push(field);
    fields
}
