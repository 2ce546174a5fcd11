//! The unit catalog
//!
//! Units and comparisons are built once from their tables and never change
//! afterwards. Each unit is indexed under the exact and rough keys of its
//! symbol, name and aliases. When two units share a key the one registered
//! later wins; this is the merge policy, not an error.

mod resolve;
pub mod table;

pub use resolve::{resolve, Fundamental};
pub use table::{ComparisonRow, UnitRow};

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::key::{exact_key, rough_key};
use crate::parser::parse_definition;
use crate::types::{ComparisonDefinition, UnitDefinition};
use table::{COMPARISONS_TABLE, UNITS_TABLE};

const BUILTIN_UNITS: &str = include_str!("../../data/units.tsv");
const BUILTIN_COMPARISONS: &str = include_str!("../../data/comparisons.tsv");

/// Immutable set of units and comparisons with their lookup indexes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<UnitDefinition>,
    comparisons: Vec<ComparisonDefinition>,
    exact: HashMap<String, usize>,
    rough: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from table rows.
    ///
    /// Fails if any row's `equivalent_to` is malformed or any chain of
    /// definitions is circular. Comparisons are resolved after every unit
    /// is indexed, since their chains run through the units.
    pub fn build(unit_rows: &[UnitRow], comparison_rows: &[ComparisonRow]) -> Result<Self> {
        let mut catalog = Self {
            units: unit_rows
                .iter()
                .enumerate()
                .map(|(i, row)| unit_from_row(i + 1, row))
                .collect::<Result<_>>()?,
            ..Self::default()
        };

        for idx in 0..catalog.units.len() {
            catalog.register(idx);
        }

        for idx in 0..catalog.units.len() {
            let unit = &catalog.units[idx];
            let fundamental = resolve(
                &unit.name,
                unit.equivalent_quantity,
                &unit.equivalent_unit,
                Some(idx),
                &catalog.units,
                &catalog.exact,
            )?;
            let unit = &mut catalog.units[idx];
            unit.fundamental_quantity = fundamental.quantity;
            unit.fundamental_unit = fundamental.unit;
        }

        catalog.comparisons = comparison_rows
            .iter()
            .enumerate()
            .map(|(i, row)| catalog.comparison_from_row(i + 1, row))
            .collect::<Result<_>>()?;

        let dimensions = catalog.dimensions();
        for comparison in &catalog.comparisons {
            if !dimensions.contains(comparison.fundamental_unit.as_str()) {
                warn!(
                    "comparison {:?} resolves to {:?}, which no unit measures",
                    comparison.name, comparison.fundamental_unit
                );
            }
        }
        debug!(
            "catalog built: {} units, {} comparisons, {} dimensions",
            catalog.units.len(),
            catalog.comparisons.len(),
            dimensions.len()
        );

        Ok(catalog)
    }

    /// Build a catalog from the text of the two tables
    pub fn from_tsv(units: &str, comparisons: &str) -> Result<Self> {
        Self::build(
            &table::parse_units(units)?,
            &table::parse_comparisons(comparisons)?,
        )
    }

    /// The catalog compiled into this crate
    pub fn builtin() -> Result<Self> {
        Self::from_tsv(BUILTIN_UNITS, BUILTIN_COMPARISONS)
    }

    /// Find a unit by name, symbol or alias: exact match first, then rough
    pub fn lookup(&self, text: &str) -> Option<&UnitDefinition> {
        self.lookup_index(text).map(|idx| &self.units[idx])
    }

    pub(crate) fn lookup_index(&self, text: &str) -> Option<usize> {
        if let Some(&idx) = self.exact.get(&exact_key(text)) {
            return Some(idx);
        }
        let rough = rough_key(text);
        if rough.is_empty() {
            return None;
        }
        self.rough.get(&rough).copied()
    }

    /// All units, in table order
    pub fn units(&self) -> &[UnitDefinition] {
        &self.units
    }

    /// All comparisons, in table order
    pub fn comparisons(&self) -> &[ComparisonDefinition] {
        &self.comparisons
    }

    /// Units measuring the given dimension
    pub fn dimension<'a>(
        &'a self,
        fundamental_unit: &'a str,
    ) -> impl Iterator<Item = &'a UnitDefinition> + 'a {
        self.units
            .iter()
            .filter(move |u| u.fundamental_unit == fundamental_unit)
    }

    /// Every fundamental unit some unit resolves to
    pub fn dimensions(&self) -> BTreeSet<&str> {
        self.units
            .iter()
            .map(|u| u.fundamental_unit.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn register(&mut self, idx: usize) {
        let unit = &self.units[idx];
        let mut keys: Vec<(bool, String)> = Vec::new();
        for spelling in unit.spellings() {
            keys.push((true, exact_key(spelling)));
            keys.push((false, rough_key(spelling)));
        }

        for (is_exact, key) in keys {
            if key.is_empty() {
                continue;
            }
            let index = if is_exact {
                &mut self.exact
            } else {
                &mut self.rough
            };
            if let Some(previous) = index.insert(key.clone(), idx) {
                if previous != idx {
                    debug!(
                        "key {key:?} moves from {:?} to {:?}",
                        self.units[previous].name, self.units[idx].name
                    );
                }
            }
        }
    }

    fn comparison_from_row(&self, row_no: usize, row: &ComparisonRow) -> Result<ComparisonDefinition> {
        let name = row.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::EmptyName {
                table: COMPARISONS_TABLE,
                row: row_no,
            });
        }
        let (equivalent_quantity, equivalent_unit) =
            parse_definition(&row.equivalent_to).map_err(|source| {
                CatalogError::MalformedEquivalent {
                    table: COMPARISONS_TABLE,
                    row: row_no,
                    name: name.clone(),
                    value: row.equivalent_to.clone(),
                    source,
                }
            })?;

        let fundamental = resolve(
            &name,
            equivalent_quantity,
            &equivalent_unit,
            None,
            &self.units,
            &self.exact,
        )?;

        Ok(ComparisonDefinition {
            name,
            equivalent_quantity,
            equivalent_unit,
            fundamental_quantity: fundamental.quantity,
            fundamental_unit: fundamental.unit,
            description: row.description.trim().to_string(),
        })
    }
}

fn unit_from_row(row_no: usize, row: &UnitRow) -> Result<UnitDefinition> {
    let name = row.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::EmptyName {
            table: UNITS_TABLE,
            row: row_no,
        });
    }

    let (equivalent_quantity, equivalent_unit) =
        parse_definition(&row.equivalent_to).map_err(|source| {
            CatalogError::MalformedEquivalent {
                table: UNITS_TABLE,
                row: row_no,
                name: name.clone(),
                value: row.equivalent_to.clone(),
                source,
            }
        })?;

    let symbol = match row.symbol.trim() {
        "" => name.clone(),
        symbol => symbol.to_string(),
    };

    let mut aliases: Vec<String> = Vec::new();
    for alias in row.aliases.split(',').map(str::trim) {
        if !alias.is_empty() && !aliases.iter().any(|a| a == alias) {
            aliases.push(alias.to_string());
        }
    }

    Ok(UnitDefinition {
        name,
        symbol,
        aliases,
        equivalent_quantity,
        fundamental_quantity: equivalent_quantity,
        fundamental_unit: equivalent_unit.clone(),
        equivalent_unit,
        description: row.description.trim().to_string(),
        exclude_from_results: is_truthy(&row.exclude_from_results),
    })
}

/// `yes`, `y` and `true` (any case) are true; anything else is false
fn is_truthy(flag: &str) -> bool {
    matches!(
        flag.trim().to_lowercase().as_str(),
        "yes" | "y" | "true"
    )
}
