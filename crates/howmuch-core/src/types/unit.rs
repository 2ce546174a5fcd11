//! Unit and comparison definitions
//!
//! Both kinds are defined by an `equivalent_to` link to another unit, and
//! both carry the fundamental quantity and unit found by following those
//! links to the end of the chain.

use serde::Serialize;

/// A unit that can be typed as input and shown as a conversion result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefinition {
    /// Canonical display name, e.g. "kilometre"
    pub name: String,
    /// Short display symbol, e.g. "km" (the name when the table leaves it blank)
    pub symbol: String,
    /// Alternate spellings recognized on input
    pub aliases: Vec<String>,
    /// How many `equivalent_unit` make one of this unit
    pub equivalent_quantity: f64,
    /// Lowercased unit token this unit is defined in terms of
    pub equivalent_unit: String,
    /// How many `fundamental_unit` make one of this unit
    pub fundamental_quantity: f64,
    /// Lowercased token of the base unit at the end of the chain
    pub fundamental_unit: String,
    /// HTML fragment describing the unit
    pub description: String,
    /// Recognized on input but never offered as a result
    pub exclude_from_results: bool,
}

/// A real-world reference quantity ("a bathtub"), used only for comparisons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonDefinition {
    pub name: String,
    pub equivalent_quantity: f64,
    pub equivalent_unit: String,
    pub fundamental_quantity: f64,
    pub fundamental_unit: String,
    pub description: String,
}

impl UnitDefinition {
    /// Whether two units measure the same dimension
    pub fn same_dimension(&self, other: &UnitDefinition) -> bool {
        self.fundamental_unit == other.fundamental_unit
    }

    /// Every spelling this unit is indexed under: symbol, name, then aliases
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        [self.symbol.as_str(), self.name.as_str()]
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }
}

impl std::fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}
