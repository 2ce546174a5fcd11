//! howmuch-core: unit resolution and conversion engine for howmuch
//!
//! Turns free text such as `"3 cubic metres"` into the same quantity in
//! other units of its dimension, plus comparisons with familiar things
//! ("20 × a bathtub"). It has no UI dependencies and can be used from a
//! CLI, a TUI or WASM.
//!
//! # Example
//!
//! ```
//! use howmuch_core::{Catalog, Engine, Query};
//!
//! let engine = Engine::new(Catalog::builtin().unwrap());
//!
//! match engine.query("2 km") {
//!     Query::Answer(answer) => {
//!         assert_eq!(answer.unit.name, "kilometre");
//!         assert!(!answer.conversions.is_empty());
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod catalog;
pub mod compare;
pub mod convert;
pub mod error;
pub mod format;
pub mod key;
pub mod parser;
pub mod session;
pub mod types;

#[cfg(all(feature = "fetch", not(target_arch = "wasm32")))]
pub mod load;
#[cfg(feature = "wasm")]
mod wasm;

pub use catalog::{Catalog, ComparisonRow, UnitRow};
pub use compare::{compare, ComparisonCandidate};
pub use convert::{convert, convert_between, Conversion, ConversionCandidate, MAX_CONVERSIONS};
pub use error::{CatalogError, ParseError, UnitNotRecognized};
pub use format::{format_fixed, format_number, format_quantity, significant_figures, MAX_FIGURES};
pub use parser::{parse_quantity, ParsedQuantity};
pub use session::{Debounce, Session, APOLOGY_DELAY};
pub use types::{ComparisonDefinition, UnitDefinition};

use serde::Serialize;

use crate::key::exact_key;

/// Main engine: answers queries against one catalog
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Catalog,
}

/// Outcome of one query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query<'a> {
    /// No number yet, or no unit text after it
    Incomplete,
    /// The unit text matched no unit
    Unrecognized { input: ParsedQuantity },
    /// The unit was recognized
    Answer(Answer<'a>),
}

/// Everything a front end shows for a recognized input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer<'a> {
    pub input: ParsedQuantity,
    pub unit: &'a UnitDefinition,
    /// "km is probably kilometre (km)", or just the name when typed in full
    pub interpretation: String,
    /// The input quantity at its own significant figures, with the unit symbol
    pub formatted_input: String,
    pub fundamental_quantity: f64,
    pub conversions: Vec<ConversionCandidate<'a>>,
    pub comparisons: Vec<ComparisonCandidate<'a>>,
}

impl Answer<'_> {
    /// Heading for the comparisons
    pub fn comparisons_title(&self) -> String {
        format!("{} is approximately:", self.formatted_input)
    }

    /// Heading for the conversions
    pub fn conversions_title(&self) -> String {
        format!(
            "To {} significant figures, {} is equivalent to:",
            self.input.figures, self.formatted_input
        )
    }
}

impl Query<'_> {
    pub fn is_answer(&self) -> bool {
        matches!(self, Query::Answer(_))
    }

    pub fn answer(&self) -> Option<&Answer<'_>> {
        match self {
            Query::Answer(answer) => Some(answer),
            _ => None,
        }
    }
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Engine over the catalog compiled into this crate
    pub fn builtin() -> error::Result<Self> {
        Catalog::builtin().map(Self::new)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Answer one line of input.
    ///
    /// Never fails: input that is incomplete or names no known unit is
    /// reported as such.
    pub fn query(&self, text: &str) -> Query<'_> {
        self.query_with_figures(text, None)
    }

    /// Answer one line of input, showing `figures` significant figures
    /// instead of as many as the input has
    pub fn query_with_figures(&self, text: &str, figures: Option<usize>) -> Query<'_> {
        let Ok(mut input) = parse_quantity(text) else {
            return Query::Incomplete;
        };
        if !input.has_unit() {
            return Query::Incomplete;
        }
        if let Some(figures) = figures {
            input.figures = figures.clamp(1, MAX_FIGURES);
        }

        let Ok(conversion) = convert(&self.catalog, input.quantity, &input.unit_text, input.figures)
        else {
            return Query::Unrecognized { input };
        };
        let unit = conversion.unit;

        let interpretation = if exact_key(&input.unit_text) == unit.name.to_lowercase() {
            unit.name.clone()
        } else {
            format!("{} is probably {}", input.unit_text, unit)
        };

        let comparisons = compare(
            conversion.fundamental_quantity,
            &unit.fundamental_unit,
            self.catalog.comparisons(),
        );

        Query::Answer(Answer {
            formatted_input: format_quantity(input.quantity, &unit.symbol, input.figures),
            interpretation,
            fundamental_quantity: conversion.fundamental_quantity,
            conversions: conversion.candidates,
            comparisons,
            unit,
            input,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::THIN_SPACE;

    fn engine() -> Engine {
        let rows = vec![
            UnitRow {
                name: "metre".into(),
                symbol: "m".into(),
                aliases: "meter, meters".into(),
                equivalent_to: "1 m".into(),
                ..UnitRow::default()
            },
            UnitRow {
                name: "kilometre".into(),
                symbol: "km".into(),
                aliases: "kilometer".into(),
                equivalent_to: "1000 m".into(),
                ..UnitRow::default()
            },
        ];
        let comparisons = vec![ComparisonRow {
            name: "a marathon".into(),
            equivalent_to: "42.195 km".into(),
            description: String::new(),
        }];
        Engine::new(Catalog::build(&rows, &comparisons).unwrap())
    }

    #[test]
    fn test_engine_answer() {
        let engine = engine();
        let query = engine.query("2 km");
        let answer = query.answer().unwrap();
        assert_eq!(answer.unit.name, "kilometre");
        assert_eq!(answer.fundamental_quantity, 2000.0);
        assert_eq!(answer.interpretation, "km is probably kilometre (km)");
        assert_eq!(answer.formatted_input, format!("2{THIN_SPACE}km"));
        assert_eq!(answer.conversions.len(), 1);
        assert_eq!(answer.conversions[0].unit.name, "metre");
        assert_eq!(answer.conversions[0].quantity, 2000.0);
        assert_eq!(answer.comparisons.len(), 1);
        assert!(answer.comparisons[0].phrase.ends_with("% of a marathon"));
    }

    #[test]
    fn test_interpretation_uses_name_when_typed_in_full() {
        let engine = engine();
        let query = engine.query("3 Kilometre");
        assert_eq!(query.answer().unwrap().interpretation, "kilometre");
    }

    #[test]
    fn test_titles() {
        let engine = engine();
        let query = engine.query("2.50 km");
        let answer = query.answer().unwrap();
        assert_eq!(
            answer.conversions_title(),
            format!("To 3 significant figures, 2.50{THIN_SPACE}km is equivalent to:")
        );
        assert_eq!(
            answer.comparisons_title(),
            format!("2.50{THIN_SPACE}km is approximately:")
        );
    }

    #[test]
    fn test_figures_override() {
        let engine = engine();
        let query = engine.query_with_figures("2 km", Some(3));
        let answer = query.answer().unwrap();
        assert_eq!(answer.input.figures, 3);
        assert_eq!(answer.formatted_input, format!("2.00{THIN_SPACE}km"));
        assert_eq!(
            answer.conversions[0].formatted,
            format!("2{THIN_SPACE}000{THIN_SPACE}m")
        );
    }

    #[test]
    fn test_engine_incomplete() {
        let engine = engine();
        assert_eq!(engine.query(""), Query::Incomplete);
        assert_eq!(engine.query("km"), Query::Incomplete);
        assert_eq!(engine.query("12   "), Query::Incomplete);
    }

    #[test]
    fn test_engine_unrecognized() {
        let engine = engine();
        assert!(matches!(
            engine.query("2 furlongs"),
            Query::Unrecognized { input } if input.unit_text == "furlongs"
        ));
    }
}
