//! Definition types held by the catalog

mod unit;

pub use unit::{ComparisonDefinition, UnitDefinition};
