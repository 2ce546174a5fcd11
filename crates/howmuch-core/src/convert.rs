//! Conversion of an input quantity into the other units of its dimension

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::UnitNotRecognized;
use crate::format::format_quantity;
use crate::types::UnitDefinition;

/// Most conversions offered for one input
pub const MAX_CONVERSIONS: usize = 5;

/// The input quantity expressed in one other unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionCandidate<'a> {
    pub unit: &'a UnitDefinition,
    pub quantity: f64,
    /// Quantity at the input's significant figures, thin space, symbol
    pub formatted: String,
}

/// Result of converting one input quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion<'a> {
    /// The unit the input text resolved to
    pub unit: &'a UnitDefinition,
    /// Input quantity expressed in the fundamental unit
    pub fundamental_quantity: f64,
    /// At most [`MAX_CONVERSIONS`], smallest unit first
    pub candidates: Vec<ConversionCandidate<'a>>,
}

impl Conversion<'_> {
    pub fn fundamental_unit(&self) -> &str {
        &self.unit.fundamental_unit
    }
}

/// Convert `quantity` of the unit named by `unit_text` into its dimension.
///
/// Every other unit sharing the input's fundamental unit is a candidate
/// unless it is flagged `exclude_from_results`. The candidates whose
/// formatted text is shortest are kept (so "10 m" beats "0.01 km" and
/// "1000 cm"), then ordered from the largest unit to the smallest.
pub fn convert<'a>(
    catalog: &'a Catalog,
    quantity: f64,
    unit_text: &str,
    figures: usize,
) -> Result<Conversion<'a>, UnitNotRecognized> {
    let input_idx = catalog
        .lookup_index(unit_text)
        .ok_or_else(|| UnitNotRecognized(unit_text.to_string()))?;
    let unit = &catalog.units()[input_idx];
    let fundamental_quantity = quantity * unit.fundamental_quantity;

    let mut candidates: Vec<ConversionCandidate<'a>> = catalog
        .units()
        .iter()
        .enumerate()
        .filter(|&(idx, candidate)| {
            idx != input_idx && candidate.same_dimension(unit) && !candidate.exclude_from_results
        })
        .map(|(_, candidate)| {
            let quantity = fundamental_quantity / candidate.fundamental_quantity;
            ConversionCandidate {
                unit: candidate,
                quantity,
                formatted: format_quantity(quantity, &candidate.symbol, figures),
            }
        })
        .collect();

    largest_unit_first(&mut candidates);
    candidates.sort_by_key(|c| c.formatted.chars().count());
    candidates.truncate(MAX_CONVERSIONS);
    largest_unit_first(&mut candidates);

    Ok(Conversion {
        unit,
        fundamental_quantity,
        candidates,
    })
}

/// Convert a quantity between two named units of the same dimension
pub fn convert_between(catalog: &Catalog, quantity: f64, from: &str, to: &str) -> Option<f64> {
    let from = catalog.lookup(from)?;
    let to = catalog.lookup(to)?;
    if !from.same_dimension(to) {
        return None; // Can't convert between dimensions
    }
    Some(quantity * from.fundamental_quantity / to.fundamental_quantity)
}

fn largest_unit_first(candidates: &mut [ConversionCandidate<'_>]) {
    candidates.sort_by(|a, b| {
        b.unit
            .fundamental_quantity
            .total_cmp(&a.unit.fundamental_quantity)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnitRow;
    use crate::format::THIN_SPACE;

    fn row(name: &str, symbol: &str, equivalent_to: &str) -> UnitRow {
        UnitRow {
            name: name.into(),
            symbol: symbol.into(),
            equivalent_to: equivalent_to.into(),
            ..UnitRow::default()
        }
    }

    fn lengths() -> Catalog {
        let mut rows = vec![
            row("metre", "m", "1 m"),
            row("kilometre", "km", "1000 m"),
            row("centimetre", "cm", "0.01 m"),
            row("millimetre", "mm", "0.001 m"),
            row("mile", "mi", "1609.344 m"),
            row("foot", "ft", "0.3048 m"),
            row("inch", "in", "0.0254 m"),
            row("light year", "ly", "9.4607e15 m"),
            row("gram", "g", "1 g"),
        ];
        rows.push(UnitRow {
            exclude_from_results: "yes".into(),
            ..row("decametre", "dam", "10 m")
        });
        Catalog::build(&rows, &[]).unwrap()
    }

    #[test]
    fn test_end_to_end_km() {
        let catalog = lengths();
        let conversion = convert(&catalog, 2.0, "km", 1).unwrap();
        assert_eq!(conversion.unit.name, "kilometre");
        assert_eq!(conversion.fundamental_quantity, 2000.0);
        assert_eq!(conversion.fundamental_unit(), "m");

        let metre = conversion
            .candidates
            .iter()
            .find(|c| c.unit.name == "metre")
            .unwrap();
        assert_eq!(metre.quantity, 2000.0);
        assert_eq!(metre.formatted, format!("2{THIN_SPACE}000{THIN_SPACE}m"));
    }

    #[test]
    fn test_selection_rules() {
        let catalog = lengths();
        let conversion = convert(&catalog, 1.0, "metre", 1).unwrap();
        assert!(conversion.candidates.len() <= MAX_CONVERSIONS);
        for candidate in &conversion.candidates {
            assert_ne!(candidate.unit.name, "metre");
            assert_ne!(candidate.unit.name, "decametre");
            assert_ne!(candidate.unit.name, "gram");
        }
    }

    #[test]
    fn test_shortest_strings_win_and_are_ordered_by_size() {
        let catalog = lengths();
        let conversion = convert(&catalog, 1.0, "m", 1).unwrap();
        let names: Vec<&str> = conversion
            .candidates
            .iter()
            .map(|c| c.unit.name.as_str())
            .collect();
        // 3 ft, 40 in, 0.001 km, 100 cm, 1000 mm, 0.0006 mi, 0.0000000000000001 ly
        assert_eq!(names, vec!["kilometre", "foot", "inch", "centimetre", "millimetre"]);
    }

    #[test]
    fn test_fewer_than_five_candidates() {
        let catalog = Catalog::build(&[row("metre", "m", "1 m"), row("foot", "ft", "0.3048 m")], &[])
            .unwrap();
        let conversion = convert(&catalog, 10.0, "ft", 2).unwrap();
        assert_eq!(conversion.candidates.len(), 1);
        assert_eq!(conversion.candidates[0].formatted, format!("3.0{THIN_SPACE}m"));
    }

    #[test]
    fn test_unrecognized_unit() {
        let catalog = lengths();
        assert_eq!(
            convert(&catalog, 1.0, "parsec", 1),
            Err(UnitNotRecognized("parsec".into()))
        );
    }

    #[test]
    fn test_round_trip_between_units() {
        let catalog = lengths();
        let units = ["m", "km", "cm", "mm", "mi", "ft", "in", "ly"];
        for from in units {
            for to in units {
                let there = convert_between(&catalog, 12.5, from, to).unwrap();
                let back = convert_between(&catalog, there, to, from).unwrap();
                assert!((back - 12.5).abs() < 1e-9, "{from} -> {to} -> {from}: {back}");
            }
        }
    }

    #[test]
    fn test_no_conversion_across_dimensions() {
        let catalog = lengths();
        assert_eq!(convert_between(&catalog, 1.0, "m", "g"), None);
    }
}
