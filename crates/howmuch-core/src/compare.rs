//! Comparison of an input quantity against real-world references
//!
//! "2 000 litres" reads better next to "13 × a bathtub". Each comparison
//! in the same dimension yields the ratio of the input to it; ratios of ten
//! or more are dropped, small ones read as a percentage.

use serde::Serialize;

use crate::format::format_fixed;
use crate::types::ComparisonDefinition;

/// Comparisons at or above this ratio are not shown
pub const MAX_FRACTION: f64 = 10.0;

/// Ratios below this read as a percentage ("80% of"), others as a multiple
pub const PERCENT_BELOW: f64 = 1.3;

/// The input measured against one reference quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCandidate<'a> {
    pub comparison: &'a ComparisonDefinition,
    /// Input quantity divided by the reference quantity
    pub fraction: f64,
    /// e.g. "45% of a bathtub" or "2.4 × a bathtub"
    pub phrase: String,
}

impl ComparisonCandidate<'_> {
    /// Fill of each bar segment for drawing the fraction, see [`bar_segments`]
    pub fn bars(&self) -> Vec<f64> {
        bar_segments(self.fraction)
    }
}

/// Compare a fundamental quantity with every reference of the same dimension.
///
/// Results keep the largest reference first, so the smallest ratios lead.
pub fn compare<'a>(
    fundamental_quantity: f64,
    fundamental_unit: &str,
    comparisons: &'a [ComparisonDefinition],
) -> Vec<ComparisonCandidate<'a>> {
    let mut candidates: Vec<ComparisonCandidate<'a>> = comparisons
        .iter()
        .filter(|c| c.fundamental_unit == fundamental_unit)
        .map(|comparison| {
            let fraction = fundamental_quantity / comparison.fundamental_quantity;
            ComparisonCandidate {
                comparison,
                fraction,
                phrase: phrase(fraction, &comparison.name),
            }
        })
        .filter(|c| c.fraction < MAX_FRACTION)
        .collect();

    candidates.sort_by(|a, b| {
        b.comparison
            .fundamental_quantity
            .total_cmp(&a.comparison.fundamental_quantity)
    });
    candidates
}

/// Describe a ratio against a named reference
pub fn phrase(fraction: f64, name: &str) -> String {
    if fraction < PERCENT_BELOW {
        format!("{}% of {name}", format_fixed(fraction * 100.0, 0))
    } else {
        format!("{} × {name}", format_fixed(fraction, 1))
    }
}

/// Split a ratio into bar segments: one full segment (1.0) per whole
/// unit, then the remainder rounded to a whole percent. An exact whole
/// number has no trailing partial segment.
pub fn bar_segments(fraction: f64) -> Vec<f64> {
    if !fraction.is_finite() || fraction <= 0.0 {
        return Vec::new();
    }
    let whole = fraction.floor();
    let remainder = fraction - whole;

    let mut segments = vec![1.0; whole as usize];
    if remainder != 0.0 {
        segments.push((remainder * 100.0).round() / 100.0);
    }
    segments
}
