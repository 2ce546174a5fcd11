//! Quantity parser using pest
//!
//! Splits text such as `"2.5 cubic metres"` into the numeric literal, its
//! value, its significant-figure count and the unit text that follows.

use pest::Parser;
use pest_derive::Parser;
use serde::Serialize;

use crate::error::ParseError;
use crate::format::significant_figures;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct QuantityParser;

/// A number followed by unit text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedQuantity {
    /// The numeric literal as typed, e.g. `"0.00120"`
    pub literal: String,
    /// The value of the literal
    pub quantity: f64,
    /// Significant figures present in the literal
    pub figures: usize,
    /// Trimmed text after the number, original case (may be empty)
    pub unit_text: String,
}

impl ParsedQuantity {
    /// Whether any unit text followed the number
    pub fn has_unit(&self) -> bool {
        !self.unit_text.is_empty()
    }
}

/// Parse user input (with fuzzy fallback).
///
/// Leading text that is not part of a number is skipped, so
/// `"about 5 km"` reads as `5` and `"km"`. Fails only when the input
/// contains no digits at all.
pub fn parse_quantity(input: &str) -> Result<ParsedQuantity, ParseError> {
    if let Ok(parsed) = parse_exact(input) {
        return Ok(parsed);
    }

    // Find the first suffix that starts a quantity
    for (i, _) in input.char_indices().skip(1) {
        if let Ok(parsed) = parse_exact(&input[i..]) {
            return Ok(parsed);
        }
    }

    Err(ParseError::NoNumber(input.to_string()))
}

/// Parse a quantity that must start the text (leading whitespace allowed)
pub fn parse_exact(input: &str) -> Result<ParsedQuantity, ParseError> {
    let mut pairs = QuantityParser::parse(Rule::quantity, input)
        .map_err(|_| ParseError::NoNumber(input.to_string()))?;
    let quantity = pairs
        .next()
        .ok_or_else(|| ParseError::NoNumber(input.to_string()))?;

    let mut literal = "";
    let mut unit_text = "";
    for pair in quantity.into_inner() {
        match pair.as_rule() {
            Rule::number => literal = pair.as_str(),
            Rule::unit => unit_text = pair.as_str(),
            _ => {}
        }
    }

    let value: f64 = literal
        .parse()
        .map_err(|_| ParseError::NoNumber(input.to_string()))?;

    Ok(ParsedQuantity {
        literal: literal.to_string(),
        quantity: value,
        figures: significant_figures(literal),
        unit_text: unit_text.trim().to_string(),
    })
}

/// Parse an `equivalent_to` definition such as `"1000 J"`.
///
/// Unlike user input, the number must come first and a unit token is
/// required. The returned unit text is lowercased.
pub fn parse_definition(input: &str) -> Result<(f64, String), ParseError> {
    let parsed = parse_exact(input)?;
    if !parsed.has_unit() {
        return Err(ParseError::MissingUnit(input.to_string()));
    }
    Ok((parsed.quantity, parsed.unit_text.to_lowercase()))
}
