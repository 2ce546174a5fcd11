//! Fundamental unit resolution
//!
//! A unit is defined in terms of another (`1 GJ = 1000 MJ`), which may be
//! defined in terms of another again. Following the links multiplies the
//! quantities together until the chain reaches a unit defined in terms of
//! itself (`1 J = 1 J`) or a token no unit answers to. That last token is
//! the fundamental unit.

use std::collections::{HashMap, HashSet};

use crate::error::{CatalogError, Result};
use crate::key::exact_key;
use crate::types::UnitDefinition;

/// Where a definition chain ends
#[derive(Debug, Clone, PartialEq)]
pub struct Fundamental {
    pub quantity: f64,
    pub unit: String,
}

/// Follow `equivalent_unit` links from one definition to its fundamental unit.
///
/// `origin` is the definition's own index when it is itself a unit, so a
/// chain that leads back to it is reported as circular. Only the
/// `equivalent_*` fields are read, so resolving again gives the same answer.
pub fn resolve(
    name: &str,
    quantity: f64,
    unit: &str,
    origin: Option<usize>,
    units: &[UnitDefinition],
    exact: &HashMap<String, usize>,
) -> Result<Fundamental> {
    let lookup = |token: &str| exact.get(&exact_key(token)).copied();

    let mut visited: HashSet<usize> = origin.into_iter().collect();
    let mut chain: Vec<usize> = origin.into_iter().collect();
    let mut fundamental = Fundamental {
        quantity,
        unit: unit.to_string(),
    };

    let mut current = lookup(unit);
    while let Some(idx) = current {
        let def = &units[idx];
        fundamental.quantity *= def.equivalent_quantity;
        fundamental.unit.clone_from(&def.equivalent_unit);

        let next = lookup(&def.equivalent_unit);
        if next == Some(idx) {
            break;
        }

        visited.insert(idx);
        chain.push(idx);
        if let Some(repeat) = next.filter(|n| visited.contains(n)) {
            chain.push(repeat);
            return Err(CatalogError::CircularDefinition {
                name: name.to_string(),
                chain: chain.iter().map(|&i| units[i].name.clone()).collect(),
            });
        }
        current = next;
    }

    Ok(fundamental)
}
