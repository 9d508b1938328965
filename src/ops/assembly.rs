//! Biological assembly construction.
//!
//! An assembly is described by generation rules: each rule names the
//! subchains to copy and an expression listing the symmetry operators to
//! apply. Expanding a rule produces one copy of its subchains per
//! operator, tagged with a zero-based `symmetry_mate` index so copies
//! remain distinguishable downstream.

use std::collections::{HashMap, HashSet};

use crate::model::frame::Frame;
use crate::model::structure::AssemblyRule;
use crate::ops::coords::transform_atom_coords;
use crate::ops::error::Error;
use crate::table::{Column, Table};

/// Resolves an operator expression against the operator map.
///
/// Only flat comma-separated operator lists are supported. The richer
/// grammar (parenthesized products, `1-60` ranges) describes large viral
/// capsids and is rejected explicitly rather than misread.
pub fn parse_oper_expression<'a>(
    expr: &str,
    oper_map: &'a HashMap<String, Frame>,
) -> Result<Vec<&'a Frame>, Error> {
    let well_formed = !expr.is_empty()
        && expr.chars().all(|c| c.is_ascii_alphanumeric() || c == ',')
        && expr.split(',').all(|segment| !segment.is_empty());
    if !well_formed {
        return Err(Error::unsupported_expression(expr));
    }

    expr.split(',')
        .map(|id| {
            oper_map
                .get(id)
                .ok_or_else(|| Error::unresolved_operator(id, expr))
        })
        .collect()
}

/// Expands the named assembly from asymmetric-unit atoms.
///
/// Rules are applied in order; within a rule, operators are applied in
/// expression order and number the copies from zero. Atoms whose
/// subchain no rule mentions are dropped; atoms named by several rules
/// appear once per mention.
pub fn build_assembly(
    asym_atoms: &Table,
    assembly_gen: &[AssemblyRule],
    oper_map: &HashMap<String, Frame>,
    assembly_id: &str,
) -> Result<Table, Error> {
    let matching: Vec<&AssemblyRule> = assembly_gen
        .iter()
        .filter(|rule| rule.assembly_id == assembly_id)
        .collect();

    if matching.is_empty() {
        let mut known: Vec<String> = assembly_gen
            .iter()
            .map(|rule| rule.assembly_id.clone())
            .collect();
        known.sort();
        known.dedup();
        return Err(Error::unknown_assembly(assembly_id, known));
    }

    let subchains = asym_atoms
        .str_column("subchain_id")
        .ok_or_else(|| Error::missing_column("subchain_id", "assembly construction"))?;

    let mut pieces: Vec<Table> = Vec::new();
    for rule in matching {
        let frames = parse_oper_expression(&rule.oper_expr, oper_map)?;

        let wanted: HashSet<&str> = rule.subchain_ids.iter().map(String::as_str).collect();
        let mask: Vec<bool> = subchains
            .iter()
            .map(|id| id.as_deref().is_some_and(|id| wanted.contains(id)))
            .collect();
        let selected = asym_atoms.filter(&mask);

        for (mate, frame) in frames.into_iter().enumerate() {
            let mut copy = transform_atom_coords(&selected, frame)?;
            copy.push_column(
                "symmetry_mate",
                Column::Int(vec![Some(mate as i64); copy.height()]),
            );
            pieces.push(copy);
        }
    }

    Ok(Table::concat(&pieces))
}
