//! Residue identity and alternate conformations.
//!
//! Atom rows carry no explicit residue index, so one is derived from a
//! composite key. The key includes the symmetry-mate index: two copies
//! of the same residue produced by different operators are different
//! residues, even though every other field matches.

use std::collections::HashMap;

use crate::ops::error::Error;
use crate::table::{Column, Table};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResidueKey {
    model: Option<String>,
    mate: Option<i64>,
    chain: Option<String>,
    subchain: Option<String>,
    seq: i64,
}

/// Adds a dense, zero-based `residue_id` column.
///
/// Rows sharing (`model_id`, `symmetry_mate`, `chain_id`, `subchain_id`,
/// `seq_id`) share an id; ids follow first appearance. Absent key
/// columns contribute nothing to the key. A row with a null `seq_id`
/// cannot be tied to any residue, so each one becomes its own singleton.
pub fn assign_residue_ids(atoms: &Table) -> Result<Table, Error> {
    let seq = atoms
        .int_column("seq_id")
        .ok_or_else(|| Error::missing_column("seq_id", "residue assignment"))?;
    let model = atoms.str_column("model_id");
    let mate = atoms.int_column("symmetry_mate");
    let chain = atoms.str_column("chain_id");
    let subchain = atoms.str_column("subchain_id");

    let field = |column: Option<&[Option<String>]>, row: usize| -> Option<String> {
        column.and_then(|values| values[row].clone())
    };

    let mut seen: HashMap<ResidueKey, i64> = HashMap::new();
    let mut next_id = 0i64;
    let mut fresh = || {
        let id = next_id;
        next_id += 1;
        id
    };

    let ids: Vec<Option<i64>> = (0..atoms.height())
        .map(|row| {
            let id = match seq[row] {
                None => fresh(),
                Some(seq_id) => {
                    let key = ResidueKey {
                        model: field(model, row),
                        mate: mate.and_then(|values| values[row]),
                        chain: field(chain, row),
                        subchain: field(subchain, row),
                        seq: seq_id,
                    };
                    *seen.entry(key).or_insert_with(&mut fresh)
                }
            };
            Some(id)
        })
        .collect();

    let mut result = atoms.clone();
    result.push_column("residue_id", Column::Int(ids));
    Ok(result)
}

/// Splits residues with alternate conformations into complete conformers.
///
/// For each residue, every distinct non-null `alt_id` (in first-seen
/// order) yields one conformer: the rows tagged with that id plus every
/// untagged row of the residue, relabeled to the conformer's id. A
/// residue with no alternates passes through unchanged, so the output
/// always holds `max(1, distinct alt ids)` conformers per residue.
pub fn explode_residue_conformations(atoms: &Table) -> Result<Table, Error> {
    let residue_ids = atoms
        .int_column("residue_id")
        .ok_or_else(|| Error::missing_column("residue_id", "conformer explosion"))?;
    let alt_ids = atoms
        .str_column("alt_id")
        .ok_or_else(|| Error::missing_column("alt_id", "conformer explosion"))?;

    // Group rows by residue, keeping first-appearance order.
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of: HashMap<Option<i64>, usize> = HashMap::new();
    for row in 0..atoms.height() {
        let slot = *group_of
            .entry(residue_ids[row])
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(row);
    }

    let mut indices: Vec<usize> = Vec::with_capacity(atoms.height());
    let mut relabeled: Vec<Option<String>> = Vec::with_capacity(atoms.height());

    for rows in &groups {
        let mut alts: Vec<&str> = Vec::new();
        for &row in rows {
            if let Some(alt) = alt_ids[row].as_deref() {
                if !alts.contains(&alt) {
                    alts.push(alt);
                }
            }
        }

        if alts.is_empty() {
            for &row in rows {
                indices.push(row);
                relabeled.push(None);
            }
            continue;
        }

        for alt in alts {
            for &row in rows {
                match alt_ids[row].as_deref() {
                    Some(tag) if tag != alt => continue,
                    _ => {
                        indices.push(row);
                        relabeled.push(Some(alt.to_string()));
                    }
                }
            }
        }
    }

    let mut result = atoms.take(&indices);
    result.push_column("alt_id", Column::Str(relabeled));
    Ok(result)
}
