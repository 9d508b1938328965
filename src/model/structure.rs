//! The parsed product of an mmCIF data block.

use std::collections::HashMap;
use std::fmt;

use crate::model::frame::Frame;
use crate::table::Table;

/// One row of the assembly-generation metadata: which subchains an
/// assembly copies, and the operator expression describing how.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyRule {
    pub assembly_id: String,
    pub subchain_ids: Vec<String>,
    pub oper_expr: String,
}

/// One row of the entity metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub entity_type: Option<String>,
    /// Formula weight in grams per mole.
    pub formula_weight: Option<f64>,
}

/// Everything extracted from one mmCIF data block: the asymmetric unit
/// plus the metadata needed to expand it into biological assemblies.
#[derive(Debug, Clone)]
pub struct Structure {
    /// Identifier of the structure, typically the PDB id or file stem.
    pub id: String,
    /// Atoms of the asymmetric unit, one row per atom site.
    pub asym_atoms: Table,
    /// Assembly-generation rules, in file order.
    pub assembly_gen: Vec<AssemblyRule>,
    /// Symmetry operators keyed by their ids.
    pub oper_map: HashMap<String, Frame>,
    /// Entity metadata, in file order.
    pub entities: Vec<Entity>,
}

impl Structure {
    /// Sorted, de-duplicated ids of the assemblies this structure can
    /// produce.
    pub fn assembly_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .assembly_gen
            .iter()
            .map(|rule| rule.assembly_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Entity lookup by id.
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure '{}': {} atoms, {} assemblies, {} operators, {} entities",
            self.id,
            self.asym_atoms.height(),
            self.assembly_ids().len(),
            self.oper_map.len(),
            self.entities.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_structure() -> Structure {
        Structure {
            id: "1abc".to_string(),
            asym_atoms: Table::new(),
            assembly_gen: vec![
                AssemblyRule {
                    assembly_id: "2".to_string(),
                    subchain_ids: vec!["A".to_string()],
                    oper_expr: "1".to_string(),
                },
                AssemblyRule {
                    assembly_id: "1".to_string(),
                    subchain_ids: vec!["B".to_string()],
                    oper_expr: "1,2".to_string(),
                },
                AssemblyRule {
                    assembly_id: "1".to_string(),
                    subchain_ids: vec!["C".to_string()],
                    oper_expr: "3".to_string(),
                },
            ],
            oper_map: HashMap::from([("1".to_string(), Frame::identity())]),
            entities: vec![Entity {
                id: "1".to_string(),
                entity_type: Some("polymer".to_string()),
                formula_weight: Some(11360.4),
            }],
        }
    }

    #[test]
    fn assembly_ids_are_sorted_and_unique() {
        let structure = sample_structure();
        assert_eq!(structure.assembly_ids(), vec!["1", "2"]);
    }

    #[test]
    fn entity_lookup_finds_by_id() {
        let structure = sample_structure();
        assert_eq!(
            structure.entity("1").unwrap().entity_type.as_deref(),
            Some("polymer")
        );
        assert!(structure.entity("9").is_none());
    }

    #[test]
    fn display_summarizes_counts() {
        let rendered = sample_structure().to_string();
        assert!(rendered.contains("'1abc'"));
        assert!(rendered.contains("2 assemblies"));
    }
}
