//! Schema-driven extraction of mmCIF categories.
//!
//! Raw category columns are always loaded as strings first and cast
//! afterwards. Casting straight off the wire is a data-corruption
//! hazard: the `.` null marker reads as boolean false in some stacks and
//! then silently becomes a zero. Keeping the raw load untyped makes the
//! null handling explicit and auditable.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use nalgebra::{Matrix3, Vector3};

use crate::io::cif::{Block, Category, Document};
use crate::io::error::Error;
use crate::model::frame::Frame;
use crate::model::structure::{AssemblyRule, Entity, Structure};
use crate::ops;
use crate::table::{Column, DataType, Table};

/// Declares how one output column is derived from a category tag.
#[derive(Debug, Clone, Copy)]
struct ColumnSpec {
    out_name: &'static str,
    source_tag: &'static str,
    data_type: DataType,
    required: bool,
}

impl ColumnSpec {
    const fn new(out_name: &'static str, source_tag: &'static str) -> Self {
        Self {
            out_name,
            source_tag,
            data_type: DataType::Str,
            required: false,
        }
    }

    const fn typed(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

const ATOM_SITE: &str = "atom_site";
const ATOM_SITE_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec::new("model_id", "pdbx_PDB_model_num"),
    ColumnSpec::new("chain_id", "auth_asym_id"),
    ColumnSpec::new("subchain_id", "label_asym_id").required(),
    ColumnSpec::new("entity_id", "label_entity_id"),
    ColumnSpec::new("alt_id", "label_alt_id"),
    ColumnSpec::new("seq_id", "label_seq_id").typed(DataType::Int),
    ColumnSpec::new("auth_seq_id", "auth_seq_id"),
    ColumnSpec::new("ins_code", "pdbx_PDB_ins_code"),
    ColumnSpec::new("comp_id", "label_comp_id").required(),
    ColumnSpec::new("atom_id", "label_atom_id").required(),
    ColumnSpec::new("element", "type_symbol"),
    ColumnSpec::new("x", "Cartn_x").typed(DataType::Float).required(),
    ColumnSpec::new("y", "Cartn_y").typed(DataType::Float).required(),
    ColumnSpec::new("z", "Cartn_z").typed(DataType::Float).required(),
    ColumnSpec::new("occupancy", "occupancy").typed(DataType::Float),
    ColumnSpec::new("b_factor", "B_iso_or_equiv").typed(DataType::Float),
];

const ASSEMBLY_GEN: &str = "pdbx_struct_assembly_gen";
const ASSEMBLY_GEN_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec::new("assembly_id", "assembly_id").required(),
    ColumnSpec::new("oper_expr", "oper_expression").required(),
    ColumnSpec::new("subchain_ids", "asym_id_list").required(),
];

const OPER_LIST: &str = "pdbx_struct_oper_list";
const OPER_LIST_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec::new("id", "id").required(),
    ColumnSpec::new("m11", "matrix[1][1]").typed(DataType::Float).required(),
    ColumnSpec::new("m12", "matrix[1][2]").typed(DataType::Float).required(),
    ColumnSpec::new("m13", "matrix[1][3]").typed(DataType::Float).required(),
    ColumnSpec::new("v1", "vector[1]").typed(DataType::Float).required(),
    ColumnSpec::new("m21", "matrix[2][1]").typed(DataType::Float).required(),
    ColumnSpec::new("m22", "matrix[2][2]").typed(DataType::Float).required(),
    ColumnSpec::new("m23", "matrix[2][3]").typed(DataType::Float).required(),
    ColumnSpec::new("v2", "vector[2]").typed(DataType::Float).required(),
    ColumnSpec::new("m31", "matrix[3][1]").typed(DataType::Float).required(),
    ColumnSpec::new("m32", "matrix[3][2]").typed(DataType::Float).required(),
    ColumnSpec::new("m33", "matrix[3][3]").typed(DataType::Float).required(),
    ColumnSpec::new("v3", "vector[3]").typed(DataType::Float).required(),
];

const ENTITY: &str = "entity";
const ENTITY_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec::new("id", "id").required(),
    ColumnSpec::new("entity_type", "type"),
    ColumnSpec::new("formula_weight", "formula_weight").typed(DataType::Float),
];

/// Applies a column schema to one category.
///
/// An absent or empty category is not an error: it yields an empty table
/// that still carries every declared column, correctly typed. A present
/// category missing required tags fails with the full list of what is
/// missing, so a malformed file surfaces every problem at once.
fn extract_table(
    category: Option<&Category>,
    category_name: &str,
    schema: &[ColumnSpec],
) -> Result<Table, Error> {
    let mut table = Table::new();

    let Some(category) = category.filter(|c| c.height() > 0) else {
        for spec in schema {
            table.push_column(spec.out_name, Column::empty(spec.data_type));
        }
        return Ok(table);
    };

    let missing: Vec<String> = schema
        .iter()
        .filter(|spec| spec.required && !category.has_column(spec.source_tag))
        .map(|spec| spec.source_tag.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::missing_columns(category_name, missing));
    }

    for spec in schema {
        let column = match category.column(spec.source_tag) {
            None => Column::nulls(spec.data_type, category.height()),
            Some(values) => cast_column(values, spec, category_name)?,
        };
        table.push_column(spec.out_name, column);
    }

    Ok(table.drop_all_null_rows())
}

fn cast_column(
    values: &[Option<String>],
    spec: &ColumnSpec,
    category_name: &str,
) -> Result<Column, Error> {
    match spec.data_type {
        DataType::Str => Ok(Column::Str(values.to_vec())),
        DataType::Int => {
            let cast: Result<Vec<Option<i64>>, Error> = values
                .iter()
                .map(|value| {
                    value
                        .as_deref()
                        .map(|raw| {
                            raw.parse().map_err(|_| {
                                Error::invalid_value(category_name, spec.source_tag, raw, "int")
                            })
                        })
                        .transpose()
                })
                .collect();
            Ok(Column::Int(cast?))
        }
        DataType::Float => {
            let cast: Result<Vec<Option<f64>>, Error> = values
                .iter()
                .map(|value| {
                    value
                        .as_deref()
                        .map(|raw| {
                            parse_float(raw).ok_or_else(|| {
                                Error::invalid_value(category_name, spec.source_tag, raw, "float")
                            })
                        })
                        .transpose()
                })
                .collect();
            Ok(Column::Float(cast?))
        }
    }
}

/// Parses a CIF number, tolerating a trailing standard-uncertainty
/// suffix like `1.54(3)`.
fn parse_float(raw: &str) -> Option<f64> {
    let numeric = match raw.find('(') {
        Some(open) if raw.ends_with(')') => &raw[..open],
        _ => raw,
    };
    numeric.parse().ok()
}

fn extract_atom_site(block: &Block) -> Result<Table, Error> {
    let category = block.category(ATOM_SITE)?;
    extract_table(category.as_ref(), ATOM_SITE, ATOM_SITE_SCHEMA)
}

fn extract_assembly_gen(block: &Block) -> Result<Option<Vec<AssemblyRule>>, Error> {
    let Some(category) = block.category(ASSEMBLY_GEN)? else {
        return Ok(None);
    };
    let table = extract_table(Some(&category), ASSEMBLY_GEN, ASSEMBLY_GEN_SCHEMA)?;

    let assembly_ids = table.str_column("assembly_id").unwrap_or_default();
    let exprs = table.str_column("oper_expr").unwrap_or_default();
    let id_lists = table.str_column("subchain_ids").unwrap_or_default();

    let mut rules = Vec::with_capacity(table.height());
    for row in 0..table.height() {
        let (Some(assembly_id), Some(oper_expr), Some(id_list)) =
            (&assembly_ids[row], &exprs[row], &id_lists[row])
        else {
            return Err(Error::inconsistent_data(
                "assembly-generation row with a null required field",
            ));
        };
        let subchain_ids = id_list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        rules.push(AssemblyRule {
            assembly_id: assembly_id.clone(),
            subchain_ids,
            oper_expr: oper_expr.clone(),
        });
    }
    Ok(Some(rules))
}

fn extract_oper_map(block: &Block) -> Result<Option<HashMap<String, Frame>>, Error> {
    let Some(category) = block.category(OPER_LIST)? else {
        return Ok(None);
    };
    let table = extract_table(Some(&category), OPER_LIST, OPER_LIST_SCHEMA)?;

    let ids = table.str_column("id").unwrap_or_default();
    let number = |name: &str, row: usize| -> Result<f64, Error> {
        table
            .float_column(name)
            .and_then(|values| values[row])
            .ok_or_else(|| {
                Error::inconsistent_data("symmetry operator with a null matrix element")
            })
    };

    let mut oper_map = HashMap::with_capacity(table.height());
    for row in 0..table.height() {
        let Some(id) = &ids[row] else {
            return Err(Error::inconsistent_data("symmetry operator with a null id"));
        };
        let rotation = Matrix3::new(
            number("m11", row)?,
            number("m12", row)?,
            number("m13", row)?,
            number("m21", row)?,
            number("m22", row)?,
            number("m23", row)?,
            number("m31", row)?,
            number("m32", row)?,
            number("m33", row)?,
        );
        let translation = Vector3::new(
            number("v1", row)?,
            number("v2", row)?,
            number("v3", row)?,
        );
        oper_map.insert(id.clone(), Frame::from_parts(rotation, translation));
    }
    Ok(Some(oper_map))
}

fn extract_entities(block: &Block) -> Result<Vec<Entity>, Error> {
    let category = block.category(ENTITY)?;
    let table = extract_table(category.as_ref(), ENTITY, ENTITY_SCHEMA)?;

    let ids = table.str_column("id").unwrap_or_default();
    let types = table.str_column("entity_type").unwrap_or_default();
    let weights = table.float_column("formula_weight").unwrap_or_default();

    let mut entities = Vec::with_capacity(table.height());
    for row in 0..table.height() {
        let Some(id) = &ids[row] else {
            return Err(Error::inconsistent_data("entity row with a null id"));
        };
        entities.push(Entity {
            id: id.clone(),
            entity_type: types[row].clone(),
            formula_weight: weights[row],
        });
    }
    Ok(entities)
}

/// Distinct non-null subchain ids, in first-appearance order.
fn distinct_subchains(atoms: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    if let Some(subchains) = atoms.str_column("subchain_id") {
        for id in subchains.iter().flatten() {
            if seen.insert(id.clone()) {
                out.push(id.clone());
            }
        }
    }
    out
}

/// Parses one mmCIF data block into a [`Structure`].
///
/// Files without symmetry operators (typical for computed models)
/// default to a single assembly `"1"` that applies the identity
/// operator to every subchain, so the asymmetric unit and the first
/// assembly coincide.
pub fn parse_structure(text: &str) -> Result<Structure, Error> {
    let document = Document::parse(text)?;
    let block = document.first_block();

    let asym_atoms = extract_atom_site(block)?;

    // The default is keyed on the operator list alone. Without
    // operators no generation rule can be applied, so any that are
    // present are discarded along with the rest of the metadata.
    let (assembly_gen, oper_map) = match extract_oper_map(block)?.filter(|map| !map.is_empty()) {
        Some(oper_map) => (
            extract_assembly_gen(block)?.unwrap_or_default(),
            oper_map,
        ),
        None => (
            vec![AssemblyRule {
                assembly_id: "1".to_string(),
                subchain_ids: distinct_subchains(&asym_atoms),
                oper_expr: "1".to_string(),
            }],
            HashMap::from([("1".to_string(), Frame::identity())]),
        ),
    };

    let known: HashSet<String> = distinct_subchains(&asym_atoms).into_iter().collect();
    for rule in &assembly_gen {
        for subchain_id in &rule.subchain_ids {
            if !known.contains(subchain_id) {
                return Err(Error::inconsistent_data(format!(
                    "assembly '{}' references subchain '{}', which has no atoms",
                    rule.assembly_id, subchain_id
                )));
            }
        }
    }

    Ok(Structure {
        id: block.name().to_string(),
        asym_atoms,
        assembly_gen,
        oper_map,
        entities: extract_entities(block)?,
    })
}

/// Reads a file into a string, transparently decoding gzip when the
/// path ends in `.gz`.
fn read_input(path: &Path) -> Result<String, Error> {
    let map_io = |source| Error::from_io(source, Some(path.to_path_buf()));
    let file = File::open(path).map_err(map_io)?;

    let mut text = String::new();
    let gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        GzDecoder::new(file).read_to_string(&mut text).map_err(map_io)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text).map_err(map_io)?;
    }
    Ok(text)
}

/// Parses a structure from a file.
pub fn read_structure(path: &Path) -> Result<Structure, Error> {
    let text = read_input(path)?;
    parse_structure(&text).map_err(|error| error.with_path(path))
}

/// Reads every atom of the asymmetric unit: no operators applied and a
/// constant zero `symmetry_mate`. Multi-model files keep all their
/// models; pick one with [`ops::select_model`] when needed.
pub fn read_asymmetric_unit(path: &Path) -> Result<Table, Error> {
    let structure = read_structure(path)?;
    Ok(asymmetric_unit(&structure))
}

/// The asymmetric unit of a [`Structure`] as an atom table.
pub fn asymmetric_unit(structure: &Structure) -> Table {
    let mut atoms = structure.asym_atoms.clone();
    atoms.push_column(
        "symmetry_mate",
        Column::Int(vec![Some(0); atoms.height()]),
    );
    atoms
}

/// Reads one model and expands the requested biological assembly.
pub fn read_biological_assembly(
    path: &Path,
    model_id: &str,
    assembly_id: &str,
) -> Result<Table, Error> {
    let structure = read_structure(path)?;
    biological_assembly(&structure, model_id, assembly_id)
        .map_err(|error| error.with_path(path))
}

/// Expands one assembly of an already-parsed structure.
pub fn biological_assembly(
    structure: &Structure,
    model_id: &str,
    assembly_id: &str,
) -> Result<Table, Error> {
    let atoms = ops::select_model(&structure.asym_atoms, model_id);
    let assembly = ops::build_assembly(
        &atoms,
        &structure.assembly_gen,
        &structure.oper_map,
        assembly_id,
    )?;
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
data_9XYZ
loop_
_atom_site.group_PDB
_atom_site.label_asym_id
_atom_site.auth_asym_id
_atom_site.label_alt_id
_atom_site.label_seq_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.type_symbol
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
_atom_site.B_iso_or_equiv
_atom_site.pdbx_PDB_model_num
ATOM A A . 1 ALA N N 1.000 2.000 3.000 1.00 20.50 1
ATOM A A . 1 ALA CA C 1.500 2.500 3.500 1.00 21.00 1
ATOM B A . ? HOH O O 9.000 9.000 9.000 0.50 30.00 1
";

    const WITH_ASSEMBLY: &str = "\
data_2BOP
loop_
_atom_site.label_asym_id
_atom_site.auth_asym_id
_atom_site.label_seq_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
A A 1 GLY CA 1.000 0.000 0.000
loop_
_pdbx_struct_assembly_gen.assembly_id
_pdbx_struct_assembly_gen.oper_expression
_pdbx_struct_assembly_gen.asym_id_list
1 1,2 A
loop_
_pdbx_struct_oper_list.id
_pdbx_struct_oper_list.matrix[1][1]
_pdbx_struct_oper_list.matrix[1][2]
_pdbx_struct_oper_list.matrix[1][3]
_pdbx_struct_oper_list.vector[1]
_pdbx_struct_oper_list.matrix[2][1]
_pdbx_struct_oper_list.matrix[2][2]
_pdbx_struct_oper_list.matrix[2][3]
_pdbx_struct_oper_list.vector[2]
_pdbx_struct_oper_list.matrix[3][1]
_pdbx_struct_oper_list.matrix[3][2]
_pdbx_struct_oper_list.matrix[3][3]
_pdbx_struct_oper_list.vector[3]
1 1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 1.0 0.0
2 -1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 -1.0 0.0
";

    #[test]
    fn atom_site_columns_are_selected_renamed_and_cast() {
        let structure = parse_structure(MINIMAL).unwrap();
        let atoms = &structure.asym_atoms;

        assert_eq!(structure.id, "9XYZ");
        assert_eq!(atoms.height(), 3);
        // Renamed to canonical names; the raw tag order does not matter.
        assert_eq!(
            atoms.str_column("subchain_id").unwrap()[2],
            Some("B".to_string())
        );
        assert_eq!(atoms.int_column("seq_id").unwrap(), &[Some(1), Some(1), None]);
        assert_eq!(atoms.float_column("b_factor").unwrap()[0], Some(20.5));
        // Both null markers come through as nulls.
        assert_eq!(atoms.str_column("alt_id").unwrap(), &[None, None, None]);
        // Undeclared tags like group_PDB are not carried along.
        assert!(!atoms.has_column("group_PDB"));
    }

    #[test]
    fn optional_columns_absent_from_the_file_are_all_null() {
        let text = "\
data_x
loop_
_atom_site.label_asym_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
A ALA CA 1.0 2.0 3.0
";
        let structure = parse_structure(text).unwrap();
        let atoms = &structure.asym_atoms;
        assert_eq!(atoms.height(), 1);
        assert_eq!(atoms.str_column("chain_id").unwrap(), &[None]);
        assert_eq!(atoms.float_column("occupancy").unwrap(), &[None]);
    }

    #[test]
    fn missing_required_columns_are_reported_together() {
        let text = "\
data_x
loop_
_atom_site.label_asym_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
A 1.0 2.0 3.0
";
        match parse_structure(text) {
            Err(Error::MissingColumns {
                category, columns, ..
            }) => {
                assert_eq!(category, ATOM_SITE);
                assert_eq!(columns, vec!["label_comp_id", "label_atom_id"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn absent_atom_site_yields_a_typed_empty_table() {
        let structure = parse_structure("data_empty\n_entry.id empty\n").unwrap();
        let atoms = &structure.asym_atoms;
        assert!(atoms.is_empty());
        assert_eq!(atoms.width(), ATOM_SITE_SCHEMA.len());
        assert!(matches!(
            atoms.column("seq_id"),
            Some(Column::Int(values)) if values.is_empty()
        ));
        assert!(matches!(atoms.column("x"), Some(Column::Float(_))));
    }

    #[test]
    fn malformed_numbers_fail_loudly() {
        let text = "\
data_x
loop_
_atom_site.label_asym_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
A ALA CA twelve 2.0 3.0
";
        match parse_structure(text) {
            Err(Error::InvalidValue { column, value, .. }) => {
                assert_eq!(column, "Cartn_x");
                assert_eq!(value, "twelve");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn uncertainty_suffixes_on_numbers_are_tolerated() {
        assert_eq!(parse_float("1.54(3)"), Some(1.54));
        assert_eq!(parse_float("-2.5"), Some(-2.5));
        assert_eq!(parse_float("(3)"), None);
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn missing_assembly_metadata_defaults_to_identity() {
        let structure = parse_structure(MINIMAL).unwrap();
        assert_eq!(structure.assembly_gen.len(), 1);
        let rule = &structure.assembly_gen[0];
        assert_eq!(rule.assembly_id, "1");
        assert_eq!(rule.oper_expr, "1");
        assert_eq!(rule.subchain_ids, vec!["A", "B"]);
        assert_eq!(structure.oper_map.len(), 1);
        assert_eq!(structure.oper_map["1"], Frame::identity());
    }

    #[test]
    fn default_assembly_reproduces_the_asymmetric_unit() {
        let structure = parse_structure(MINIMAL).unwrap();
        let assembly = biological_assembly(&structure, "1", "1").unwrap();
        // The assembly has its model resolved; the asymmetric unit keeps
        // the model column.
        let mut asym_unit = asymmetric_unit(&structure);
        asym_unit.drop_column("model_id");
        assert_eq!(assembly, asym_unit);
    }

    #[test]
    fn assembly_metadata_is_parsed_into_rules_and_frames() {
        let structure = parse_structure(WITH_ASSEMBLY).unwrap();
        assert_eq!(structure.assembly_gen.len(), 1);
        assert_eq!(structure.assembly_gen[0].oper_expr, "1,2");
        assert_eq!(structure.oper_map.len(), 2);
        assert_eq!(structure.oper_map["1"], Frame::identity());
        assert_eq!(structure.oper_map["2"].rotation()[(0, 0)], -1.0);
    }

    #[test]
    fn built_assembly_matches_the_half_turn_scenario() {
        let structure = parse_structure(WITH_ASSEMBLY).unwrap();
        let assembly = biological_assembly(&structure, "1", "1").unwrap();

        assert_eq!(assembly.height(), 2);
        assert_eq!(assembly.float_column("x").unwrap(), &[Some(1.0), Some(-1.0)]);
        assert_eq!(
            assembly.int_column("symmetry_mate").unwrap(),
            &[Some(0), Some(1)]
        );
        assert!(!assembly.has_column("model_id"));
    }

    #[test]
    fn unknown_assembly_is_an_error_with_the_known_ids() {
        let structure = parse_structure(WITH_ASSEMBLY).unwrap();
        match biological_assembly(&structure, "1", "3") {
            Err(Error::Assembly {
                source: ops::Error::UnknownAssembly { requested, known },
                ..
            }) => {
                assert_eq!(requested, "3");
                assert_eq!(known, vec!["1"]);
            }
            other => panic!("expected UnknownAssembly, got {other:?}"),
        }
    }

    #[test]
    fn rules_referencing_unknown_subchains_are_rejected() {
        let text = "\
data_x
loop_
_atom_site.label_asym_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
A ALA CA 1.0 2.0 3.0
loop_
_pdbx_struct_assembly_gen.assembly_id
_pdbx_struct_assembly_gen.oper_expression
_pdbx_struct_assembly_gen.asym_id_list
1 1 A,Z
loop_
_pdbx_struct_oper_list.id
_pdbx_struct_oper_list.matrix[1][1]
_pdbx_struct_oper_list.matrix[1][2]
_pdbx_struct_oper_list.matrix[1][3]
_pdbx_struct_oper_list.vector[1]
_pdbx_struct_oper_list.matrix[2][1]
_pdbx_struct_oper_list.matrix[2][2]
_pdbx_struct_oper_list.matrix[2][3]
_pdbx_struct_oper_list.vector[2]
_pdbx_struct_oper_list.matrix[3][1]
_pdbx_struct_oper_list.matrix[3][2]
_pdbx_struct_oper_list.matrix[3][3]
_pdbx_struct_oper_list.vector[3]
1 1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 1.0 0.0
";
        match parse_structure(text) {
            Err(Error::InconsistentData { details, .. }) => {
                assert!(details.contains("'Z'"));
            }
            other => panic!("expected InconsistentData, got {other:?}"),
        }
    }

    #[test]
    fn generation_rules_without_operators_fall_back_to_identity() {
        // A generation rule alone is unusable; the whole metadata set is
        // replaced by the identity default.
        let text = "\
data_x
loop_
_atom_site.label_asym_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
A ALA CA 1.0 2.0 3.0
loop_
_pdbx_struct_assembly_gen.assembly_id
_pdbx_struct_assembly_gen.oper_expression
_pdbx_struct_assembly_gen.asym_id_list
5 (1-60) A
";
        let structure = parse_structure(text).unwrap();
        assert_eq!(structure.assembly_gen.len(), 1);
        assert_eq!(structure.assembly_gen[0].assembly_id, "1");
        assert_eq!(structure.assembly_gen[0].oper_expr, "1");
        assert_eq!(structure.oper_map.len(), 1);
        assert_eq!(structure.oper_map["1"], Frame::identity());

        let assembly = biological_assembly(&structure, "1", "1").unwrap();
        assert_eq!(assembly.height(), 1);
    }

    #[test]
    fn entities_are_extracted_with_typed_weights() {
        let text = "\
data_x
loop_
_entity.id
_entity.type
_entity.formula_weight
1 polymer 11360.4
2 water ?
";
        let structure = parse_structure(text).unwrap();
        assert_eq!(structure.entities.len(), 2);
        assert_eq!(structure.entities[0].formula_weight, Some(11360.4));
        assert_eq!(structure.entities[1].entity_type.as_deref(), Some("water"));
        assert_eq!(structure.entities[1].formula_weight, None);
    }

    #[test]
    fn asymmetric_unit_tags_mate_zero_and_keeps_model_ids() {
        let structure = parse_structure(MINIMAL).unwrap();
        let atoms = asymmetric_unit(&structure);
        assert_eq!(atoms.height(), 3);
        assert!(atoms.has_column("model_id"));
        assert_eq!(
            atoms.int_column("symmetry_mate").unwrap(),
            &[Some(0), Some(0), Some(0)]
        );
    }

    #[test]
    fn asymmetric_unit_keeps_every_model() {
        let text = "\
data_nmr
loop_
_atom_site.label_asym_id
_atom_site.label_comp_id
_atom_site.label_atom_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.pdbx_PDB_model_num
A ALA CA 1.0 2.0 3.0 1
A ALA CA 1.1 2.1 3.1 2
A ALA CA 1.2 2.2 3.2 3
";
        let structure = parse_structure(text).unwrap();
        let atoms = asymmetric_unit(&structure);
        assert_eq!(atoms.height(), 3);
        assert_eq!(
            atoms.str_column("model_id").unwrap(),
            &[
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string())
            ]
        );
    }

    #[test]
    fn read_errors_carry_the_path() {
        let error = read_structure(Path::new("/nonexistent/1abc.cif")).unwrap_err();
        assert!(error.to_string().contains("1abc.cif"));
    }
}
