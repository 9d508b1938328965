//! Debug export of atom tables as a minimal mmCIF `atom_site` loop.
//!
//! The output exists so intermediate tables can be dropped into a
//! molecular viewer, not to round-trip the input file: a fixed set of
//! items, floats at three decimals, and `?` for every null.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::io::error::Error;
use crate::table::Table;

/// The exported items, paired with the table columns feeding them.
/// Column order is part of the contract.
const EXPORT_ITEMS: &[(&str, &str)] = &[
    ("auth_asym_id", "chain_id"),
    ("label_asym_id", "subchain_id"),
    ("label_alt_id", "alt_id"),
    ("label_seq_id", "seq_id"),
    ("label_comp_id", "comp_id"),
    ("label_atom_id", "atom_id"),
    ("type_symbol", "element"),
    ("Cartn_x", "x"),
    ("Cartn_y", "y"),
    ("Cartn_z", "z"),
    ("occupancy", "occupancy"),
    ("B_iso_or_equiv", "b_factor"),
];

const NULL: &str = "?";

struct WriterContext<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> WriterContext<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    fn line(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.writer, "{}", text).map_err(|e| Error::from_io(e, None))
    }

    fn header(&mut self, name: &str) -> Result<(), Error> {
        self.line(&format!("data_{}", name))?;
        self.line("#")?;
        self.line("loop_")?;
        for (item, _) in EXPORT_ITEMS {
            self.line(&format!("_atom_site.{}", item))?;
        }
        Ok(())
    }

    fn row(&mut self, atoms: &Table, row: usize) -> Result<(), Error> {
        let mut fields = Vec::with_capacity(EXPORT_ITEMS.len());
        for (_, column) in EXPORT_ITEMS {
            fields.push(match *column {
                "chain_id" => chain_label(atoms, row),
                "seq_id" => int_field(atoms, "seq_id", row),
                "x" | "y" | "z" | "occupancy" | "b_factor" => float_field(atoms, column, row),
                name => str_field(atoms, name, row),
            });
        }
        self.line(&fields.join(" "))
    }
}

/// The exported chain label: the author chain id, suffixed with the
/// one-based symmetry-mate number when the table carries one, so copies
/// of chain `A` come out as `A1`, `A2`, ...
fn chain_label(atoms: &Table, row: usize) -> String {
    let chain = atoms
        .str_column("chain_id")
        .and_then(|values| values[row].clone());
    let mate = atoms
        .int_column("symmetry_mate")
        .and_then(|values| values[row]);
    match (chain, mate) {
        (Some(chain), Some(mate)) => format!("{}{}", chain, mate + 1),
        (Some(chain), None) => quote(chain),
        (None, _) => NULL.to_string(),
    }
}

fn str_field(atoms: &Table, name: &str, row: usize) -> String {
    atoms
        .str_column(name)
        .and_then(|values| values[row].clone())
        .map_or_else(|| NULL.to_string(), quote)
}

fn int_field(atoms: &Table, name: &str, row: usize) -> String {
    atoms
        .int_column(name)
        .and_then(|values| values[row])
        .map_or_else(|| NULL.to_string(), |value| value.to_string())
}

fn float_field(atoms: &Table, name: &str, row: usize) -> String {
    atoms
        .float_column(name)
        .and_then(|values| values[row])
        .map_or_else(|| NULL.to_string(), |value| format!("{:.3}", value))
}

/// Wraps values that would not survive whitespace-splitting.
fn quote(value: String) -> String {
    if value.is_empty() || value.contains(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value
    }
}

/// Writes an atom table as one `atom_site` loop.
pub fn write_atoms<W: Write>(writer: &mut W, atoms: &Table, name: &str) -> Result<(), Error> {
    let mut context = WriterContext::new(writer);
    context.header(name)?;
    for row in 0..atoms.height() {
        context.row(atoms, row)?;
    }
    context.line("#")
}

/// Writes an atom table to a file. The data block is named after `name`
/// when given, otherwise after the file stem.
pub fn write_atoms_to_path(path: &Path, atoms: &Table, name: Option<&str>) -> Result<(), Error> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("atoms");
    let name = name.unwrap_or(stem);

    let file =
        File::create(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    let mut writer = BufWriter::new(file);
    write_atoms(&mut writer, atoms, name).map_err(|error| error.with_path(path))?;
    writer
        .flush()
        .map_err(|e| Error::from_io(e, Some(path.to_path_buf())))
}
