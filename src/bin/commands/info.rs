use std::collections::BTreeSet;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use bioasm::Structure;

/// Report-only command that inspects a structure without writing atoms.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {}

/// Computes and prints structure statistics to stderr.
pub fn run(structure: &Structure, _args: &InfoArgs) -> Result<()> {
    let stats = collect_stats(structure);
    print_tables(structure, &stats)
}

#[derive(Debug)]
struct StructureStats {
    atoms: usize,
    models: usize,
    subchains: usize,
}

fn collect_stats(structure: &Structure) -> StructureStats {
    let atoms = &structure.asym_atoms;

    let distinct = |name: &str| -> usize {
        atoms
            .str_column(name)
            .map(|values| values.iter().flatten().collect::<BTreeSet<_>>().len())
            .unwrap_or(0)
    };

    StructureStats {
        atoms: atoms.height(),
        models: distinct("model_id").max(1),
        subchains: distinct("subchain_id"),
    }
}

fn print_tables(structure: &Structure, stats: &StructureStats) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "Bioasm Structure Report")?;
    writeln!(&mut stderr)?;

    let mut summary_table = Table::new();
    print_boxed_label(&mut stderr, "Structure Summary")?;
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Id", structure.id]);
    summary_table.add_row(row!["Atoms (asymmetric unit)", stats.atoms]);
    summary_table.add_row(row!["Models", stats.models]);
    summary_table.add_row(row!["Subchains", stats.subchains]);
    summary_table.add_row(row!["Entities", structure.entities.len()]);
    summary_table.add_row(row!["Symmetry operators", structure.oper_map.len()]);
    summary_table
        .print(&mut stderr)
        .context("Failed to render structure summary")?;
    writeln!(&mut stderr)?;

    let mut assembly_table = Table::new();
    print_boxed_label(&mut stderr, "Assembly Breakdown")?;
    assembly_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    assembly_table.set_titles(row!["Assembly", "Operators", "Subchains"]);
    for rule in &structure.assembly_gen {
        assembly_table.add_row(row![
            rule.assembly_id,
            rule.oper_expr,
            rule.subchain_ids.join(", ")
        ]);
    }
    assembly_table
        .print(&mut stderr)
        .context("Failed to render assembly breakdown")?;

    Ok(())
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}
