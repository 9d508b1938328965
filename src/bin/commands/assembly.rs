use anyhow::Result;
use clap::Args;

use bioasm::io::biological_assembly;
use bioasm::{Structure, Table};

/// Expands one biological assembly of one model.
#[derive(Debug, Args)]
pub struct AssemblyArgs {
    /// Assembly id to build, as named by the file's generation rules.
    #[arg(long = "id", value_name = "ID", default_value = "1")]
    pub assembly_id: String,

    /// Model number to expand.
    #[arg(long, value_name = "MODEL", default_value = "1")]
    pub model: String,
}

pub fn run(structure: &Structure, args: &AssemblyArgs) -> Result<Table> {
    let atoms = biological_assembly(structure, &args.model, &args.assembly_id)?;
    Ok(atoms)
}
