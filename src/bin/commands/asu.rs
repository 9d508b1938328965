use anyhow::Result;
use clap::Args;

use bioasm::io::asymmetric_unit;
use bioasm::{Structure, Table};

/// Exports the asymmetric unit, every model included.
#[derive(Debug, Default, Args)]
pub struct AsuArgs {}

pub fn run(structure: &Structure, _args: &AsuArgs) -> Result<Table> {
    Ok(asymmetric_unit(structure))
}
