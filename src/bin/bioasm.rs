use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::IoParameters;
use commands::{assembly, asu, info};

#[derive(Parser, Debug)]
#[command(
    name = "bioasm",
    about = "A command-line tool for turning mmCIF structure files into flat atom tables and biological assemblies.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input mmCIF file path (.cif or .cif.gz). When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the structure without writing atom data.
    Info(info::InfoArgs),
    /// Export the asymmetric unit, every model included.
    Asu(asu::AsuArgs),
    /// Build a biological assembly and export it.
    Assembly(assembly::AssemblyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let io_params = IoParameters {
        input: cli.input.clone(),
        output: cli.output.clone(),
    };

    match cli.command {
        Command::Info(args) => {
            let structure = commands::load_input(&io_params)?;
            info::run(&structure, &args)?;
        }
        Command::Asu(args) => {
            commands::ensure_noninteractive_stdout("asu", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let atoms = asu::run(&structure, &args)?;
            commands::save_atoms(&atoms, &io_params, &structure.id)?;
        }
        Command::Assembly(args) => {
            commands::ensure_noninteractive_stdout("assembly", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let atoms = assembly::run(&structure, &args)?;
            commands::save_atoms(&atoms, &io_params, &structure.id)?;
        }
    }

    Ok(())
}
