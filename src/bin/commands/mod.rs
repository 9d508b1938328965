use std::io::{self as stdio, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use bioasm::io::{parse_structure, read_structure, write_atoms, write_atoms_to_path};
use bioasm::{Structure, Table};

pub mod assembly;
pub mod asu;
pub mod info;

/// IO parameters shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct IoParameters {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Parses a structure from the configured input source. Gzip input is
/// only recognized for real paths; stdin must be plain text.
pub fn load_input(params: &IoParameters) -> Result<Structure> {
    if let Some(path) = &params.input {
        run_with_spinner("Parsing structure", || {
            read_structure(path)
                .with_context(|| format!("Failed to parse mmCIF input from {}", path.display()))
        })
    } else {
        let stdin = stdio::stdin();
        if stdin.is_terminal() {
            bail!(
                "No --input provided and stdin is a TTY. Provide -i/--input or pipe an mmCIF file into bioasm."
            );
        }
        let mut text = String::new();
        stdin
            .lock()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        run_with_spinner("Parsing structure", || {
            parse_structure(&text).context("Failed to parse mmCIF input from stdin")
        })
    }
}

/// Writes an atom table to the configured output destination.
pub fn save_atoms(atoms: &Table, params: &IoParameters, name: &str) -> Result<()> {
    match &params.output {
        Some(path) => write_atoms_to_path(path, atoms, Some(name))
            .with_context(|| format!("Failed to write output to {}", path.display()))?,
        None => {
            let stdout = stdio::stdout();
            let handle = stdout.lock();
            let mut writer = BufWriter::new(handle);
            write_atoms(&mut writer, atoms, name).context("Failed to write output to stdout")?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Ensures commands do not dump loop data into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, params: &IoParameters) -> Result<()> {
    if params.output.is_none() && stdio::stdout().is_terminal() {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}
