//! Silica CLI — the command-line interface for the silica chip simulator.
//!
//! Provides `silica check` for elaborating a chip and reporting its
//! interface, and `silica eval` for instantiating a chip, driving its
//! inputs, and stepping the clock.

#![warn(missing_docs)]

mod check;
mod eval;
mod session;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// Silica — an HDL elaborator and gate-level chip simulator.
#[derive(Parser, Debug)]
#[command(name = "silica", version, about = "Silica chip simulator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Elaborate a chip and report its interface.
    Check(CheckArgs),
    /// Instantiate a chip, drive its inputs, and print its pins.
    Eval(EvalArgs),
}

/// Arguments for the `silica check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The chip name to elaborate (resolved to `<name>.hdl`).
    pub chip: String,

    /// Directories to search for `.hdl` files, first match wins.
    #[arg(short, long = "dir", default_value = ".")]
    pub dirs: Vec<PathBuf>,
}

/// Arguments for the `silica eval` subcommand.
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// The chip name to simulate (resolved to `<name>.hdl`).
    pub chip: String,

    /// Directories to search for `.hdl` files, first match wins.
    #[arg(short, long = "dir", default_value = ".")]
    pub dirs: Vec<PathBuf>,

    /// Input assignments, e.g. `--set a=1 --set addr=0x1F`.
    #[arg(short, long = "set", value_name = "PIN=VALUE")]
    pub sets: Vec<String>,

    /// Number of full clock cycles to run after the inputs settle.
    #[arg(short, long, default_value_t = 0)]
    pub cycles: u32,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, cli.quiet),
        Command::Eval(ref args) => eval::run(args, cli.quiet),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
