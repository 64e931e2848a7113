//! The rbsgen command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library functions: `clean` deletes the output tree, `generate` runs
//! the batch boundary, `setup` does both in order.

pub mod args;

pub use args::{Command, CommonOptions, RbsgenArgs};

use clap::Parser;

use crate::batch::{self, BatchConfig, Summary};

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let args = RbsgenArgs::parse();
    match args.command {
        Command::Clean { options } => {
            batch::clean(&options.output)?;
            println!("removed {}", options.output.display());
        }
        Command::Generate { options } => {
            let summary = batch::generate_all(&config(&options))?;
            report(&summary);
        }
        Command::Setup { options } => {
            batch::clean(&options.output)?;
            let summary = batch::generate_all(&config(&options))?;
            report(&summary);
        }
    }
    Ok(())
}

fn config(options: &CommonOptions) -> BatchConfig {
    BatchConfig {
        output_root: options.output.clone(),
        inputs: options.inputs.clone(),
        signatures: options.signatures.clone(),
    }
}

fn report(summary: &Summary) {
    println!(
        "wrote {} signature file(s) ({} source(s) had nothing to emit, {} failed)",
        summary.written, summary.empty, summary.failed
    );
}
