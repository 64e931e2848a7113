//! Defines the command-line arguments and subcommands for the rbsgen CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "rbsgen",
    version,
    about = "Generates RBS signatures for methods defined by Rails-style class macros."
)]
pub struct RbsgenArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Delete the generated signature tree.
    Clean {
        #[command(flatten)]
        options: CommonOptions,
    },
    /// Scan input directories and write signature files.
    Generate {
        #[command(flatten)]
        options: CommonOptions,
    },
    /// Clean, then generate.
    Setup {
        #[command(flatten)]
        options: CommonOptions,
    },
}

#[derive(Debug, Args)]
pub struct CommonOptions {
    /// Root directory for generated .rbs files.
    #[arg(short, long, default_value = "sig/generated")]
    pub output: PathBuf,

    /// YAML signature table used to type delegated methods.
    #[arg(long)]
    pub signatures: Option<PathBuf>,

    /// Directories to scan for Ruby sources.
    #[arg(default_value = "app")]
    pub inputs: Vec<PathBuf>,
}
