mod check;
pub mod demo;

use clap::{Parser, Subcommand};
use codemodel_api::Encoding;
use codemodel_core::logging::{LogOptions, init_logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codemodel",
    version,
    about = "Build Java source trees from a typed code model",
    long_about = "Codemodel builds Java compilation units from a typed declaration model and \
                  writes them as import-optimized source text to a directory, a zip archive \
                  or standard output."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify names as Java identifiers, keywords or qualified names
    Check {
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
    /// Generate a sample model and write it out
    #[command(
        long_about = "Builds a small sample model (interfaces, generics, enums, annotations, \
                      nested classes, resources) and writes it. Without --out or --zip every \
                      file is written to standard output with a header line."
    )]
    Demo {
        /// Write a source tree below this directory
        #[arg(long, value_name = "DIR", conflicts_with = "zip")]
        out: Option<PathBuf>,
        /// Write a zip archive
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,
        /// JSON render configuration
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Encoding of written sources
        #[arg(long, value_parser = ["utf8", "latin1", "ascii"], default_value = "utf8")]
        encoding: String,
        /// Comment text put at the top of every source file
        #[arg(long, value_name = "TEXT")]
        prologue: Option<String>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = init_logging("cli", &LogOptions::default());

    match cli.command {
        Commands::Check { names } => {
            check::run(&names);
            Ok(())
        }
        Commands::Demo {
            out,
            zip,
            config,
            encoding,
            prologue,
        } => {
            let target = match (out, zip) {
                (Some(dir), _) => demo::Target::Directory(dir),
                (None, Some(file)) => demo::Target::Zip(file),
                (None, None) => demo::Target::Stdout,
            };
            demo::run(demo::DemoOptions {
                target,
                config,
                encoding: parse_encoding(&encoding),
                prologue,
            })
        }
    }
}

fn parse_encoding(name: &str) -> Encoding {
    match name {
        "latin1" => Encoding::Latin1,
        "ascii" => Encoding::Ascii,
        _ => Encoding::Utf8,
    }
}
