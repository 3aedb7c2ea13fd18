//! Axo command-line interface
//!
//! One optional positional argument: a path to an `.axo` source file. With
//! no argument the interactive REPL starts. Anything else is a usage error.

use clap::error::ErrorKind;
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "axo")]
#[command(about = "Axo language interpreter", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to an .axo source file; omit to start the REPL
    file: Option<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let result = match cli.file {
        Some(file) => commands::run::run(&file),
        None => commands::repl::run(),
    };

    if result.is_err() {
        std::process::exit(1);
    }
}
