//! Interactive REPL
//!
//! Lines buffer until one contains `;` or `}`, then the buffer runs against
//! a persistent interpreter. Errors are reported without exiting; `exit`
//! quits.

use anyhow::Result;
use axo_runtime::ReplCore;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive REPL
pub fn run() -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::new();

    println!("Axo v{}", axo_runtime::VERSION);
    println!("Type 'exit' to quit");

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if ReplCore::is_exit(&line) {
                    break;
                }
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let outcome = repl.eval_line(&line);
                for diag in &outcome.diagnostics {
                    eprintln!("{}", super::render_diagnostic(diag));
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C drops any buffered partial input
                repl.reset_buffer();
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
