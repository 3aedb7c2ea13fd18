//! Run command - execute an Axo source file

use anyhow::{anyhow, Result};
use axo_runtime::Axo;

/// Execute a source file; diagnostics go to stderr and the error return
/// makes the process exit nonzero
pub fn run(file_path: &str) -> Result<()> {
    let runtime = Axo::new();

    match runtime.run_file(file_path) {
        Ok(_) => Ok(()),
        Err(diagnostics) => {
            for diag in &diagnostics {
                eprintln!("{}", super::render_diagnostic(diag));
            }
            Err(anyhow!("failed to execute {}", file_path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_run_simple_script() {
        let mut file = NamedTempFile::with_suffix(".axo").unwrap();
        writeln!(file, "var x: int = 41; print(x + 1);").unwrap();
        assert!(run(file.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_run_missing_file() {
        assert!(run("no_such_script.axo").is_err());
    }

    #[test]
    fn test_run_parse_error() {
        let mut file = NamedTempFile::with_suffix(".axo").unwrap();
        writeln!(file, "var x: int = ;").unwrap();
        assert!(run(file.path().to_str().unwrap()).is_err());
    }
}
