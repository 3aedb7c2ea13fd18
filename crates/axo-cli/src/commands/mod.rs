//! CLI commands

pub mod repl;
pub mod run;

use axo_runtime::Diagnostic;
use colored::Colorize;

/// Render a diagnostic for the terminal: red header, location, source line,
/// and a caret under the offending token
pub fn render_diagnostic(diag: &Diagnostic) -> String {
    let mut out = format!("{}: {}\n", "error".red().bold(), diag.message.bold());

    if diag.line > 0 {
        out.push_str(&format!(
            "  {} {}:{}:{}\n",
            "-->".blue(),
            diag.file,
            diag.line,
            diag.column
        ));
    }

    if !diag.snippet.is_empty() {
        let line_label = diag.line.to_string();
        let gutter = " ".repeat(line_label.len());
        out.push_str(&format!("{} {}\n", gutter, "|".blue()));
        out.push_str(&format!("{} {} {}\n", line_label.blue(), "|".blue(), diag.snippet));
        let pad = " ".repeat(diag.column.saturating_sub(1));
        out.push_str(&format!(
            "{} {} {}{}\n",
            gutter,
            "|".blue(),
            pad,
            "^".repeat(diag.length.max(1)).red().bold()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axo_runtime::Span;

    #[test]
    fn test_render_includes_caret() {
        colored::control::set_override(false);
        let diag = Diagnostic::error("Unexpected token: ';'", Span::new(1, 14))
            .with_source("var x: int = ;");
        let text = render_diagnostic(&diag);
        assert!(text.contains("error: Unexpected token: ';'"));
        assert!(text.contains("var x: int = ;"));
        assert!(text.contains('^'));
    }
}
