//! Template string interpolation
//!
//! `${...}` holes inside string literals are lexed and parsed on demand and
//! evaluated in the current scope. An unbalanced `${` or a hole whose
//! contents do not parse reverts to literal text.

use super::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::span::Span;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// Expand every `${expr}` hole in `raw` with the canonical form of the
    /// evaluated expression
    pub(crate) fn interpolate(&mut self, raw: &str, _span: Span) -> Result<Value, RuntimeError> {
        let chars: Vec<char> = raw.chars().collect();
        let mut out = String::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '$' && chars.get(i + 1) == Some(&'{') {
                match find_closing_brace(&chars, i + 2) {
                    Some(end) => {
                        let inner: String = chars[i + 2..end].iter().collect();
                        match self.eval_template_expr(&inner)? {
                            Some(value) => out.push_str(&value.canonical()),
                            None => {
                                // Unparsable hole stays literal
                                out.push_str("${");
                                out.push_str(&inner);
                                out.push('}');
                            }
                        }
                        i = end + 1;
                    }
                    None => {
                        // Unbalanced `${` reverts to literal text
                        out.push(chars[i]);
                        i += 1;
                    }
                }
            } else {
                out.push(chars[i]);
                i += 1;
            }
        }

        Ok(Value::string(out))
    }

    /// Lex and parse one hole; `None` when the contents do not form a
    /// complete expression. Evaluation errors propagate normally.
    fn eval_template_expr(&mut self, source: &str) -> Result<Option<Value>, RuntimeError> {
        let tokens = Lexer::new(source).tokenize();
        let expr = match Parser::new(tokens).parse_single_expression() {
            Ok(expr) => expr,
            Err(_) => return Ok(None),
        };
        Ok(Some(self.eval_expr(&expr)?))
    }
}

/// Find the `}` matching an opening `${`, brace-depth aware
fn find_closing_brace(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
