//! Shared test helpers

use axo_runtime::{Interpreter, Lexer, OutputWriter, Parser, RuntimeError, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// A writer that records everything printed
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Build an output writer plus a handle to read back what was printed
pub fn capture_writer() -> (OutputWriter, Arc<Mutex<Vec<u8>>>) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer: OutputWriter = Arc::new(Mutex::new(Box::new(CaptureWriter(Arc::clone(&buffer)))));
    (writer, buffer)
}

/// Run source in a fresh interpreter, returning the last statement's value
pub fn run_source(source: &str) -> Result<Value, RuntimeError> {
    let program = Parser::new(Lexer::new(source).tokenize())
        .parse()
        .expect("source should parse");
    Interpreter::new().run(&program)
}

/// Run source and also collect everything it printed
pub fn run_capture(source: &str) -> (Result<Value, RuntimeError>, String) {
    let (writer, buffer) = capture_writer();
    let program = Parser::new(Lexer::new(source).tokenize())
        .parse()
        .expect("source should parse");
    let result = Interpreter::with_output(writer).run(&program);
    let text = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    (result, text)
}

/// Run source expecting success, returning printed output
pub fn run_expect_output(source: &str) -> String {
    let (result, output) = run_capture(source);
    result.expect("source should run");
    output
}
