//! I/O and utility built-ins
//!
//! File handles are scoped to each call: `std::fs` helpers open, act, and
//! release on every path, including errors.

use super::{arity_error, check_arity, want_int, want_string, OutputWriter};
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

fn io_error(msg: impl Into<String>, span: Span) -> RuntimeError {
    RuntimeError::Io {
        msg: msg.into(),
        span,
    }
}

/// `print(...)`: canonical forms separated by spaces, then a newline
pub fn print(args: &[Value], span: Span, output: &OutputWriter) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(|v| v.canonical())
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = output
        .lock()
        .map_err(|_| io_error("output writer poisoned", span))?;
    writeln!(out, "{}", line).map_err(|e| io_error(e.to_string(), span))?;
    Ok(Value::unit())
}

/// `write(path, content)`
pub fn write_file(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("write", args, 2, span)?;
    let path = want_string("write", &args[0], span)?;
    let content = args[1].canonical();

    std::fs::write(&path, content)
        .map_err(|e| io_error(format!("could not write '{}': {}", path, e), span))?;
    Ok(Value::unit())
}

/// `read(path) -> string`
pub fn read_file(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("read", args, 1, span)?;
    let path = want_string("read", &args[0], span)?;

    let content = std::fs::read_to_string(&path)
        .map_err(|e| io_error(format!("could not read '{}': {}", path, e), span))?;
    Ok(Value::string(content))
}

/// `readDir(path) -> array` of entry names, sorted for determinism
pub fn read_dir(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("readDir", args, 1, span)?;
    let path = want_string("readDir", &args[0], span)?;

    let entries = std::fs::read_dir(&path)
        .map_err(|e| io_error(format!("could not read dir '{}': {}", path, e), span))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error(e.to_string(), span))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    Ok(Value::array(names.into_iter().map(Value::string).collect()))
}

/// `copy(src, dst)`
pub fn copy_file(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("copy", args, 2, span)?;
    let src = want_string("copy", &args[0], span)?;
    let dst = want_string("copy", &args[1], span)?;

    std::fs::copy(&src, &dst)
        .map_err(|e| io_error(format!("could not copy '{}' to '{}': {}", src, dst, e), span))?;
    Ok(Value::unit())
}

/// `millis() -> int`: milliseconds since the Unix epoch
pub fn millis(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("millis", args, 0, span)?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io_error(e.to_string(), span))?;
    Ok(Value::Int(now.as_millis() as i64))
}

/// `sleep(ms)`
pub fn sleep(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("sleep", args, 1, span)?;
    let ms = want_int("sleep", &args[0], span)?;
    if ms > 0 {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
    Ok(Value::unit())
}

/// `assert(cond, msg)`: fatal when the condition is falsy
pub fn assert_cond(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("assert", args, 2, span)?;
    if !args[0].is_truthy() {
        return Err(RuntimeError::Kind {
            msg: format!("Assertion failed: {}", args[1].canonical()),
            span,
        });
    }
    Ok(Value::unit())
}

/// `error(msg)`: raise a fatal runtime error
pub fn raise_error(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(arity_error("error", "1", args.len(), span));
    }
    Err(RuntimeError::Kind {
        msg: args[0].canonical(),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::stdout_writer;
    use std::sync::{Arc, Mutex};

    fn capture() -> (OutputWriter, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer_buffer = Arc::clone(&buffer);
        let writer: OutputWriter = Arc::new(Mutex::new(Box::new(TeeBuffer(writer_buffer))));
        (writer, buffer)
    }

    struct TeeBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for TeeBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_joins_with_spaces() {
        let (writer, buffer) = capture();
        print(
            &[Value::Int(1), Value::string("a"), Value::Bool(true)],
            Span::dummy(),
            &writer,
        )
        .unwrap();
        assert_eq!(String::from_utf8(buffer.lock().unwrap().clone()).unwrap(), "1 a true\n");
    }

    #[test]
    fn test_assert_passes_and_fails() {
        let out = stdout_writer();
        assert!(assert_cond(
            &[Value::Bool(true), Value::string("m")],
            Span::dummy(),
            &out
        )
        .is_ok());
        let err = assert_cond(
            &[Value::Int(0), Value::string("boom")],
            Span::dummy(),
            &out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Assertion failed: boom"));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let out = stdout_writer();
        let err = read_file(
            &[Value::string("/definitely/not/here.axo")],
            Span::dummy(),
            &out,
        )
        .unwrap_err();
        assert!(matches!(err, RuntimeError::Io { .. }));
    }

    #[test]
    fn test_error_builtin() {
        let out = stdout_writer();
        let err = raise_error(&[Value::string("bad state")], Span::dummy(), &out).unwrap_err();
        assert_eq!(err.to_string(), "bad state");
    }
}
