//! Bytecode loader: whitespace separated decimal integers, one code word each.
//!
//! The loader is format-agnostic. It does not know which words are opcodes and
//! which are inline operands; malformed programs are caught by the machine.

use std::io::BufRead;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::segment::CodeSegment;

const TRACE_TARGET: &str = "secd::vm::loader";

/// Append integers from `reader` to `code` until end of input or until the
/// segment is full. Returns how many words were read.
pub fn read_code<R: BufRead>(mut reader: R, code: &mut CodeSegment) -> Result<usize> {
    let mut read = 0usize;
    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        let n = reader.read_line(&mut line).context("failed to read bytecode")?;
        if n == 0 {
            break;
        }
        line_no += 1;

        for token in line.split_whitespace() {
            if code.is_full() {
                warn!(
                    target: TRACE_TARGET,
                    capacity = code.capacity(),
                    line = line_no,
                    "code segment full, ignoring remaining input"
                );
                return Ok(read);
            }
            let word: i64 = token
                .parse()
                .with_context(|| format!("line {line_no}: `{token}` is not an integer"))?;
            code.push(word)?;
            read += 1;
        }
    }

    debug!(target: TRACE_TARGET, words = read, lines = line_no, "bytecode loaded");
    Ok(read)
}

/// Convenience wrapper over [`read_code`] for in-memory text.
pub fn parse_code(text: &str, capacity: usize) -> Result<CodeSegment> {
    let mut code = CodeSegment::with_capacity(capacity)?;
    read_code(text.as_bytes(), &mut code)?;
    Ok(code)
}
