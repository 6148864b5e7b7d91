//! Metadata-line tokenizer.
//!
//! Reads the start-line and header lines of a message, byte by byte, up
//! to and including the blank line that separates them from the body.
//! Nothing past the blank line is consumed, so body bytes stay on the
//! stream for the body reader.
//!
//! The same tokenizer reads chunked-body trailers, which share the
//! header-block syntax; the error constructor is a parameter so each
//! caller can flavor faults as request, response or plain I/O errors.

use std::io::{self, Read};

use log::trace;

use crate::options::ParserOptions;

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const LINE_ENDING: &str = "\r\n";

/// One metadata line and the 1-based line number it appeared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    pub(crate) text: String,
    pub(crate) number: u32,
}

/// Reads one byte, mapping EOF to `None` and retrying on interruption.
pub(crate) fn next_byte<R: Read>(stream: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match stream.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(..) => return Ok(Some(byte[0])),
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Reads metadata lines until the blank line (or EOF) that ends the
/// block. Line numbers start at `first_line` and count every line kept;
/// terminators skipped through `ignore_leading_empty_line` do not count.
///
/// CR must be followed by LF. A bare LF terminates a line only when
/// `allow_new_line_without_return` is set. Bytes are widened to chars
/// directly, so header values round-trip as ISO-8859-1.
pub(crate) fn read_message_lines<R, E, F>(
    stream: &mut R,
    options: &ParserOptions,
    make_err: F,
    first_line: u32,
) -> Result<Vec<Line>, E>
where
    R: Read,
    E: From<io::Error>,
    F: Fn(String, u32) -> E,
{
    let mut lines = Vec::new();
    let mut number = first_line;
    let mut skip_empty = options.ignore_leading_empty_line;

    loop {
        let mut text = String::new();
        let mut terminated = false;

        loop {
            match next_byte(stream)? {
                None => break,
                Some(CR) => match next_byte(stream)? {
                    Some(LF) => {
                        terminated = true;
                        break;
                    }
                    _ => {
                        return Err(make_err(
                            "Illegal character after return".to_string(),
                            number,
                        ));
                    }
                },
                Some(LF) if options.allow_new_line_without_return => {
                    terminated = true;
                    break;
                }
                Some(LF) => {
                    return Err(make_err(
                        "Illegal new-line character without preceding return".to_string(),
                        number,
                    ));
                }
                Some(b) => text.push(b as char),
            }
        }

        if text.is_empty() {
            if terminated && skip_empty {
                continue;
            }
            // blank line or EOF: end of the metadata block
            break;
        }

        skip_empty = false;
        lines.push(Line { text, number });
        number += 1;

        if !terminated {
            // EOF mid-line: keep the partial line, stop here
            break;
        }
    }

    trace!("read {} metadata lines", lines.len());
    Ok(lines)
}
