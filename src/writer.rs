//! Serialization of messages back to an octet sink.
//!
//! Start-line, then each header as `Name: Value` in insertion order,
//! then a blank line, then the body. A sized or close-terminated body is
//! emitted verbatim; a chunked body is re-emitted in chunked framing,
//! preserving chunk boundaries, extensions and trailers.

use std::io::{self, Read, Write};

use log::trace;

use crate::body::{BodyReader, Chunk, ChunkedBody, EagerBody};
use crate::header::Headers;
use crate::lines::LINE_ENDING;

/// Writes the header block and the blank line that ends it. Values are
/// narrowed back to the single bytes they were widened from, so
/// ISO-8859-1 values round-trip.
pub(crate) fn write_headers<W: Write>(headers: &Headers, out: &mut W) -> io::Result<()> {
    for (name, value) in headers.iter() {
        out.write_all(name.as_bytes())?;
        out.write_all(b": ")?;
        write_field_value(value, out)?;
        out.write_all(LINE_ENDING.as_bytes())?;
    }
    out.write_all(LINE_ENDING.as_bytes())
}

fn write_field_value<W: Write>(value: &str, out: &mut W) -> io::Result<()> {
    if value.is_ascii() {
        out.write_all(value.as_bytes())
    } else {
        let bytes: Vec<u8> = value.chars().map(|c| c as u8).collect();
        out.write_all(&bytes)
    }
}

/// Streams a lazy body into `out`, re-encoding chunked framing and
/// passing sized and close-terminated bodies through verbatim.
pub(crate) fn write_lazy_body<R: Read, W: Write>(
    body: BodyReader<R>,
    out: &mut W,
) -> io::Result<()> {
    match body {
        BodyReader::Chunked(mut decoder) => {
            while let Some(chunk) = decoder.read_next_chunk()? {
                write_chunk(&chunk, out)?;
            }
            write_last_chunk(decoder.trailers(), out)
        }
        mut body => {
            io::copy(&mut body, out)?;
            Ok(())
        }
    }
}

/// Writes a buffered body in its original framing.
pub(crate) fn write_eager_body<W: Write>(body: &EagerBody, out: &mut W) -> io::Result<()> {
    match *body {
        EagerBody::Sized(ref bytes) | EagerBody::Eof(ref bytes) => out.write_all(bytes),
        EagerBody::Chunked(ref body) => write_chunked_body(body, out),
    }
}

fn write_chunked_body<W: Write>(body: &ChunkedBody, out: &mut W) -> io::Result<()> {
    for chunk in &body.chunks {
        write_chunk(chunk, out)?;
    }
    write_last_chunk(&body.trailers, out)
}

fn write_chunk<W: Write>(chunk: &Chunk, out: &mut W) -> io::Result<()> {
    trace!("chunked write, size={}", chunk.data.len());
    match chunk.extensions {
        Some(ref ext) => write!(out, "{:X};{}{}", chunk.data.len(), ext, LINE_ENDING)?,
        None => write!(out, "{:X}{}", chunk.data.len(), LINE_ENDING)?,
    }
    out.write_all(&chunk.data)?;
    out.write_all(LINE_ENDING.as_bytes())
}

fn write_last_chunk<W: Write>(trailers: &Headers, out: &mut W) -> io::Result<()> {
    write!(out, "0{}", LINE_ENDING)?;
    write_headers(trailers, out)
}
