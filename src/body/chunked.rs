//! Chunked transfer decoding.
//!
//! `chunked-body = *chunk last-chunk trailer-part CRLF`
//! `chunk        = chunk-size [ chunk-ext ] CRLF chunk-data CRLF`
//!
//! Chunk sizes are hexadecimal; anything after a `;` on the size line is
//! a chunk extension and does not affect the size. The final zero-size
//! chunk may be followed by trailer headers, which use the same syntax
//! as the main header block.

use std::cmp;
use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;
use log::{debug, trace};

use crate::header::{parse_header_lines, Headers};
use crate::lines::{next_byte, read_message_lines, CR, LF};
use crate::options::ParserOptions;

/// One decoded chunk: its payload and any extensions from its size line.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Raw extension text that followed the `;` on the size line, if
    /// any.
    pub extensions: Option<String>,
    /// The chunk payload.
    pub data: Bytes,
}

/// Incremental decoder for a chunked body.
///
/// Reading through the `Read` impl yields the decoded payload bytes;
/// [`ChunkedDecoder::read_next_chunk`] yields whole chunks instead,
/// preserving their boundaries and extensions. Once the terminal
/// zero-size chunk has been consumed, [`ChunkedDecoder::trailers`]
/// exposes any trailer headers.
pub struct ChunkedDecoder<R> {
    stream: R,
    /// Bytes left in the current chunk; `None` at a chunk boundary.
    remaining: Option<u64>,
    done: bool,
    lenient: bool,
    trailers: Headers,
}

impl<R: Read> ChunkedDecoder<R> {
    pub(crate) fn new(stream: R, lenient: bool) -> ChunkedDecoder<R> {
        ChunkedDecoder {
            stream,
            remaining: None,
            done: false,
            lenient,
            trailers: Headers::new(),
        }
    }

    /// Trailer headers read after the final chunk. Empty until the body
    /// has been fully consumed.
    pub fn trailers(&self) -> &Headers {
        &self.trailers
    }

    pub(crate) fn into_trailers(self) -> Headers {
        self.trailers
    }

    /// Unwraps the decoder and returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Reads one whole chunk, or `None` once the terminal zero-size
    /// chunk (and the trailers after it) have been consumed.
    pub fn read_next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        if self.done {
            return Ok(None);
        }
        let (size, extensions) = match self.remaining.take() {
            // the current chunk was partially drained through `read`;
            // hand back what is left of it
            Some(remaining) => (remaining, None),
            None => {
                let (size, extensions) = read_chunk_size(&mut self.stream, self.lenient)?;
                if size == 0 {
                    self.finish()?;
                    return Ok(None);
                }
                (size, extensions)
            }
        };
        let mut data = vec![0u8; size as usize];
        self.stream.read_exact(&mut data)?;
        self.eat_line_ending()?;
        debug!("read chunk, size={}", size);
        Ok(Some(Chunk {
            extensions,
            data: Bytes::from(data),
        }))
    }

    /// Consumes the trailer block that follows the zero-size chunk.
    fn finish(&mut self) -> io::Result<()> {
        let options = ParserOptions {
            allow_new_line_without_return: self.lenient,
            ignore_leading_empty_line: false,
            insert_http_version_if_missing: false,
            insert_host_header_if_missing: false,
        };
        let lines = read_message_lines(&mut self.stream, &options, invalid_data, 1)?;
        self.trailers = parse_header_lines(&lines, invalid_data)?;
        trace!("end of chunked, trailers={}", self.trailers.len());
        self.done = true;
        Ok(())
    }

    fn eat_line_ending(&mut self) -> io::Result<()> {
        match next_byte(&mut self.stream)? {
            Some(CR) => match next_byte(&mut self.stream)? {
                Some(LF) => Ok(()),
                _ => Err(invalid_data(
                    "Illegal character after return".to_string(),
                    0,
                )),
            },
            Some(LF) if self.lenient => Ok(()),
            Some(..) | None => Err(invalid_data(
                "Missing line terminator after chunk data".to_string(),
                0,
            )),
        }
    }
}

impl<R: Read> Read for ChunkedDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.done {
                return Ok(0);
            }
            match self.remaining {
                None => {
                    let (size, _extensions) = read_chunk_size(&mut self.stream, self.lenient)?;
                    if size == 0 {
                        self.finish()?;
                        return Ok(0);
                    }
                    self.remaining = Some(size);
                }
                Some(remaining) => {
                    let max = cmp::min(remaining, buf.len() as u64) as usize;
                    let num = self.stream.read(&mut buf[..max])?;
                    if num == 0 {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "stream ended inside a chunk",
                        ));
                    }
                    let remaining = remaining - num as u64;
                    if remaining == 0 {
                        self.eat_line_ending()?;
                        self.remaining = None;
                    } else {
                        self.remaining = Some(remaining);
                    }
                    return Ok(num);
                }
            }
        }
    }
}

impl<R> fmt::Debug for ChunkedDecoder<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ChunkedDecoder")
            .field("remaining", &self.remaining)
            .field("done", &self.done)
            .finish()
    }
}

fn invalid_data(message: String, _line: u32) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Chunked chunks start with 1*HEXDIGIT, indicating the size of the
/// chunk. Linear white space may follow the size, and a `;` starts the
/// chunk extensions, which run to the end of the line and are returned
/// verbatim without affecting the size.
pub(crate) fn read_chunk_size<R: Read>(
    stream: &mut R,
    lenient: bool,
) -> io::Result<(u64, Option<String>)> {
    let mut size: u64 = 0;
    let mut any_digit = false;
    let mut in_chunk_size = true;
    let mut in_ext = false;
    let mut ext = String::new();

    loop {
        let b = match next_byte(stream)? {
            Some(b) => b,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside a chunk-size line",
                ));
            }
        };
        match b {
            b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' if in_chunk_size => {
                let digit = match b {
                    b'0'..=b'9' => b - b'0',
                    b'a'..=b'f' => b - b'a' + 10,
                    _ => b - b'A' + 10,
                };
                size = size
                    .checked_mul(16)
                    .and_then(|s| s.checked_add(u64::from(digit)))
                    .ok_or_else(|| {
                        invalid_data("Chunk size overflows a 64-bit integer".to_string(), 0)
                    })?;
                any_digit = true;
            }
            CR => match next_byte(stream)? {
                Some(LF) => break,
                _ => {
                    return Err(invalid_data(
                        "Illegal character after return".to_string(),
                        0,
                    ));
                }
            },
            LF if lenient => break,
            LF => {
                return Err(invalid_data(
                    "Illegal new-line character without preceding return".to_string(),
                    0,
                ));
            }
            // the ";" signals the start of the extensions
            b';' if !in_ext => {
                in_ext = true;
                in_chunk_size = false;
            }
            // LWS can follow the chunk size, but no more digits can come
            b'\t' | b' ' if in_chunk_size => in_chunk_size = false,
            b'\t' | b' ' if !in_ext => {}
            // extensions are carried verbatim; their syntax is not our
            // concern
            _ if in_ext => ext.push(b as char),
            _ => return Err(invalid_data("Invalid chunk-size line".to_string(), 0)),
        }
    }

    if !any_digit {
        return Err(invalid_data("Missing chunk size".to_string(), 0));
    }
    trace!("chunk size={}", size);
    Ok((size, if ext.is_empty() { None } else { Some(ext) }))
}
