//! Message bodies.
//!
//! A parsed message hands back a [`BodyReader`]: a lazy handle over the
//! bytes still sitting on the stream after the header block. Reading
//! from it yields the *decoded* body (chunked framing stripped); the
//! reader is consumed at most once. [`BodyReader::eagerly`] drains it
//! into an in-memory [`EagerBody`] that can be re-read and
//! re-serialized.

use std::cmp;
use std::fmt;
use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};
use log::trace;

pub use self::chunked::{Chunk, ChunkedDecoder};

use crate::header::Headers;

mod chunked;

/// How the end of a message body is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// A Content-Length header declared this many bytes.
    Length(u64),
    /// The body uses `Transfer-Encoding: chunked` framing.
    Chunked,
    /// The body runs until the peer closes the connection.
    Eof,
}

/// Readers to handle the different body framings.
///
/// If a message body does not include a Transfer-Encoding, it *should*
/// include a Content-Length header; without either, only a response may
/// carry a body, terminated by closing the connection.
pub enum BodyReader<R> {
    /// A reader used when a Content-Length header is passed with a
    /// non-negative integer: reads exactly that many bytes.
    Sized(R, u64),
    /// A reader used when Transfer-Encoding is `chunked`.
    Chunked(ChunkedDecoder<R>),
    /// A reader used for responses that don't indicate a length or
    /// chunked: reads until EOF.
    Eof(R),
}

impl<R: Read> BodyReader<R> {
    /// Wraps `stream` in the reader matching `body_type`. The `lenient`
    /// flag lets the chunked decoder accept a bare LF where CRLF is
    /// required.
    pub fn new(body_type: BodyType, stream: R, lenient: bool) -> BodyReader<R> {
        match body_type {
            BodyType::Length(n) => BodyReader::Sized(stream, n),
            BodyType::Chunked => BodyReader::Chunked(ChunkedDecoder::new(stream, lenient)),
            BodyType::Eof => BodyReader::Eof(stream),
        }
    }

    /// The framing this reader decodes. For a partially consumed sized
    /// body, the length reflects what is still to be read.
    pub fn body_type(&self) -> BodyType {
        match *self {
            BodyReader::Sized(_, remaining) => BodyType::Length(remaining),
            BodyReader::Chunked(..) => BodyType::Chunked,
            BodyReader::Eof(..) => BodyType::Eof,
        }
    }

    /// Unwraps this reader and returns the underlying stream.
    pub fn into_inner(self) -> R {
        match self {
            BodyReader::Sized(stream, _) => stream,
            BodyReader::Chunked(decoder) => decoder.into_inner(),
            BodyReader::Eof(stream) => stream,
        }
    }

    /// Streams the decoded body bytes into `out`, returning how many
    /// were written.
    pub fn write_to<W: Write>(mut self, out: &mut W) -> io::Result<u64> {
        io::copy(&mut self, out)
    }

    /// Decodes the whole body into memory.
    pub fn into_bytes(mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Materializes the body, closing the source stream. For chunked
    /// bodies the individual chunks and the trailers are preserved.
    pub fn eagerly(self) -> io::Result<EagerBody> {
        match self {
            BodyReader::Sized(mut stream, remaining) => {
                let mut buf = vec![0u8; remaining as usize];
                stream.read_exact(&mut buf)?;
                Ok(EagerBody::Sized(Bytes::from(buf)))
            }
            BodyReader::Chunked(mut decoder) => {
                let mut chunks = Vec::new();
                while let Some(chunk) = decoder.read_next_chunk()? {
                    chunks.push(chunk);
                }
                let trailers = decoder.into_trailers();
                Ok(EagerBody::Chunked(ChunkedBody { chunks, trailers }))
            }
            BodyReader::Eof(mut stream) => {
                let mut buf = Vec::new();
                stream.read_to_end(&mut buf)?;
                Ok(EagerBody::Eof(Bytes::from(buf)))
            }
        }
    }
}

impl<R: Read> Read for BodyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match *self {
            BodyReader::Sized(ref mut stream, ref mut remaining) => {
                if *remaining == 0 || buf.is_empty() {
                    return Ok(0);
                }
                let max = cmp::min(*remaining, buf.len() as u64) as usize;
                let num = stream.read(&mut buf[..max])?;
                if num == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended before the declared Content-Length",
                    ));
                }
                *remaining -= num as u64;
                trace!("sized read, remaining={}", remaining);
                Ok(num)
            }
            BodyReader::Chunked(ref mut decoder) => decoder.read(buf),
            BodyReader::Eof(ref mut stream) => stream.read(buf),
        }
    }
}

impl<R> fmt::Debug for BodyReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BodyReader::Sized(_, remaining) => write!(f, "BodyReader::Sized({})", remaining),
            BodyReader::Chunked(ref decoder) => write!(f, "BodyReader::Chunked({:?})", decoder),
            BodyReader::Eof(..) => f.write_str("BodyReader::Eof"),
        }
    }
}

/// A fully-buffered message body.
#[derive(Debug, Clone, PartialEq)]
pub enum EagerBody {
    /// Content-length framed bytes.
    Sized(Bytes),
    /// Decoded chunks plus trailers.
    Chunked(ChunkedBody),
    /// Close-terminated bytes.
    Eof(Bytes),
}

impl EagerBody {
    /// The decoded body bytes; for a chunked body, the chunk payloads
    /// concatenated in order.
    pub fn bytes(&self) -> Bytes {
        match *self {
            EagerBody::Sized(ref bytes) | EagerBody::Eof(ref bytes) => bytes.clone(),
            EagerBody::Chunked(ref body) => body.data(),
        }
    }

    /// Decoded length in bytes.
    pub fn len(&self) -> usize {
        match *self {
            EagerBody::Sized(ref bytes) | EagerBody::Eof(ref bytes) => bytes.len(),
            EagerBody::Chunked(ref body) => body.chunks.iter().map(|c| c.data.len()).sum(),
        }
    }

    /// Returns whether the decoded body is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The framing this body was (and will again be) carried in.
    pub fn body_type(&self) -> BodyType {
        match *self {
            EagerBody::Sized(ref bytes) => BodyType::Length(bytes.len() as u64),
            EagerBody::Chunked(..) => BodyType::Chunked,
            EagerBody::Eof(..) => BodyType::Eof,
        }
    }
}

/// A decoded chunked body: the chunk sequence and any trailers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedBody {
    /// Data chunks in wire order; the terminal zero-size chunk is
    /// implicit.
    pub chunks: Vec<Chunk>,
    /// Headers that followed the final chunk.
    pub trailers: Headers,
}

impl ChunkedBody {
    /// The chunk payloads concatenated in wire order.
    pub fn data(&self) -> Bytes {
        let total = self.chunks.iter().map(|c| c.data.len()).sum();
        let mut buf = BytesMut::with_capacity(total);
        for chunk in &self.chunks {
            buf.extend_from_slice(&chunk.data);
        }
        buf.freeze()
    }
}
