#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! # rawhttp
//!
//! rawhttp manipulates HTTP/1.0 and HTTP/1.1 messages at the wire
//! level: it parses raw request and response bytes into structured
//! messages, serializes structured messages back to bytes, and streams
//! message bodies in all three framings (content-length, chunked and
//! close-terminated).
//!
//! It deliberately carries none of the policy of a full HTTP stack (no
//! cookies, redirects, pools or caching), which makes it a fit for
//! lightweight clients, embeddable servers, test harnesses and replay
//! tools that want direct control over HTTP framing.
//!
//! Parsing is lazy about bodies: a parsed message's body is a
//! [`BodyReader`] still holding the remaining bytes of the stream, and
//! nothing past the header block is consumed until it is read.
//! [`Request::eagerly`] and [`Response::eagerly`] buffer the body and
//! release the stream.
//!
//! ## Example
//!
//! ```
//! use rawhttp::HttpParser;
//!
//! let parser = HttpParser::default();
//!
//! let response = parser
//!     .parse_response_slice(
//!         b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
//!     )
//!     .unwrap()
//!     .eagerly()
//!     .unwrap();
//!
//! assert_eq!(response.status().as_u16(), 200);
//! let body = response.body().unwrap();
//! assert_eq!(&body.bytes()[..], b"hello");
//! ```
//!
//! How forgiving the parser is about common wire deviations (bare LF
//! line endings, missing version tokens, missing Host headers, leading
//! empty lines) is controlled by [`ParserOptions`]; the default is
//! lenient, [`ParserOptions::strict`] accepts RFC 7230 framing only.

pub use http::{Method, StatusCode, Uri};

pub use crate::body::{BodyReader, BodyType, Chunk, ChunkedBody, ChunkedDecoder, EagerBody};
pub use crate::error::{Error, Result};
pub use crate::header::{Headers, InvalidHeaderName};
pub use crate::message::{EagerRequest, EagerResponse, Request, Response};
pub use crate::options::ParserOptions;
pub use crate::parser::{
    body_type, parse_content_length, request_has_body, response_has_body, HttpParser,
};
pub use crate::startline::{RequestLine, StatusLine};
pub use crate::version::{HttpVersion, InvalidHttpVersion};

mod body;
mod error;
mod header;
mod lines;
mod message;
mod options;
mod parser;
mod startline;
mod uri;
mod version;
mod writer;
