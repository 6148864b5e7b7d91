//! Request and response messages.
//!
//! A message freshly parsed from a stream is *lazy*: its body (if any)
//! is a [`BodyReader`] still holding the stream. Lazy messages are
//! consumed by value, either by draining the body ([`Request::eagerly`])
//! or by serializing the whole message ([`Request::write_to`]). The
//! eager forms hold their body in memory and can be re-read, compared
//! and re-serialized freely.

use std::fmt;
use std::io::{Read, Write};
use std::net::SocketAddr;

use http::{Method, StatusCode, Uri};

use crate::body::{BodyReader, EagerBody};
use crate::error::Result;
use crate::header::Headers;
use crate::lines::LINE_ENDING;
use crate::startline::{RequestLine, StatusLine};
use crate::version::HttpVersion;
use crate::writer::{write_eager_body, write_headers, write_lazy_body};

/// A parsed request whose body, if any, still sits on the stream.
pub struct Request<R> {
    request_line: RequestLine,
    headers: Headers,
    body: Option<BodyReader<R>>,
    sender: Option<SocketAddr>,
}

impl<R: Read> Request<R> {
    /// Assembles a request from its parts.
    pub fn new(
        request_line: RequestLine,
        headers: Headers,
        body: Option<BodyReader<R>>,
    ) -> Request<R> {
        Request {
            request_line,
            headers,
            body,
            sender: None,
        }
    }

    /// The request-line.
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        self.request_line.method()
    }

    /// The target URI.
    pub fn uri(&self) -> &Uri {
        self.request_line.uri()
    }

    /// The HTTP version.
    pub fn version(&self) -> HttpVersion {
        self.request_line.version()
    }

    /// The request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns whether a body is expected on this request.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// The address the request was received from, if known.
    pub fn sender(&self) -> Option<SocketAddr> {
        self.sender
    }

    /// Records the address the request was received from.
    pub fn with_sender(mut self, sender: SocketAddr) -> Request<R> {
        self.sender = Some(sender);
        self
    }

    /// Takes the body reader, consuming the message.
    pub fn into_body(self) -> Option<BodyReader<R>> {
        self.body
    }

    /// Buffers the whole message in memory, closing the source stream.
    pub fn eagerly(self) -> Result<EagerRequest> {
        let body = match self.body {
            Some(body) => Some(body.eagerly()?),
            None => None,
        };
        Ok(EagerRequest {
            request_line: self.request_line,
            headers: self.headers,
            body,
            sender: self.sender,
        })
    }

    /// Serializes the message into `out`, streaming the body through.
    pub fn write_to<W: Write>(self, out: &mut W) -> Result<()> {
        write!(out, "{}{}", self.request_line, LINE_ENDING)?;
        write_headers(&self.headers, out)?;
        if let Some(body) = self.body {
            write_lazy_body(body, out)?;
        }
        Ok(())
    }
}

impl<R> fmt::Debug for Request<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Request")
            .field("request_line", &self.request_line)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("sender", &self.sender)
            .finish()
    }
}

/// A parsed response whose body, if any, still sits on the stream.
pub struct Response<R> {
    status_line: StatusLine,
    headers: Headers,
    body: Option<BodyReader<R>>,
}

impl<R: Read> Response<R> {
    /// Assembles a response from its parts.
    pub fn new(
        status_line: StatusLine,
        headers: Headers,
        body: Option<BodyReader<R>>,
    ) -> Response<R> {
        Response {
            status_line,
            headers,
            body,
        }
    }

    /// The status-line.
    pub fn status_line(&self) -> &StatusLine {
        &self.status_line
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status_line.code()
    }

    /// The HTTP version.
    pub fn version(&self) -> HttpVersion {
        self.status_line.version()
    }

    /// The response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns whether a body is expected on this response.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Takes the body reader, consuming the message.
    pub fn into_body(self) -> Option<BodyReader<R>> {
        self.body
    }

    /// Buffers the whole message in memory, closing the source stream.
    pub fn eagerly(self) -> Result<EagerResponse> {
        let body = match self.body {
            Some(body) => Some(body.eagerly()?),
            None => None,
        };
        Ok(EagerResponse {
            status_line: self.status_line,
            headers: self.headers,
            body,
        })
    }

    /// Serializes the message into `out`, streaming the body through.
    pub fn write_to<W: Write>(self, out: &mut W) -> Result<()> {
        write!(out, "{}{}", self.status_line, LINE_ENDING)?;
        write_headers(&self.headers, out)?;
        if let Some(body) = self.body {
            write_lazy_body(body, out)?;
        }
        Ok(())
    }
}

impl<R> fmt::Debug for Response<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Response")
            .field("status_line", &self.status_line)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

/// A request with its body fully buffered in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct EagerRequest {
    request_line: RequestLine,
    headers: Headers,
    body: Option<EagerBody>,
    sender: Option<SocketAddr>,
}

impl EagerRequest {
    /// The request-line.
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        self.request_line.method()
    }

    /// The target URI.
    pub fn uri(&self) -> &Uri {
        self.request_line.uri()
    }

    /// The HTTP version.
    pub fn version(&self) -> HttpVersion {
        self.request_line.version()
    }

    /// The request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The buffered body, if the request has one.
    pub fn body(&self) -> Option<&EagerBody> {
        self.body.as_ref()
    }

    /// The address the request was received from, if known.
    pub fn sender(&self) -> Option<SocketAddr> {
        self.sender
    }

    /// Serializes the message into `out`. May be called repeatedly.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}{}", self.request_line, LINE_ENDING)?;
        write_headers(&self.headers, out)?;
        if let Some(ref body) = self.body {
            write_eager_body(body, out)?;
        }
        Ok(())
    }

    /// The serialized message as a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// A response with its body fully buffered in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct EagerResponse {
    status_line: StatusLine,
    headers: Headers,
    body: Option<EagerBody>,
}

impl EagerResponse {
    /// The status-line.
    pub fn status_line(&self) -> &StatusLine {
        &self.status_line
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status_line.code()
    }

    /// The HTTP version.
    pub fn version(&self) -> HttpVersion {
        self.status_line.version()
    }

    /// The response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The buffered body, if the response has one.
    pub fn body(&self) -> Option<&EagerBody> {
        self.body.as_ref()
    }

    /// Serializes the message into `out`. May be called repeatedly.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}{}", self.status_line, LINE_ENDING)?;
        write_headers(&self.headers, out)?;
        if let Some(ref body) = self.body {
            write_eager_body(body, out)?;
        }
        Ok(())
    }

    /// The serialized message as a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}
