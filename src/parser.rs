//! The top-level message parser.
//!
//! `HttpParser` combines the metadata tokenizer, the start-line parsers,
//! the header parser and the body-reader factory. It is stateless apart
//! from its immutable [`ParserOptions`], so one instance can be shared
//! freely. Parsing never reads past the header block's blank line; body
//! bytes stay on the stream for the returned body reader.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use http::{Method, StatusCode};
use log::debug;

use crate::body::{BodyReader, BodyType};
use crate::error::{Error, Result};
use crate::header::{parse_header_lines, Headers};
use crate::lines::read_message_lines;
use crate::message::{Request, Response};
use crate::options::ParserOptions;
use crate::startline::{RequestLine, StatusLine};
use crate::uri::host_header_value;

/// Parses HTTP/1.0 and HTTP/1.1 requests and responses at the wire
/// level.
///
/// # Example
///
/// ```
/// use rawhttp::HttpParser;
///
/// let parser = HttpParser::default();
/// let request = parser
///     .parse_request_slice(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")
///     .unwrap();
/// assert_eq!(request.uri().host(), Some("example.com"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpParser {
    options: ParserOptions,
}

impl HttpParser {
    /// A parser applying the given leniency options.
    pub fn new(options: ParserOptions) -> HttpParser {
        HttpParser { options }
    }

    /// A parser accepting only strictly well-formed messages.
    pub fn strict() -> HttpParser {
        HttpParser::new(ParserOptions::strict())
    }

    /// The options this parser applies.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a request from `stream`, taking ownership of it. If the
    /// request has a body, the stream moves into the body reader;
    /// parse via `&mut stream` to keep ownership on the calling side.
    pub fn parse_request<R: Read>(&self, mut stream: R) -> Result<Request<R>> {
        let lines =
            read_message_lines(&mut stream, &self.options, Error::invalid_request, 1)?;
        let first = match lines.first() {
            Some(first) => first,
            None => return Err(Error::invalid_request("No content".to_string(), 0)),
        };
        let request_line = RequestLine::parse(&first.text, first.number, &self.options)?;
        debug!("request line: {}", request_line);
        let mut headers = parse_header_lines(&lines[1..], Error::invalid_request)?;
        let request_line = self.reconcile_host(request_line, &mut headers)?;

        let body = if request_has_body(&headers) {
            let body_type = resolve_body_type(&headers, Error::invalid_request)?;
            Some(BodyReader::new(
                body_type,
                stream,
                self.options.allow_new_line_without_return,
            ))
        } else {
            None
        };
        Ok(Request::new(request_line, headers, body))
    }

    /// Parses a request from a byte buffer.
    pub fn parse_request_slice<'a>(&self, bytes: &'a [u8]) -> Result<Request<Cursor<&'a [u8]>>> {
        self.parse_request(Cursor::new(bytes))
    }

    /// Parses a request from the file at `path`.
    pub fn parse_request_file(&self, path: impl AsRef<Path>) -> Result<Request<BufReader<File>>> {
        let file = File::open(path)?;
        self.parse_request(BufReader::new(file))
    }

    /// Parses a response from `stream`. Body presence is decided from
    /// the status code alone; use [`HttpParser::parse_response_for`]
    /// when the originating request is known.
    pub fn parse_response<R: Read>(&self, stream: R) -> Result<Response<R>> {
        self.parse_response_inner(stream, None)
    }

    /// Parses a response to the request identified by `request_line`,
    /// which suppresses bodies on responses to HEAD and on successful
    /// responses to CONNECT.
    pub fn parse_response_for<R: Read>(
        &self,
        stream: R,
        request_line: &RequestLine,
    ) -> Result<Response<R>> {
        self.parse_response_inner(stream, Some(request_line))
    }

    /// Parses a response from a byte buffer.
    pub fn parse_response_slice<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Result<Response<Cursor<&'a [u8]>>> {
        self.parse_response(Cursor::new(bytes))
    }

    /// Parses a response from the file at `path`.
    pub fn parse_response_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Response<BufReader<File>>> {
        let file = File::open(path)?;
        self.parse_response(BufReader::new(file))
    }

    fn parse_response_inner<R: Read>(
        &self,
        mut stream: R,
        request_line: Option<&RequestLine>,
    ) -> Result<Response<R>> {
        let lines =
            read_message_lines(&mut stream, &self.options, Error::invalid_response, 1)?;
        let first = match lines.first() {
            Some(first) => first,
            None => return Err(Error::invalid_response("No content".to_string(), 0)),
        };
        let status_line = StatusLine::parse(&first.text, first.number, &self.options)?;
        debug!("status line: {}", status_line);
        let headers = parse_header_lines(&lines[1..], Error::invalid_response)?;

        let body = if response_has_body(status_line.code(), request_line) {
            let body_type = resolve_body_type(&headers, Error::invalid_response)?;
            Some(BodyReader::new(
                body_type,
                stream,
                self.options.allow_new_line_without_return,
            ))
        } else {
            None
        };
        Ok(Response::new(status_line, headers, body))
    }

    /// Applies the Host rules: a parsed request ends up with exactly one
    /// Host header that agrees with its request-target.
    fn reconcile_host(
        &self,
        request_line: RequestLine,
        headers: &mut Headers,
    ) -> Result<RequestLine> {
        let hosts: Vec<(String, u32)> = headers
            .entries_of("Host")
            .into_iter()
            .map(|(value, line)| (value.to_string(), line))
            .collect();

        match hosts.len() {
            0 => {
                if !self.options.insert_host_header_if_missing {
                    return Err(Error::invalid_request(
                        "Host header is missing".to_string(),
                        1,
                    ));
                }
                match host_header_value(request_line.uri()) {
                    Some(host) => {
                        headers
                            .overwrite("Host", host)
                            .map_err(|e| Error::invalid_request(e.to_string(), 1))?;
                        Ok(request_line)
                    }
                    None => Err(Error::invalid_request(
                        "Host not given in request line nor in Host header".to_string(),
                        1,
                    )),
                }
            }
            1 => {
                let (value, line) = (hosts[0].0.as_str(), hosts[0].1);
                if request_line.uri().host().is_none() {
                    // move the declared host into the request-target and
                    // canonicalize the header from the rebuilt URI
                    let request_line = request_line.with_host(value).map_err(|_| {
                        Error::invalid_request(format!("Invalid Host header: {}", value), line)
                    })?;
                    let canonical =
                        host_header_value(request_line.uri()).ok_or_else(|| {
                            Error::invalid_request(
                                format!("Invalid Host header: {}", value),
                                line,
                            )
                        })?;
                    headers
                        .overwrite("Host", canonical)
                        .map_err(|e| Error::invalid_request(e.to_string(), line))?;
                    Ok(request_line)
                } else {
                    // both the target and the header name an authority;
                    // they must agree
                    let declared = request_line.with_host(value).map_err(|_| {
                        Error::invalid_request(format!("Invalid Host header: {}", value), line)
                    })?;
                    let target_host = host_header_value(request_line.uri());
                    let header_host = host_header_value(declared.uri());
                    match (target_host, header_host) {
                        (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => Ok(request_line),
                        _ => Err(Error::invalid_request(
                            "Host specified both in Host header and in request line"
                                .to_string(),
                            line,
                        )),
                    }
                }
            }
            _ => Err(Error::invalid_request(
                "More than one Host header".to_string(),
                hosts[1].1,
            )),
        }
    }
}

/// Returns whether request headers declare a message body. Per RFC 7230
/// §3.3 a request has a body exactly when Content-Length or
/// Transfer-Encoding is present, regardless of the method.
pub fn request_has_body(headers: &Headers) -> bool {
    headers.contains("Content-Length") || headers.contains("Transfer-Encoding")
}

/// Returns whether a response carries a body, given its status code and,
/// optionally, the request-line it answers.
pub fn response_has_body(status: StatusCode, request_line: Option<&RequestLine>) -> bool {
    if let Some(request_line) = request_line {
        if *request_line.method() == Method::HEAD {
            return false;
        }
        if *request_line.method() == Method::CONNECT && status.is_success() {
            return false;
        }
    }
    let code = status.as_u16();
    !(status.is_informational() || code == 204 || code == 304)
}

/// The first Content-Length value parsed as a non-negative integer, or
/// `None` when the header is absent.
pub fn parse_content_length(
    headers: &Headers,
) -> Option<std::result::Result<u64, std::num::ParseIntError>> {
    headers
        .get_first("Content-Length")
        .map(|value| value.trim().parse::<u64>())
}

/// The body framing implied by `headers`; `length` is the already-parsed
/// Content-Length, if any. A Transfer-Encoding whose last value is
/// `chunked` wins over any Content-Length; any other coding is
/// unsupported.
pub fn body_type(headers: &Headers, length: Option<u64>) -> Result<BodyType> {
    if let Some(encoding) = headers.get("Transfer-Encoding").last().copied() {
        let encoding = encoding.trim();
        if encoding.eq_ignore_ascii_case("chunked") {
            return Ok(BodyType::Chunked);
        }
        return Err(Error::UnsupportedEncoding(encoding.to_string()));
    }
    Ok(match length {
        Some(length) => BodyType::Length(length),
        None => BodyType::Eof,
    })
}

fn resolve_body_type(headers: &Headers, make_err: fn(String, u32) -> Error) -> Result<BodyType> {
    let length = match parse_content_length(headers) {
        Some(Ok(length)) => Some(length),
        Some(Err(..)) => {
            let line = headers
                .entries_of("Content-Length")
                .first()
                .map(|&(_, line)| line)
                .unwrap_or(0);
            return Err(make_err("Invalid Content-Length".to_string(), line));
        }
        None => None,
    };
    body_type(headers, length)
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use crate::body::BodyType;
    use crate::error::Error;
    use crate::header::Headers;
    use crate::options::ParserOptions;
    use crate::startline::RequestLine;

    use super::{
        body_type, parse_content_length, request_has_body, response_has_body, HttpParser,
    };

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        let mut headers = Headers::new();
        for &(name, value) in pairs {
            headers.append(name, value).unwrap();
        }
        headers
    }

    fn request_line(line: &str) -> RequestLine {
        RequestLine::parse(line, 1, &ParserOptions::lenient()).unwrap()
    }

    #[test]
    fn test_request_has_body() {
        assert!(!request_has_body(&headers(&[("Host", "x")])));
        assert!(request_has_body(&headers(&[("Content-Length", "0")])));
        assert!(request_has_body(&headers(&[(
            "Transfer-Encoding",
            "chunked"
        )])));
    }

    #[test]
    fn test_response_has_body() {
        fn status(code: u16) -> StatusCode {
            StatusCode::from_u16(code).unwrap()
        }

        assert!(response_has_body(status(200), None));
        assert!(response_has_body(status(500), None));
        assert!(!response_has_body(status(100), None));
        assert!(!response_has_body(status(101), None));
        assert!(!response_has_body(status(204), None));
        assert!(!response_has_body(status(304), None));

        let head = request_line("HEAD / HTTP/1.1");
        assert!(!response_has_body(status(200), Some(&head)));

        let connect = request_line("CONNECT example.com:443 HTTP/1.1");
        assert!(!response_has_body(status(200), Some(&connect)));
        assert!(response_has_body(status(500), Some(&connect)));

        let get = request_line("GET / HTTP/1.1");
        assert!(response_has_body(status(200), Some(&get)));
    }

    #[test]
    fn test_body_type() {
        assert_eq!(
            body_type(&headers(&[]), None).unwrap(),
            BodyType::Eof
        );
        assert_eq!(
            body_type(&headers(&[("Content-Length", "12")]), Some(12)).unwrap(),
            BodyType::Length(12)
        );
        assert_eq!(
            body_type(&headers(&[("Transfer-Encoding", "chunked")]), None).unwrap(),
            BodyType::Chunked
        );
        assert_eq!(
            body_type(&headers(&[("Transfer-Encoding", "CHUNKED")]), None).unwrap(),
            BodyType::Chunked
        );
        // chunked beats any Content-Length
        assert_eq!(
            body_type(
                &headers(&[("Content-Length", "12"), ("Transfer-Encoding", "chunked")]),
                Some(12)
            )
            .unwrap(),
            BodyType::Chunked
        );
        // the last Transfer-Encoding value decides
        assert_eq!(
            body_type(
                &headers(&[("Transfer-Encoding", "gzip"), ("Transfer-Encoding", "chunked")]),
                None
            )
            .unwrap(),
            BodyType::Chunked
        );

        match body_type(&headers(&[("Transfer-Encoding", "gzip")]), None) {
            Err(Error::UnsupportedEncoding(encoding)) => assert_eq!(encoding, "gzip"),
            other => panic!("expected UnsupportedEncoding, got {:?}", other),
        }
        match body_type(&headers(&[("Transfer-Encoding", "gzip, chunked")]), None) {
            Err(Error::UnsupportedEncoding(encoding)) => assert_eq!(encoding, "gzip, chunked"),
            other => panic!("expected UnsupportedEncoding, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_content_length() {
        assert!(parse_content_length(&headers(&[])).is_none());
        assert_eq!(
            parse_content_length(&headers(&[("Content-Length", "42")])),
            Some(Ok(42))
        );
        assert!(parse_content_length(&headers(&[("Content-Length", "-1")]))
            .unwrap()
            .is_err());
        assert!(parse_content_length(&headers(&[("Content-Length", "abc")]))
            .unwrap()
            .is_err());
        // the first value wins
        assert_eq!(
            parse_content_length(&headers(&[
                ("Content-Length", "1"),
                ("Content-Length", "2")
            ])),
            Some(Ok(1))
        );
    }

    #[test]
    fn test_synthesized_host_header() {
        let parser = HttpParser::default();
        let request = parser
            .parse_request_slice(b"GET http://example.com:8080/x HTTP/1.1\r\n\r\n")
            .unwrap();
        assert_eq!(
            request.headers().get_first("host"),
            Some("example.com:8080")
        );
    }

    #[test]
    fn test_host_header_fills_target() {
        let parser = HttpParser::default();
        let request = parser
            .parse_request_slice(b"GET /x HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .unwrap();
        assert_eq!(request.uri().host(), Some("example.com"));
        assert_eq!(request.uri().path(), "/x");
        assert_eq!(request.headers().get_first("Host"), Some("example.com"));
    }

    #[test]
    fn test_agreeing_host_header_is_kept() {
        let parser = HttpParser::default();
        let request = parser
            .parse_request_slice(
                b"GET http://example.com/x HTTP/1.1\r\nHost: EXAMPLE.com\r\n\r\n",
            )
            .unwrap();
        assert_eq!(request.uri().host(), Some("example.com"));
    }

    #[test]
    fn test_conflicting_host_header() {
        let parser = HttpParser::default();
        let err = parser
            .parse_request_slice(b"GET http://example.com/ HTTP/1.1\r\nHost: other.org\r\n\r\n")
            .unwrap_err();
        match err {
            Error::InvalidRequest { message, line } => {
                assert_eq!(
                    message,
                    "Host specified both in Host header and in request line"
                );
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_host_strict() {
        let parser = HttpParser::strict();
        let err = parser
            .parse_request_slice(b"GET /x HTTP/1.1\r\n\r\n")
            .unwrap_err();
        match err {
            Error::InvalidRequest { message, line } => {
                assert_eq!(message, "Host header is missing");
                assert_eq!(line, 1);
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_no_host_anywhere() {
        let parser = HttpParser::default();
        let err = parser
            .parse_request_slice(b"GET /x HTTP/1.1\r\n\r\n")
            .unwrap_err();
        match err {
            Error::InvalidRequest { message, .. } => {
                assert_eq!(message, "Host not given in request line nor in Host header");
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_host_header_value() {
        let parser = HttpParser::default();
        let err = parser
            .parse_request_slice(b"GET /x HTTP/1.1\r\nHost: not a host\r\n\r\n")
            .unwrap_err();
        match err {
            Error::InvalidRequest { message, line } => {
                assert_eq!(message, "Invalid Host header: not a host");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_content_length() {
        let parser = HttpParser::default();
        let err = parser
            .parse_request_slice(
                b"POST / HTTP/1.1\r\nHost: x\r\nContent-Length: ten\r\n\r\n",
            )
            .unwrap_err();
        match err {
            Error::InvalidRequest { message, line } => {
                assert_eq!(message, "Invalid Content-Length");
                assert_eq!(line, 3);
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }
}
