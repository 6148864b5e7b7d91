//! Request-lines and status-lines.
//!
//! `request-line = method SP request-target SP HTTP-version`
//! `status-line  = HTTP-version SP status-code SP reason-phrase`
//!
//! Both parsers tolerate the deviations permitted by
//! [`ParserOptions`](crate::ParserOptions): a start-line missing its
//! version token can default to HTTP/1.1, and a status-line may lead
//! with the status code alone.

use std::fmt;

use http::{Method, StatusCode, Uri};

use crate::error::{Error, Result};
use crate::options::ParserOptions;
use crate::uri::{origin_form, parse_target, with_authority};
use crate::version::HttpVersion;

/// The first line of a request: method, target URI and version.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLine {
    method: Method,
    uri: Uri,
    version: HttpVersion,
}

impl RequestLine {
    /// Builds a request-line from its parts.
    pub fn new(method: Method, uri: Uri, version: HttpVersion) -> RequestLine {
        RequestLine {
            method,
            uri,
            version,
        }
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The target URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The HTTP version.
    pub fn version(&self) -> HttpVersion {
        self.version
    }

    /// Rebuilds this request-line so that its URI carries the given
    /// `host[:port]` authority.
    pub fn with_host(&self, authority: &str) -> std::result::Result<RequestLine, http::Error> {
        Ok(RequestLine {
            method: self.method.clone(),
            uri: with_authority(&self.uri, authority)?,
            version: self.version,
        })
    }

    pub(crate) fn parse(
        line: &str,
        number: u32,
        options: &ParserOptions,
    ) -> Result<RequestLine> {
        let tokens = split_ws_limit(line, usize::MAX);
        let (raw_method, raw_target, version) = match tokens.len() {
            2 => {
                if !options.insert_http_version_if_missing {
                    return Err(Error::invalid_request(
                        "Missing HTTP version".to_string(),
                        number,
                    ));
                }
                (tokens[0], tokens[1], HttpVersion::default())
            }
            3 => {
                let version = tokens[2].parse::<HttpVersion>().map_err(|_| {
                    Error::invalid_request(
                        format!("Invalid HTTP version: {}", tokens[2]),
                        number,
                    )
                })?;
                (tokens[0], tokens[1], version)
            }
            _ => {
                return Err(Error::invalid_request(
                    "Invalid request line".to_string(),
                    number,
                ));
            }
        };
        let method = Method::from_bytes(raw_method.as_bytes()).map_err(|_| {
            Error::invalid_request(format!("Invalid method name: {}", raw_method), number)
        })?;
        let uri = parse_target(raw_target).map_err(|_| {
            Error::invalid_request(format!("Invalid request target: {}", raw_target), number)
        })?;
        Ok(RequestLine {
            method,
            uri,
            version,
        })
    }
}

impl fmt::Display for RequestLine {
    /// Writes the wire form, with the target in origin-form (the host
    /// travels in the Host header).
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.method, origin_form(&self.uri), self.version)
    }
}

/// The first line of a response: version, status code and reason phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    version: HttpVersion,
    code: StatusCode,
    reason: String,
}

impl StatusLine {
    /// Builds a status-line from its parts.
    pub fn new(version: HttpVersion, code: StatusCode, reason: impl Into<String>) -> StatusLine {
        StatusLine {
            version,
            code,
            reason: reason.into(),
        }
    }

    /// The HTTP version.
    pub fn version(&self) -> HttpVersion {
        self.version
    }

    /// The status code.
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// The reason phrase, possibly empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub(crate) fn parse(line: &str, number: u32, options: &ParserOptions) -> Result<StatusLine> {
        let tokens = split_ws_limit(line, 3);
        if tokens.is_empty() {
            return Err(Error::invalid_response(
                "Empty status line".to_string(),
                number,
            ));
        }

        let (version, raw_code, reason) = if tokens.len() == 1 {
            // a lone token is taken as the status code
            (None, tokens[0], String::new())
        } else if tokens[0].starts_with("HTTP") {
            let version = tokens[0].parse::<HttpVersion>().map_err(|_| {
                Error::invalid_response(format!("Invalid HTTP version: {}", tokens[0]), number)
            })?;
            (
                Some(version),
                tokens[1],
                tokens.get(2).map(|s| s.to_string()).unwrap_or_default(),
            )
        } else {
            (None, tokens[0], tokens[1..].join(" "))
        };

        let version = match version {
            Some(version) => version,
            None if options.insert_http_version_if_missing => HttpVersion::default(),
            None => {
                return Err(Error::invalid_response(
                    "Missing HTTP version".to_string(),
                    number,
                ));
            }
        };

        let code = StatusCode::from_bytes(raw_code.as_bytes()).map_err(|_| {
            Error::invalid_response(format!("Invalid status code: {}", raw_code), number)
        })?;

        Ok(StatusLine {
            version,
            code,
            reason,
        })
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.version, self.code.as_str())?;
        if !self.reason.is_empty() {
            write!(f, " {}", self.reason)?;
        }
        Ok(())
    }
}

/// Splits on runs of whitespace, keeping at most `limit` parts; the last
/// part carries the untouched remainder (so a reason phrase keeps its
/// inner spacing). Surrounding whitespace is trimmed; an all-whitespace
/// input yields no parts.
fn split_ws_limit(s: &str, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s.trim();
    if rest.is_empty() {
        return parts;
    }
    while parts.len() + 1 < limit {
        match rest.find(|c: char| c.is_ascii_whitespace()) {
            Some(at) => {
                parts.push(&rest[..at]);
                rest = rest[at..].trim_start();
            }
            None => break,
        }
    }
    parts.push(rest);
    parts
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::options::ParserOptions;
    use crate::version::HttpVersion::{Http10, Http11};

    use super::{split_ws_limit, RequestLine, StatusLine};

    fn request_fault(line: &str, options: &ParserOptions) -> (String, u32) {
        match RequestLine::parse(line, 1, options) {
            Err(Error::InvalidRequest { message, line }) => (message, line),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    fn response_fault(line: &str, options: &ParserOptions) -> (String, u32) {
        match StatusLine::parse(line, 1, options) {
            Err(Error::InvalidResponse { message, line }) => (message, line),
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_split_ws_limit() {
        assert_eq!(split_ws_limit("a b c", 3), vec!["a", "b", "c"]);
        assert_eq!(
            split_ws_limit("HTTP/1.1 204 No Content", 3),
            vec!["HTTP/1.1", "204", "No Content"]
        );
        assert_eq!(
            split_ws_limit("200   crazy  pants", 3),
            vec!["200", "crazy", "pants"]
        );
        assert_eq!(
            split_ws_limit("200 two  words kept", 2),
            vec!["200", "two  words kept"]
        );
        assert_eq!(split_ws_limit("  only ", 3), vec!["only"]);
        assert_eq!(split_ws_limit("   ", 3), Vec::<&str>::new());
        assert_eq!(
            split_ws_limit("GET / HTTP/1.1", usize::MAX),
            vec!["GET", "/", "HTTP/1.1"]
        );
    }

    #[test]
    fn test_parse_request_line() {
        let lenient = ParserOptions::lenient();

        let line = RequestLine::parse("GET /hello.txt HTTP/1.1", 1, &lenient).unwrap();
        assert_eq!(line.method().as_str(), "GET");
        assert_eq!(line.uri().path(), "/hello.txt");
        assert_eq!(line.version(), Http11);

        let line = RequestLine::parse("POST http://example.com/x HTTP/1.0", 1, &lenient).unwrap();
        assert_eq!(line.uri().host(), Some("example.com"));
        assert_eq!(line.version(), Http10);

        // authority-ish target: prefixed with http://
        let line = RequestLine::parse("GET host.example/path HTTP/1.1", 1, &lenient).unwrap();
        assert_eq!(line.uri().host(), Some("host.example"));
        assert_eq!(line.uri().path(), "/path");
    }

    #[test]
    fn test_request_line_version_defaulting() {
        let lenient = ParserOptions::lenient();
        let strict = ParserOptions::strict();

        let line = RequestLine::parse("GET example.com", 1, &lenient).unwrap();
        assert_eq!(line.version(), Http11);
        assert_eq!(line.uri().host(), Some("example.com"));

        assert_eq!(
            request_fault("GET example.com", &strict),
            ("Missing HTTP version".to_string(), 1)
        );
    }

    #[test]
    fn test_invalid_request_lines() {
        let lenient = ParserOptions::lenient();

        assert_eq!(
            request_fault("GET", &lenient),
            ("Invalid request line".to_string(), 1)
        );
        assert_eq!(
            request_fault("   ", &lenient),
            ("Invalid request line".to_string(), 1)
        );
        assert_eq!(
            request_fault("GET / to HTTP/1.1", &lenient),
            ("Invalid request line".to_string(), 1)
        );
        assert_eq!(
            request_fault("G<T / HTTP/1.1", &lenient),
            ("Invalid method name: G<T".to_string(), 1)
        );
        assert_eq!(
            request_fault("GET / HTTP/7.7", &lenient),
            ("Invalid HTTP version: HTTP/7.7".to_string(), 1)
        );
    }

    #[test]
    fn test_request_line_display() {
        let lenient = ParserOptions::lenient();
        let line = RequestLine::parse("GET http://example.com/a?b=c HTTP/1.1", 1, &lenient)
            .unwrap();
        assert_eq!(line.to_string(), "GET /a?b=c HTTP/1.1");

        let line = RequestLine::parse("GET example.com HTTP/1.0", 1, &lenient).unwrap();
        assert_eq!(line.to_string(), "GET / HTTP/1.0");
    }

    #[test]
    fn test_with_host() {
        let lenient = ParserOptions::lenient();
        let line = RequestLine::parse("GET /x HTTP/1.1", 1, &lenient).unwrap();
        assert_eq!(line.uri().host(), None);

        let line = line.with_host("example.com:8080").unwrap();
        assert_eq!(line.uri().host(), Some("example.com"));
        assert_eq!(line.uri().port_u16(), Some(8080));
        assert_eq!(line.uri().path(), "/x");

        assert!(line.with_host("not a host").is_err());
    }

    #[test]
    fn test_parse_status_line() {
        let lenient = ParserOptions::lenient();

        let line = StatusLine::parse("HTTP/1.1 200 OK", 1, &lenient).unwrap();
        assert_eq!(line.version(), Http11);
        assert_eq!(line.code().as_u16(), 200);
        assert_eq!(line.reason(), "OK");

        let line = StatusLine::parse("HTTP/1.1 204 No Content", 1, &lenient).unwrap();
        assert_eq!(line.reason(), "No Content");

        let line = StatusLine::parse("HTTP/1.0 404", 1, &lenient).unwrap();
        assert_eq!(line.version(), Http10);
        assert_eq!(line.code().as_u16(), 404);
        assert_eq!(line.reason(), "");
    }

    #[test]
    fn test_status_line_without_version() {
        let lenient = ParserOptions::lenient();
        let strict = ParserOptions::strict();

        let line = StatusLine::parse("200", 1, &lenient).unwrap();
        assert_eq!(line.version(), Http11);
        assert_eq!(line.code().as_u16(), 200);

        let line = StatusLine::parse("404 Not Found", 1, &lenient).unwrap();
        assert_eq!(line.version(), Http11);
        assert_eq!(line.code().as_u16(), 404);
        assert_eq!(line.reason(), "Not Found");

        assert_eq!(
            response_fault("200", &strict),
            ("Missing HTTP version".to_string(), 1)
        );
    }

    #[test]
    fn test_invalid_status_lines() {
        let lenient = ParserOptions::lenient();

        assert_eq!(
            response_fault("HTTP/1.1 abc OK", &lenient),
            ("Invalid status code: abc".to_string(), 1)
        );
        assert_eq!(
            response_fault("HTTP/1.1 0x1 OK", &lenient),
            ("Invalid status code: 0x1".to_string(), 1)
        );
        assert_eq!(
            response_fault("HTTP/1.1 99 OK", &lenient),
            ("Invalid status code: 99".to_string(), 1)
        );
        assert_eq!(
            response_fault("", &lenient),
            ("Empty status line".to_string(), 1)
        );
        assert_eq!(
            response_fault("HTTP/1.1", &lenient),
            ("Invalid status code: HTTP/1.1".to_string(), 1)
        );
        assert_eq!(
            response_fault("HTP/1.1 200 OK", &lenient),
            ("Invalid status code: HTP/1.1".to_string(), 1)
        );
    }

    #[test]
    fn test_status_line_display() {
        let lenient = ParserOptions::lenient();
        let line = StatusLine::parse("HTTP/1.1 200 OK", 1, &lenient).unwrap();
        assert_eq!(line.to_string(), "HTTP/1.1 200 OK");

        let line = StatusLine::parse("HTTP/1.1 404", 1, &lenient).unwrap();
        assert_eq!(line.to_string(), "HTTP/1.1 404");
    }
}
