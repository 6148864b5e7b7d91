//! HTTP version
//!
//! Only the two versions whose framing this crate implements are
//! representable; anything else is rejected at parse time.

use std::fmt;
use std::str::FromStr;

use self::HttpVersion::{Http10, Http11};

/// The version of an HTTP message, `HTTP/1.0` or `HTTP/1.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    /// `HTTP/1.0`
    Http10,
    /// `HTTP/1.1`
    Http11,
}

impl HttpVersion {
    /// The wire form of this version, e.g. `HTTP/1.1`.
    pub fn as_str(self) -> &'static str {
        match self {
            Http10 => "HTTP/1.0",
            Http11 => "HTTP/1.1",
        }
    }
}

impl Default for HttpVersion {
    fn default() -> HttpVersion {
        Http11
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a version token is not `HTTP/1.0` or `HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHttpVersion(());

impl fmt::Display for InvalidHttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid or unsupported HTTP version")
    }
}

impl std::error::Error for InvalidHttpVersion {}

impl FromStr for HttpVersion {
    type Err = InvalidHttpVersion;

    fn from_str(s: &str) -> Result<HttpVersion, InvalidHttpVersion> {
        match s {
            "HTTP/1.0" => Ok(Http10),
            "HTTP/1.1" => Ok(Http11),
            _ => Err(InvalidHttpVersion(())),
        }
    }
}
