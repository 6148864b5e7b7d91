//! Error and Result module.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Result type often returned from methods that can fail with `rawhttp::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing or writing HTTP messages.
///
/// Framing and syntax faults carry the 1-based line number at which they
/// were detected, counting from the start-line. I/O errors from the
/// underlying stream are passed through untranslated.
#[derive(Debug)]
pub enum Error {
    /// The request bytes violate HTTP/1.x framing or syntax.
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
        /// 1-based line where the fault was detected, 0 for empty input.
        line: u32,
    },
    /// The response bytes violate HTTP/1.x framing or syntax.
    InvalidResponse {
        /// What was wrong with the response.
        message: String,
        /// 1-based line where the fault was detected, 0 for empty input.
        line: u32,
    },
    /// A Transfer-Encoding other than `chunked` was declared.
    UnsupportedEncoding(String),
    /// The underlying byte stream failed.
    Io(io::Error),
}

impl Error {
    pub(crate) fn invalid_request(message: String, line: u32) -> Error {
        Error::InvalidRequest { message, line }
    }

    pub(crate) fn invalid_response(message: String, line: u32) -> Error {
        Error::InvalidResponse { message, line }
    }

    /// The line number attached to this error, if it points into the input.
    pub fn line(&self) -> Option<u32> {
        match *self {
            Error::InvalidRequest { line, .. } | Error::InvalidResponse { line, .. } => Some(line),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidRequest { ref message, line } => {
                write!(f, "invalid HTTP request (line {}): {}", line, message)
            }
            Error::InvalidResponse { ref message, line } => {
                write!(f, "invalid HTTP response (line {}): {}", line, message)
            }
            Error::UnsupportedEncoding(ref encoding) => {
                write!(f, "unsupported transfer encoding: {}", encoding)
            }
            Error::Io(ref e) => fmt::Display::fmt(e, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::io;

    use super::Error;

    #[test]
    fn test_display() {
        let err = Error::invalid_request("Invalid header".to_string(), 3);
        assert_eq!(err.to_string(), "invalid HTTP request (line 3): Invalid header");
        assert_eq!(err.line(), Some(3));

        let err = Error::UnsupportedEncoding("gzip".to_string());
        assert_eq!(err.to_string(), "unsupported transfer encoding: gzip");
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_io_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(err.source().is_some());
    }
}
