//! Knobs controlling how forgiving the parser is about wire deviations.

/// Leniency switches consumed by [`HttpParser`](crate::HttpParser).
///
/// The default configuration turns every switch on, accepting the small
/// deviations commonly produced by hand-written clients and test
/// fixtures. [`ParserOptions::strict`] turns them all off, accepting
/// only messages that follow RFC 7230 to the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Accept a bare LF as a line terminator (otherwise only CRLF ends
    /// a metadata line).
    pub allow_new_line_without_return: bool,
    /// Skip empty line(s) before the start-line instead of treating
    /// them as an empty start-line.
    pub ignore_leading_empty_line: bool,
    /// Accept a two-token start-line and default its version to
    /// HTTP/1.1.
    pub insert_http_version_if_missing: bool,
    /// Accept a request without a Host header if its target is in
    /// absolute-URI form, synthesizing the header from the target's
    /// authority.
    pub insert_host_header_if_missing: bool,
}

impl ParserOptions {
    /// All switches on. This is also the `Default`.
    pub fn lenient() -> ParserOptions {
        ParserOptions {
            allow_new_line_without_return: true,
            ignore_leading_empty_line: true,
            insert_http_version_if_missing: true,
            insert_host_header_if_missing: true,
        }
    }

    /// All switches off: only strictly well-formed messages parse.
    pub fn strict() -> ParserOptions {
        ParserOptions {
            allow_new_line_without_return: false,
            ignore_leading_empty_line: false,
            insert_http_version_if_missing: false,
            insert_host_header_if_missing: false,
        }
    }
}

impl Default for ParserOptions {
    fn default() -> ParserOptions {
        ParserOptions::lenient()
    }
}
