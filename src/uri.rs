//! Request-target handling.
//!
//! A request-target on the wire may be origin-form (`/index.html`),
//! absolute-form (`http://example.com/`), authority-ish
//! (`example.com/path`) or the asterisk `*`. Targets that name an
//! authority without a scheme get an `http://` prefix before URI
//! parsing, so `example.com/path` yields a URI whose host is
//! `example.com`. The prefix check is literally "starts with `http`",
//! so a target like `httpx://x` is parsed as-is with scheme `httpx`.

use http::uri::{Authority, InvalidUri, PathAndQuery, Scheme, Uri};

/// Parses a request-target token into a [`Uri`].
pub(crate) fn parse_target(target: &str) -> Result<Uri, InvalidUri> {
    if target.starts_with('/') || target == "*" || target.starts_with("http") {
        target.parse()
    } else {
        format!("http://{}", target).parse()
    }
}

/// Rebuilds `uri` with the given `host[:port]` authority, defaulting the
/// scheme to `http` and the path to `/` where absent.
pub(crate) fn with_authority(uri: &Uri, authority: &str) -> Result<Uri, http::Error> {
    let authority = authority.parse::<Authority>()?;
    let mut parts = uri.clone().into_parts();
    if parts.scheme.is_none() {
        parts.scheme = Some(Scheme::HTTP);
    }
    parts.authority = Some(authority);
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Ok(Uri::from_parts(parts)?)
}

/// The `host[:port]` string a Host header should carry for `uri`, if the
/// URI names a host at all. IPv6 hosts stay bracketed.
pub(crate) fn host_header_value(uri: &Uri) -> Option<String> {
    let host = uri.host()?;
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    };
    Some(match uri.port_u16() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// The origin-form (path plus query) of `uri`, as written on a
/// request-line. An empty path serializes as `/`.
pub(crate) fn origin_form(uri: &Uri) -> String {
    let path = uri.path();
    let path = if path.is_empty() { "/" } else { path };
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}
