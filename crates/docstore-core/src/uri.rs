//! Public connector-address encoding.
//!
//! A connector's public URI identifies it in error messages
//! (`ResourceNotFound`, `ConnectionNotReady`) and must never leak
//! credentials; only the scheme and the public path segments appear.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a URI path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Encode a public connector address: `scheme://seg1/seg2/...`.
#[must_use]
pub fn encode_public(scheme: &str, segments: &[&str]) -> String {
    let path = segments
        .iter()
        .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("{scheme}://{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_encode_plain_segments() {
        assert_eq!(
            encode_public("dynamo", &["development", "my_table"]),
            "dynamo://development/my_table"
        );
    }

    #[test]
    fn test_should_escape_reserved_characters() {
        assert_eq!(
            encode_public("dynamo", &["dev env", "a/b"]),
            "dynamo://dev%20env/a%2Fb"
        );
    }
}
