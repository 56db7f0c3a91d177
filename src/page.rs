//! Page loading from raw bytes.
//!
//! Product pages fetched outside a browser arrive as bytes in whatever charset
//! the server declared. The charset is read from the `<meta>` tags in the
//! first kilobyte; without one the page is taken as UTF-8.

use std::sync::LazyLock;

use dom_query::Document;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

use crate::dom;

/// How much of the page is scanned for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;/]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>;]+)"#,
    )
    .expect("valid regex")
});

/// Charset declared by the page, or UTF-8.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);

    [&*HTTP_EQUIV_CHARSET, &*META_CHARSET]
        .iter()
        .filter_map(|re| re.captures(&head).and_then(|c| c.get(1)))
        .find_map(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode page bytes to a UTF-8 string. Undecodable sequences become U+FFFD.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    let encoding = sniff_encoding(bytes);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::debug!("page: replaced malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

/// Decode and parse page bytes.
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> Document {
    dom::parse(&decode(bytes))
}
