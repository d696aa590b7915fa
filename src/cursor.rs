//! Best-effort helpers for servers whose cursors are base64-encoded offsets.
//!
//! Cursors are opaque by contract, so decoding never fails loudly.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;

/// Decodes the numeric index behind a cursor such as `"MTA="` (`"10"`) or
/// `"YXJyYXljb25uZWN0aW9uOjU="` (`"arrayconnection:5"`).
pub fn decode_index(cursor: &str) -> Option<u64> {
    let bytes = STANDARD
        .decode(cursor)
        .or_else(|_| URL_SAFE.decode(cursor))
        .or_else(|_| URL_SAFE_NO_PAD.decode(cursor))
        .ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let digits = text.rsplit(|c: char| !c.is_ascii_digit()).next()?;
    digits.parse().ok()
}

pub fn encode_index(index: u64) -> String {
    STANDARD.encode(index.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_index() {
        assert_eq!(decode_index("MTA="), Some(10));
        assert_eq!(decode_index(&encode_index(42)), Some(42));
    }

    #[test]
    fn test_decode_prefixed_index() {
        assert_eq!(decode_index("YXJyYXljb25uZWN0aW9uOjU="), Some(5));
    }

    #[test]
    fn test_malformed_cursor_is_none() {
        assert_eq!(decode_index("not base64!"), None);
        assert_eq!(decode_index(&STANDARD.encode("no-digits")), None);
        assert_eq!(decode_index(""), None);
    }
}
