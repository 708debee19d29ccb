//! Body decoding.
//!
//! Decoding is an ordered list of attempts, the first strict success wins:
//!
//! 1. Byte order mark,
//! 1. `charset` parameter of the `Content-Type` header,
//! 1. `<meta>` charset declaration found at the start of the body,
//! 1. fallback encoding.
//!
//! If every attempt fails, the body is decoded with the fallback encoding,
//! replacing malformed sequences with U+FFFD.
use std::fmt;

use encoding_rs::Encoding;

// same window as the html5 prescan
const SNIFF_LEN: usize = 1024;

/// How the text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeQuality {
    /// BOM or `Content-Type` charset.
    Declared,
    /// `<meta>` charset.
    Sniffed,
    /// No usable declaration, fallback encoding decoded cleanly.
    Fallback,
    /// Replacement characters were inserted.
    Lossy,
}

impl DecodeQuality {
    /// `true` when the declared encoding could not be used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback | Self::Lossy)
    }
}

impl fmt::Display for DecodeQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Declared => "declared",
            Self::Sniffed => "sniffed",
            Self::Fallback => "fallback",
            Self::Lossy => "lossy",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    pub quality: DecodeQuality,
}

/// Decode `bytes`, never failing.
///
/// `declared` is the raw charset label from the HTTP headers, if any.
pub fn decode(bytes: &[u8], declared: Option<&str>, fallback: &'static Encoding) -> Decoded {
    let sniffed = sniff_meta_charset(bytes);

    let bom = Encoding::for_bom(bytes).map(|(enc, len)| (enc, &bytes[len..]));
    let attempts = bom
        .into_iter()
        .map(|(enc, body)| (enc, body, DecodeQuality::Declared))
        .chain(
            declared
                .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
                .map(|enc| (enc, bytes, DecodeQuality::Declared)),
        )
        .chain(
            sniffed
                .as_deref()
                .and_then(|label| Encoding::for_label(label.as_bytes()))
                .map(|enc| (enc, bytes, DecodeQuality::Sniffed)),
        )
        .chain(std::iter::once((fallback, bytes, DecodeQuality::Fallback)));

    for (encoding, body, quality) in attempts {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(body) {
            return Decoded {
                text: text.into_owned(),
                encoding,
                quality,
            };
        }
    }

    let (text, _) = fallback.decode_without_bom_handling(bytes);
    Decoded {
        text: text.into_owned(),
        encoding: fallback,
        quality: DecodeQuality::Lossy,
    }
}

/// Extract the `charset` parameter of a `Content-Type` value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|value| !value.is_empty())
}

/// Look for a charset declaration in the `<meta>` tags of the first kilobyte.
pub fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];

        if let Some(pos) = tag.find("charset") {
            let value = tag[pos + "charset".len()..]
                .trim_start()
                .strip_prefix('=')
                .map(|v| v.trim_start().trim_start_matches(|c: char| c == '"' || c == '\''));
            if let Some(value) = value {
                let label: String = value
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || "-_.:".contains(*c))
                    .collect();
                if !label.is_empty() {
                    return Some(label);
                }
            }
        }
        rest = &rest[start + "<meta".len()..];
    }
    None
}

#[cfg(test)]
mod tests {
    use encoding_rs::{UTF_8, WINDOWS_1252};

    use super::*;

    #[test]
    fn utf8_without_declaration() {
        let d = decode("മലയാളം".as_bytes(), None, UTF_8);
        assert_eq!(d.text, "മലയാളം");
        assert_eq!(d.quality, DecodeQuality::Fallback);
        assert!(d.quality.is_fallback());
    }

    #[test]
    fn declared_latin1() {
        let d = decode(b"Caf\xE9", Some("ISO-8859-1"), UTF_8);
        assert_eq!(d.text, "Café");
        assert_eq!(d.quality, DecodeQuality::Declared);
        assert_eq!(d.encoding, WINDOWS_1252);
    }

    #[test]
    fn wrong_declaration_falls_back() {
        // declared as utf-8 but only valid as windows-1252 (which is the fallback)
        let d = decode(b"Caf\xE9", Some("utf-8"), WINDOWS_1252);
        assert_eq!(d.text, "Café");
        assert_eq!(d.quality, DecodeQuality::Fallback);
    }

    #[test]
    fn unknown_label_is_ignored() {
        let d = decode(b"plain", Some("klingon"), UTF_8);
        assert_eq!(d.text, "plain");
        assert_eq!(d.quality, DecodeQuality::Fallback);
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let d = decode(b"ab\xFF\xFEcd", None, UTF_8);
        assert_eq!(d.text, "ab\u{FFFD}\u{FFFD}cd");
        assert_eq!(d.quality, DecodeQuality::Lossy);
    }

    #[test]
    fn bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("മ".as_bytes());
        let d = decode(&bytes, Some("iso-8859-1"), UTF_8);
        assert_eq!(d.text, "മ");
        assert_eq!(d.quality, DecodeQuality::Declared);
    }

    #[test]
    fn meta_charset() {
        let html = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        assert_eq!(sniff_meta_charset(html), Some("iso-8859-1".to_string()));
        let d = decode(html, None, UTF_8);
        assert!(d.text.contains("Café"));
        assert_eq!(d.quality, DecodeQuality::Sniffed);

        let html = b"<meta name=viewport><META CHARSET='utf-8'>";
        assert_eq!(sniff_meta_charset(html), Some("utf-8".to_string()));
        assert_eq!(sniff_meta_charset(b"<p>charset=utf-8</p>"), None);
    }

    #[test]
    fn content_type_charset() {
        assert_eq!(
            charset_from_content_type("text/html; charset=UTF-8"),
            Some("UTF-8")
        );
        assert_eq!(
            charset_from_content_type("text/html;Charset=\"windows-1251\"; q=1"),
            Some("windows-1251")
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }
}
