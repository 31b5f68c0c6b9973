//! Encoding label resolution and strict decoding.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Resolves an encoding label to an `encoding_rs` encoding.
///
/// Accepts WHATWG labels (`utf-8`, `shift_jis`, `windows-1252`, ...) plus the
/// common Python-style names descriptors tend to use (`utf_8`, `utf-8-sig`,
/// `cp932`, `latin-1`). Underscores are treated as hyphens and matching is
/// case-insensitive.
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
    let canonical = match normalized.as_str() {
        "utf-8-sig" | "utf8-sig" => "utf-8",
        "cp932" | "ms932" | "mskanji" => "windows-31j",
        "latin-1" | "iso8859-1" => "iso-8859-1",
        "cp936" => "gbk",
        "cp949" => "euc-kr",
        "cp950" => "big5",
        other => other,
    };

    Encoding::for_label(canonical.as_bytes()).or_else(|| {
        canonical
            .strip_prefix("cp")
            .and_then(|code| Encoding::for_label(format!("windows-{code}").as_bytes()))
    })
}

/// Decodes `bytes`, treating malformed sequences as fatal.
///
/// A leading BOM is stripped when it belongs to `encoding`; a UTF-16 BOM also
/// selects the byte order when the label was a generic `utf-16`.
/// Returns the decoded text and the encoding actually used, or `None` if the
/// input is malformed.
pub fn decode_strict<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Option<(Cow<'a, str>, &'static Encoding)> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len))
            if bom_encoding == encoding || (is_utf16(bom_encoding) && is_utf16(encoding)) =>
        {
            (bom_encoding, &bytes[bom_len..])
        }
        _ => (encoding, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| (text, encoding))
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

    #[test]
    fn test_resolve_whatwg_labels() {
        assert_eq!(resolve_encoding("utf-8"), Some(UTF_8));
        assert_eq!(resolve_encoding("UTF-8"), Some(UTF_8));
        assert_eq!(resolve_encoding("shift_jis"), Some(SHIFT_JIS));
    }

    #[test]
    fn test_resolve_python_aliases() {
        assert_eq!(resolve_encoding("utf_8"), Some(UTF_8));
        assert_eq!(resolve_encoding("utf-8-sig"), Some(UTF_8));
        assert_eq!(resolve_encoding("cp932"), Some(SHIFT_JIS));
        assert_eq!(resolve_encoding("cp1252"), Some(WINDOWS_1252));
        assert_eq!(resolve_encoding("latin-1"), Some(WINDOWS_1252));
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(resolve_encoding("klingon"), None);
        assert_eq!(resolve_encoding(""), None);
    }

    #[test]
    fn test_decode_strips_matching_bom() {
        let bytes = b"\xEF\xBB\xBFname,age\n";
        let (text, used) = decode_strict(bytes, UTF_8).unwrap();
        assert_eq!(text, "name,age\n");
        assert_eq!(used, UTF_8);
    }

    #[test]
    fn test_decode_rejects_malformed_utf8() {
        assert!(decode_strict(b"caf\xE9\n", UTF_8).is_none());
    }

    #[test]
    fn test_decode_shift_jis() {
        // "名前" in Shift_JIS
        let bytes = b"\x96\xBC\x91\x4F";
        let (text, _) = decode_strict(bytes, SHIFT_JIS).unwrap();
        assert_eq!(text, "名前");
    }

    #[test]
    fn test_decode_utf16_bom_selects_byte_order() {
        let bytes = b"\xFE\xFF\x00a\x00b";
        let (text, used) = decode_strict(bytes, UTF_16LE).unwrap();
        assert_eq!(text, "ab");
        assert_eq!(used, UTF_16BE);
    }
}
