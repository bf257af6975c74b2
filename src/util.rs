//! Small text and attribute helpers shared by the decoder and extractors.

use std::borrow::Cow;

/// Decode document bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the encoding named in the XML declaration
/// 3. Falls back to Windows-1252 (common in older transcription exports)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = extract_xml_encoding(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract encoding from XML declaration.
///
/// Parses `<?xml ... encoding="..." ?>` in the first 100 bytes and returns
/// the encoding name, or `None` when there is no declaration or it names no
/// encoding.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let &quote = after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

/// Collapse every run of XML whitespace to a single space and trim the ends.
pub fn normalize_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_ascii_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Parse a coordinate attribute.
///
/// Integers parse directly, decimals are rounded. Anything else is `None`.
pub fn parse_coordinate(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i32>() {
        return Some(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
        .map(|f| f.round() as i32)
}

/// Parse a pixel dimension such as `2480` or `2480px`.
///
/// Only the leading digits are read; zero and missing digits yield `None`.
pub fn parse_dimension(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse::<u32>().ok().filter(|&n| n > 0)
}

/// Strip a leading `#` from a positional reference (`#z1` -> `z1`).
///
/// Returns `None` for references that are empty once stripped.
pub fn strip_anchor(reference: &str) -> Option<&str> {
    let reference = reference.trim();
    let id = reference.strip_prefix('#').unwrap_or(reference);
    (!id.is_empty()).then_some(id)
}

/// Resolve XML entity references.
pub fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };

    char::from_u32(code).map(|c| c.to_string())
}

// ============================================================================
// Tests
// ============================================================================
