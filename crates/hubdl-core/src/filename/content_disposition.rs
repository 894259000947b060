//! Content-Disposition header parsing (filename and filename*).

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Looks for `filename*=UTF-8''value` first, then `filename="value"` or
/// `filename=value`. The first form found wins; a later form is never
/// consulted once an earlier one matched. The value is percent-decoded, and
/// if decoding fails (bad escape or invalid UTF-8) the header is ignored and
/// `None` is returned.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let raw = find_param(header_value, "filename*")
        .and_then(strip_utf8_prefix)
        .or_else(|| find_param(header_value, "filename").map(unquote))?;

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match percent_decode(raw) {
        Ok(decoded) if !decoded.is_empty() => Some(decoded),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("ignoring undecodable content-disposition filename: {}", e);
            None
        }
    }
}

/// Returns the raw value of the first `name=value` parameter, matched ASCII
/// case-insensitively.
fn find_param<'a>(header_value: &'a str, name: &str) -> Option<&'a str> {
    header_value.split(';').find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

fn strip_utf8_prefix(value: &str) -> Option<&str> {
    let prefix = value.get(..7)?;
    prefix
        .eq_ignore_ascii_case("utf-8''")
        .then(|| &value[7..])
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Error from strict percent-decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PercentDecodeError {
    #[error("malformed escape at byte {0}")]
    MalformedEscape(usize),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Strict percent-decode: every `%` must be followed by two hex digits and
/// the result must be valid UTF-8.
pub(super) fn percent_decode(input: &str) -> Result<String, PercentDecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let high = bytes.get(i + 1).copied().and_then(hex_digit);
            let low = bytes.get(i + 2).copied().and_then(hex_digit);
            match (high, low) {
                (Some(h), Some(l)) => out.push(h << 4 | l),
                _ => return Err(PercentDecodeError::MalformedEscape(i)),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| PercentDecodeError::InvalidUtf8)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
