//! Helpers for the presentation format of record data.

use super::RDataError;
use std::string::String;
use std::vec::Vec;

/// The longest character string allowed on the wire.
pub const MAX_CHAR_STR_LEN: usize = 255;

/// Splits record data text into tokens.
///
/// Tokens are separated by white space. A token starting with a double
/// quote extends to the next unescaped double quote and may contain white
/// space. A backslash escapes the following character in both kinds of
/// tokens. Returns the start position and text of each token with the
/// quotes left in place.
pub fn tokenize(s: &str) -> Result<Vec<(usize, &str)>, RDataError> {
    let bytes = s.as_bytes();
    let mut res = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        let start = pos;
        if bytes[pos] == b'"' {
            pos += 1;
            loop {
                match bytes.get(pos) {
                    None => {
                        return Err(RDataError::Syntax(
                            "unterminated quoted string",
                        ))
                    }
                    Some(b'\\') => pos += 2,
                    Some(b'"') => {
                        pos += 1;
                        break;
                    }
                    Some(_) => pos += 1,
                }
            }
        } else {
            while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
        }
        let end = pos.min(bytes.len());
        res.push((start, &s[start..end]));
    }
    Ok(res)
}

/// Parses a single character string, quoted or not.
pub fn parse_char_str(token: &str) -> Result<Vec<u8>, RDataError> {
    let inner = match token.strip_prefix('"') {
        Some(rest) => rest
            .strip_suffix('"')
            .ok_or(RDataError::Syntax("unterminated quoted string"))?,
        None => token,
    };
    let mut res = Vec::with_capacity(inner.len());
    let mut chars = inner.bytes();
    while let Some(ch) = chars.next() {
        if ch != b'\\' {
            res.push(ch);
            continue;
        }
        let ch = chars
            .next()
            .ok_or(RDataError::Syntax("incomplete escape sequence"))?;
        if !ch.is_ascii_digit() {
            res.push(ch);
            continue;
        }
        let mut value = u32::from(ch - b'0');
        for _ in 0..2 {
            match chars.next() {
                Some(ch) if ch.is_ascii_digit() => {
                    value = value * 10 + u32::from(ch - b'0')
                }
                _ => {
                    return Err(RDataError::Syntax(
                        "incomplete escape sequence",
                    ))
                }
            }
        }
        res.push(
            u8::try_from(value)
                .map_err(|_| RDataError::Syntax("escape value too large"))?,
        );
    }
    if res.len() > MAX_CHAR_STR_LEN {
        return Err(RDataError::LongString);
    }
    Ok(res)
}

/// Appends a character string in quoted form.
pub fn format_char_str(data: &[u8], target: &mut String) {
    target.push('"');
    for &ch in data {
        match ch {
            b'"' | b'\\' => {
                target.push('\\');
                target.push(char::from(ch));
            }
            0x20..=0x7E => target.push(char::from(ch)),
            _ => target.push_str(&format!("\\{:03}", ch)),
        }
    }
    target.push('"');
}

//============ Testing =======================================================
