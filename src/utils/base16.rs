//! Hex digits as used for binary record data.
//!
//! Record data that has no other presentation format is written as a
//! sequence of hex digits ([RFC 4648] calls this Base 16). Output always
//! uses upper case letters. Input accepts either case and, in [`decode`],
//! white space between digits since zone files often split long values.
//!
//! [RFC 4648]: https://tools.ietf.org/html/rfc4648

use core::fmt;
use std::string::String;
use std::vec::Vec;

/// Upper case hex digits indexed by their value.
const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

//------------ Convenience Functions -----------------------------------------

/// Decodes hex digits, skipping any white space.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    decode_chars(s.chars().filter(|ch| !ch.is_whitespace()))
}

/// Decodes hex digits without allowing anything else in between.
pub fn decode_vec(s: &str) -> Result<Vec<u8>, DecodeError> {
    decode_chars(s.chars())
}

fn decode_chars(
    chars: impl Iterator<Item = char>,
) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = Decoder::new();
    for ch in chars {
        decoder.push(ch)?;
    }
    decoder.finalize()
}

/// Writes `bytes` as hex digits into a formatter.
pub fn display<B, W>(bytes: &B, f: &mut W) -> fmt::Result
where
    B: AsRef<[u8]> + ?Sized,
    W: fmt::Write,
{
    for &octet in bytes.as_ref() {
        f.write_char(char::from(DIGITS[usize::from(octet >> 4)]))?;
        f.write_char(char::from(DIGITS[usize::from(octet & 0x0F)]))?;
    }
    Ok(())
}

/// Returns `bytes` as a string of hex digits.
pub fn encode_string<B: AsRef<[u8]> + ?Sized>(bytes: &B) -> String {
    let mut res = String::with_capacity(bytes.as_ref().len() * 2);
    for &octet in bytes.as_ref() {
        res.push(char::from(DIGITS[usize::from(octet >> 4)]));
        res.push(char::from(DIGITS[usize::from(octet & 0x0F)]));
    }
    res
}

//------------ Decoder -------------------------------------------------------

/// Incremental hex decoding, one character at a time.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    /// The high nibble of an incomplete octet.
    pending: Option<u8>,
    octets: Vec<u8>,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the next digit.
    pub fn push(&mut self, ch: char) -> Result<(), DecodeError> {
        let nibble = ch
            .to_digit(16)
            .and_then(|value| u8::try_from(value).ok())
            .ok_or(DecodeError::IllegalChar(ch))?;
        match self.pending.take() {
            Some(high) => self.octets.push(high | nibble),
            None => self.pending = Some(nibble << 4),
        }
        Ok(())
    }

    /// Returns the decoded octets, failing on a dangling digit.
    pub fn finalize(self) -> Result<Vec<u8>, DecodeError> {
        match self.pending {
            Some(_) => Err(DecodeError::ShortInput),
            None => Ok(self.octets),
        }
    }
}

//------------ DecodeError ---------------------------------------------------

/// Hex data could not be decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// Something other than a hex digit.
    IllegalChar(char),

    /// An odd number of digits.
    ShortInput,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::IllegalChar(ch) => {
                write!(f, "illegal character '{}'", ch)
            }
            DecodeError::ShortInput => f.write_str("incomplete input"),
        }
    }
}

impl std::error::Error for DecodeError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decoding() {
        assert_eq!(decode_vec("").unwrap(), b"");
        assert_eq!(decode_vec("c3").unwrap(), b"\xC3");
        assert_eq!(decode_vec("00Ff7e").unwrap(), b"\x00\xFF\x7E");
        assert_eq!(decode("de ad\n\tBE EF").unwrap(), b"\xDE\xAD\xBE\xEF");
        assert_eq!(decode_vec("de ad"), Err(DecodeError::IllegalChar(' ')));
        assert_eq!(decode_vec("abc"), Err(DecodeError::ShortInput));
        assert_eq!(decode("0g"), Err(DecodeError::IllegalChar('g')));
    }

    #[test]
    fn encoding() {
        let mut out = String::new();
        display(b"\x00\x9f\xa0", &mut out).unwrap();
        assert_eq!(out, "009FA0");
        assert_eq!(encode_string(b""), "");
        assert_eq!(encode_string(b"\x01\xab"), "01AB");
    }
}
