//! Creating and consuming data in wire format.
//!
//! This module contains the stateless building blocks of the codec: packing
//! and unpacking of big-endian integers, of length-prefixed labels, of
//! domain names with and without compression, and of compression pointers.
//! It also defines the [`Composer`] trait for the targets messages are
//! written into and the error types shared by parsing and composing.

use super::compress::CompressionMap;
use super::name::{Name, MAX_LABEL_LEN, MAX_NAME_LEN};
use crate::rdata::RDataError;
use core::fmt;
use octseq::builder::{OctetsBuilder, Truncate};

/// The largest offset a compression pointer can refer to.
pub const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// The bits marking a label token as a compression pointer.
pub const POINTER_MASK: u8 = 0xC0;

//------------ Composer ------------------------------------------------------

/// A target that wire-format data can be appended to.
///
/// Because the encoder needs to know absolute positions for name compression
/// and needs to fill in length fields after the fact, a target must give
/// access to everything written so far.
pub trait Composer:
    OctetsBuilder + AsRef<[u8]> + AsMut<[u8]> + Truncate
{
}

impl Composer for std::vec::Vec<u8> {}

#[cfg(feature = "bytes")]
impl Composer for bytes::BytesMut {}

/// Appends a slice to the target.
pub fn append<Target: Composer + ?Sized>(
    target: &mut Target,
    slice: &[u8],
) -> Result<(), ComposeError> {
    target.append_slice(slice).map_err(|_| ComposeError::ShortBuf)
}

//------------ Integers ------------------------------------------------------

pub fn pack_u8<Target: Composer + ?Sized>(
    target: &mut Target,
    value: u8,
) -> Result<(), ComposeError> {
    append(target, &[value])
}

pub fn pack_u16<Target: Composer + ?Sized>(
    target: &mut Target,
    value: u16,
) -> Result<(), ComposeError> {
    append(target, &value.to_be_bytes())
}

pub fn pack_u32<Target: Composer + ?Sized>(
    target: &mut Target,
    value: u32,
) -> Result<(), ComposeError> {
    append(target, &value.to_be_bytes())
}

/// Reads an octet at `pos`.
pub fn unpack_u8(data: &[u8], pos: usize) -> Result<u8, ParseError> {
    data.get(pos).copied().ok_or(ParseError::ShortInput)
}

/// Reads a big-endian 16 bit integer starting at `pos`.
pub fn unpack_u16(data: &[u8], pos: usize) -> Result<u16, ParseError> {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(slice_at(data, pos, 2)?);
    Ok(u16::from_be_bytes(buf))
}

/// Reads a big-endian 32 bit integer starting at `pos`.
pub fn unpack_u32(data: &[u8], pos: usize) -> Result<u32, ParseError> {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(slice_at(data, pos, 4)?);
    Ok(u32::from_be_bytes(buf))
}

fn slice_at(data: &[u8], pos: usize, len: usize) -> Result<&[u8], ParseError> {
    pos.checked_add(len)
        .and_then(|end| data.get(pos..end))
        .ok_or(ParseError::ShortInput)
}

//------------ Labels --------------------------------------------------------

/// Appends a length-prefixed domain name label.
///
/// The label must be between 1 and 63 octets long. The empty root label is
/// written by the name functions only.
pub fn pack_label<Target: Composer + ?Sized>(
    target: &mut Target,
    label: &[u8],
) -> Result<(), ComposeError> {
    if label.is_empty() {
        return Err(ComposeError::EmptyLabel);
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(ComposeError::LongLabel);
    }
    append(target, &[label.len() as u8])?;
    append(target, label)
}

/// Reads a length-prefixed label starting at `pos`.
///
/// Returns the label content and the position right after it. The length
/// octet must be a plain label length, i.e., not have either of the two top
/// bits set.
pub fn unpack_label(
    data: &[u8],
    pos: usize,
) -> Result<(&[u8], usize), ParseError> {
    let len = unpack_u8(data, pos)?;
    if len & POINTER_MASK != 0 {
        return Err(FormError::new("invalid label type").into());
    }
    let len = usize::from(len);
    let label = slice_at(data, pos + 1, len)?;
    Ok((label, pos + 1 + len))
}

//------------ Compression Pointers -----------------------------------------

/// Appends a compression pointer to the given absolute offset.
pub fn pack_pointer<Target: Composer + ?Sized>(
    target: &mut Target,
    offset: usize,
) -> Result<(), ComposeError> {
    if offset > MAX_POINTER_OFFSET {
        return Err(ComposeError::PointerRange);
    }
    pack_u16(target, 0xC000 | offset as u16)
}

/// Reads a compression pointer at `pos` and returns its target offset.
pub fn unpack_pointer(data: &[u8], pos: usize) -> Result<usize, ParseError> {
    let value = unpack_u16(data, pos)?;
    if (value >> 8) as u8 & POINTER_MASK != POINTER_MASK {
        return Err(FormError::new("not a compression pointer").into());
    }
    Ok(usize::from(value & 0x3FFF))
}

//------------ Names ---------------------------------------------------------

/// Appends a domain name without compression.
pub fn pack_name<Target: Composer + ?Sized>(
    target: &mut Target,
    name: &Name,
) -> Result<(), ComposeError> {
    if name.wire_len() > MAX_NAME_LEN {
        return Err(ComposeError::LongName);
    }
    for label in name.iter() {
        pack_label(target, label)?;
    }
    pack_u8(target, 0)
}

/// Appends a domain name using name compression.
///
/// The name is walked from its full form towards the root. For each suffix,
/// if `map` knows an earlier position for it, a pointer to that position
/// ends the name. Otherwise the suffix’s first label is written and the
/// suffix is recorded at the position it was written at. Positions are taken
/// from the length of the target, so the target must hold the complete
/// message from its first octet.
pub fn pack_name_compressed<Target: Composer + ?Sized>(
    target: &mut Target,
    name: &Name,
    map: &mut CompressionMap,
) -> Result<(), ComposeError> {
    if name.wire_len() > MAX_NAME_LEN {
        return Err(ComposeError::LongName);
    }
    let labels = name.labels();
    for start in 0..labels.len() {
        let suffix = &labels[start..];
        if let Some(pos) = map.get(suffix) {
            return pack_pointer(target, pos);
        }
        let pos = target.as_ref().len();
        pack_label(target, &labels[start])?;
        map.insert(suffix, pos);
    }
    pack_u8(target, 0)
}

//------------ Length-prefixed Data ------------------------------------------

/// Composes some data prefixed by its 16 bit length.
///
/// Two placeholder octets are written first and filled with the actual
/// length once `op` has finished. If `op` fails or the data is longer than
/// 65535 octets, the target is truncated back to where it was.
pub fn compose_len_prefixed<Target, F>(
    target: &mut Target,
    op: F,
) -> Result<(), ComposeError>
where
    Target: Composer + ?Sized,
    F: FnOnce(&mut Target) -> Result<(), ComposeError>,
{
    let start = target.as_ref().len();
    append(target, &[0; 2])?;
    let pos = target.as_ref().len();
    let res = op(target).and_then(|_| {
        u16::try_from(target.as_ref().len() - pos)
            .map_err(|_| ComposeError::LongData)
    });
    match res {
        Ok(len) => {
            target.as_mut()[pos - 2..pos].copy_from_slice(&len.to_be_bytes());
            Ok(())
        }
        Err(err) => {
            target.truncate(start);
            Err(err)
        }
    }
}

//============ Error Types ===================================================

//------------ ComposeError --------------------------------------------------

/// An error happened while composing data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComposeError {
    /// The target ran out of space.
    ShortBuf,

    /// A label was longer than 63 octets.
    LongLabel,

    /// An empty label appeared somewhere other than at the root.
    EmptyLabel,

    /// A name was longer than 255 octets.
    LongName,

    /// A compression pointer would have to point beyond offset 0x3FFF.
    PointerRange,

    /// Length-prefixed data was longer than 65535 octets.
    LongData,

    /// A message carried both EDNS data and an OPT record.
    DuplicateOpt,

    /// Record data didn’t fit its record type.
    Rdata(RDataError),
}

impl From<RDataError> for ComposeError {
    fn from(err: RDataError) -> Self {
        ComposeError::Rdata(err)
    }
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ComposeError::ShortBuf => f.write_str("buffer size exceeded"),
            ComposeError::LongLabel => f.write_str("label too long"),
            ComposeError::EmptyLabel => f.write_str("empty label"),
            ComposeError::LongName => f.write_str("domain name too long"),
            ComposeError::PointerRange => {
                f.write_str("compression pointer offset out of range")
            }
            ComposeError::LongData => f.write_str("long data"),
            ComposeError::DuplicateOpt => {
                f.write_str("message has both EDNS data and an OPT record")
            }
            ComposeError::Rdata(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ComposeError {}

//------------ ParseError ----------------------------------------------------

/// An error happened while parsing data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An attempt was made to go beyond the end of the available data.
    ShortInput,

    /// A chain of compression pointers revisited the given offset.
    PointerLoop(usize),

    /// A formatting error occurred.
    Form(FormError),

    /// A message contained more than one OPT record.
    MultipleOpt,
}

impl ParseError {
    /// Creates a new parse error as a form error with the given message.
    pub fn form_error(msg: &'static str) -> Self {
        FormError::new(msg).into()
    }
}

//--- From

impl From<FormError> for ParseError {
    fn from(err: FormError) -> Self {
        ParseError::Form(err)
    }
}

//--- Display and Error

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::ShortInput => f.write_str("unexpected end of input"),
            ParseError::PointerLoop(offset) => {
                write!(f, "compression pointer loop at offset {}", offset)
            }
            ParseError::Form(ref err) => fmt::Display::fmt(err, f),
            ParseError::MultipleOpt => f.write_str("multiple OPT records"),
        }
    }
}

impl std::error::Error for ParseError {}

//------------ FormError -----------------------------------------------------

/// A formatting error occured.
///
/// This is a generic error for all kinds of error cases that result in data
/// not being accepted. For diagnostics, the error is being given a static
/// string describing the error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormError(&'static str);

impl FormError {
    /// Creates a new form error value with the given diagnostics string.
    pub fn new(msg: &'static str) -> Self {
        FormError(msg)
    }
}

//--- Display and Error

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FormError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn integers() {
        let mut buf = Vec::new();
        pack_u8(&mut buf, 0x12).unwrap();
        pack_u16(&mut buf, 0x3456).unwrap();
        pack_u32(&mut buf, 0x789a_bcde).unwrap();
        assert_eq!(buf, b"\x12\x34\x56\x78\x9a\xbc\xde");
        assert_eq!(unpack_u8(&buf, 0), Ok(0x12));
        assert_eq!(unpack_u16(&buf, 1), Ok(0x3456));
        assert_eq!(unpack_u32(&buf, 3), Ok(0x789a_bcde));
        assert_eq!(unpack_u32(&buf, 4), Err(ParseError::ShortInput));
        assert_eq!(unpack_u16(&buf, usize::MAX), Err(ParseError::ShortInput));
    }

    #[test]
    fn labels() {
        let mut buf = Vec::new();
        pack_label(&mut buf, b"foo").unwrap();
        assert_eq!(buf, b"\x03foo");
        assert_eq!(unpack_label(&buf, 0), Ok((&b"foo"[..], 4)));
        assert_eq!(pack_label(&mut buf, b""), Err(ComposeError::EmptyLabel));
        assert_eq!(
            pack_label(&mut buf, &[b'a'; 64]),
            Err(ComposeError::LongLabel)
        );
        pack_label(&mut buf, &[b'a'; 63]).unwrap();
        assert_eq!(unpack_label(b"\x05abc", 0), Err(ParseError::ShortInput));
        assert!(matches!(
            unpack_label(b"\x41abc", 0),
            Err(ParseError::Form(_))
        ));
    }

    #[test]
    fn pointers() {
        let mut buf = Vec::new();
        pack_pointer(&mut buf, 12).unwrap();
        pack_pointer(&mut buf, 0x3FFF).unwrap();
        assert_eq!(buf, b"\xC0\x0C\xFF\xFF");
        assert_eq!(
            pack_pointer(&mut buf, 0x4000),
            Err(ComposeError::PointerRange)
        );
        assert_eq!(unpack_pointer(&buf, 0), Ok(12));
        assert_eq!(unpack_pointer(&buf, 2), Ok(0x3FFF));
        assert!(unpack_pointer(b"\x03foo", 0).is_err());
    }

    #[test]
    fn names() {
        let mut buf = Vec::new();
        pack_name(&mut buf, &"www.example.com".parse().unwrap()).unwrap();
        assert_eq!(buf, b"\x03www\x07example\x03com\x00");

        let mut buf = Vec::new();
        pack_name(&mut buf, &Name::root()).unwrap();
        assert_eq!(buf, b"\x00");
    }

    #[test]
    fn compressed_names() {
        let mut map = CompressionMap::new();
        let mut buf = vec![0u8; 12];
        pack_name_compressed(
            &mut buf,
            &"www.example.com".parse().unwrap(),
            &mut map,
        )
        .unwrap();
        pack_name_compressed(
            &mut buf,
            &"mail.EXAMPLE.com".parse().unwrap(),
            &mut map,
        )
        .unwrap();
        pack_name_compressed(
            &mut buf,
            &"www.example.com".parse().unwrap(),
            &mut map,
        )
        .unwrap();
        pack_name_compressed(&mut buf, &Name::root(), &mut map).unwrap();
        assert_eq!(
            &buf[12..],
            b"\x03www\x07example\x03com\x00\
              \x04mail\xC0\x10\
              \xC0\x0C\
              \x00"
        );
    }

    #[test]
    fn len_prefixed() {
        let mut buf = vec![0xAA];
        compose_len_prefixed(&mut buf, |buf| append(buf, b"abc")).unwrap();
        assert_eq!(buf, b"\xAA\x00\x03abc");
        let err = compose_len_prefixed(&mut buf, |buf| {
            append(buf, b"xyz")?;
            Err(ComposeError::LongLabel)
        });
        assert_eq!(err, Err(ComposeError::LongLabel));
        assert_eq!(buf, b"\xAA\x00\x03abc");
    }
}
