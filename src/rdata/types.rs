//! The kinds of fields record data is made of.
//!
//! Record data of all supported record types is a sequence of fields, each
//! of one of a small number of kinds listed by [`RDataType`]. For each kind,
//! this module knows how to read it from wire format, how to write it, and
//! how to convert it from and to its presentation format. The value of a
//! field is an [`RDataValue`].

use super::text::{format_char_str, parse_char_str, tokenize, MAX_CHAR_STR_LEN};
use super::RDataError;
use crate::base::buffer::{Buffer, Source};
use crate::base::compress::CompressionMap;
use crate::base::name::Name;
use crate::base::opt::EdnsOption;
use crate::base::wire::{
    append, pack_name, pack_name_compressed, pack_u16, pack_u32, pack_u8,
    ComposeError, Composer, ParseError,
};
use crate::utils::base16;
use core::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::string::String;
use std::vec::Vec;

//------------ RDataType -----------------------------------------------------

/// The kind of a record data field.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RDataType {
    /// A domain name, possibly compressed.
    DomainName,

    /// A four octet IPv4 address.
    Ipv4Address,

    /// A sixteen octet IPv6 address.
    Ipv6Address,

    /// A single octet length followed by that many octets.
    CharacterString,

    /// Character strings until the end of the record data.
    CharacterStringList,

    /// Raw octets until the end of the record data.
    HexBinary,

    /// An unsigned eight bit integer.
    Uint8,

    /// An unsigned 16 bit integer in network byte order.
    Uint16,

    /// An unsigned 32 bit integer in network byte order.
    Uint32,

    /// A single EDNS option.
    EdnsOption,

    /// EDNS options until the end of the record data.
    OptionList,
}

impl RDataType {
    /// Returns whether a field of this kind extends to the end of the data.
    ///
    /// Such a field can only ever be the last field of a record type.
    pub fn is_greedy(self) -> bool {
        matches!(
            self,
            RDataType::CharacterStringList
                | RDataType::HexBinary
                | RDataType::OptionList
        )
    }

    /// Reads a field of this kind.
    ///
    /// Greedy kinds read everything up to the end of the buffer, so the
    /// buffer needs to be limited to the record data.
    pub fn decode<S: Source>(
        self,
        buf: &mut Buffer<S>,
    ) -> Result<RDataValue, ParseError> {
        Ok(match self {
            RDataType::DomainName => RDataValue::Name(buf.consume_name_array()?),
            RDataType::Ipv4Address => RDataValue::Ipv4(buf.consume_ipv4()?),
            RDataType::Ipv6Address => RDataValue::Ipv6(buf.consume_ipv6()?),
            RDataType::CharacterString => {
                RDataValue::CharStr(buf.consume_label()?)
            }
            RDataType::CharacterStringList => {
                let mut res = Vec::new();
                while !buf.at_end() {
                    res.push(buf.consume_label()?);
                }
                RDataValue::CharStrList(res)
            }
            RDataType::HexBinary => {
                let len = buf.remaining();
                RDataValue::Binary(buf.consume(len)?.to_vec())
            }
            RDataType::Uint8 => RDataValue::U8(buf.consume_u8()?),
            RDataType::Uint16 => RDataValue::U16(buf.consume_u16()?),
            RDataType::Uint32 => RDataValue::U32(buf.consume_u32()?),
            RDataType::EdnsOption => {
                RDataValue::Option(EdnsOption::parse(buf)?)
            }
            RDataType::OptionList => {
                let mut res = Vec::new();
                while !buf.at_end() {
                    res.push(EdnsOption::parse(buf)?);
                }
                RDataValue::Options(res)
            }
        })
    }

    /// Writes a field of this kind.
    ///
    /// Domain names are compressed if `compress` provides a map.
    pub fn encode<Target: Composer + ?Sized>(
        self,
        target: &mut Target,
        value: &RDataValue,
        compress: Option<&mut CompressionMap>,
    ) -> Result<(), ComposeError> {
        self.check(value)?;
        match *value {
            RDataValue::Name(ref name) => match compress {
                Some(map) => pack_name_compressed(target, name, map),
                None => pack_name(target, name),
            },
            RDataValue::Ipv4(addr) => append(target, &addr.octets()),
            RDataValue::Ipv6(addr) => append(target, &addr.octets()),
            RDataValue::CharStr(ref data) => compose_char_str(target, data),
            RDataValue::CharStrList(ref list) => {
                for data in list {
                    compose_char_str(target, data)?;
                }
                Ok(())
            }
            RDataValue::Binary(ref data) => append(target, data),
            RDataValue::U8(value) => pack_u8(target, value),
            RDataValue::U16(value) => pack_u16(target, value),
            RDataValue::U32(value) => pack_u32(target, value),
            RDataValue::Option(ref option) => option.compose(target),
            RDataValue::Options(ref options) => {
                for option in options {
                    option.compose(target)?;
                }
                Ok(())
            }
        }
    }

    /// Checks that a value is of this kind and within its limits.
    pub fn check(self, value: &RDataValue) -> Result<(), RDataError> {
        match (self, value) {
            (RDataType::CharacterString, RDataValue::CharStr(data)) => {
                check_char_str(data)
            }
            (RDataType::CharacterStringList, RDataValue::CharStrList(list)) => {
                list.iter().try_for_each(|data| check_char_str(data))
            }
            (RDataType::DomainName, RDataValue::Name(_))
            | (RDataType::Ipv4Address, RDataValue::Ipv4(_))
            | (RDataType::Ipv6Address, RDataValue::Ipv6(_))
            | (RDataType::HexBinary, RDataValue::Binary(_))
            | (RDataType::Uint8, RDataValue::U8(_))
            | (RDataType::Uint16, RDataValue::U16(_))
            | (RDataType::Uint32, RDataValue::U32(_))
            | (RDataType::EdnsOption, RDataValue::Option(_))
            | (RDataType::OptionList, RDataValue::Options(_)) => Ok(()),
            _ => Err(RDataError::TypeMismatch {
                expected: self,
                found: value.kind(),
            }),
        }
    }

    /// Converts the presentation format of a field into a value.
    ///
    /// Greedy kinds take the complete remainder of the record data’s text.
    /// EDNS options have no presentation format and can’t be parsed.
    pub fn parse(self, s: &str) -> Result<RDataValue, RDataError> {
        Ok(match self {
            RDataType::DomainName => RDataValue::Name(
                s.parse()
                    .map_err(|_| RDataError::Syntax("invalid domain name"))?,
            ),
            RDataType::Ipv4Address => RDataValue::Ipv4(
                s.parse()
                    .map_err(|_| RDataError::Syntax("invalid IPv4 address"))?,
            ),
            RDataType::Ipv6Address => RDataValue::Ipv6(
                s.parse()
                    .map_err(|_| RDataError::Syntax("invalid IPv6 address"))?,
            ),
            RDataType::CharacterString => {
                RDataValue::CharStr(parse_char_str(s)?)
            }
            RDataType::CharacterStringList => RDataValue::CharStrList(
                tokenize(s)?
                    .into_iter()
                    .map(|(_, token)| parse_char_str(token))
                    .collect::<Result<_, _>>()?,
            ),
            RDataType::HexBinary => RDataValue::Binary(
                base16::decode(s).map_err(|_| RDataError::InvalidHex)?,
            ),
            RDataType::Uint8 => RDataValue::U8(parse_int(s)?),
            RDataType::Uint16 => RDataValue::U16(parse_int(s)?),
            RDataType::Uint32 => RDataValue::U32(parse_int(s)?),
            RDataType::EdnsOption | RDataType::OptionList => {
                return Err(RDataError::Unsupported(self))
            }
        })
    }

    /// Returns the presentation format of a field.
    pub fn format(self, value: &RDataValue) -> Result<String, RDataError> {
        self.check(value)?;
        Ok(value.to_string())
    }
}

//--- Display

impl fmt::Display for RDataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            RDataType::DomainName => "domain name",
            RDataType::Ipv4Address => "IPv4 address",
            RDataType::Ipv6Address => "IPv6 address",
            RDataType::CharacterString => "character string",
            RDataType::CharacterStringList => "character string list",
            RDataType::HexBinary => "binary data",
            RDataType::Uint8 => "8 bit integer",
            RDataType::Uint16 => "16 bit integer",
            RDataType::Uint32 => "32 bit integer",
            RDataType::EdnsOption => "EDNS option",
            RDataType::OptionList => "EDNS option list",
        })
    }
}

fn check_char_str(data: &[u8]) -> Result<(), RDataError> {
    if data.len() > MAX_CHAR_STR_LEN {
        Err(RDataError::LongString)
    } else {
        Ok(())
    }
}

fn compose_char_str<Target: Composer + ?Sized>(
    target: &mut Target,
    data: &[u8],
) -> Result<(), ComposeError> {
    let len = u8::try_from(data.len()).map_err(|_| ComposeError::LongData)?;
    pack_u8(target, len)?;
    append(target, data)
}

/// Parses a decimal integer, telling overflow apart from other problems.
fn parse_int<T: TryFrom<u64>>(s: &str) -> Result<T, RDataError> {
    if s.is_empty() || !s.bytes().all(|ch| ch.is_ascii_digit()) {
        return Err(RDataError::Syntax("invalid integer"));
    }
    let value: u64 = s.parse().map_err(|_| RDataError::OutOfRange)?;
    T::try_from(value).map_err(|_| RDataError::OutOfRange)
}

//------------ RDataValue ----------------------------------------------------

/// The value of a single record data field.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RDataValue {
    Name(Name),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    CharStr(Vec<u8>),
    CharStrList(Vec<Vec<u8>>),
    Binary(Vec<u8>),
    U8(u8),
    U16(u16),
    U32(u32),
    Option(EdnsOption),
    Options(Vec<EdnsOption>),
}

impl RDataValue {
    /// Returns the field kind this value belongs to.
    pub fn kind(&self) -> RDataType {
        match *self {
            RDataValue::Name(_) => RDataType::DomainName,
            RDataValue::Ipv4(_) => RDataType::Ipv4Address,
            RDataValue::Ipv6(_) => RDataType::Ipv6Address,
            RDataValue::CharStr(_) => RDataType::CharacterString,
            RDataValue::CharStrList(_) => RDataType::CharacterStringList,
            RDataValue::Binary(_) => RDataType::HexBinary,
            RDataValue::U8(_) => RDataType::Uint8,
            RDataValue::U16(_) => RDataType::Uint16,
            RDataValue::U32(_) => RDataType::Uint32,
            RDataValue::Option(_) => RDataType::EdnsOption,
            RDataValue::Options(_) => RDataType::OptionList,
        }
    }

    pub fn as_name(&self) -> Option<&Name> {
        match *self {
            RDataValue::Name(ref name) => Some(name),
            _ => None,
        }
    }

    /// Returns any integer value widened to 32 bits.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            RDataValue::U8(value) => Some(value.into()),
            RDataValue::U16(value) => Some(value.into()),
            RDataValue::U32(value) => Some(value),
            _ => None,
        }
    }
}

//--- From

impl From<Name> for RDataValue {
    fn from(name: Name) -> Self {
        RDataValue::Name(name)
    }
}

impl From<Ipv4Addr> for RDataValue {
    fn from(addr: Ipv4Addr) -> Self {
        RDataValue::Ipv4(addr)
    }
}

impl From<Ipv6Addr> for RDataValue {
    fn from(addr: Ipv6Addr) -> Self {
        RDataValue::Ipv6(addr)
    }
}

impl From<u8> for RDataValue {
    fn from(value: u8) -> Self {
        RDataValue::U8(value)
    }
}

impl From<u16> for RDataValue {
    fn from(value: u16) -> Self {
        RDataValue::U16(value)
    }
}

impl From<u32> for RDataValue {
    fn from(value: u32) -> Self {
        RDataValue::U32(value)
    }
}

//--- Display

impl fmt::Display for RDataValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RDataValue::Name(ref name) => fmt::Display::fmt(name, f),
            RDataValue::Ipv4(ref addr) => fmt::Display::fmt(addr, f),
            RDataValue::Ipv6(ref addr) => fmt::Display::fmt(addr, f),
            RDataValue::CharStr(ref data) => {
                let mut out = String::new();
                format_char_str(data, &mut out);
                f.write_str(&out)
            }
            RDataValue::CharStrList(ref list) => {
                let mut out = String::new();
                for (i, data) in list.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    format_char_str(data, &mut out);
                }
                f.write_str(&out)
            }
            RDataValue::Binary(ref data) => base16::display(data, f),
            RDataValue::U8(value) => fmt::Display::fmt(&value, f),
            RDataValue::U16(value) => fmt::Display::fmt(&value, f),
            RDataValue::U32(value) => fmt::Display::fmt(&value, f),
            RDataValue::Option(ref option) => fmt::Display::fmt(option, f),
            RDataValue::Options(ref options) => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    fmt::Display::fmt(option, f)?;
                }
                Ok(())
            }
        }
    }
}

//============ Testing =======================================================
