//! Record data.
//!
//! The data of a resource record is represented by [`RData`]. For record
//! types with a known layout, listed in the [`maps`] module, it is a
//! [`RecordData`] value: the record type plus one [`RDataValue`] per field
//! of the layout. For all other types, the data is kept as raw octets in an
//! [`OpaqueRData`] value and shown in the generic format defined in
//! [RFC 3597].
//!
//! Both forms can be created from their presentation format via
//! [`RData::scan`] and displayed through their `Display` impls.
//!
//! [RFC 3597]: https://tools.ietf.org/html/rfc3597

pub use self::maps::{map, try_map, RDataMap};
pub use self::types::{RDataType, RDataValue};

pub mod maps;
mod text;
pub mod types;

use self::text::tokenize;
use crate::base::buffer::{Buffer, Source};
use crate::base::compress::CompressionMap;
use crate::base::iana::Rtype;
use crate::base::wire::{append, ComposeError, Composer, ParseError};
use crate::utils::base16;
use core::fmt;
use std::vec::Vec;
use tracing::debug;

//------------ RData ---------------------------------------------------------

/// The data of a resource record.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RData {
    /// Data of a record type with a known layout.
    Typed(RecordData),

    /// Data of any other record type.
    Opaque(OpaqueRData),
}

impl RData {
    /// Returns the record type the data belongs to.
    pub fn rtype(&self) -> Rtype {
        match *self {
            RData::Typed(ref data) => data.rtype(),
            RData::Opaque(ref data) => data.rtype(),
        }
    }

    /// Returns the value of the named field.
    ///
    /// Opaque data has no fields and always returns `None`.
    pub fn get(&self, field: &str) -> Option<&RDataValue> {
        match *self {
            RData::Typed(ref data) => data.get(field),
            RData::Opaque(_) => None,
        }
    }

    /// Returns the typed data if this is typed data.
    pub fn as_typed(&self) -> Option<&RecordData> {
        match *self {
            RData::Typed(ref data) => Some(data),
            RData::Opaque(_) => None,
        }
    }

    /// Reads `len` octets of record data for a record of type `rtype`.
    ///
    /// All `len` octets have to be used by the fields of the record type’s
    /// layout. If there is no layout, the octets are kept as they are.
    pub fn decode<S: Source>(
        rtype: Rtype,
        buf: &mut Buffer<S>,
        len: usize,
    ) -> Result<Self, ParseError> {
        buf.bounded(len, |buf| match try_map(rtype) {
            Some(map) => RecordData::decode(map, buf).map(RData::Typed),
            None => {
                debug!("keeping record data of type {} as opaque", rtype);
                Ok(RData::Opaque(OpaqueRData {
                    rtype,
                    data: buf.consume(len)?.to_vec(),
                }))
            }
        })
    }

    /// Writes the record data without a length prefix.
    ///
    /// Embedded domain names are only compressed if `compress` provides a
    /// map and the record type is one of those defined in RFC 1035.
    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
        compress: Option<&mut CompressionMap>,
    ) -> Result<(), ComposeError> {
        match *self {
            RData::Typed(ref data) => data.compose(target, compress),
            RData::Opaque(ref data) => append(target, &data.data),
        }
    }

    /// Creates record data from its presentation format.
    ///
    /// Besides the format specific to the record type, the generic format
    /// `\# <length> <hex data>` is accepted for every type. Record types
    /// without a known layout only accept the generic format.
    pub fn scan(rtype: Rtype, text: &str) -> Result<Self, RDataError> {
        let tokens = tokenize(text)?;
        if matches!(tokens.first(), Some((_, r"\#"))) {
            return Self::scan_generic(rtype, text, &tokens);
        }
        let map = map(rtype)?;
        let mut values = Vec::with_capacity(map.len());
        let mut tokens = tokens.into_iter();
        for &(_, kind) in map.fields() {
            if kind.is_greedy() {
                let rest = match tokens.next() {
                    Some((start, _)) => &text[start..],
                    None => "",
                };
                values.push(kind.parse(rest)?);
                tokens = Vec::new().into_iter();
            } else {
                let (_, token) = tokens
                    .next()
                    .ok_or(RDataError::Syntax("missing field"))?;
                values.push(kind.parse(token)?);
            }
        }
        if tokens.next().is_some() {
            return Err(RDataError::Syntax("trailing data"));
        }
        RecordData::new(rtype, values).map(RData::Typed)
    }

    fn scan_generic(
        rtype: Rtype,
        text: &str,
        tokens: &[(usize, &str)],
    ) -> Result<Self, RDataError> {
        let len: usize = tokens
            .get(1)
            .ok_or(RDataError::Syntax("missing data length"))?
            .1
            .parse()
            .map_err(|_| RDataError::Syntax("invalid data length"))?;
        let data = match tokens.get(2) {
            Some(&(start, _)) => base16::decode(&text[start..])
                .map_err(|_| RDataError::InvalidHex)?,
            None => Vec::new(),
        };
        if data.len() != len {
            return Err(RDataError::Syntax("data length mismatch"));
        }
        if try_map(rtype).is_none() {
            return Ok(RData::Opaque(OpaqueRData { rtype, data }));
        }
        let mut buf = Buffer::new(data);
        Self::decode(rtype, &mut buf, len)
            .map_err(|_| RDataError::Syntax("malformed record data"))
    }
}

//--- From

impl From<RecordData> for RData {
    fn from(data: RecordData) -> Self {
        RData::Typed(data)
    }
}

impl From<OpaqueRData> for RData {
    fn from(data: OpaqueRData) -> Self {
        RData::Opaque(data)
    }
}

//--- Display

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RData::Typed(ref data) => fmt::Display::fmt(data, f),
            RData::Opaque(ref data) => fmt::Display::fmt(data, f),
        }
    }
}

//------------ RecordData ----------------------------------------------------

/// Record data following the layout of its record type.
///
/// The values are kept in the order of the layout’s fields. A value of this
/// type always has a value of the right kind for each field.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RecordDataRepr", into = "RecordDataRepr")
)]
pub struct RecordData {
    rtype: Rtype,
    values: Vec<RDataValue>,
}

/// The serialized form of [`RecordData`], checked on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename = "RecordData")]
struct RecordDataRepr {
    rtype: Rtype,
    values: Vec<RDataValue>,
}

#[cfg(feature = "serde")]
impl TryFrom<RecordDataRepr> for RecordData {
    type Error = RDataError;

    fn try_from(repr: RecordDataRepr) -> Result<Self, Self::Error> {
        RecordData::new(repr.rtype, repr.values)
    }
}

#[cfg(feature = "serde")]
impl From<RecordData> for RecordDataRepr {
    fn from(data: RecordData) -> Self {
        RecordDataRepr {
            rtype: data.rtype,
            values: data.values,
        }
    }
}

impl RecordData {
    /// Creates record data from values given in field order.
    pub fn new(
        rtype: Rtype,
        values: Vec<RDataValue>,
    ) -> Result<Self, RDataError> {
        let map = map(rtype)?;
        if values.len() != map.len() {
            return Err(RDataError::FieldCount {
                expected: map.len(),
                found: values.len(),
            });
        }
        for ((_, kind), value) in map.fields().iter().zip(values.iter()) {
            kind.check(value)?;
        }
        Ok(RecordData { rtype, values })
    }

    /// Creates record data from named values in any order.
    pub fn from_fields<'a>(
        rtype: Rtype,
        fields: impl IntoIterator<Item = (&'a str, RDataValue)>,
    ) -> Result<Self, RDataError> {
        let map = map(rtype)?;
        let mut slots: Vec<Option<RDataValue>> = vec![None; map.len()];
        let mut found = 0;
        for (name, value) in fields {
            let idx = map.position(name).ok_or(RDataError::UnknownField)?;
            if slots[idx].replace(value).is_none() {
                found += 1;
            }
        }
        let values = slots.into_iter().collect::<Option<Vec<_>>>().ok_or(
            RDataError::FieldCount {
                expected: map.len(),
                found,
            },
        )?;
        Self::new(rtype, values)
    }

    /// Creates record data whose values are known to fit the layout.
    pub(crate) fn new_unchecked(rtype: Rtype, values: Vec<RDataValue>) -> Self {
        RecordData { rtype, values }
    }

    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns the values in field order.
    pub fn values(&self) -> &[RDataValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<RDataValue> {
        self.values
    }

    /// Returns an iterator over pairs of field name and value.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &RDataValue)> {
        let names = try_map(self.rtype).map(RDataMap::fields).unwrap_or(&[]);
        names.iter().map(|(name, _)| *name).zip(self.values.iter())
    }

    /// Returns the value of the named field.
    pub fn get(&self, field: &str) -> Option<&RDataValue> {
        try_map(self.rtype)?
            .position(field)
            .and_then(|idx| self.values.get(idx))
    }

    /// Replaces the value of the named field.
    pub fn set(
        &mut self,
        field: &str,
        value: RDataValue,
    ) -> Result<(), RDataError> {
        let map = map(self.rtype)?;
        let idx = map.position(field).ok_or(RDataError::UnknownField)?;
        map.fields()[idx].1.check(&value)?;
        self.values[idx] = value;
        Ok(())
    }

    fn decode<S: Source>(
        map: &RDataMap,
        buf: &mut Buffer<S>,
    ) -> Result<Self, ParseError> {
        let values = map
            .fields()
            .iter()
            .map(|&(_, kind)| kind.decode(buf))
            .collect::<Result<_, _>>()?;
        Ok(RecordData {
            rtype: map.rtype(),
            values,
        })
    }

    fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
        compress: Option<&mut CompressionMap>,
    ) -> Result<(), ComposeError> {
        let map = map(self.rtype)?;
        if self.values.len() != map.len() {
            return Err(RDataError::FieldCount {
                expected: map.len(),
                found: self.values.len(),
            }
            .into());
        }
        let mut compress = compress.filter(|_| self.rtype.compresses_rdata_names());
        for ((_, kind), value) in map.fields().iter().zip(self.values.iter()) {
            kind.encode(target, value, compress.as_deref_mut())?;
        }
        Ok(())
    }
}

//--- Display

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(value, f)?;
        }
        Ok(())
    }
}

//------------ OpaqueRData ---------------------------------------------------

/// Record data kept as raw octets.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueRData {
    rtype: Rtype,
    data: Vec<u8>,
}

impl OpaqueRData {
    /// Creates opaque data, failing if it is longer than 65535 octets.
    pub fn new(rtype: Rtype, data: impl Into<Vec<u8>>) -> Result<Self, RDataError> {
        let data = data.into();
        if data.len() > usize::from(u16::MAX) {
            return Err(RDataError::OutOfRange);
        }
        Ok(OpaqueRData { rtype, data })
    }

    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

//--- Display

impl fmt::Display for OpaqueRData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\# {}", self.data.len())?;
        if !self.data.is_empty() {
            f.write_str(" ")?;
            base16::display(&self.data, f)?;
        }
        Ok(())
    }
}

//============ Error Types ===================================================

//------------ RDataError ----------------------------------------------------

/// Record data was not valid for its record type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RDataError {
    /// The record type has no known layout.
    Unmapped(Rtype),

    /// A value was of the wrong kind for its field.
    TypeMismatch {
        expected: RDataType,
        found: RDataType,
    },

    /// The number of values didn’t match the number of fields.
    FieldCount { expected: usize, found: usize },

    /// A field name is not part of the record type’s layout.
    UnknownField,

    /// Binary data was not valid hex.
    InvalidHex,

    /// A value exceeded the range of its field.
    OutOfRange,

    /// A character string was longer than 255 octets.
    LongString,

    /// The presentation format was malformed.
    Syntax(&'static str),

    /// The field kind has no presentation format.
    Unsupported(RDataType),
}

impl fmt::Display for RDataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RDataError::Unmapped(rtype) => {
                write!(f, "no record data layout for type {}", rtype)
            }
            RDataError::TypeMismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            RDataError::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            RDataError::UnknownField => f.write_str("unknown field"),
            RDataError::InvalidHex => f.write_str("invalid hex data"),
            RDataError::OutOfRange => f.write_str("value out of range"),
            RDataError::LongString => f.write_str("character string too long"),
            RDataError::Syntax(msg) => f.write_str(msg),
            RDataError::Unsupported(kind) => {
                write!(f, "{} has no presentation format", kind)
            }
        }
    }
}

impl std::error::Error for RDataError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::name::Name;
    use rstest::rstest;
    use std::net::Ipv4Addr;
    use std::string::ToString;

    #[rstest]
    #[case(Rtype::A, "192.0.2.1")]
    #[case(Rtype::MX, "10 mail.example.com.")]
    #[case(Rtype::SOA, "ns.example. admin.example. 2024010101 7200 3600 1209600 300")]
    #[case(Rtype::TXT, "\"v=spf1 -all\" \"second \\\"part\\\"\"")]
    #[case(Rtype::HINFO, "\"PC\" \"Linux\"")]
    #[case(Rtype::DS, "60485 5 1 2BB183AF5F22588179A53B0A98631FAD1A292118")]
    #[case(Rtype::SRV, "0 5 5060 sip.example.com.")]
    #[case(Rtype::AAAA, "2001:db8::1")]
    #[case(Rtype::TSIG, "\\# 3 ABCDEF")]
    fn scan_and_display(#[case] rtype: Rtype, #[case] text: &str) {
        let data = RData::scan(rtype, text).unwrap();
        assert_eq!(data.rtype(), rtype);
        assert_eq!(data.to_string(), text);
        assert_eq!(RData::scan(rtype, &data.to_string()).unwrap(), data);
    }

    #[test]
    fn scan_hex_with_spaces() {
        let data = RData::scan(Rtype::DS, "1 8 2 ABCD EF01").unwrap();
        assert_eq!(
            data.get("digest"),
            Some(&RDataValue::Binary(vec![0xAB, 0xCD, 0xEF, 0x01]))
        );
    }

    #[test]
    fn scan_generic_known_type() {
        let data = RData::scan(Rtype::A, r"\# 4 0A000001").unwrap();
        assert_eq!(
            data.get("address"),
            Some(&RDataValue::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_eq!(
            RData::scan(Rtype::A, r"\# 5 0A000001"),
            Err(RDataError::Syntax("data length mismatch"))
        );
        assert_eq!(
            RData::scan(Rtype::A, r"\# 3 0A0000"),
            Err(RDataError::Syntax("malformed record data"))
        );
        assert_eq!(RData::scan(Rtype::NULL, r"\# 0").unwrap().to_string(), "");
    }

    #[test]
    fn scan_errors() {
        assert_eq!(
            RData::scan(Rtype::MX, "10"),
            Err(RDataError::Syntax("missing field"))
        );
        assert_eq!(
            RData::scan(Rtype::MX, "10 mx.example. extra"),
            Err(RDataError::Syntax("trailing data"))
        );
        assert_eq!(
            RData::scan(Rtype::MX, "65536 mx.example."),
            Err(RDataError::OutOfRange)
        );
        assert_eq!(
            RData::scan(Rtype::DS, "1 8 2 ABC"),
            Err(RDataError::InvalidHex)
        );
        assert_eq!(
            RData::scan(Rtype::CAA, "0 issue \"ca.example\""),
            Err(RDataError::Unmapped(Rtype::CAA))
        );
    }

    #[test]
    fn record_data_construction() {
        let exchange: Name = "mx.example.com".parse().unwrap();
        let data = RecordData::from_fields(
            Rtype::MX,
            [
                ("exchange", RDataValue::Name(exchange.clone())),
                ("preference", RDataValue::U16(10)),
            ],
        )
        .unwrap();
        assert_eq!(
            data.values(),
            &[RDataValue::U16(10), RDataValue::Name(exchange.clone())]
        );
        let names: Vec<_> = data.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["preference", "exchange"]);

        assert_eq!(
            RecordData::new(Rtype::MX, vec![RDataValue::U16(10)]),
            Err(RDataError::FieldCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            RecordData::new(
                Rtype::MX,
                vec![RDataValue::U8(10), RDataValue::Name(exchange.clone())]
            ),
            Err(RDataError::TypeMismatch {
                expected: RDataType::Uint16,
                found: RDataType::Uint8
            })
        );
        assert_eq!(
            RecordData::from_fields(
                Rtype::MX,
                [("weight", RDataValue::U16(1))]
            ),
            Err(RDataError::UnknownField)
        );
        assert_eq!(
            RecordData::from_fields(
                Rtype::MX,
                [("exchange", RDataValue::Name(exchange))]
            ),
            Err(RDataError::FieldCount {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn set_field() {
        let mut data = RecordData::new(
            Rtype::A,
            vec![RDataValue::Ipv4(Ipv4Addr::new(192, 0, 2, 1))],
        )
        .unwrap();
        data.set("address", Ipv4Addr::new(192, 0, 2, 2).into()).unwrap();
        assert_eq!(data.to_string(), "192.0.2.2");
        assert!(data.set("address", RDataValue::U8(1)).is_err());
    }

    #[test]
    fn compose_checks_field_count() {
        let data = RecordData::new_unchecked(Rtype::MX, vec![RDataValue::U16(10)]);
        let mut target = Vec::new();
        assert_eq!(
            data.compose(&mut target, None),
            Err(ComposeError::Rdata(RDataError::FieldCount {
                expected: 2,
                found: 1
            }))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_checks_layout() {
        use serde_test::{
            assert_de_tokens_error, assert_tokens, Configure, Readable, Token,
        };

        let data = RecordData::new(
            Rtype::A,
            vec![RDataValue::Ipv4(Ipv4Addr::new(192, 0, 2, 1))],
        )
        .unwrap();
        assert_tokens(
            &data.readable(),
            &[
                Token::Struct {
                    name: "RecordData",
                    len: 2,
                },
                Token::Str("rtype"),
                Token::Str("A"),
                Token::Str("values"),
                Token::Seq { len: Some(1) },
                Token::NewtypeVariant {
                    name: "RDataValue",
                    variant: "Ipv4",
                },
                Token::Str("192.0.2.1"),
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );

        assert_de_tokens_error::<Readable<RecordData>>(
            &[
                Token::Struct {
                    name: "RecordData",
                    len: 2,
                },
                Token::Str("rtype"),
                Token::Str("MX"),
                Token::Str("values"),
                Token::Seq { len: Some(1) },
                Token::NewtypeVariant {
                    name: "RDataValue",
                    variant: "U16",
                },
                Token::U16(10),
                Token::SeqEnd,
                Token::StructEnd,
            ],
            "expected 2 fields, found 1",
        );
    }

    #[test]
    fn decode_requires_all_data() {
        let mut buf = Buffer::new(vec![192, 0, 2, 1, 0]);
        assert_eq!(
            RData::decode(Rtype::A, &mut buf, 5),
            Err(ParseError::form_error("trailing data in record data"))
        );
        let mut buf = Buffer::new(vec![192, 0, 2]);
        assert!(RData::decode(Rtype::A, &mut buf, 3).is_err());
    }

    #[test]
    fn opaque_display() {
        let data = OpaqueRData::new(Rtype::CAA, vec![0x00, 0xFF]).unwrap();
        assert_eq!(RData::from(data).to_string(), r"\# 2 00FF");
    }

    #[test]
    fn compression_only_for_rfc1035_types() {
        let mut map = CompressionMap::new();
        let mut out = Vec::new();
        crate::base::wire::pack_name_compressed(
            &mut out,
            &"example.com".parse().unwrap(),
            &mut map,
        )
        .unwrap();
        let start = out.len();

        let mx = RData::scan(Rtype::MX, "10 example.com.").unwrap();
        mx.compose(&mut out, Some(&mut map)).unwrap();
        assert_eq!(&out[start..], &[0, 10, 0xC0, 0x00]);

        let start = out.len();
        let srv = RData::scan(Rtype::SRV, "0 0 53 example.com.").unwrap();
        srv.compose(&mut out, Some(&mut map)).unwrap();
        assert_eq!(out.len() - start, 6 + 13);
    }
}
