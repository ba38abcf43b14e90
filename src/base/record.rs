//! Resource records.
//!
//! This module defines the type [`ResourceRecord`] for a single record as
//! it appears in the answer, authority, or additional section of a message.

use super::buffer::{Buffer, Source};
use super::compress::CompressionMap;
use super::iana::{Class, Rtype};
use super::name::Name;
use super::wire::{
    compose_len_prefixed, pack_name, pack_name_compressed, pack_u32,
    ComposeError, Composer, ParseError,
};
use crate::rdata::RData;
use core::fmt;

//------------ ResourceRecord ------------------------------------------------

/// A DNS resource record.
///
/// A record consists of its owner, i.e., the domain name it belongs to, a
/// class, a time to live in seconds, and the record data. The record type
/// is part of the data, so a record can never be of a different type than
/// its data.
///
/// The OPT pseudo record is a record like any other on this level. Its
/// class and TTL fields are reinterpreted by [`Edns`].
///
/// [`Edns`]: super::opt::Edns
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceRecord {
    owner: Name,
    class: Class,
    ttl: u32,
    data: RData,
}

/// # Creation and Element Access
///
impl ResourceRecord {
    /// Creates a new record from its parts.
    pub fn new(owner: Name, class: Class, ttl: u32, data: RData) -> Self {
        ResourceRecord {
            owner,
            class,
            ttl,
            data,
        }
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn rtype(&self) -> Rtype {
        self.data.rtype()
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn set_class(&mut self, class: Class) {
        self.class = class
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: u32) {
        self.ttl = ttl
    }

    pub fn data(&self) -> &RData {
        &self.data
    }

    pub fn into_data(self) -> RData {
        self.data
    }
}

/// # Parsing and Composing
///
impl ResourceRecord {
    /// Parses a record.
    ///
    /// The record data has to fill exactly the number of octets given in
    /// the record’s RDLENGTH field.
    pub fn parse<S: Source>(buf: &mut Buffer<S>) -> Result<Self, ParseError> {
        let owner = buf.consume_name_array()?;
        let rtype = Rtype::parse(buf)?;
        let class = Class::parse(buf)?;
        let ttl = buf.consume_u32()?;
        let rdlen = usize::from(buf.consume_u16()?);
        let data = RData::decode(rtype, buf, rdlen)?;
        Ok(ResourceRecord::new(owner, class, ttl, data))
    }

    /// Appends the record without any name compression.
    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        pack_name(target, &self.owner)?;
        self.compose_tail(target, None)
    }

    /// Appends the record compressing names via `map`.
    ///
    /// The owner is always compressed. Names in the record data only for
    /// record types that allow it.
    pub fn compose_compressed<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
        map: &mut CompressionMap,
    ) -> Result<(), ComposeError> {
        pack_name_compressed(target, &self.owner, map)?;
        self.compose_tail(target, Some(map))
    }

    fn compose_tail<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
        compress: Option<&mut CompressionMap>,
    ) -> Result<(), ComposeError> {
        self.rtype().compose(target)?;
        self.class.compose(target)?;
        pack_u32(target, self.ttl)?;
        compose_len_prefixed(target, |target| {
            self.data.compose(target, compress)
        })
    }
}

//--- Display

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.owner,
            self.ttl,
            self.class,
            self.rtype(),
            self.data
        )
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::rdata::RDataValue;
    use std::io::SeekFrom;
    use std::net::Ipv4Addr;
    use std::string::ToString;
    use std::vec::Vec;

    fn example_message(record: &[u8]) -> Vec<u8> {
        let mut data = vec![0; 12];
        data.extend_from_slice(b"\x07example\x03com\x00");
        data.extend_from_slice(record);
        data
    }

    #[test]
    fn parse_compressed_a_record() {
        let data = example_message(&[
            0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x0E, 0x10, 0x00,
            0x04, 0x01, 0x02, 0x03, 0x04,
        ]);
        let mut buf = Buffer::new(data);
        buf.seek(SeekFrom::Start(25)).unwrap();
        let record = ResourceRecord::parse(&mut buf).unwrap();
        assert!(buf.at_end());
        assert_eq!(record.owner(), &"example.com".parse::<Name>().unwrap());
        assert_eq!(record.rtype(), Rtype::A);
        assert_eq!(record.class(), Class::IN);
        assert_eq!(record.ttl(), 3600);
        assert_eq!(
            record.data().get("address"),
            Some(&RDataValue::Ipv4(Ipv4Addr::new(1, 2, 3, 4)))
        );
        assert_eq!(record.to_string(), "example.com.\t3600\tIN\tA\t1.2.3.4");
    }

    #[test]
    fn rdlength_must_match() {
        // An A record claiming five octets of data.
        let data = example_message(&[
            0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x0E, 0x10, 0x00,
            0x05, 0x01, 0x02, 0x03, 0x04, 0x05,
        ]);
        let mut buf = Buffer::new(data);
        buf.seek(SeekFrom::Start(25)).unwrap();
        assert!(matches!(
            ResourceRecord::parse(&mut buf),
            Err(ParseError::Form(_))
        ));

        // An MX record whose exchange runs past its data.
        let data = example_message(&[
            0xC0, 0x0C, 0x00, 0x0F, 0x00, 0x01, 0x00, 0x00, 0x0E, 0x10, 0x00,
            0x04, 0x00, 0x0A, 0x02, b'm', b'x', 0x00,
        ]);
        let mut buf = Buffer::new(data);
        buf.seek(SeekFrom::Start(25)).unwrap();
        assert!(matches!(
            ResourceRecord::parse(&mut buf),
            Err(ParseError::Form(_))
        ));
    }

    #[test]
    fn compose_sets_rdlength() {
        let record = ResourceRecord::new(
            "example.com".parse().unwrap(),
            Class::IN,
            300,
            RData::scan(Rtype::MX, "10 mail.example.com.").unwrap(),
        );
        let mut out = vec![0; 12];
        let mut map = CompressionMap::new();
        record.compose_compressed(&mut out, &mut map).unwrap();
        // owner (13) + type, class, ttl (8), then RDLENGTH.
        assert_eq!(&out[33..35], &[0x00, 0x09]);
        assert_eq!(&out[35..], b"\x00\x0A\x04mail\xC0\x0C");

        let mut buf = Buffer::new(out);
        buf.seek(SeekFrom::Start(12)).unwrap();
        assert_eq!(ResourceRecord::parse(&mut buf).unwrap(), record);
    }

    #[test]
    fn unknown_type_is_opaque() {
        let record = ResourceRecord::new(
            "example.com".parse().unwrap(),
            Class::IN,
            60,
            RData::scan(Rtype::from_int(65280), r"\# 2 ABCD").unwrap(),
        );
        let mut out = Vec::new();
        record.compose(&mut out).unwrap();
        let parsed = ResourceRecord::parse(&mut Buffer::new(out)).unwrap();
        assert_eq!(parsed, record);
        assert!(matches!(parsed.data(), RData::Opaque(_)));
        assert_eq!(
            parsed.to_string(),
            "example.com.\t60\tIN\tTYPE65280\t\\# 2 ABCD"
        );
    }
}
