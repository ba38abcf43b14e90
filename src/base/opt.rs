//! Extended DNS (EDNS) data.
//!
//! EDNS, defined in [RFC 6891], is carried by a pseudo resource record of
//! type OPT placed in the additional section of a message. The record
//! abuses its fields: the class holds the largest UDP payload the sender can
//! reassemble and the TTL is split into the upper eight bits of the response
//! code, the EDNS version, and a flag word of which only the top bit, DO,
//! is currently defined. Its record data is a sequence of options.
//!
//! Within a [`Message`], this data is kept in an [`Edns`] value rather than
//! as a record. The decoder and encoder convert between the two forms via
//! [`Edns::from_opt_record`] and [`Edns::to_opt_record`].
//!
//! [RFC 6891]: https://tools.ietf.org/html/rfc6891
//! [`Message`]: crate::base::message::Message

use super::buffer::{Buffer, Source};
use super::iana::{Class, OptionCode, Rcode, Rtype};
use super::name::Name;
use super::record::ResourceRecord;
use super::wire::{
    append, compose_len_prefixed, ComposeError, Composer, FormError,
    ParseError,
};
use crate::rdata::{RData, RDataError, RDataValue, RecordData};
use crate::utils::base16;
use core::fmt;
use std::vec::Vec;

/// The UDP payload size advertised unless set otherwise.
pub const DEFAULT_UDP_PAYLOAD_SIZE: u16 = 4096;

/// The bit of the TTL flag word carrying the DO flag.
const DNSSEC_OK_BIT: u32 = 0x8000;

//------------ EdnsOption ----------------------------------------------------

/// A single option of an OPT record.
///
/// The option’s data is kept as raw octets. Interpreting it is left to
/// whoever knows the meaning of the option code.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdnsOption {
    code: OptionCode,
    data: Vec<u8>,
}

impl EdnsOption {
    /// Creates a new option.
    ///
    /// Returns an error if the data is longer than 65535 octets.
    pub fn new(
        code: OptionCode,
        data: impl Into<Vec<u8>>,
    ) -> Result<Self, RDataError> {
        let data = data.into();
        if data.len() > usize::from(u16::MAX) {
            return Err(RDataError::OutOfRange);
        }
        Ok(EdnsOption { code, data })
    }

    pub fn code(&self) -> OptionCode {
        self.code
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Parses an option consisting of code, length, and data.
    pub fn parse<S: Source>(buf: &mut Buffer<S>) -> Result<Self, ParseError> {
        let code = OptionCode::parse(buf)?;
        let len = buf.consume_u16()?;
        let data = buf.consume(usize::from(len))?.to_vec();
        Ok(EdnsOption { code, data })
    }

    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        self.code.compose(target)?;
        compose_len_prefixed(target, |target| append(target, &self.data))
    }
}

//--- Display

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:", self.code.to_int())?;
        base16::display(&self.data, f)
    }
}

//------------ Edns ----------------------------------------------------------

/// The EDNS data of a message.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edns {
    udp_payload_size: u16,
    ext_rcode: u8,
    version: u8,
    dnssec_ok: bool,

    /// The flag bits other than DO, kept in their original positions.
    z: u16,

    options: Vec<EdnsOption>,
}

/// # Creation and Conversion
///
impl Edns {
    /// Creates EDNS data with default values and no options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates EDNS data from the fields of an OPT record.
    ///
    /// The record has to have the root as its owner and its data has to
    /// be a sequence of options.
    pub fn from_opt_record(record: &ResourceRecord) -> Result<Self, ParseError> {
        if record.rtype() != Rtype::OPT {
            return Err(FormError::new("not an OPT record").into());
        }
        if !record.owner().is_root() {
            return Err(FormError::new("OPT record owner not root").into());
        }
        let options = match record.data() {
            RData::Typed(data) => match data.get("options") {
                Some(RDataValue::Options(options)) => options.clone(),
                _ => return Err(FormError::new("invalid OPT data").into()),
            },
            RData::Opaque(data) => {
                let mut buf = Buffer::new(data.data());
                let mut options = Vec::new();
                while !buf.at_end() {
                    options.push(EdnsOption::parse(&mut buf)?);
                }
                options
            }
        };
        let mut res = Edns {
            udp_payload_size: record.class().to_int(),
            options,
            ..Default::default()
        };
        res.set_ttl(record.ttl());
        Ok(res)
    }

    /// Converts the data into an OPT record.
    pub fn to_opt_record(&self) -> ResourceRecord {
        ResourceRecord::new(
            Name::root(),
            Class::from_int(self.udp_payload_size),
            self.ttl(),
            RData::Typed(RecordData::new_unchecked(
                Rtype::OPT,
                vec![RDataValue::Options(self.options.clone())],
            )),
        )
    }
}

/// # Field Access
///
impl Edns {
    pub fn udp_payload_size(&self) -> u16 {
        self.udp_payload_size
    }

    pub fn set_udp_payload_size(&mut self, value: u16) {
        self.udp_payload_size = value
    }

    /// Returns the upper eight bits of the extended response code.
    pub fn ext_rcode(&self) -> u8 {
        self.ext_rcode
    }

    pub fn set_ext_rcode(&mut self, value: u8) {
        self.ext_rcode = value
    }

    /// Takes the upper eight bits from a complete response code.
    pub fn set_rcode_bits(&mut self, rcode: Rcode) {
        self.ext_rcode = rcode.ext_bits()
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn set_version(&mut self, value: u8) {
        self.version = value
    }

    /// Returns whether the DO bit is set.
    pub fn dnssec_ok(&self) -> bool {
        self.dnssec_ok
    }

    pub fn set_dnssec_ok(&mut self, value: bool) {
        self.dnssec_ok = value
    }

    /// Returns the remaining 15 flag bits.
    pub fn z(&self) -> u16 {
        self.z
    }

    /// Sets the remaining flag bits. The DO bit is ignored.
    pub fn set_z(&mut self, value: u16) {
        self.z = value & 0x7FFF
    }

    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Vec<EdnsOption> {
        &mut self.options
    }

    pub fn push_option(&mut self, option: EdnsOption) {
        self.options.push(option)
    }

    /// Returns the first option with the given code.
    pub fn option(&self, code: OptionCode) -> Option<&EdnsOption> {
        self.options.iter().find(|opt| opt.code == code)
    }

    /// Returns the value of the TTL field of the OPT record.
    pub fn ttl(&self) -> u32 {
        let mut res = (u32::from(self.ext_rcode) << 24)
            | (u32::from(self.version) << 16)
            | u32::from(self.z & 0x7FFF);
        if self.dnssec_ok {
            res |= DNSSEC_OK_BIT;
        }
        res
    }

    /// Sets the packed fields from the TTL field of an OPT record.
    pub fn set_ttl(&mut self, ttl: u32) {
        self.ext_rcode = (ttl >> 24) as u8;
        self.version = (ttl >> 16) as u8;
        self.dnssec_ok = ttl & DNSSEC_OK_BIT != 0;
        self.z = (ttl & 0x7FFF) as u16;
    }
}

//--- Default

impl Default for Edns {
    fn default() -> Self {
        Edns {
            udp_payload_size: DEFAULT_UDP_PAYLOAD_SIZE,
            ext_rcode: 0,
            version: 0,
            dnssec_ok: false,
            z: 0,
            options: Vec::new(),
        }
    }
}

//--- Display

impl fmt::Display for Edns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "version: {}, flags:", self.version)?;
        if self.dnssec_ok {
            f.write_str(" do")?;
        }
        write!(f, "; udp: {}", self.udp_payload_size)?;
        for option in &self.options {
            match option.code.to_mnemonic() {
                Some(name) => write!(f, "\n; {}: ", name)?,
                None => write!(f, "\n; OPT{}: ", option.code.to_int())?,
            }
            base16::display(&option.data, f)?;
        }
        Ok(())
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ttl_packing() {
        let mut edns = Edns::new();
        edns.set_ext_rcode(0x01);
        edns.set_version(0x02);
        edns.set_dnssec_ok(true);
        edns.set_z(0x0003);
        assert_eq!(edns.ttl(), 0x0102_8003);

        let mut other = Edns::new();
        other.set_ttl(0x0102_8003);
        assert_eq!(other, edns);
    }

    #[test]
    fn z_never_touches_do() {
        let mut edns = Edns::new();
        edns.set_z(0xFFFF);
        assert!(!edns.dnssec_ok());
        assert_eq!(edns.ttl(), 0x7FFF);
    }

    #[test]
    fn opt_record_round_trip() {
        let mut edns = Edns::new();
        edns.set_udp_payload_size(1232);
        edns.set_version(1);
        edns.set_dnssec_ok(true);
        edns.push_option(
            EdnsOption::new(OptionCode::NSID, b"ns1".to_vec()).unwrap(),
        );

        let record = edns.to_opt_record();
        assert_eq!(record.rtype(), Rtype::OPT);
        assert_eq!(record.class().to_int(), 1232);
        assert_eq!(record.ttl(), 0x0001_8000);
        assert!(record.owner().is_root());

        let back = Edns::from_opt_record(&record).unwrap();
        assert_eq!(back, edns);
        assert_eq!(back.udp_payload_size(), 1232);
        assert_eq!(back.version(), 1);
        assert!(back.dnssec_ok());
        assert_eq!(back.option(OptionCode::NSID).unwrap().data(), b"ns1");
    }

    #[test]
    fn option_wire_format() {
        let option =
            EdnsOption::new(OptionCode::COOKIE, vec![1, 2, 3, 4]).unwrap();
        let mut out = Vec::new();
        option.compose(&mut out).unwrap();
        assert_eq!(out, [0x00, 0x0A, 0x00, 0x04, 1, 2, 3, 4]);
        let mut buf = Buffer::new(out);
        assert_eq!(EdnsOption::parse(&mut buf).unwrap(), option);
        assert_eq!(option.to_string(), "10:01020304");
    }

    #[test]
    fn option_too_long() {
        assert_eq!(
            EdnsOption::new(OptionCode::PADDING, vec![0; 65536]),
            Err(RDataError::OutOfRange)
        );
    }
}
