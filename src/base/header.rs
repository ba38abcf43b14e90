//! The header of a DNS message.
//!
//! Every message begins with a fixed twelve octet header section defined in
//! section 4.1.1 of [RFC 1035]. It carries the message ID, a word of flags
//! and codes, and one entry count for each of the four sections.
//!
//! The header is split into two types: [`Header`] contains the message ID
//! and the flag word, [`HeaderCounts`] contains the section counts. The
//! [`HeaderSection`] type combines both of them. When a message is encoded,
//! the counts are always taken from the actual number of entries written.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

use super::buffer::{Buffer, Source};
use super::iana::{Opcode, Rcode};
use super::wire::{append, ComposeError, Composer, ParseError};
use core::{fmt, str::FromStr};

//------------ Header --------------------------------------------------

/// The first part of the header of a DNS message.
///
/// A value holds the first four octets of the header section exactly as
/// they appear on the wire, so reading and writing it is a plain copy:
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|Z |AD|CD|   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// The three bits between RA and RCODE were all reserved in [RFC 1035].
/// The later two of them are now the AD and CD flags of [RFC 4035].
///
/// [RFC 1035]: https://tools.ietf.org/html/rfc1035
/// [RFC 4035]: https://tools.ietf.org/html/rfc4035
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    inner: [u8; 4],
}

/// # Creation and Conversion
///
impl Header {
    /// Creates a new header.
    ///
    /// All bits are zero, giving [`Opcode::QUERY`] and [`Rcode::NOERROR`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header from its ID and the raw flag word.
    pub fn from_parts(id: u16, flags: u16) -> Self {
        let mut res = Header::new();
        res.set_id(id);
        res.set_flag_word(flags);
        res
    }

    /// Returns a reference to the underlying octets slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }
}

/// # Field Access
///
impl Header {
    /// Returns the value of the ID field.
    ///
    /// A response carries the ID of the query it answers.
    pub fn id(self) -> u16 {
        u16::from_be_bytes([self.inner[0], self.inner[1]])
    }

    /// Sets the value of the ID field.
    pub fn set_id(&mut self, value: u16) {
        self.inner[..2].copy_from_slice(&value.to_be_bytes())
    }

    /// Sets the value of the ID field to a randomly chosen number.
    #[cfg(feature = "rand")]
    pub fn set_random_id(&mut self) {
        self.set_id(::rand::random())
    }

    /// Returns the complete flag word as a 16 bit integer.
    pub fn flag_word(self) -> u16 {
        u16::from_be_bytes([self.inner[2], self.inner[3]])
    }

    /// Sets the complete flag word.
    pub fn set_flag_word(&mut self, value: u16) {
        self.inner[2..].copy_from_slice(&value.to_be_bytes())
    }

    /// Returns whether the [QR](Flags::qr) bit is set.
    pub fn qr(self) -> bool {
        self.get_bit(2, 7)
    }

    /// Sets the value of the [QR](Flags::qr) bit.
    pub fn set_qr(&mut self, set: bool) {
        self.set_bit(2, 7, set)
    }

    /// Returns the value of the Opcode field.
    pub fn opcode(self) -> Opcode {
        Opcode::from_int((self.inner[2] >> 3) & 0x0F)
    }

    /// Sets the value of the opcode field.
    ///
    /// Fails if the opcode doesn’t fit into four bits.
    pub fn set_opcode(&mut self, opcode: Opcode) -> Result<(), OpcodeError> {
        if !opcode.is_valid() {
            return Err(OpcodeError(opcode));
        }
        self.inner[2] = self.inner[2] & 0x87 | (opcode.to_int() << 3);
        Ok(())
    }

    /// Returns all flags contained in the header.
    pub fn flags(self) -> Flags {
        Flags {
            qr: self.qr(),
            aa: self.aa(),
            tc: self.tc(),
            rd: self.rd(),
            ra: self.ra(),
            ad: self.ad(),
            cd: self.cd(),
        }
    }

    /// Sets all flag bits.
    pub fn set_flags(&mut self, flags: Flags) {
        self.set_qr(flags.qr);
        self.set_aa(flags.aa);
        self.set_tc(flags.tc);
        self.set_rd(flags.rd);
        self.set_ra(flags.ra);
        self.set_ad(flags.ad);
        self.set_cd(flags.cd);
    }

    /// Returns whether the [AA](Flags::aa) bit is set.
    pub fn aa(self) -> bool {
        self.get_bit(2, 2)
    }

    /// Sets the value of the [AA](Flags::aa) bit.
    pub fn set_aa(&mut self, set: bool) {
        self.set_bit(2, 2, set)
    }

    /// Returns whether the [TC](Flags::tc) bit is set.
    pub fn tc(self) -> bool {
        self.get_bit(2, 1)
    }

    /// Sets the value of the [TC](Flags::tc) bit.
    pub fn set_tc(&mut self, set: bool) {
        self.set_bit(2, 1, set)
    }

    /// Returns whether the [RD](Flags::rd) bit is set.
    pub fn rd(self) -> bool {
        self.get_bit(2, 0)
    }

    /// Sets the value of the [RD](Flags::rd) bit.
    pub fn set_rd(&mut self, set: bool) {
        self.set_bit(2, 0, set)
    }

    /// Returns whether the [RA](Flags::ra) bit is set.
    pub fn ra(self) -> bool {
        self.get_bit(3, 7)
    }

    /// Sets the value of the [RA](Flags::ra) bit.
    pub fn set_ra(&mut self, set: bool) {
        self.set_bit(3, 7, set)
    }

    /// Returns whether the reserved bit is set.
    ///
    /// This bit must be `false` in all queries and responses.
    pub fn z(self) -> bool {
        self.get_bit(3, 6)
    }

    /// Sets the value of the reserved bit.
    pub fn set_z(&mut self, set: bool) {
        self.set_bit(3, 6, set)
    }

    /// Returns whether the [AD](Flags::ad) bit is set.
    pub fn ad(self) -> bool {
        self.get_bit(3, 5)
    }

    /// Sets the value of the [AD](Flags::ad) bit.
    pub fn set_ad(&mut self, set: bool) {
        self.set_bit(3, 5, set)
    }

    /// Returns whether the [CD](Flags::cd) bit is set.
    pub fn cd(self) -> bool {
        self.get_bit(3, 4)
    }

    /// Sets the value of the [CD](Flags::cd) bit.
    pub fn set_cd(&mut self, set: bool) {
        self.set_bit(3, 4, set)
    }

    /// Returns the value of the RCODE field.
    ///
    /// This is only the lower four bits of the response code. If the
    /// message has EDNS data, [`Message::rcode`] provides the complete one.
    ///
    /// [`Message::rcode`]: crate::base::message::Message::rcode
    pub fn rcode(self) -> Rcode {
        Rcode::from_int(u16::from(self.inner[3] & 0x0F))
    }

    /// Sets the value of the RCODE field.
    ///
    /// Only the lower four bits of `rcode` are stored.
    pub fn set_rcode(&mut self, rcode: Rcode) {
        self.inner[3] = self.inner[3] & 0xF0 | rcode.header_bits();
    }

    //--- Internal helpers

    /// Returns the value of the bit at the given position.
    ///
    /// The argument `offset` gives the byte offset of the underlying bytes
    /// slice and `bit` gives the number of the bit with the most significant
    /// bit being 7.
    fn get_bit(self, offset: usize, bit: usize) -> bool {
        self.inner[offset] & (1 << bit) != 0
    }

    /// Sets or resets the given bit.
    fn set_bit(&mut self, offset: usize, bit: usize, set: bool) {
        if set {
            self.inner[offset] |= 1 << bit
        } else {
            self.inner[offset] &= !(1 << bit)
        }
    }
}

/// # Parsing and Composing
///
impl Header {
    pub fn parse<S: Source>(buf: &mut Buffer<S>) -> Result<Self, ParseError> {
        let mut res = Header::new();
        res.inner.copy_from_slice(buf.consume(4)?);
        Ok(res)
    }

    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        append(target, &self.inner)
    }
}

//------------ Flags ---------------------------------------------------

/// The flags contained in the DNS message header.
///
/// This is a utility type that makes it easier to work with flags. It
/// contains only standard DNS message flags that are part of the
/// [`Header`], i.e., EDNS flags are not included.
///
/// This type has a text notation and can be created from it as well. Each
/// flags that is set is represented by a two-letter token, which is the
/// uppercase version of the flag name. If mutliple flags are set, the
/// tokens are separated by space.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Flags {
    /// Whether a message is a response (`true`) rather than a query.
    pub qr: bool,

    /// Whether the responding server is authoritative for the data.
    pub aa: bool,

    /// Whether the message was truncated.
    pub tc: bool,

    /// Whether recursion is desired.
    pub rd: bool,

    /// Whether recursion is available.
    pub ra: bool,

    /// Whether the responding server considers all data authentic.
    pub ad: bool,

    /// Whether validation was disabled by the requester.
    pub cd: bool,
}

impl Flags {
    /// Creates new flags.
    ///
    /// All flags will be unset.
    pub fn new() -> Self {
        Self::default()
    }
}

//--- Display & FromStr

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tokens = [
            (self.qr, "QR"),
            (self.aa, "AA"),
            (self.tc, "TC"),
            (self.rd, "RD"),
            (self.ra, "RA"),
            (self.ad, "AD"),
            (self.cd, "CD"),
        ];
        let mut sep = "";
        for (set, token) in tokens {
            if set {
                write!(f, "{}{}", sep, token)?;
                sep = " ";
            }
        }
        Ok(())
    }
}

impl FromStr for Flags {
    type Err = FlagsFromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::new();
        for token in s.split_ascii_whitespace() {
            match token.to_ascii_uppercase().as_str() {
                "QR" => flags.qr = true,
                "AA" => flags.aa = true,
                "TC" => flags.tc = true,
                "RD" => flags.rd = true,
                "RA" => flags.ra = true,
                "AD" => flags.ad = true,
                "CD" => flags.cd = true,
                _ => return Err(FlagsFromStrError),
            }
        }
        Ok(flags)
    }
}

//------------ HeaderCounts -------------------------------------------------

/// The section count part of the header section of a DNS message.
///
/// This part consists of four 16 bit counters for the number of entries in
/// the four sections of a DNS message: QDCOUNT for the question section,
/// ANCOUNT for the answer section, NSCOUNT for the authority section, and
/// ARCOUNT for the additional section.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderCounts {
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl HeaderCounts {
    /// Creates a new value with all counters set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of entries in all four sections.
    pub fn total(self) -> usize {
        usize::from(self.qdcount)
            + usize::from(self.ancount)
            + usize::from(self.nscount)
            + usize::from(self.arcount)
    }

    pub fn parse<S: Source>(buf: &mut Buffer<S>) -> Result<Self, ParseError> {
        Ok(HeaderCounts {
            qdcount: buf.consume_u16()?,
            ancount: buf.consume_u16()?,
            nscount: buf.consume_u16()?,
            arcount: buf.consume_u16()?,
        })
    }

    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        for count in [self.qdcount, self.ancount, self.nscount, self.arcount] {
            append(target, &count.to_be_bytes())?;
        }
        Ok(())
    }
}

//------------ HeaderSection -------------------------------------------------

/// The complete header section of a DNS message.
///
/// Consists of a [`Header`] directly followed by a [`HeaderCounts`]. This
/// is what [`Decoder::decode_header`] returns for those that want to look
/// at a message without decoding all of it.
///
/// [`Decoder::decode_header`]: crate::codec::Decoder::decode_header
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HeaderSection {
    pub header: Header,
    pub counts: HeaderCounts,
}

impl HeaderSection {
    /// The length of the header section in wire format.
    pub const LEN: usize = 12;

    pub fn new(header: Header, counts: HeaderCounts) -> Self {
        HeaderSection { header, counts }
    }

    pub fn parse<S: Source>(buf: &mut Buffer<S>) -> Result<Self, ParseError> {
        Ok(HeaderSection {
            header: Header::parse(buf)?,
            counts: HeaderCounts::parse(buf)?,
        })
    }

    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        self.header.compose(target)?;
        self.counts.compose(target)
    }
}

//============ Error Types ===================================================

//------------ FlagsFromStrError --------------------------------------------

/// An error happened when converting string to flags.
#[derive(Debug)]
pub struct FlagsFromStrError;

impl fmt::Display for FlagsFromStrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal flags token")
    }
}

impl std::error::Error for FlagsFromStrError {}

//------------ OpcodeError ---------------------------------------------------

/// An opcode didn’t fit into the four bits available in the header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OpcodeError(pub Opcode);

impl fmt::Display for OpcodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opcode {} out of range", self.0.to_int())
    }
}

impl std::error::Error for OpcodeError {}

//============ Testing ======================================================
