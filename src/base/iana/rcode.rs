//! DNS response codes.
//!
//! The response code of a response indicates what happened on the server
//! when trying to answer the query. The header carries only the lower four
//! bits of it. With EDNS, another eight bits are carried in the OPT record,
//! giving twelve bits in total.

//------------ Rcode ---------------------------------------------------------

int_enum! {
    /// DNS response codes.
    ///
    /// The type covers the full twelve bit range of extended response codes.
    /// Use [`Rcode::header_bits`] and [`Rcode::ext_bits`] to split a value
    /// into the part that goes into the message header and the part that
    /// goes into the OPT record, and [`Rcode::from_parts`] to combine them
    /// again.
    =>
    Rcode, u16, consume_u16;

    /// No error condition.
    (NOERROR => 0, "NOERROR")

    /// Format error.
    ///
    /// The name server was unable to interpret the query.
    (FORMERR => 1, "FORMERR")

    /// Server failure.
    (SERVFAIL => 2, "SERVFAIL")

    /// Name error.
    ///
    /// The domain name given in the query does not exist.
    (NXDOMAIN => 3, "NXDOMAIN")

    /// Not implemented.
    (NOTIMP => 4, "NOTIMP")

    /// Query refused.
    (REFUSED => 5, "REFUSED")

    /// Name exists when it should not (RFC 2136).
    (YXDOMAIN => 6, "YXDOMAIN")

    /// RR set exists when it should not (RFC 2136).
    (YXRRSET => 7, "YXRRSET")

    /// RR set that should exist does not (RFC 2136).
    (NXRRSET => 8, "NXRRSET")

    /// Server not authoritative for zone or client not authorized.
    (NOTAUTH => 9, "NOTAUTH")

    /// Name not contained in zone (RFC 2136).
    (NOTZONE => 10, "NOTZONE")

    /// Bad OPT version (RFC 6891).
    (BADVERS => 16, "BADVERS")

    /// Bad or missing server cookie (RFC 7873).
    (BADCOOKIE => 23, "BADCOOKIE")
}

int_enum_str_with_decimal!(Rcode, u16, "unknown rcode");

impl Rcode {
    /// Creates a response code from the header nibble and the OPT bits.
    #[must_use]
    pub const fn from_parts(header: u8, ext: u8) -> Self {
        Rcode(((ext as u16) << 4) | (header & 0x0F) as u16)
    }

    /// Returns the four bits carried in the message header.
    #[must_use]
    pub const fn header_bits(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    /// Returns the eight bits carried in the OPT record.
    #[must_use]
    pub const fn ext_bits(self) -> u8 {
        ((self.0 >> 4) & 0xFF) as u8
    }

    /// Returns whether the value needs an OPT record to be transmitted.
    #[must_use]
    pub const fn is_extended(self) -> bool {
        self.0 > 0x0F
    }
}

//============ Tests =========================================================
