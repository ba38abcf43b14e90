//! DNS OpCodes

//------------ Opcode --------------------------------------------------------

int_enum! {
    /// DNS OpCodes.
    ///
    /// The opcode specifies the kind of query to be performed. It occupies
    /// four bits of the flag word in the message header, so only values up
    /// to 15 can ever appear on the wire.
    ///
    /// The opcode and its initial set of values are defined in [RFC 1035].
    /// Additional values have been defined over time.
    ///
    /// [RFC 1035]: https://tools.ietf.org/html/rfc1035
    =>
    Opcode, u8, consume_u8;

    /// A standard query.
    (QUERY => 0, "QUERY")

    /// An inverse query (obsolete).
    (IQUERY => 1, "IQUERY")

    /// A server status request.
    (STATUS => 2, "STATUS")

    /// A NOTIFY query (RFC 1996).
    (NOTIFY => 4, "NOTIFY")

    /// An UPDATE query (RFC 2136).
    (UPDATE => 5, "UPDATE")

    /// DNS Stateful Operations (RFC 8490).
    (DSO => 6, "DSO")
}

int_enum_str_with_decimal!(Opcode, u8, "unknown opcode");

impl Opcode {
    /// Returns whether the value fits into the four bits of the header.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 <= 0x0F
    }
}
