//! Resource Record (RR) TYPEs

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource Record Types.
    ///
    /// The 16 bit type tells what a record’s data means and a question which
    /// records it asks for. Query-only types such as `ANY` share the same
    /// value space and are included here.
    ///
    /// Assigned values are listed in the [IANA registry].
    ///
    /// [IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    =>
    Rtype, u16, consume_u16;

    /// A host address.
    (A => 1, "A")

    /// An authoritative name server.
    (NS => 2, "NS")

    /// A mail destination.
    ///
    /// (Obsolete – use MX)
    (MD => 3, "MD")

    /// A mail forwarder.
    ///
    /// (Obsolete – use MX)
    (MF => 4, "MF")

    /// The canonical name for an alias
    (CNAME => 5, "CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, "SOA")

    /// A mailbox domain name.
    (MB =>  7, "MB")

    /// A mail group member
    (MG => 8, "MG")

    /// A mail rename domain name.
    (MR => 9, "MR")

    /// A null resource record.
    (NULL =>  10, "NULL")

    /// A well known service description.
    (WKS => 11, "WKS")

    /// A domain name pointer.
    (PTR => 12, "PTR")

    /// Host information.
    (HINFO => 13, "HINFO")

    /// Mailbox or mail list information.
    (MINFO => 14, "MINFO")

    /// Mail exchange.
    (MX => 15, "MX")

    /// Text strings.
    (TXT => 16, "TXT")

    /// For Responsible Person.
    ///
    /// See RFC 1183
    (RP => 17, "RP")

    /// For AFS Data Base location.
    ///
    /// See RFC 1183 and RFC 5864.
    (AFSDB => 18, "AFSDB")

    /// For X.25 PSDN address.
    ///
    /// See RFC 1183.
    (X25 => 19, "X25")

    /// For ISDN address.
    ///
    /// See RFC 1183.
    (ISDN => 20, "ISDN")

    /// For Route Through.
    ///
    /// See RFC 1183
    (RT => 21, "RT")

    /// For security signature.
    (SIG => 24, "SIG")

    /// For security key.
    (KEY => 25, "KEY")

    /// X.400 mail mapping information.
    ///
    /// See RFC 2163.
    (PX => 26, "PX")

    /// IPv6 address.
    ///
    /// See RFC 3596.
    (AAAA =>  28, "AAAA")

    /// Location Information.
    (LOC => 29, "LOC")

    /// Server selection.
    ///
    /// See RFC 2782.
    (SRV => 33, "SRV")

    /// Naming authority pointer.
    ///
    /// See RFC 2915, RFC 2168, and RFC 3403.
    (NAPTR => 35, "NAPTR")

    /// Key exchanger.
    ///
    /// See RFC 2230.
    (KX => 36, "KX")

    /// CERT
    ///
    /// See RFC 4398.
    (CERT => 37, "CERT")

    /// DNAME.
    ///
    /// See RFC 6672.
    (DNAME => 39, "DNAME")

    /// OPT.
    ///
    /// See RFC 6891 and RFC 3225.
    (OPT => 41, "OPT")

    /// Delegation signer.
    ///
    /// See RFC 4034 and RFC 3658.
    (DS => 43, "DS")

    /// SSH key fingerprint.
    ///
    /// See RFC 4255.
    (SSHFP => 44, "SSHFP")

    /// RRSIG.
    ///
    /// See RFC 4034 and RFC 3755.
    (RRSIG => 46, "RRSIG")

    /// NSEC.
    ///
    /// See RFC 4034 and RFC 3755.
    (NSEC => 47, "NSEC")

    /// DNSKEY.
    ///
    /// See RFC 4034 and RFC 3755.
    (DNSKEY => 48, "DNSKEY")

    /// DHCID.
    ///
    /// See RFC 4701.
    (DHCID => 49, "DHCID")

    /// NSEC3
    ///
    /// See RFC 5155.
    (NSEC3 => 50, "NSEC3")

    /// NSEC3PARAM.
    ///
    /// See RFC 5155.
    (NSEC3PARAM => 51, "NSEC3PARAM")

    /// TLSA.
    ///
    /// See RFC 6698.
    (TLSA => 52, "TLSA")

    /// S/MIME cert association.
    ///
    /// See RFC 8162.
    (SMIMEA => 53, "SMIMEA")

    /// Child DS.
    ///
    /// See RFC 7344.
    (CDS => 59, "CDS")

    /// DNSKEY(s) the child wants reflected in DS.
    ///
    /// See RFC 7344.
    (CDNSKEY => 60, "CDNSKEY")

    /// OpenPGP key.
    ///
    /// See RFC 7929.
    (OPENPGPKEY => 61, "OPENPGPKEY")

    /// Child-to-parent synchronization.
    ///
    /// See RFC 7477.
    (CSYNC => 62, "CSYNC")

    /// Message digest for DNS zone.
    ///
    /// See RFC 8976.
    (ZONEMD => 63, "ZONEMD")

    /// Sender Policy Framework.
    ///
    /// See RFC 4408.
    (SPF => 99, "SPF")

    /// Locator32.
    ///
    /// See RFC 6742.
    (L32 => 105, "L32")

    /// LP.
    ///
    /// See RFC 6742.
    (LP => 107, "LP")

    /// An EUI-48 address.
    ///
    /// See RFC 7043.
    (EUI48 => 108, "EUI48")

    /// An EUI-64 address.
    ///
    /// See RFC 7043.
    (EUI64 => 109, "EUI64")

    /// Transaction key.
    ///
    /// See RFC 2930.
    (TKEY => 249, "TKEY")

    /// Transaction signature.
    ///
    /// See RFC 2845.
    (TSIG => 250, "TSIG")

    /// Incremental transfer.
    ///
    /// See RFC 1995.
    (IXFR => 251, "IXFR")

    /// Transfer of entire zone.
    ///
    /// See RFC 1035 and RFC 5936.
    (AXFR => 252, "AXFR")

    /// Mailbox-related RRs (MB, MG, or MR).
    (MAILB => 253, "MAILB")

    /// Mail agent RRS.
    ///
    /// (Obsolete – see MX.)
    (MAILA => 254, "MAILA")

    /// A request for all records the server/cache has available.
    ///
    /// See RFC 1035 and RFC 6895.
    (ANY => 255, "ANY")

    /// URI
    ///
    /// See RFC 7553.
    (URI => 256, "URI")

    /// Certification Authority Restriction.
    ///
    /// See RFC 6844.
    (CAA => 257, "CAA")
}

int_enum_str_with_prefix!(Rtype, "TYPE", u16, "unknown record type");

impl Rtype {
    /// Returns whether names in the record data may be compressed.
    ///
    /// [RFC 3597] restricts name compression inside record data to the
    /// types defined in [RFC 1035]. Names in the record data of all other
    /// types are always written in full, though a decoder must still be
    /// able to follow compression pointers in them.
    ///
    /// [RFC 1035]: https://tools.ietf.org/html/rfc1035
    /// [RFC 3597]: https://tools.ietf.org/html/rfc3597
    #[must_use]
    pub fn compresses_rdata_names(self) -> bool {
        matches!(
            self,
            Rtype::NS
                | Rtype::MD
                | Rtype::MF
                | Rtype::CNAME
                | Rtype::SOA
                | Rtype::MB
                | Rtype::MG
                | Rtype::MR
                | Rtype::PTR
                | Rtype::MINFO
                | Rtype::MX
        )
    }

    /// Returns whether the type is a pseudo type only valid in queries.
    #[must_use]
    pub fn is_qtype(self) -> bool {
        matches!(
            self,
            Rtype::IXFR | Rtype::AXFR | Rtype::MAILB | Rtype::MAILA
                | Rtype::ANY
        )
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::Rtype;
    use core::str::FromStr;

    #[test]
    fn mnemonics() {
        assert_eq!(Rtype::from_str("aaaa").unwrap(), Rtype::AAAA);
        assert_eq!(Rtype::from_str("TYPE28").unwrap(), Rtype::AAAA);
        assert_eq!(Rtype::from_str("TYPE65280").unwrap(), Rtype(65280));
        assert!(Rtype::from_str("TYPE").is_err());
        assert!(Rtype::from_str("BOGUS").is_err());
        assert_eq!(Rtype::MX.to_string(), "MX");
        assert_eq!(Rtype(65280).to_string(), "TYPE65280");
    }

    #[test]
    fn compression() {
        assert!(Rtype::MX.compresses_rdata_names());
        assert!(!Rtype::SRV.compresses_rdata_names());
        assert!(!Rtype::RRSIG.compresses_rdata_names());
    }
}
