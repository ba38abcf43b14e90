//! The field layout of record data for each supported record type.
//!
//! Each record type this crate understands is described by an
//! [`RDataMap`]: an ordered list of named fields together with their
//! [`RDataType`]. Decoding, encoding, and the presentation format of record
//! data are all driven by this table. Record types missing from it are
//! treated as opaque.
//!
//! A field of a greedy kind, i.e., one that runs to the end of the record
//! data, only ever appears as the last field of a layout.

use super::types::RDataType::{self, *};
use super::RDataError;
use crate::base::iana::Rtype;

//------------ RDataMap ------------------------------------------------------

/// The field layout of the record data of one record type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RDataMap {
    rtype: Rtype,
    fields: &'static [(&'static str, RDataType)],
}

impl RDataMap {
    /// Returns the record type described by the layout.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns the fields as pairs of name and kind.
    pub fn fields(&self) -> &'static [(&'static str, RDataType)] {
        self.fields
    }

    /// Returns an iterator over the field names.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Returns the index of the field with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| *field == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

//------------ Lookup --------------------------------------------------------

/// Returns the layout for `rtype` if there is one.
pub fn try_map(rtype: Rtype) -> Option<&'static RDataMap> {
    MAPS.binary_search_by_key(&rtype.to_int(), |map| map.rtype.to_int())
        .ok()
        .map(|idx| &MAPS[idx])
}

/// Returns the layout for `rtype` or an error if there is none.
pub fn map(rtype: Rtype) -> Result<&'static RDataMap, RDataError> {
    try_map(rtype).ok_or(RDataError::Unmapped(rtype))
}

/// Returns all known layouts ordered by record type value.
pub fn all() -> &'static [RDataMap] {
    MAPS
}

//------------ The Table -----------------------------------------------------

macro_rules! rdata_maps {
    ( $( $rtype:ident => [ $( $name:literal: $kind:ident ),* ] )* ) => {
        static MAPS: &[RDataMap] = &[
            $(
                RDataMap {
                    rtype: Rtype::$rtype,
                    fields: &[ $( ($name, $kind) ),* ],
                },
            )*
        ];
    }
}

// Must stay ordered by record type value.
rdata_maps! {
    A => ["address": Ipv4Address]
    NS => ["nsdname": DomainName]
    MD => ["madname": DomainName]
    MF => ["madname": DomainName]
    CNAME => ["cname": DomainName]
    SOA => [
        "mname": DomainName, "rname": DomainName, "serial": Uint32,
        "refresh": Uint32, "retry": Uint32, "expire": Uint32,
        "minimum": Uint32
    ]
    MB => ["madname": DomainName]
    MG => ["mgmname": DomainName]
    MR => ["newname": DomainName]
    NULL => ["anything": HexBinary]
    WKS => ["address": Ipv4Address, "protocol": Uint8, "bitmap": HexBinary]
    PTR => ["ptrdname": DomainName]
    HINFO => ["cpu": CharacterString, "os": CharacterString]
    MINFO => ["rmailbx": DomainName, "emailbx": DomainName]
    MX => ["preference": Uint16, "exchange": DomainName]
    TXT => ["txt_data": CharacterStringList]
    RP => ["mbox_dname": DomainName, "txt_dname": DomainName]
    AFSDB => ["subtype": Uint16, "hostname": DomainName]
    X25 => ["psdn_address": CharacterString]
    RT => ["preference": Uint16, "intermediate_host": DomainName]
    KEY => [
        "flags": Uint16, "protocol": Uint8, "algorithm": Uint8,
        "public_key": HexBinary
    ]
    PX => [
        "preference": Uint16, "map822": DomainName, "mapx400": DomainName
    ]
    AAAA => ["address": Ipv6Address]
    SRV => [
        "priority": Uint16, "weight": Uint16, "port": Uint16,
        "target": DomainName
    ]
    NAPTR => [
        "order": Uint16, "preference": Uint16, "flags": CharacterString,
        "services": CharacterString, "regexp": CharacterString,
        "replacement": DomainName
    ]
    KX => ["preference": Uint16, "exchanger": DomainName]
    DNAME => ["target": DomainName]
    OPT => ["options": OptionList]
    DS => [
        "key_tag": Uint16, "algorithm": Uint8, "digest_type": Uint8,
        "digest": HexBinary
    ]
    SSHFP => [
        "algorithm": Uint8, "fp_type": Uint8, "fingerprint": HexBinary
    ]
    RRSIG => [
        "type_covered": Uint16, "algorithm": Uint8, "labels": Uint8,
        "original_ttl": Uint32, "expiration": Uint32, "inception": Uint32,
        "key_tag": Uint16, "signer_name": DomainName, "signature": HexBinary
    ]
    NSEC => ["next_domain_name": DomainName, "type_bit_maps": HexBinary]
    DNSKEY => [
        "flags": Uint16, "protocol": Uint8, "algorithm": Uint8,
        "public_key": HexBinary
    ]
    DHCID => ["digest": HexBinary]
    TLSA => [
        "usage": Uint8, "selector": Uint8, "matching_type": Uint8,
        "certificate_data": HexBinary
    ]
    SMIMEA => [
        "usage": Uint8, "selector": Uint8, "matching_type": Uint8,
        "certificate_data": HexBinary
    ]
    CDS => [
        "key_tag": Uint16, "algorithm": Uint8, "digest_type": Uint8,
        "digest": HexBinary
    ]
    CDNSKEY => [
        "flags": Uint16, "protocol": Uint8, "algorithm": Uint8,
        "public_key": HexBinary
    ]
    OPENPGPKEY => ["public_key": HexBinary]
    CSYNC => ["serial": Uint32, "flags": Uint16, "type_bit_map": HexBinary]
    ZONEMD => [
        "serial": Uint32, "scheme": Uint8, "hash_algorithm": Uint8,
        "digest": HexBinary
    ]
    SPF => ["txt_data": CharacterStringList]
    L32 => ["preference": Uint16, "locator32": Ipv4Address]
    LP => ["preference": Uint16, "fqdn": DomainName]
    EUI48 => ["address": HexBinary]
    EUI64 => ["address": HexBinary]
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for pair in MAPS.windows(2) {
            assert!(
                pair[0].rtype.to_int() < pair[1].rtype.to_int(),
                "{} not before {}",
                pair[0].rtype,
                pair[1].rtype
            );
        }
    }

    #[test]
    fn greedy_fields_come_last() {
        for map in all() {
            assert!(!map.is_empty(), "{} has no fields", map.rtype());
            let (_, init) = map.fields().split_last().unwrap();
            assert!(
                init.iter().all(|(_, kind)| !kind.is_greedy()),
                "{} has a greedy field before the end",
                map.rtype()
            );
        }
    }

    #[test]
    fn lookup() {
        let mx = map(Rtype::MX).unwrap();
        assert_eq!(mx.rtype(), Rtype::MX);
        assert_eq!(
            mx.fields(),
            &[("preference", Uint16), ("exchange", DomainName)]
        );
        assert_eq!(mx.position("exchange"), Some(1));
        assert_eq!(mx.position("weight"), None);
        assert_eq!(try_map(Rtype::SOA).unwrap().len(), 7);
        assert!(try_map(Rtype::TSIG).is_none());
        assert_eq!(map(Rtype::CAA), Err(RDataError::Unmapped(Rtype::CAA)));
    }
}
