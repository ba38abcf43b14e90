//! EDNS option codes.

//------------ OptionCode ----------------------------------------------------

int_enum! {
    /// DNS EDNS0 option codes.
    ///
    /// The record data of OPT records is a sequence of options. The type of
    /// each of these options is given through a 16 bit value called the
    /// *option code.* The registry lives at
    /// <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-11>.
    =>
    OptionCode, u16, consume_u16;

    (LLQ => 1, "LLQ")
    (UL => 2, "UL")
    (NSID => 3, "NSID")
    (DAU => 5, "DAU")
    (DHU => 6, "DHU")
    (N3U => 7, "N3U")
    (CLIENT_SUBNET => 8, "edns-client-subnet")
    (EXPIRE => 9, "EDNS EXPIRE")
    (COOKIE => 10, "COOKIE")
    (TCP_KEEPALIVE => 11, "edns-tcp-keepalive")
    (PADDING => 12, "Padding")
    (CHAIN => 13, "CHAIN")
    (KEY_TAG => 14, "edns-key-tag")
    (EXTENDED_ERROR => 15, "Extended DNS Error")
    (CLIENT_TAG => 16, "EDNS-Client-Tag")
    (SERVER_TAG => 17, "EDNS-Server-Tag")
}

int_enum_str_with_decimal!(OptionCode, u16, "unknown option code");
