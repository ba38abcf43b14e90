//! DNS CLASSes.

//------------ Class ---------------------------------------------------------

int_enum! {
    /// DNS CLASSes.
    ///
    /// The domain name space is partitioned into separate classes for
    /// different network types. In practice, only the IN class is really
    /// relevant.
    ///
    /// In addition, there are query classes or QCLASSes that are used in
    /// questions or UPDATE queries, namely NONE and ANY (or *).
    ///
    /// Note that the class field of an OPT record doesn’t contain a class
    /// at all but the requestor’s UDP payload size. See [`Edns`].
    ///
    /// [`Edns`]: crate::base::opt::Edns
    =>
    Class, u16, consume_u16;

    /// Internet (IN).
    (IN => 1, "IN")

    /// Chaosnet (CH).
    ///
    /// Reused by BIND for built-in server information zones.
    (CH => 3, "CH")

    /// Hesiod (HS).
    (HS => 4, "HS")

    /// Query class None.
    ///
    /// Defined in RFC 2136, this class is used in UPDATE queries to
    /// require that an RRset does not exist prior to the update.
    (NONE => 0xFE, "NONE")

    /// Query class * (ANY).
    (ANY => 0xFF, "ANY")
}

int_enum_str_with_prefix!(Class, "CLASS", u16, "unknown class");

//============ Tests =========================================================
