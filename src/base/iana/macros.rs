//! Macros for the registry types wrapping a plain integer.

/// Defines a registry type as a newtype over an integer with named constants.
///
/// This adds impls for `From`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`,
/// `Hash`, and `Debug`, as well as functions to read the value from a
/// [`Buffer`] and write it into a [`Composer`].
///
/// Text conversions come from `int_enum_str_with_prefix!` or
/// `int_enum_str_with_decimal!`.
///
/// [`Buffer`]: crate::base::buffer::Buffer
/// [`Composer`]: crate::base::wire::Composer
macro_rules! int_enum {
    ( $(#[$attr:meta])* =>
      $ianatype:ident, $inttype:ident, $consume:ident;
      $( $(#[$variant_attr:meta])* ( $variant:ident =>
                                        $value:expr, $mnemonic:expr) )* ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $ianatype($inttype);

        impl $ianatype {
            $(
                $(#[$variant_attr])*
                pub const $variant: $ianatype = $ianatype($value);
            )*
        }

        impl $ianatype {
            /// Returns a value from its raw integer value.
            #[must_use]
            pub const fn from_int(value: $inttype) -> Self {
                Self(value)
            }

            /// Returns the raw integer value for a value.
            #[must_use]
            pub const fn to_int(self) -> $inttype {
                self.0
            }

            /// Returns a value from a well-defined mnemonic.
            #[must_use]
            pub fn from_mnemonic(m: &[u8]) -> Option<Self> {
                $(
                    if m.eq_ignore_ascii_case($mnemonic.as_bytes()) {
                        return Some($ianatype::$variant)
                    }
                )*
                None
            }

            /// Returns the mnemonic as a `&str` for this value if there is
            /// one.
            #[must_use]
            pub const fn to_mnemonic(self) -> Option<&'static str> {
                match self {
                    $(
                        $ianatype::$variant => Some($mnemonic),
                    )*
                    _ => None
                }
            }

            /// Takes a value off the front of the buffer.
            pub fn parse<S: $crate::base::buffer::Source>(
                buf: &mut $crate::base::buffer::Buffer<S>,
            ) -> Result<Self, $crate::base::wire::ParseError> {
                buf.$consume().map(Self::from_int)
            }

            /// Appends the wire-format value to the target.
            pub fn compose<Target: $crate::base::wire::Composer + ?Sized>(
                self,
                target: &mut Target,
            ) -> Result<(), $crate::base::wire::ComposeError> {
                $crate::base::wire::append(target, &self.0.to_be_bytes())
            }
        }

        //--- From

        impl From<$inttype> for $ianatype {
            fn from(value: $inttype) -> Self {
                $ianatype::from_int(value)
            }
        }

        impl From<$ianatype> for $inttype {
            fn from(value: $ianatype) -> Self {
                value.to_int()
            }
        }

        //--- Debug

        impl core::fmt::Debug for $ianatype {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self.to_mnemonic() {
                    Some(mnemonic) => {
                        write!(
                            f,
                            concat!(stringify!($ianatype), "::{}"),
                            mnemonic
                        )
                    }
                    None => {
                        f.debug_tuple(stringify!($ianatype))
                            .field(&self.0)
                            .finish()
                    }
                }
            }
        }
    }
}

/// Text conversions using a generic prefix such as `TYPE` for unnamed values.
///
/// Parsing accepts a mnemonic or the prefix plus a decimal number, both in
/// any case. Display falls back to the prefixed form, e.g. `TYPE65280`.
///
/// If the `serde` feature is enabled, also adds implementations for
/// `Serialize` and `Deserialize`. Human readable formats use the text form,
/// compact formats the integer.
macro_rules! int_enum_str_with_prefix {
    ($ianatype:ident, $str_prefix:expr, $inttype:ident, $error:expr) => {
        impl core::str::FromStr for $ianatype {
            type Err = FromStrError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Some(res) = $ianatype::from_mnemonic(s.as_bytes()) {
                    return Ok(res);
                }
                let prefix_len = $str_prefix.len();
                if s.len() <= prefix_len || !s.is_char_boundary(prefix_len) {
                    return Err(FromStrError(()));
                }
                let (l, r) = s.split_at(prefix_len);
                if !l.eq_ignore_ascii_case($str_prefix) {
                    return Err(FromStrError(()));
                }
                r.parse().map($ianatype::from_int).map_err(|_| FromStrError(()))
            }
        }

        impl core::fmt::Display for $ianatype {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self.to_mnemonic() {
                    Some(m) => f.write_str(m),
                    None => write!(f, "{}{}", $str_prefix, self.to_int()),
                }
            }
        }

        int_enum_serde!($ianatype, $inttype);
        from_str_error!($error);
    };
}

/// Text conversions using plain decimal numbers for unnamed values.
///
/// `FromStr` recognizes the mnemonics ignoring case as well as any decimal
/// value. `Display` prints the mnemonic if there is one and the decimal
/// value otherwise.
macro_rules! int_enum_str_with_decimal {
    ($ianatype:ident, $inttype:ident, $error:expr) => {
        impl core::str::FromStr for $ianatype {
            type Err = FromStrError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match $ianatype::from_mnemonic(s.as_bytes()) {
                    Some(res) => Ok(res),
                    None => s
                        .parse()
                        .map($ianatype::from_int)
                        .map_err(|_| FromStrError(())),
                }
            }
        }

        impl core::fmt::Display for $ianatype {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self.to_mnemonic() {
                    Some(m) => f.write_str(m),
                    None => write!(f, "{}", self.to_int()),
                }
            }
        }

        int_enum_serde!($ianatype, $inttype);
        from_str_error!($error);
    };
}

macro_rules! int_enum_serde {
    ($ianatype:ident, $inttype:ident) => {
        #[cfg(feature = "serde")]
        impl serde::Serialize for $ianatype {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.collect_str(&format_args!("{}", self))
                } else {
                    serde::Serialize::serialize(&self.to_int(), serializer)
                }
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $ianatype {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = <std::string::String as serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                    s.parse().map_err(serde::de::Error::custom)
                } else {
                    <$inttype as serde::Deserialize>::deserialize(deserializer)
                        .map(Into::into)
                }
            }
        }
    };
}

macro_rules! from_str_error {
    ($description:expr) => {
        #[derive(Clone, Debug)]
        pub struct FromStrError(());

        impl std::error::Error for FromStrError {}

        impl core::fmt::Display for FromStrError {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str($description)
            }
        }
    };
}
