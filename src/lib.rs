//! A DNS message wire-format codec.
//!
//! This crate converts between DNS messages as defined in [RFC 1035] and
//! extended by [RFC 6891] and their in-memory representation. It handles
//! name compression when writing and follows compression pointers when
//! reading, refusing pointer loops. Record data is decoded into typed
//! fields for all record types with a known layout and kept as raw octets
//! for all others.
//!
//! # Modules
//!
//! * [base] contains the types making up a message, such as [`Message`],
//!   [`Name`], or [`ResourceRecord`], together with the wire-format
//!   primitives and the [`Buffer`] all parsing happens on,
//! * [rdata] contains the record data model and the table of record data
//!   layouts,
//! * [codec] contains the [`Encoder`] and [`Decoder`] for complete
//!   messages, and
//! * [utils] contains helpers such as hex encoding.
//!
//! # Reference of Feature Flags
//!
//! * `bytes`: Enables using `Bytes` as input to a [`Buffer`] and `BytesMut`
//!   as an encoding target.
//! * `logging`: Adds a [`logging::init_logging`] function setting up a
//!   `tracing` subscriber configured through `RUST_LOG`.
//! * `rand`: Enables random message IDs. This feature is enabled by
//!   default.
//! * `serde`: Enables serde serialization for the message data types.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035
//! [RFC 6891]: https://tools.ietf.org/html/rfc6891
//! [`Message`]: base::Message
//! [`Name`]: base::Name
//! [`ResourceRecord`]: base::ResourceRecord
//! [`Buffer`]: base::Buffer
//! [`Encoder`]: codec::Encoder
//! [`Decoder`]: codec::Decoder

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base;
pub mod codec;
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;
pub mod rdata;
pub mod utils;

pub use self::codec::{decode, encode};
