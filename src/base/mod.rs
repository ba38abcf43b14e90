//! Basics.
//!
//! This module provides the types making up a DNS message and the building
//! blocks for moving them from and to wire format.
//!
//!
//! ## Parsing and Composing
//!
//! In order to easily distinguish the process of creating and disecting
//! wire-format messages from other forms of representation conversion such
//! as reading from the presentation format, we use the term *parsing* for
//! extracting data from a wire-format representation and *composing* for
//! producing such a representation.
//!
//! Parsing happens on a [`Buffer`] which holds the complete message so far
//! and can pull in more data from a [`Source`] if it runs dry. Composing
//! appends to any type implementing [`Composer`]. Both keep absolute
//! message positions around since compression pointers refer to them.
//!
//! Most users will want to use the [codec] module rather than parsing and
//! composing individual items.
//!
//!
//! # Types for DNS Data
//!
//! The module contains a number of types for DNS data, arranged in
//! submodules:
//!
//! * [header] for the header of DNS messages,
//! * [iana] for the various registries of parameter values,
//! * [name] for domain names,
//! * [opt] for EDNS data,
//! * [question] for questions,
//! * [record] for resource records, and
//! * [message] for complete messages.
//!
//! [`Buffer`]: buffer::Buffer
//! [`Source`]: buffer::Source
//! [`Composer`]: wire::Composer
//! [codec]: crate::codec

pub use self::buffer::{Buffer, ReadSource, Source};
pub use self::compress::CompressionMap;
pub use self::header::{Flags, Header, HeaderCounts, HeaderSection};
pub use self::iana::{Class, Opcode, OptionCode, Rcode, Rtype};
pub use self::message::Message;
pub use self::name::Name;
pub use self::opt::{Edns, EdnsOption};
pub use self::question::Question;
pub use self::record::ResourceRecord;
pub use self::wire::{ComposeError, Composer, FormError, ParseError};

pub mod buffer;
pub mod compress;
pub mod header;
pub mod iana;
pub mod message;
pub mod name;
pub mod opt;
pub mod question;
pub mod record;
pub mod wire;
