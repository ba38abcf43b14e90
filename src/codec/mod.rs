//! Encoding and decoding complete DNS messages.
//!
//! The [`Decoder`] turns wire-format data into a [`Message`], the
//! [`Encoder`] does the reverse. Both also offer their steps individually
//! for those that need to look at or produce only parts of a message.
//!
//! For the common case, the functions [`encode`] and [`decode`] use an
//! encoder or decoder with default settings. [`decode_from`] and
//! [`decode_stream`] read from a [`Buffer`] that may be fed from a
//! [`Source`] and return `None` once no more data is available.
//!
//! ```
//! use dnswire::base::{Message, Question, Rtype};
//! use dnswire::codec;
//!
//! let mut query = Message::new();
//! query.header_mut().set_id(42);
//! query.header_mut().set_rd(true);
//! query.questions_mut().push(
//!     Question::new_in("example.com".parse().unwrap(), Rtype::A)
//! );
//! let data = codec::encode(&query).unwrap();
//! assert_eq!(codec::decode(&data).unwrap(), query);
//! ```
//!
//! [`Message`]: crate::base::Message
//! [`Buffer`]: crate::base::Buffer
//! [`Source`]: crate::base::Source

pub use self::decoder::Decoder;
pub use self::encoder::Encoder;

mod decoder;
mod encoder;

use crate::base::buffer::{Buffer, Source};
use crate::base::message::Message;
use crate::base::wire::{ComposeError, ParseError};
use std::vec::Vec;

/// Encodes a message using name compression.
pub fn encode(msg: &Message) -> Result<Vec<u8>, ComposeError> {
    Encoder::new().encode(msg)
}

/// Decodes a message from data containing exactly one message.
pub fn decode(data: &[u8]) -> Result<Message, ParseError> {
    Decoder::new().decode(data)
}

/// Decodes the message in a buffer, if there is one.
///
/// Returns `Ok(None)` if the buffer has no data and can’t get any more.
pub fn decode_from<S: Source>(
    buf: &mut Buffer<S>,
) -> Result<Option<Message>, ParseError> {
    Decoder::new().decode_from(buf)
}

/// Decodes the next length-prefixed message from a stream buffer.
pub fn decode_stream<S: Source>(
    buf: &mut Buffer<S>,
) -> Result<Option<Message>, ParseError> {
    Decoder::new().decode_stream(buf)
}
