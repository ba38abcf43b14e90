//! Turning wire-format data into messages.

use crate::base::buffer::{Buffer, Source};
use crate::base::header::HeaderSection;
use crate::base::message::Message;
use crate::base::question::Question;
use crate::base::record::ResourceRecord;
use crate::base::wire::{FormError, ParseError};
use std::io::SeekFrom;
use std::vec::Vec;
use tracing::{debug, trace};

//------------ Decoder -------------------------------------------------------

/// A DNS message decoder.
///
/// The decoder works on a [`Buffer`] that holds a message starting at
/// position zero. Besides decoding complete messages, it can decode
/// the individual parts of a message for those who only need to look at,
/// say, the header.
///
/// By default, [`decode`][Self::decode] rejects data that continues after
/// the message. This can be relaxed via
/// [`allow_trailing_data`][Self::allow_trailing_data].
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    allow_trailing: bool,
}

impl Decoder {
    /// Creates a new decoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether data following a complete message is acceptable.
    pub fn allow_trailing_data(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }

    /// Decodes the header section.
    pub fn decode_header<S: Source>(
        &self,
        buf: &mut Buffer<S>,
    ) -> Result<HeaderSection, ParseError> {
        HeaderSection::parse(buf)
    }

    /// Decodes a single question.
    pub fn decode_question<S: Source>(
        &self,
        buf: &mut Buffer<S>,
    ) -> Result<Question, ParseError> {
        Question::parse(buf)
    }

    /// Decodes a single resource record.
    ///
    /// The record data must use exactly the number of octets announced in
    /// the record. Record types without a known layout get opaque data.
    pub fn decode_resource_record<S: Source>(
        &self,
        buf: &mut Buffer<S>,
    ) -> Result<ResourceRecord, ParseError> {
        let start = buf.tell();
        let record = ResourceRecord::parse(buf).map_err(|err| {
            debug!("failed to decode record at offset {}: {}", start, err);
            err
        })?;
        trace!(
            "decoded {} record for {} at offset {}",
            record.rtype(),
            record.owner(),
            start
        );
        Ok(record)
    }

    /// Decodes a complete message from the buffer.
    ///
    /// Compression pointers are offsets from the start of the buffer, so
    /// the message should start there. Each section is read according to
    /// its count in the header. An OPT record in the additional section is
    /// turned into the message’s EDNS data; more than one is an error.
    pub fn decode_message<S: Source>(
        &self,
        buf: &mut Buffer<S>,
    ) -> Result<Message, ParseError> {
        let section = self.decode_header(buf)?;
        let counts = section.counts;
        trace!(
            "decoding message {}: {} questions, {} answers, {} authority, \
             {} additional",
            section.header.id(),
            counts.qdcount,
            counts.ancount,
            counts.nscount,
            counts.arcount
        );
        let mut questions = Vec::new();
        for _ in 0..counts.qdcount {
            questions.push(self.decode_question(buf)?);
        }
        let answers = self.decode_records(buf, counts.ancount)?;
        let authority = self.decode_records(buf, counts.nscount)?;
        let additional = self.decode_records(buf, counts.arcount)?;
        let mut msg = Message::from_parts(
            section.header,
            questions,
            answers,
            authority,
            additional,
        );
        msg.extract_opt()?;
        if let Some(edns) = msg.edns() {
            debug!(
                "message {} has EDNS version {}, payload size {}",
                section.header.id(),
                edns.version(),
                edns.udp_payload_size()
            );
        }
        Ok(msg)
    }

    fn decode_records<S: Source>(
        &self,
        buf: &mut Buffer<S>,
        count: u16,
    ) -> Result<Vec<ResourceRecord>, ParseError> {
        let mut res = Vec::new();
        for _ in 0..count {
            res.push(self.decode_resource_record(buf)?);
        }
        Ok(res)
    }

    /// Decodes a message from a slice holding exactly that message.
    pub fn decode(&self, data: &[u8]) -> Result<Message, ParseError> {
        let mut buf = Buffer::new(data);
        let msg = self.decode_message(&mut buf)?;
        if !self.allow_trailing && !buf.at_end() {
            debug!("{} octets of trailing data after message", buf.remaining());
            return Err(FormError::new("trailing data after message").into());
        }
        Ok(msg)
    }

    /// Decodes a message from a buffer if there is any data.
    ///
    /// Returns `Ok(None)` if the buffer is exhausted and its source has no
    /// more data. Once any data is there, the complete message has to
    /// follow. Data consumed by earlier calls is dropped first, so the
    /// message’s compression pointers are relative to its own first octet.
    ///
    /// If the message is incomplete, the error is [`ParseError::ShortInput`]
    /// and the buffer is left at the start of the message. Decoding can be
    /// retried once more data has been appended.
    pub fn decode_from<S: Source>(
        &self,
        buf: &mut Buffer<S>,
    ) -> Result<Option<Message>, ParseError> {
        if !buf.ready_check() {
            return Ok(None);
        }
        buf.discard_consumed();
        match self.decode_message(buf) {
            Ok(msg) => Ok(Some(msg)),
            Err(err) => Err(rewind_if_short(buf, 0, err)),
        }
    }

    /// Decodes the next message of a stream of length-prefixed messages.
    ///
    /// This is the framing used on TCP: each message is preceded by its
    /// length as a 16 bit integer. Each message is decoded on its own, so
    /// compression pointers are relative to its first octet. Consumed data
    /// is dropped from the buffer. Whether data may follow the message
    /// within its frame depends on the decoder’s settings.
    ///
    /// Returns `Ok(None)` when the stream has ended cleanly. An incomplete
    /// frame leaves the buffer at the length prefix and returns
    /// [`ParseError::ShortInput`].
    pub fn decode_stream<S: Source>(
        &self,
        buf: &mut Buffer<S>,
    ) -> Result<Option<Message>, ParseError> {
        if !buf.ready_check() {
            return Ok(None);
        }
        let start = buf.tell();
        let data = match next_frame(buf) {
            Ok(data) => data,
            Err(err) => return Err(rewind_if_short(buf, start, err)),
        };
        buf.discard_consumed();
        trace!("decoding stream message of {} octets", data.len());
        self.decode(&data).map(Some)
    }
}

/// Consumes a length-prefixed frame, returning its content.
fn next_frame<S: Source>(buf: &mut Buffer<S>) -> Result<Vec<u8>, ParseError> {
    let len = usize::from(buf.consume_u16()?);
    Ok(buf.consume(len)?.to_vec())
}

/// Moves back to `start` if `err` says the input was incomplete.
fn rewind_if_short<S: Source>(
    buf: &mut Buffer<S>,
    start: usize,
    err: ParseError,
) -> ParseError {
    if err == ParseError::ShortInput {
        trace!("incomplete message, rewinding to offset {}", start);
        if let Err(err) = buf.seek(SeekFrom::Start(start as u64)) {
            return err;
        }
    }
    err
}

//============ Testing =======================================================
