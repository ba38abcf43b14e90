//! Turning messages into wire format.

use crate::base::compress::CompressionMap;
use crate::base::header::{Header, HeaderCounts, HeaderSection};
use crate::base::message::Message;
use crate::base::question::Question;
use crate::base::record::ResourceRecord;
use crate::base::wire::{pack_u16, ComposeError, Composer};
use std::vec::Vec;
use tracing::trace;

//------------ Encoder -------------------------------------------------------

/// A DNS message encoder.
///
/// The encoder keeps the compression map for the message it is currently
/// writing. The map is reset at the start of each message, so an encoder
/// can be reused for any number of messages, one at a time.
///
/// Name compression can be switched off via
/// [`without_compression`][Self::without_compression]. The output is then
/// the same apart from all names appearing in full.
#[derive(Clone, Debug)]
pub struct Encoder {
    compress: bool,
    map: CompressionMap,
}

impl Encoder {
    /// Creates a new encoder using name compression.
    pub fn new() -> Self {
        Encoder {
            compress: true,
            map: CompressionMap::new(),
        }
    }

    /// Creates a new encoder that never compresses names.
    pub fn without_compression() -> Self {
        Encoder {
            compress: false,
            map: CompressionMap::new(),
        }
    }

    /// Returns whether the encoder compresses names.
    pub fn is_compressing(&self) -> bool {
        self.compress
    }

    /// Starts a new message, forgetting all names written so far.
    pub fn reset(&mut self) {
        self.map.clear()
    }

    /// Appends the header section.
    pub fn encode_header<Target: Composer + ?Sized>(
        &mut self,
        target: &mut Target,
        header: Header,
        counts: HeaderCounts,
    ) -> Result<(), ComposeError> {
        HeaderSection::new(header, counts).compose(target)
    }

    /// Appends a question.
    pub fn encode_question<Target: Composer + ?Sized>(
        &mut self,
        target: &mut Target,
        question: &Question,
    ) -> Result<(), ComposeError> {
        if self.compress {
            question.compose_compressed(target, &mut self.map)
        } else {
            question.compose(target)
        }
    }

    /// Appends a resource record.
    ///
    /// The record data is preceded by its actual length.
    pub fn encode_resource_record<Target: Composer + ?Sized>(
        &mut self,
        target: &mut Target,
        record: &ResourceRecord,
    ) -> Result<(), ComposeError> {
        if self.compress {
            record.compose_compressed(target, &mut self.map)
        } else {
            record.compose(target)
        }
    }

    /// Writes a complete message into `target`.
    ///
    /// Since compression pointers refer to positions within the message,
    /// the message has to start at the beginning of the target. Anything
    /// already in the target is therefore removed first.
    ///
    /// If the message has EDNS data, an OPT record is created from it and
    /// appended to the additional section. It is an error for the message
    /// to have EDNS data and an OPT record in its additional section.
    pub fn encode_message<Target: Composer + ?Sized>(
        &mut self,
        target: &mut Target,
        msg: &Message,
    ) -> Result<(), ComposeError> {
        if msg.edns().is_some() && msg.has_opt_record() {
            return Err(ComposeError::DuplicateOpt);
        }
        let counts = checked_counts(msg)?;
        self.reset();
        target.truncate(0);
        let res = self.encode_sections(target, msg, counts);
        if res.is_err() {
            target.truncate(0);
        }
        res
    }

    fn encode_sections<Target: Composer + ?Sized>(
        &mut self,
        target: &mut Target,
        msg: &Message,
        counts: HeaderCounts,
    ) -> Result<(), ComposeError> {
        self.encode_header(target, msg.header(), counts)?;
        for question in msg.questions() {
            self.encode_question(target, question)?;
        }
        for record in msg.records() {
            self.encode_resource_record(target, record)?;
        }
        if let Some(edns) = msg.edns() {
            self.encode_resource_record(target, &edns.to_opt_record())?;
        }
        trace!(
            "encoded message {} into {} octets",
            msg.header().id(),
            target.as_ref().len()
        );
        Ok(())
    }

    /// Encodes a message into a new vec.
    pub fn encode(&mut self, msg: &Message) -> Result<Vec<u8>, ComposeError> {
        let mut res = Vec::new();
        self.encode_message(&mut res, msg)?;
        Ok(res)
    }

    /// Encodes a message prefixed with its length as used on TCP.
    pub fn encode_stream(
        &mut self,
        msg: &Message,
    ) -> Result<Vec<u8>, ComposeError> {
        let data = self.encode(msg)?;
        let len = u16::try_from(data.len()).map_err(|_| ComposeError::LongData)?;
        let mut res = Vec::with_capacity(data.len() + 2);
        pack_u16(&mut res, len)?;
        res.extend_from_slice(&data);
        Ok(res)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the section counts, failing if a section is too large.
fn checked_counts(msg: &Message) -> Result<HeaderCounts, ComposeError> {
    fn count(len: usize) -> Result<u16, ComposeError> {
        u16::try_from(len).map_err(|_| ComposeError::LongData)
    }
    Ok(HeaderCounts {
        qdcount: count(msg.questions().len())?,
        ancount: count(msg.answers().len())?,
        nscount: count(msg.authority().len())?,
        arcount: count(
            msg.additional().len() + usize::from(msg.edns().is_some()),
        )?,
    })
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::{Class, Rtype};
    use crate::base::opt::Edns;
    use crate::rdata::RData;

    fn message() -> Message {
        let mut msg = Message::new();
        msg.header_mut().set_id(0x1234);
        msg.header_mut().set_qr(true);
        msg.questions_mut().push(Question::new_in(
            "example.com".parse().unwrap(),
            Rtype::MX,
        ));
        msg.answers_mut().push(ResourceRecord::new(
            "example.com".parse().unwrap(),
            Class::IN,
            3600,
            RData::scan(Rtype::MX, "10 mail.example.com.").unwrap(),
        ));
        msg
    }

    #[test]
    fn compression_points_to_first_occurrence() {
        let data = Encoder::new().encode(&message()).unwrap();
        // Answer owner points to the question name at offset 12.
        assert_eq!(&data[29..31], &[0xC0, 0x0C]);
        // The exchange’s suffix, too.
        assert_eq!(&data[data.len() - 2..], &[0xC0, 0x0C]);
    }

    #[test]
    fn without_compression() {
        let compressed = Encoder::new().encode(&message()).unwrap();
        let plain = Encoder::without_compression().encode(&message()).unwrap();
        assert!(plain.len() > compressed.len());
        assert!(!plain[12..].windows(2).any(|w| w == [0xC0, 0x0C]));
        assert_eq!(
            crate::codec::decode(&plain).unwrap(),
            crate::codec::decode(&compressed).unwrap()
        );
    }

    #[test]
    fn encoder_is_reusable() {
        let mut encoder = Encoder::new();
        let first = encoder.encode(&message()).unwrap();
        let second = encoder.encode(&message()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_opt() {
        let mut msg = message();
        msg.set_edns(Edns::new());
        msg.additional_mut().push(Edns::new().to_opt_record());
        assert_eq!(
            Encoder::new().encode(&msg),
            Err(ComposeError::DuplicateOpt)
        );
    }

    #[test]
    fn opt_is_appended() {
        let mut msg = message();
        let mut edns = Edns::new();
        edns.set_udp_payload_size(1232);
        edns.set_dnssec_ok(true);
        msg.set_edns(edns);
        let data = Encoder::new().encode(&msg).unwrap();
        assert_eq!(&data[10..12], &[0x00, 0x01]);
        // Root owner, type OPT, class 1232, TTL with DO, no data.
        assert_eq!(
            &data[data.len() - 11..],
            &[0x00, 0x00, 0x29, 0x04, 0xD0, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn stream_prefix() {
        let data = Encoder::new().encode_stream(&message()).unwrap();
        let len = usize::from(u16::from_be_bytes([data[0], data[1]]));
        assert_eq!(len, data.len() - 2);
    }
}
