//! Complete DNS messages.
//!
//! A [`Message`] owns the header and the content of all four sections of a
//! DNS message. EDNS data is taken out of the additional section and kept
//! separately, so that the additional section only ever contains real
//! records.

use super::header::{Header, HeaderCounts};
use super::iana::{Rcode, Rtype};
use super::name::Name;
use super::opt::Edns;
use super::question::Question;
use super::record::ResourceRecord;
use super::wire::ParseError;
use core::fmt;
use std::vec::Vec;

//------------ Message -------------------------------------------------------

/// A DNS message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    header: Header,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
    authority: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
    edns: Option<Edns>,
}

/// # Creation
///
impl Message {
    /// Creates an empty message with an all-zero header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a message from its parts.
    pub fn from_parts(
        header: Header,
        questions: Vec<Question>,
        answers: Vec<ResourceRecord>,
        authority: Vec<ResourceRecord>,
        additional: Vec<ResourceRecord>,
    ) -> Self {
        Message {
            header,
            questions,
            answers,
            authority,
            additional,
            edns: None,
        }
    }

    /// Creates a recursive query for `qname` and `qtype` in class IN.
    ///
    /// The message ID is chosen randomly.
    #[cfg(feature = "rand")]
    pub fn query(qname: Name, qtype: Rtype) -> Self {
        let mut res = Self::new();
        res.header.set_random_id();
        res.header.set_rd(true);
        res.questions.push(Question::new_in(qname, qtype));
        res
    }

    /// Creates a response to this message.
    ///
    /// The response has the same ID, opcode, and questions, the QR flag
    /// set, and RD copied over.
    pub fn start_answer(&self) -> Self {
        let mut header = Header::new();
        header.set_id(self.header.id());
        header.set_flag_word(self.header.flag_word() & 0x7900);
        header.set_qr(true);
        Message {
            header,
            questions: self.questions.clone(),
            ..Default::default()
        }
    }
}

/// # Field Access
///
impl Message {
    pub fn header(&self) -> Header {
        self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn questions_mut(&mut self) -> &mut Vec<Question> {
        &mut self.questions
    }

    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut Vec<ResourceRecord> {
        &mut self.answers
    }

    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut Vec<ResourceRecord> {
        &mut self.authority
    }

    /// Returns the additional section without any OPT record.
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    pub fn additional_mut(&mut self) -> &mut Vec<ResourceRecord> {
        &mut self.additional
    }

    pub fn edns(&self) -> Option<&Edns> {
        self.edns.as_ref()
    }

    pub fn edns_mut(&mut self) -> Option<&mut Edns> {
        self.edns.as_mut()
    }

    /// Sets the EDNS data.
    ///
    /// Any OPT record in the additional section is dropped since the EDNS
    /// data takes its place.
    pub fn set_edns(&mut self, edns: Edns) {
        self.additional.retain(|record| record.rtype() != Rtype::OPT);
        self.edns = Some(edns)
    }

    pub fn remove_edns(&mut self) -> Option<Edns> {
        self.edns.take()
    }

    /// Returns the first question if there is one.
    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }
}

/// # Derived Information
///
impl Message {
    /// Returns the section counts as they will appear in wire format.
    ///
    /// The additional count includes the OPT record if there is EDNS data.
    /// Counts beyond what fits the 16 bit fields are capped.
    pub fn counts(&self) -> HeaderCounts {
        fn count(len: usize) -> u16 {
            u16::try_from(len).unwrap_or(u16::MAX)
        }
        HeaderCounts {
            qdcount: count(self.questions.len()),
            ancount: count(self.answers.len()),
            nscount: count(self.authority.len()),
            arcount: count(
                self.additional.len() + usize::from(self.edns.is_some()),
            ),
        }
    }

    /// Returns the complete response code.
    ///
    /// The lower four bits come from the header, the upper eight bits from
    /// the EDNS data if there is any.
    pub fn rcode(&self) -> Rcode {
        Rcode::from_parts(
            self.header.rcode().header_bits(),
            self.edns.as_ref().map(Edns::ext_rcode).unwrap_or(0),
        )
    }

    /// Sets the complete response code.
    ///
    /// If the code doesn’t fit into the header alone, EDNS data is added
    /// when missing.
    pub fn set_rcode(&mut self, rcode: Rcode) {
        self.header.set_rcode(rcode);
        if rcode.is_extended() {
            self.edns
                .get_or_insert_with(Edns::default)
                .set_rcode_bits(rcode);
        } else if let Some(edns) = self.edns.as_mut() {
            edns.set_rcode_bits(rcode);
        }
    }

    /// Returns whether the message is a response to `query`.
    pub fn is_answer(&self, query: &Message) -> bool {
        self.header.qr()
            && self.header.id() == query.header.id()
            && self.questions == query.questions
    }

    /// Returns the records of all three record sections in order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authority.iter())
            .chain(self.additional.iter())
    }

    /// Moves an OPT record from the additional section into the EDNS data.
    ///
    /// Fails if there is more than one OPT record or if the record is
    /// malformed. Existing EDNS data is replaced only if an OPT record is
    /// found.
    pub fn extract_opt(&mut self) -> Result<(), ParseError> {
        let mut positions = self
            .additional
            .iter()
            .enumerate()
            .filter(|(_, record)| record.rtype() == Rtype::OPT)
            .map(|(idx, _)| idx);
        let idx = match (positions.next(), positions.next()) {
            (None, _) => return Ok(()),
            (Some(idx), None) => idx,
            (Some(_), Some(_)) => return Err(ParseError::MultipleOpt),
        };
        self.edns = Some(Edns::from_opt_record(&self.additional[idx])?);
        self.additional.remove(idx);
        Ok(())
    }

    /// Returns whether the additional section contains an OPT record.
    pub fn has_opt_record(&self) -> bool {
        self.additional
            .iter()
            .any(|record| record.rtype() == Rtype::OPT)
    }
}

//--- Display

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let counts = self.counts();
        writeln!(
            f,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            self.header.opcode(),
            self.rcode(),
            self.header.id()
        )?;
        writeln!(
            f,
            ";; flags: {}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, \
             ADDITIONAL: {}",
            self.header.flags().to_string().to_ascii_lowercase(),
            counts.qdcount,
            counts.ancount,
            counts.nscount,
            counts.arcount
        )?;

        if let Some(edns) = self.edns.as_ref() {
            writeln!(f, "\n;; OPT PSEUDOSECTION:\n; EDNS: {}", edns)?;
        }

        if !self.questions.is_empty() {
            writeln!(f, "\n;; QUESTION SECTION:")?;
            for question in &self.questions {
                writeln!(f, ";{}", question)?;
            }
        }

        for (title, section) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authority),
            ("ADDITIONAL", &self.additional),
        ] {
            if section.is_empty() {
                continue;
            }
            writeln!(f, "\n;; {} SECTION:", title)?;
            for record in section {
                writeln!(f, "{}", record)?;
            }
        }
        Ok(())
    }
}

//============ Testing =======================================================
