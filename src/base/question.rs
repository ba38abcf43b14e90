//! A single question in a DNS message.
//!
//! This module defines the type [`Question`] which represents an entry in
//! the question section of a DNS message.

use super::buffer::{Buffer, Source};
use super::compress::CompressionMap;
use super::iana::{Class, Rtype};
use super::name::Name;
use super::wire::{
    pack_name, pack_name_compressed, ComposeError, Composer, ParseError,
};
use core::fmt;

//------------ Question ------------------------------------------------------

/// A question in a DNS message.
///
/// In DNS, a question describes what is requested in a query. It consists
/// of three elements: a domain name, a record type, and a class. This type
/// represents such a question.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    /// The domain name of the question.
    qname: Name,

    /// The record type of the question.
    qtype: Rtype,

    /// The class of the question.
    qclass: Class,
}

/// # Creation and Conversion
///
impl Question {
    /// Creates a new question from its three components.
    pub fn new(qname: Name, qtype: Rtype, qclass: Class) -> Self {
        Question {
            qname,
            qtype,
            qclass,
        }
    }

    /// Creates a new question from a name and record type, assuming class IN.
    pub fn new_in(qname: Name, qtype: Rtype) -> Self {
        Question::new(qname, qtype, Class::IN)
    }

    /// Converts the question into the qname.
    pub fn into_qname(self) -> Name {
        self.qname
    }
}

/// # Field Access
///
impl Question {
    /// Returns a reference to the domain name in the question.
    pub fn qname(&self) -> &Name {
        &self.qname
    }

    /// Returns the record type of the question.
    pub fn qtype(&self) -> Rtype {
        self.qtype
    }

    /// Returns the class of the question.
    pub fn qclass(&self) -> Class {
        self.qclass
    }
}

/// # Parsing and Composing
///
impl Question {
    pub fn parse<S: Source>(buf: &mut Buffer<S>) -> Result<Self, ParseError> {
        Ok(Question::new(
            buf.consume_name_array()?,
            Rtype::parse(buf)?,
            Class::parse(buf)?,
        ))
    }

    /// Appends the question without name compression.
    pub fn compose<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        pack_name(target, &self.qname)?;
        self.qtype.compose(target)?;
        self.qclass.compose(target)
    }

    /// Appends the question compressing its name via `map`.
    pub fn compose_compressed<Target: Composer + ?Sized>(
        &self,
        target: &mut Target,
        map: &mut CompressionMap,
    ) -> Result<(), ComposeError> {
        pack_name_compressed(target, &self.qname, map)?;
        self.qtype.compose(target)?;
        self.qclass.compose(target)
    }
}

//--- From

impl From<(Name, Rtype, Class)> for Question {
    fn from((name, rtype, class): (Name, Rtype, Class)) -> Self {
        Question::new(name, rtype, class)
    }
}

impl From<(Name, Rtype)> for Question {
    fn from((name, rtype): (Name, Rtype)) -> Self {
        Question::new_in(name, rtype)
    }
}

//--- Display

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.qname, self.qclass, self.qtype)
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compose_example_com() {
        let question =
            Question::new_in("example.com".parse().unwrap(), Rtype::A);
        let mut out = Vec::new();
        question.compose(&mut out).unwrap();
        assert_eq!(
            out,
            [
                0x07, 0x65, 0x78, 0x61, 0x6D, 0x70, 0x6C, 0x65, 0x03, 0x63,
                0x6F, 0x6D, 0x00, 0x00, 0x01, 0x00, 0x01
            ]
        );
        let mut buf = Buffer::new(out);
        assert_eq!(Question::parse(&mut buf).unwrap(), question);
        assert!(buf.at_end());
    }

    #[test]
    fn display() {
        let question = Question::new(
            "example.com".parse().unwrap(),
            Rtype::AAAA,
            Class::CH,
        );
        assert_eq!(question.to_string(), "example.com.\tCH\tAAAA");
    }
}
