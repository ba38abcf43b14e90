//! Domain names.
//!
//! A domain name is kept as an ordered sequence of labels, each an opaque
//! octet string. Labels are never joined into a single dotted string
//! internally since a label may well contain a literal dot. The root name
//! is the empty sequence.
//!
//! The presentation format understood by the `FromStr` impl and produced by
//! the `Display` impl follows [RFC 1035]: labels are separated by dots, a
//! backslash escapes the next character, and `\DDD` gives an octet as three
//! decimal digits.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

use core::{fmt, hash, str::FromStr};
use std::vec::Vec;

/// The maximum length of a label in octets.
pub const MAX_LABEL_LEN: usize = 63;

/// The maximum length of a domain name in wire format.
pub const MAX_NAME_LEN: usize = 255;

//------------ Name ----------------------------------------------------------

/// An absolute domain name.
///
/// Comparison and hashing ignore ASCII case as the DNS does. The original
/// spelling is kept, though, and written out unchanged.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")
)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

/// # Creation and Conversion
///
impl Name {
    /// Returns the root name.
    pub fn root() -> Self {
        Name { labels: Vec::new() }
    }

    /// Creates a name from a sequence of labels.
    ///
    /// The sequence must not contain the empty root label. Each label must
    /// be at most 63 octets long and the complete name must not exceed 255
    /// octets in wire format.
    pub fn from_labels<I, L>(iter: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let labels = iter
            .into_iter()
            .map(|label| label.as_ref().to_vec())
            .collect::<Vec<_>>();
        Self::check(&labels)?;
        Ok(Name { labels })
    }

    fn check(labels: &[Vec<u8>]) -> Result<(), NameError> {
        let mut len = 1;
        for label in labels {
            if label.is_empty() {
                return Err(NameError::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(NameError::LongLabel);
            }
            len += label.len() + 1;
        }
        if len > MAX_NAME_LEN {
            return Err(NameError::LongName);
        }
        Ok(())
    }

    /// Returns the labels of the name, starting with the leftmost one.
    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    /// Returns an iterator over the labels as slices.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.labels.iter().map(Vec::as_slice)
    }

    /// Converts the name into its labels.
    pub fn into_labels(self) -> Vec<Vec<u8>> {
        self.labels
    }

    /// Returns a copy of the name with all ASCII letters in lowercase.
    pub fn to_canonical(&self) -> Self {
        Name {
            labels: self
                .labels
                .iter()
                .map(|label| label.to_ascii_lowercase())
                .collect(),
        }
    }
}

/// # Properties
///
impl Name {
    /// Returns whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the number of labels, not counting the root label.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the length of the uncompressed wire format of the name.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|label| label.len() + 1).sum::<usize>() + 1
    }

    /// Returns whether `self` is `base` or a name below it.
    pub fn ends_with(&self, base: &Name) -> bool {
        if base.labels.len() > self.labels.len() {
            return false;
        }
        let start = self.labels.len() - base.labels.len();
        self.labels[start..]
            .iter()
            .zip(base.labels.iter())
            .all(|(left, right)| left.eq_ignore_ascii_case(right))
    }
}

//--- TryFrom

impl TryFrom<Vec<Vec<u8>>> for Name {
    type Error = NameError;

    fn try_from(labels: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::check(&labels)?;
        Ok(Name { labels })
    }
}

//--- From

impl From<Name> for Vec<Vec<u8>> {
    fn from(name: Name) -> Self {
        name.labels
    }
}

//--- FromStr

impl FromStr for Name {
    type Err = NameError;

    /// Parses a name in presentation format.
    ///
    /// A trailing dot is optional, all names are considered absolute. Both
    /// the empty string and a single dot denote the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." {
            return Ok(Name::root());
        }
        let mut labels = Vec::new();
        let mut label = Vec::new();
        let mut chars = s.bytes();
        while let Some(ch) = chars.next() {
            match ch {
                b'.' => {
                    if label.is_empty() {
                        return Err(NameError::EmptyLabel);
                    }
                    labels.push(core::mem::take(&mut label));
                }
                b'\\' => label.push(parse_escape(&mut chars)?),
                _ => label.push(ch),
            }
        }
        if !label.is_empty() {
            labels.push(label);
        }
        Self::check(&labels)?;
        Ok(Name { labels })
    }
}

/// Parses the remainder of an escape sequence after the backslash.
fn parse_escape(chars: &mut impl Iterator<Item = u8>) -> Result<u8, NameError> {
    let ch = chars.next().ok_or(NameError::BadEscape)?;
    if !ch.is_ascii_digit() {
        return Ok(ch);
    }
    let mut value = u32::from(ch - b'0');
    for _ in 0..2 {
        match chars.next() {
            Some(ch) if ch.is_ascii_digit() => {
                value = value * 10 + u32::from(ch - b'0');
            }
            _ => return Err(NameError::BadEscape),
        }
    }
    u8::try_from(value).map_err(|_| NameError::BadEscape)
}

//--- PartialEq, Eq, and Hash

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(left, right)| left.eq_ignore_ascii_case(right))
    }
}

impl Eq for Name {}

impl hash::Hash for Name {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            state.write_u8(label.len() as u8);
            for ch in label {
                state.write_u8(ch.to_ascii_lowercase())
            }
        }
        state.write_u8(0)
    }
}

//--- Display and Debug

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(".");
        }
        for label in &self.labels {
            for &ch in label {
                if ch == b'.' || ch == b'\\' {
                    write!(f, "\\{}", ch as char)?;
                } else if ch.is_ascii_graphic() {
                    write!(f, "{}", ch as char)?;
                } else {
                    write!(f, "\\{:03}", ch)?;
                }
            }
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

//============ Error Types ===================================================

//------------ NameError -----------------------------------------------------

/// A domain name could not be created.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameError {
    /// A label was longer than 63 octets.
    LongLabel,

    /// The name was longer than 255 octets in wire format.
    LongName,

    /// An empty label appeared in a place other than the end.
    EmptyLabel,

    /// An escape sequence was invalid.
    BadEscape,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            NameError::LongLabel => "label too long",
            NameError::LongName => "domain name too long",
            NameError::EmptyLabel => "empty label",
            NameError::BadEscape => "invalid escape sequence",
        })
    }
}

impl std::error::Error for NameError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;
    use std::string::ToString;

    #[test]
    fn from_str() {
        let name: Name = "www.example.com".parse().unwrap();
        assert_eq!(
            name.labels(),
            &[b"www".to_vec(), b"example".to_vec(), b"com".to_vec()]
        );
        assert_eq!(name, "www.example.com.".parse().unwrap());
        assert!(Name::from_str(".").unwrap().is_root());
        assert!(Name::from_str("").unwrap().is_root());
        assert_eq!(Name::from_str("a..b"), Err(NameError::EmptyLabel));
        assert_eq!(Name::from_str(".a"), Err(NameError::EmptyLabel));
    }

    #[test]
    fn escapes() {
        let name: Name = r"a\.b.c\\d.\065\032".parse().unwrap();
        assert_eq!(
            name.labels(),
            &[b"a.b".to_vec(), b"c\\d".to_vec(), b"A ".to_vec()]
        );
        assert_eq!(name.to_string(), r"a\.b.c\\d.A\032.");
        assert_eq!(Name::from_str(r"a\25"), Err(NameError::BadEscape));
        assert_eq!(Name::from_str(r"a\256"), Err(NameError::BadEscape));
        assert_eq!(Name::from_str("a\\"), Err(NameError::BadEscape));
    }

    #[test]
    fn limits() {
        let long_label = "a".repeat(64);
        assert_eq!(Name::from_str(&long_label), Err(NameError::LongLabel));
        let label = "a".repeat(63);
        let name = [label.as_str(); 4].join(".");
        assert_eq!(Name::from_str(&name), Err(NameError::LongName));
        let name = [label.as_str(); 3].join(".") + "." + &"b".repeat(61);
        assert_eq!(Name::from_str(&name).unwrap().wire_len(), 255);
    }

    #[test]
    fn literal_dot_label() {
        let name = Name::from_labels(["a.b", "c"]).unwrap();
        assert_eq!(name.label_count(), 2);
        assert_eq!(name.to_string(), r"a\.b.c.");
        assert_ne!(name, "a.b.c".parse().unwrap());
    }

    #[test]
    fn case_insensitive() {
        let lower: Name = "example.com".parse().unwrap();
        let upper: Name = "EXAMPLE.Com".parse().unwrap();
        assert_eq!(lower, upper);
        let mut set = HashSet::new();
        set.insert(lower);
        assert!(set.contains(&upper));
        assert_eq!(upper.to_canonical().labels()[0], b"example");
        assert_eq!(upper.to_string(), "EXAMPLE.Com.");
    }

    #[test]
    fn ends_with() {
        let name: Name = "www.example.com".parse().unwrap();
        assert!(name.ends_with(&"Example.com".parse().unwrap()));
        assert!(name.ends_with(&Name::root()));
        assert!(!name.ends_with(&"example.org".parse().unwrap()));
        assert!(!Name::root().ends_with(&name));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ser_de() {
        use serde_test::{assert_tokens, Token};

        let name: Name = "a.bc".parse().unwrap();
        assert_tokens(
            &name,
            &[
                Token::Seq { len: Some(2) },
                Token::Seq { len: Some(1) },
                Token::U8(b'a'),
                Token::SeqEnd,
                Token::Seq { len: Some(2) },
                Token::U8(b'b'),
                Token::U8(b'c'),
                Token::SeqEnd,
                Token::SeqEnd,
            ],
        );
    }
}
