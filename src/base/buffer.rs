//! A cursor over wire-format data.
//!
//! The [`Buffer`] is what all parsing in this crate happens on. It keeps the
//! complete data of a DNS message and a current position. All `consume_*`
//! methods take data off the position and advance it. They fail with
//! [`ParseError::ShortInput`] if there isn’t enough data.
//!
//! A buffer can have a [`Source`] attached. When it runs out of data, it asks
//! the source for more and appends whatever it gets. This allows consuming
//! data that arrives in pieces, for instance from a stream socket. Pulling
//! data is a plain function call; whether it blocks is up to the source.
//!
//! Because compression pointers refer to absolute positions in a message,
//! positions in a buffer are always absolute, too. The message is assumed
//! to start at position zero.

use super::name::{Name, MAX_NAME_LEN};
use super::wire::{FormError, ParseError, POINTER_MASK};
use std::collections::HashSet;
use std::io;
use std::io::SeekFrom;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::vec::Vec;
use tracing::trace;

//------------ Source --------------------------------------------------------

/// Something that can provide more data to a buffer.
pub trait Source {
    /// Returns the next chunk of data.
    ///
    /// Returns `None` if no more data is available at this time. An empty
    /// chunk is treated the same way.
    fn fetch(&mut self) -> Option<Vec<u8>>;
}

impl<F: FnMut() -> Option<Vec<u8>>> Source for F {
    fn fetch(&mut self) -> Option<Vec<u8>> {
        self()
    }
}

//------------ NoSource ------------------------------------------------------

/// The source of a buffer that has all its data from the start.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSource;

impl Source for NoSource {
    fn fetch(&mut self) -> Option<Vec<u8>> {
        None
    }
}

//------------ ReadSource ----------------------------------------------------

/// A source pulling data from an [`io::Read`] value.
///
/// Each fetch performs a single read of up to the configured chunk size.
/// End of file or an error end the data. The error is kept and can be
/// retrieved via [`take_error`][Self::take_error].
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    chunk_size: usize,
    error: Option<io::Error>,
}

impl<R: io::Read> ReadSource<R> {
    /// The chunk size used by [`new`][Self::new].
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, Self::DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        ReadSource {
            reader,
            chunk_size: chunk_size.max(1),
            error: None,
        }
    }

    /// Returns the error that ended reading, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: io::Read> Source for ReadSource<R> {
    fn fetch(&mut self) -> Option<Vec<u8>> {
        if self.error.is_some() {
            return None;
        }
        let mut chunk = vec![0; self.chunk_size];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => return None,
                Ok(len) => {
                    chunk.truncate(len);
                    return Some(chunk);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.error = Some(err);
                    return None;
                }
            }
        }
    }
}

//------------ NameToken -----------------------------------------------------

/// A single token of an encoded domain name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NameToken {
    /// A normal label with its content.
    Label(Vec<u8>),

    /// A compression pointer with its target offset.
    Pointer(u16),

    /// The terminating empty root label.
    Root,
}

impl NameToken {
    /// Returns the token as it appears on the wire.
    pub fn to_wire(&self) -> Vec<u8> {
        match *self {
            NameToken::Label(ref label) => {
                let mut res = Vec::with_capacity(label.len() + 1);
                res.push(label.len() as u8);
                res.extend_from_slice(label);
                res
            }
            NameToken::Pointer(offset) => {
                (0xC000 | offset).to_be_bytes().to_vec()
            }
            NameToken::Root => vec![0],
        }
    }
}

//------------ Buffer --------------------------------------------------------

/// A cursor over a growable sequence of octets.
#[derive(Clone, Debug)]
pub struct Buffer<S = NoSource> {
    /// All data received so far.
    data: Vec<u8>,

    /// The current position.
    pos: usize,

    /// The position reading must not go beyond, if any.
    ///
    /// This is used to restrict parsing of record data to its length. The
    /// limit is never beyond the end of `data`.
    limit: Option<usize>,

    /// Where to get more data from.
    source: S,
}

/// # Creation and Conversion
///
impl Buffer<NoSource> {
    /// Creates a buffer atop complete data.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Buffer::with_source(data, NoSource)
    }
}

impl<S: Source> Buffer<S> {
    /// Creates an empty buffer that pulls all its data from `source`.
    pub fn streaming(source: S) -> Self {
        Buffer::with_source(Vec::new(), source)
    }

    /// Creates a buffer with some initial data and a source for more.
    pub fn with_source(data: impl Into<Vec<u8>>, source: S) -> Self {
        Buffer {
            data: data.into(),
            pos: 0,
            limit: None,
            source,
        }
    }

    /// Returns all data received so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns a reference to the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Appends data to the end of the buffer.
    pub fn append(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    /// Drops all data before the current position.
    ///
    /// Afterwards, the current position is the new position zero. This is
    /// used between messages arriving on a stream. It does nothing while
    /// reading is restricted to record data.
    pub fn discard_consumed(&mut self) {
        if self.limit.is_none() {
            self.data.drain(..self.pos);
            self.pos = 0;
        }
    }
}

/// # Positioning
///
impl<S: Source> Buffer<S> {
    /// Returns the current position.
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Moves the current position.
    ///
    /// Positions relative to the end are relative to the data received so
    /// far. Seeking beyond the available data will try to fetch more from
    /// the source. Returns the new position.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<usize, ParseError> {
        let target = match pos {
            SeekFrom::Start(pos) => usize::try_from(pos).ok(),
            SeekFrom::Current(delta) => offset_by(self.pos, delta),
            SeekFrom::End(delta) => offset_by(self.end(), delta),
        }
        .ok_or(ParseError::ShortInput)?;
        if target > self.pos {
            self.ensure(target - self.pos)?;
        }
        self.pos = target;
        Ok(target)
    }

    /// Returns the number of octets available without fetching.
    pub fn remaining(&self) -> usize {
        self.end() - self.pos
    }

    /// Returns whether all buffered data has been consumed.
    ///
    /// This doesn’t consider the source. Use
    /// [`ready_check`][Self::ready_check] for that.
    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns whether there is more data, fetching it if necessary.
    pub fn ready_check(&mut self) -> bool {
        self.remaining() > 0 || (self.limit.is_none() && self.fetch_data())
    }

    /// Runs `op` with reading restricted to the next `len` octets.
    ///
    /// The operation has to consume exactly those octets. Reading beyond
    /// them or leaving some unread results in a form error.
    pub fn bounded<T, F>(&mut self, len: usize, op: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        self.ensure(len)?;
        let end = self.pos + len;
        let saved = self.limit.replace(end);
        let res = op(self);
        self.limit = saved;
        let res = res?;
        if self.pos != end {
            return Err(FormError::new("trailing data in record data").into());
        }
        Ok(res)
    }

    fn end(&self) -> usize {
        self.limit.unwrap_or(self.data.len())
    }

    /// Pulls the next chunk from the source.
    ///
    /// Returns whether any data was added.
    fn fetch_data(&mut self) -> bool {
        match self.source.fetch() {
            Some(chunk) if !chunk.is_empty() => {
                trace!("fetched {} octets from source", chunk.len());
                self.data.extend_from_slice(&chunk);
                true
            }
            _ => false,
        }
    }

    /// Makes sure at least `len` octets are available from the position.
    fn ensure(&mut self, len: usize) -> Result<(), ParseError> {
        let end = self.pos.checked_add(len).ok_or(ParseError::ShortInput)?;
        if let Some(limit) = self.limit {
            if end > limit {
                return Err(FormError::new("read beyond record data").into());
            }
            return Ok(());
        }
        while self.data.len() < end {
            if !self.fetch_data() {
                return Err(ParseError::ShortInput);
            }
        }
        Ok(())
    }

    /// Returns the octet at an absolute position, fetching if necessary.
    ///
    /// This ignores any limit and is used for following compression
    /// pointers.
    fn octet_at(&mut self, pos: usize) -> Result<u8, ParseError> {
        while self.data.len() <= pos {
            if self.limit.is_some() || !self.fetch_data() {
                return Err(
                    FormError::new("compressed name beyond end of data").into()
                );
            }
        }
        Ok(self.data[pos])
    }
}

fn offset_by(base: usize, delta: i64) -> Option<usize> {
    if delta >= 0 {
        base.checked_add(usize::try_from(delta).ok()?)
    } else {
        base.checked_sub(usize::try_from(delta.unsigned_abs()).ok()?)
    }
}

/// # Consuming Data
///
impl<S: Source> Buffer<S> {
    /// Takes the next `len` octets.
    pub fn consume(&mut self, len: usize) -> Result<&[u8], ParseError> {
        self.ensure(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    /// Takes the next `N` octets as an array.
    fn consume_array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let mut res = [0u8; N];
        res.copy_from_slice(self.consume(N)?);
        Ok(res)
    }

    /// Takes an unsigned octet.
    pub fn consume_u8(&mut self) -> Result<u8, ParseError> {
        self.consume_array::<1>().map(|buf| buf[0])
    }

    /// Takes a big-endian unsigned 16 bit integer.
    pub fn consume_u16(&mut self) -> Result<u16, ParseError> {
        self.consume_array().map(u16::from_be_bytes)
    }

    /// Takes a big-endian unsigned 32 bit integer.
    pub fn consume_u32(&mut self) -> Result<u32, ParseError> {
        self.consume_array().map(u32::from_be_bytes)
    }

    /// Takes an IPv4 address in its four octet form.
    pub fn consume_ipv4(&mut self) -> Result<Ipv4Addr, ParseError> {
        self.consume_array::<4>().map(Ipv4Addr::from)
    }

    /// Takes an IPv6 address in its sixteen octet form.
    pub fn consume_ipv6(&mut self) -> Result<Ipv6Addr, ParseError> {
        self.consume_array::<16>().map(Ipv6Addr::from)
    }

    /// Takes a character string, i.e., a length octet and that many octets.
    pub fn consume_label(&mut self) -> Result<Vec<u8>, ParseError> {
        let len = self.consume_u8()?;
        self.consume(usize::from(len)).map(<[u8]>::to_vec)
    }

    /// Takes the next token of a domain name.
    pub fn consume_name_label(&mut self) -> Result<NameToken, ParseError> {
        let len = self.consume_u8()?;
        match len & POINTER_MASK {
            0 if len == 0 => Ok(NameToken::Root),
            0 => {
                let label = self.consume(usize::from(len))?;
                Ok(NameToken::Label(label.to_vec()))
            }
            POINTER_MASK => {
                let low = self.consume_u8()?;
                Ok(NameToken::Pointer(u16::from(len & 0x3F) << 8 | u16::from(low)))
            }
            _ => Err(FormError::new("invalid label type").into()),
        }
    }

    /// Takes a complete, possibly compressed domain name.
    ///
    /// The position ends up right after the name as it appears here, i.e.,
    /// after the zero octet or the first compression pointer.
    pub fn consume_name_array(&mut self) -> Result<Name, ParseError> {
        let mut visited = HashSet::new();
        visited.insert(self.pos);
        let mut labels = Vec::new();
        let mut wire_len = 1;
        loop {
            match self.consume_name_label()? {
                NameToken::Root => break,
                NameToken::Label(label) => {
                    wire_len += label.len() + 1;
                    if wire_len > MAX_NAME_LEN {
                        return Err(FormError::new("long domain name").into());
                    }
                    labels.push(label);
                }
                NameToken::Pointer(offset) => {
                    self.expand_into(
                        Some(self.pos - 2),
                        usize::from(offset),
                        &mut visited,
                        &mut labels,
                        wire_len,
                    )?;
                    break;
                }
            }
        }
        Name::try_from(labels)
            .map_err(|_| FormError::new("invalid domain name").into())
    }

    /// Decodes the labels of the name starting at the absolute `offset`.
    ///
    /// The current position is not changed. Compression pointers are
    /// followed. Each offset jumped to is added to `visited`; reaching an
    /// offset that is already in there is reported as
    /// [`ParseError::PointerLoop`]. A pointer must refer to a position
    /// before itself, anything else is a form error.
    pub fn expand_name_pointer(
        &mut self,
        offset: usize,
        visited: &mut HashSet<usize>,
    ) -> Result<Vec<Vec<u8>>, ParseError> {
        let mut labels = Vec::new();
        self.expand_into(None, offset, visited, &mut labels, 1)?;
        Ok(labels)
    }

    fn expand_into(
        &mut self,
        pointer: Option<usize>,
        offset: usize,
        visited: &mut HashSet<usize>,
        labels: &mut Vec<Vec<u8>>,
        mut wire_len: usize,
    ) -> Result<(), ParseError> {
        let mut pos = offset;
        check_jump(visited, pointer, pos)?;
        loop {
            let len = self.octet_at(pos)?;
            match len & POINTER_MASK {
                0 if len == 0 => return Ok(()),
                0 => {
                    let len = usize::from(len);
                    wire_len += len + 1;
                    if wire_len > MAX_NAME_LEN {
                        return Err(FormError::new("long domain name").into());
                    }
                    self.octet_at(pos + len)?;
                    labels.push(self.data[pos + 1..pos + 1 + len].to_vec());
                    pos += len + 1;
                }
                POINTER_MASK => {
                    let low = self.octet_at(pos + 1)?;
                    let target = usize::from(len & 0x3F) << 8 | usize::from(low);
                    check_jump(visited, Some(pos), target)?;
                    pos = target;
                }
                _ => return Err(FormError::new("invalid label type").into()),
            }
        }
    }
}

/// Checks a jump from the pointer at `pointer` to `target`.
///
/// Revisiting an offset is a loop. Otherwise the target has to lie before
/// the pointer.
fn check_jump(
    visited: &mut HashSet<usize>,
    pointer: Option<usize>,
    target: usize,
) -> Result<(), ParseError> {
    if !visited.insert(target) {
        return Err(ParseError::PointerLoop(target));
    }
    match pointer {
        Some(pointer) if target >= pointer => {
            Err(FormError::new("forward compression pointer").into())
        }
        _ => Ok(()),
    }
}

//--- From

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Buffer::new(data)
    }
}

impl<'a> From<&'a [u8]> for Buffer {
    fn from(data: &'a [u8]) -> Self {
        Buffer::new(data)
    }
}

#[cfg(feature = "bytes")]
impl From<bytes::Bytes> for Buffer {
    fn from(data: bytes::Bytes) -> Self {
        Buffer::new(std::vec::Vec::from(data))
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::VecDeque;

    fn chunked(chunks: &[&[u8]]) -> impl FnMut() -> Option<Vec<u8>> {
        let mut chunks: VecDeque<Vec<u8>> =
            chunks.iter().map(|chunk| chunk.to_vec()).collect();
        move || chunks.pop_front()
    }

    #[test]
    fn integers_and_addresses() {
        let mut buf = Buffer::new(
            &b"\x01\x02\x03\x04\x05\x06\x07\xC0\x00\x02\x01\
               \x20\x01\x0d\xb8\0\0\0\0\0\0\0\0\0\0\0\x01"[..],
        );
        assert_eq!(buf.consume_u8(), Ok(1));
        assert_eq!(buf.consume_u16(), Ok(0x0203));
        assert_eq!(buf.consume_u32(), Ok(0x0405_0607));
        assert_eq!(buf.consume_ipv4(), Ok(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(buf.consume_ipv6(), Ok("2001:db8::1".parse().unwrap()));
        assert!(buf.at_end());
        assert_eq!(buf.consume_u8(), Err(ParseError::ShortInput));
    }

    #[test]
    fn seek_and_tell() {
        let mut buf = Buffer::new(&b"abcdefgh"[..]);
        assert_eq!(buf.seek(SeekFrom::Start(3)), Ok(3));
        assert_eq!(buf.consume(2), Ok(&b"de"[..]));
        assert_eq!(buf.seek(SeekFrom::Current(-4)), Ok(1));
        assert_eq!(buf.seek(SeekFrom::End(-1)), Ok(7));
        assert_eq!(buf.tell(), 7);
        assert_eq!(buf.seek(SeekFrom::Start(9)), Err(ParseError::ShortInput));
        assert_eq!(buf.seek(SeekFrom::Current(-8)), Err(ParseError::ShortInput));
        assert_eq!(buf.tell(), 7);
    }

    #[test]
    fn character_strings() {
        let mut buf = Buffer::new(&b"\x03foo\x00\x05ab"[..]);
        assert_eq!(buf.consume_label(), Ok(b"foo".to_vec()));
        assert_eq!(buf.consume_label(), Ok(Vec::new()));
        assert_eq!(buf.consume_label(), Err(ParseError::ShortInput));
    }

    #[test]
    fn name_tokens() {
        let mut buf = Buffer::new(&b"\x03foo\xC0\x0C\x00\x40"[..]);
        let token = buf.consume_name_label().unwrap();
        assert_eq!(token, NameToken::Label(b"foo".to_vec()));
        assert_eq!(token.to_wire(), b"\x03foo");
        let token = buf.consume_name_label().unwrap();
        assert_eq!(token, NameToken::Pointer(12));
        assert_eq!(token.to_wire(), b"\xC0\x0C");
        assert_eq!(buf.consume_name_label(), Ok(NameToken::Root));
        assert!(matches!(buf.consume_name_label(), Err(ParseError::Form(_))));
    }

    #[test]
    fn names() {
        let mut buf = Buffer::new(
            &b"\x07example\x03com\x00\x03www\xC0\x00\xC0\x08\x00"[..],
        );
        assert_eq!(
            buf.consume_name_array().unwrap(),
            "example.com".parse().unwrap()
        );
        assert_eq!(buf.tell(), 13);
        assert_eq!(
            buf.consume_name_array().unwrap(),
            "www.example.com".parse().unwrap()
        );
        assert_eq!(buf.tell(), 19);
        assert_eq!(buf.consume_name_array().unwrap(), "com".parse().unwrap());
        assert!(buf.consume_name_array().unwrap().is_root());
        assert!(buf.at_end());
    }

    #[test]
    fn expand_name_pointer() {
        let mut buf =
            Buffer::new(&b"\x07example\x03com\x00\x03www\xC0\x00"[..]);
        let mut visited = HashSet::new();
        let labels = buf.expand_name_pointer(13, &mut visited).unwrap();
        assert_eq!(
            labels,
            [b"www".to_vec(), b"example".to_vec(), b"com".to_vec()]
        );
        assert_eq!(buf.tell(), 0);
        assert!(visited.contains(&13) && visited.contains(&0));
        assert_eq!(
            buf.expand_name_pointer(0, &mut visited),
            Err(ParseError::PointerLoop(0))
        );
    }

    #[test]
    fn pointer_to_itself() {
        let mut buf = Buffer::new(&b"\xC0\x00"[..]);
        assert_eq!(buf.consume_name_array(), Err(ParseError::PointerLoop(0)));
    }

    #[test]
    fn pointer_back_to_start() {
        let mut buf = Buffer::new(&b"\x01a\xC0\x00"[..]);
        assert_eq!(buf.consume_name_array(), Err(ParseError::PointerLoop(0)));
    }

    #[test]
    fn forward_pointer() {
        let mut buf = Buffer::new(&b"\x01a\xC0\x04\x01b\xC0\x00"[..]);
        assert_eq!(
            buf.consume_name_array(),
            Err(ParseError::form_error("forward compression pointer"))
        );

        // Within an expanded name, too.
        let mut buf = Buffer::new(&b"\xC0\x04\x01a\xC0\x00"[..]);
        buf.seek(SeekFrom::Start(2)).unwrap();
        assert_eq!(
            buf.consume_name_array(),
            Err(ParseError::form_error("forward compression pointer"))
        );
    }

    #[test]
    fn pointer_out_of_bounds() {
        let mut buf = Buffer::new(&b"\x01a\xC0\x10"[..]);
        assert!(matches!(buf.consume_name_array(), Err(ParseError::Form(_))));
    }

    #[test]
    fn long_names() {
        // 128 labels of one octet each make a 257 octet name.
        let data = b"\x01a".repeat(128);
        let mut buf = Buffer::new(data);
        buf.append(b"\x00");
        assert!(matches!(buf.consume_name_array(), Err(ParseError::Form(_))));
    }

    #[test]
    fn bounded() {
        let mut buf = Buffer::new(&b"\x00\x01\x02\x03\x04"[..]);
        let value = buf.bounded(2, |buf| buf.consume_u16()).unwrap();
        assert_eq!(value, 1);
        assert!(matches!(
            buf.bounded(2, |buf| buf.consume_u8()),
            Err(ParseError::Form(_))
        ));
        buf.seek(SeekFrom::Start(2)).unwrap();
        assert!(matches!(
            buf.bounded(1, |buf| buf.consume_u16()),
            Err(ParseError::Form(_))
        ));
        buf.seek(SeekFrom::Start(2)).unwrap();
        assert_eq!(
            buf.bounded(4, |buf| buf.consume_u8()),
            Err(ParseError::ShortInput)
        );
        let remaining = buf.bounded(3, |buf| {
            let remaining = buf.remaining();
            buf.consume(remaining)?;
            Ok(remaining)
        });
        assert_eq!(remaining, Ok(3));
    }

    #[test]
    fn streaming() {
        let mut buf = Buffer::streaming(chunked(&[b"\x00", b"\x01\x02", b"\x03"]));
        assert!(buf.at_end());
        assert!(buf.ready_check());
        assert_eq!(buf.consume_u16(), Ok(1));
        assert_eq!(buf.consume_u16(), Ok(0x0203));
        assert!(!buf.ready_check());
        assert_eq!(buf.consume_u8(), Err(ParseError::ShortInput));
        buf.append(b"\x04");
        assert_eq!(buf.consume_u8(), Ok(4));
        buf.discard_consumed();
        assert_eq!(buf.tell(), 0);
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn streaming_split_pointer() {
        let mut buf =
            Buffer::streaming(chunked(&[b"\x01a", b"\x00\x01b\xC0", b"\x00"]));
        assert_eq!(buf.consume_name_array().unwrap(), "a".parse().unwrap());
        assert_eq!(buf.consume_name_array().unwrap(), "b.a".parse().unwrap());
        assert!(!buf.ready_check());
    }

    #[test]
    fn read_source() {
        let data: &[u8] = b"\x00\x2a\x01";
        let mut buf = Buffer::streaming(ReadSource::with_chunk_size(data, 1));
        assert_eq!(buf.consume_u16(), Ok(42));
        assert_eq!(buf.consume_u8(), Ok(1));
        assert!(!buf.ready_check());
        assert!(buf.source_mut().take_error().is_none());
    }
}
