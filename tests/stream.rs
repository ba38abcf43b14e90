use std::io::Cursor;

use dnswire::base::iana::{Class, Rtype};
use dnswire::base::{
    Buffer, Message, ParseError, Question, ReadSource, ResourceRecord,
};
use dnswire::codec::{self, Encoder};
use dnswire::rdata::RData;

fn message(id: u16, addr: &str) -> Message {
    message_for("example.com", id, addr)
}

fn message_for(qname: &str, id: u16, addr: &str) -> Message {
    let mut query = Message::new();
    query.header_mut().set_id(id);
    query.header_mut().set_rd(true);
    query
        .questions_mut()
        .push(Question::new_in(qname.parse().unwrap(), Rtype::A));
    let mut msg = query.start_answer();
    msg.answers_mut().push(ResourceRecord::new(
        qname.parse().unwrap(),
        Class::IN,
        300,
        RData::scan(Rtype::A, addr).unwrap(),
    ));
    msg
}

fn stream(msgs: &[Message]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    let mut res = Vec::new();
    for msg in msgs {
        res.extend_from_slice(&encoder.encode_stream(msg).unwrap());
    }
    res
}

#[test]
fn messages_from_reader() {
    let msgs = [
        message(1, "192.0.2.1"),
        message(2, "192.0.2.2"),
        message(3, "192.0.2.3"),
    ];
    let data = stream(&msgs);

    // Small chunks so that messages straddle refills.
    let source = ReadSource::with_chunk_size(Cursor::new(data), 7);
    let mut buf = Buffer::streaming(source);
    for msg in &msgs {
        assert_eq!(codec::decode_stream(&mut buf).unwrap().as_ref(), Some(msg));
    }
    assert_eq!(codec::decode_stream(&mut buf), Ok(None));
}

#[test]
fn messages_from_closure() {
    let msgs = [message(10, "198.51.100.1"), message(11, "198.51.100.2")];
    let data = stream(&msgs);
    let mut chunks = data.chunks(5).map(<[u8]>::to_vec);
    let mut buf = Buffer::streaming(move || chunks.next());

    let first = codec::decode_stream(&mut buf).unwrap().unwrap();
    assert_eq!(first.header().id(), 10);
    let second = codec::decode_stream(&mut buf).unwrap().unwrap();
    assert_eq!(second.header().id(), 11);
    assert_eq!(second.answers()[0].data().to_string(), "198.51.100.2");
    assert_eq!(codec::decode_stream(&mut buf), Ok(None));
}

#[test]
fn stream_ends_mid_message() {
    let mut data = stream(&[message(1, "192.0.2.1")]);
    data.truncate(data.len() - 3);
    let mut buf = Buffer::new(data);
    assert_eq!(codec::decode_stream(&mut buf), Err(ParseError::ShortInput));
}

#[test]
fn pointers_are_relative_to_each_message() {
    // The second message’s pointers refer to its own start, not to the
    // start of the stream.
    let msgs = [message(1, "192.0.2.1"), message(2, "192.0.2.2")];
    let mut buf = Buffer::new(stream(&msgs));
    assert!(codec::decode_stream(&mut buf).unwrap().is_some());
    let second = codec::decode_stream(&mut buf).unwrap().unwrap();
    assert_eq!(second, msgs[1]);
}

#[test]
fn plain_messages_back_to_back() {
    // Without framing, messages can still be read one after another. The
    // answer owners are compressed, so the second message only decodes
    // right if its pointers are taken relative to its own start.
    let msgs = [
        message_for("example.com", 1, "192.0.2.1"),
        message_for("mail.other.org", 2, "192.0.2.2"),
    ];
    let mut data = codec::encode(&msgs[0]).unwrap();
    data.extend_from_slice(&codec::encode(&msgs[1]).unwrap());
    let mut buf = Buffer::new(data);

    let first = codec::decode_from(&mut buf).unwrap().unwrap();
    assert_eq!(first, msgs[0]);
    let second = codec::decode_from(&mut buf).unwrap().unwrap();
    assert_eq!(second, msgs[1]);
    assert_eq!(
        second.answers()[0].owner().to_string(),
        "mail.other.org."
    );
    assert_eq!(codec::decode_from(&mut buf), Ok(None));
}

#[test]
fn partial_frame_completes_after_append() {
    let msg = message(5, "203.0.113.5");
    let data = stream(&[msg.clone()]);
    let (head, tail) = data.split_at(data.len() / 2);
    let mut buf = Buffer::new(head);
    assert_eq!(codec::decode_stream(&mut buf), Err(ParseError::ShortInput));
    buf.append(tail);
    assert_eq!(codec::decode_stream(&mut buf), Ok(Some(msg)));
    assert_eq!(codec::decode_stream(&mut buf), Ok(None));
}
