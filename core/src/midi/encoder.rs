use super::messages::{Event, Message, Meta};
use super::types::{U4, U7};

#[inline]
fn u4(d: &U4) -> u8 {
  d & 0x0f
}

#[inline]
fn u7(d: &U7) -> u8 {
  d & 0x7f
}

#[inline]
fn status_and_channel(status: U4, channel: &U4) -> u8 {
  (status << 4) | u4(channel)
}

fn meta_type(meta: &Meta) -> u8 {
  match meta {
    Meta::TrackName(_) => 0x03,
    Meta::Lyric(_) => 0x05,
    Meta::Tempo(_) => 0x51,
    Meta::TimeSignature { .. } => 0x58,
    Meta::EndOfTrack => 0x2f,
  }
}

fn meta_data(meta: &Meta) -> Vec<u8> {
  match meta {
    Meta::TrackName(text) | Meta::Lyric(text) => text.as_bytes().to_vec(),
    Meta::Tempo(micros) => vec![(micros >> 16) as u8, (micros >> 8) as u8, *micros as u8],
    Meta::TimeSignature {
      numerator,
      denominator,
    } => {
      // denominator is stored as a power of two
      let power = denominator.max(&1).trailing_zeros() as u8;
      vec![*numerator, power, 24, 8]
    }
    Meta::EndOfTrack => Vec::new(),
  }
}

pub struct Encoder;

impl Encoder {
  pub fn data_size(msg: &Message) -> usize {
    match msg {
      Message::NoteOff { .. } => 3,
      Message::NoteOn { .. } => 3,
    }
  }

  pub fn encode(msg: &Message, out: &mut [u8]) {
    match msg {
      Message::NoteOff {
        channel,
        key,
        velocity,
      } => out[..3].copy_from_slice(&[
        status_and_channel(0b1000, channel),
        u7(key),
        u7(velocity),
      ]),
      Message::NoteOn {
        channel,
        key,
        velocity,
      } => out[..3].copy_from_slice(&[
        status_and_channel(0b1001, channel),
        u7(key),
        u7(velocity),
      ]),
    }
  }

  /// Appends an event without its delta time.
  pub fn encode_event(event: &Event, out: &mut Vec<u8>) {
    match event {
      Event::Message(msg) => {
        let start = out.len();
        out.resize(start + Encoder::data_size(msg), 0);
        Encoder::encode(msg, &mut out[start..]);
      }
      Event::Meta(meta) => {
        let data = meta_data(meta);
        out.push(0xff);
        out.push(meta_type(meta));
        Encoder::encode_vlq(data.len() as u32, out);
        out.extend_from_slice(&data);
      }
    }
  }

  /// Variable length quantity, 7 bits per byte, most significant first.
  pub fn encode_vlq(value: u32, out: &mut Vec<u8>) {
    let mut bytes = [0u8; 5];
    let mut index = bytes.len() - 1;
    let mut rest = value;
    bytes[index] = (rest & 0x7f) as u8;
    rest >>= 7;
    while rest > 0 {
      index -= 1;
      bytes[index] = ((rest & 0x7f) | 0x80) as u8;
      rest >>= 7;
    }
    out.extend_from_slice(&bytes[index..]);
  }
}

#[cfg(test)]
mod test {

  use super::*;

  #[test]
  pub fn test_u4() {
    assert_eq!(u4(&0xff), 0x0f);
  }

  #[test]
  pub fn test_u7() {
    assert_eq!(u7(&0xff), 0x7f);
  }

  #[test]
  pub fn test_status_and_channel() {
    assert_eq!(status_and_channel(0b1001, &0b0101_0101), 0b1001_0101);
  }

  #[test]
  pub fn note_off() {
    assert_encoding(
      Event::Message(Message::NoteOff {
        channel: 1,
        key: 65,
        velocity: 0,
      }),
      vec![0b1000_0001, 65, 0],
    )
  }

  #[test]
  pub fn note_on() {
    assert_encoding(
      Event::Message(Message::NoteOn {
        channel: 1,
        key: 65,
        velocity: 120,
      }),
      vec![0b1001_0001, 65, 120],
    )
  }

  #[test]
  pub fn lyric() {
    assert_encoding(
      Event::Meta(Meta::Lyric("la".to_string())),
      vec![0xff, 0x05, 2, b'l', b'a'],
    )
  }

  #[test]
  pub fn tempo() {
    assert_encoding(
      Event::Meta(Meta::Tempo(500_000)),
      vec![0xff, 0x51, 3, 0x07, 0xa1, 0x20],
    )
  }

  #[test]
  pub fn time_signature() {
    assert_encoding(
      Event::Meta(Meta::TimeSignature {
        numerator: 6,
        denominator: 8,
      }),
      vec![0xff, 0x58, 4, 6, 3, 24, 8],
    )
  }

  #[test]
  pub fn end_of_track() {
    assert_encoding(Event::Meta(Meta::EndOfTrack), vec![0xff, 0x2f, 0])
  }

  #[test]
  pub fn vlq() {
    assert_vlq(0, vec![0x00]);
    assert_vlq(0x7f, vec![0x7f]);
    assert_vlq(0x80, vec![0x81, 0x00]);
    assert_vlq(1920, vec![0x8f, 0x00]);
    assert_vlq(0x0fff_ffff, vec![0xff, 0xff, 0xff, 0x7f]);
  }

  fn assert_encoding(event: Event, expected: Vec<u8>) {
    let mut data = Vec::new();
    Encoder::encode_event(&event, &mut data);
    assert_eq!(data, expected);
  }

  fn assert_vlq(value: u32, expected: Vec<u8>) {
    let mut data = Vec::new();
    Encoder::encode_vlq(value, &mut data);
    assert_eq!(data, expected);
  }
}
