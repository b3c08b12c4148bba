use byteorder::{BigEndian, ByteOrder};

use super::encoder::Encoder;
use super::messages::{Event, Meta};

/// Events of one track at absolute ticks.
#[derive(Debug, Clone, Default)]
pub struct SmfTrack {
  events: Vec<(u32, Event)>,
}

impl SmfTrack {
  pub fn new() -> SmfTrack {
    SmfTrack::default()
  }

  pub fn push(&mut self, tick: u32, event: Event) -> &mut Self {
    self.events.push((tick, event));
    self
  }

  pub fn events(&self) -> &[(u32, Event)] {
    self.events.as_slice()
  }

  /// Chunk body: events ordered by tick (insertion order among equal ticks)
  /// with delta times, closed by an end-of-track event.
  fn encode(&self) -> Vec<u8> {
    let mut events: Vec<&(u32, Event)> = self.events.iter().collect();
    events.sort_by_key(|(tick, _)| *tick);

    let mut data = Vec::new();
    let mut last = 0;
    for (tick, event) in events {
      if let Event::Meta(Meta::EndOfTrack) = event {
        continue;
      }
      Encoder::encode_vlq(tick - last, &mut data);
      Encoder::encode_event(event, &mut data);
      last = *tick;
    }
    let end = self.events.iter().map(|(tick, _)| *tick).max().unwrap_or(0);
    Encoder::encode_vlq(end - last, &mut data);
    Encoder::encode_event(&Event::Meta(Meta::EndOfTrack), &mut data);
    data
  }
}

/// Format 1 standard MIDI file.
#[derive(Debug, Clone)]
pub struct Smf {
  pub ticks_per_quarter: u16,
  pub tracks: Vec<SmfTrack>,
}

impl Smf {
  pub fn new(ticks_per_quarter: u16) -> Smf {
    Smf {
      ticks_per_quarter,
      tracks: Vec::new(),
    }
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    let mut data = Vec::new();
    let mut header = [0u8; 6];
    BigEndian::write_u16(&mut header[0..2], 1);
    BigEndian::write_u16(&mut header[2..4], self.tracks.len() as u16);
    BigEndian::write_u16(&mut header[4..6], self.ticks_per_quarter);
    write_chunk(&mut data, b"MThd", &header);
    for track in self.tracks.iter() {
      write_chunk(&mut data, b"MTrk", &track.encode());
    }
    data
  }
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], body: &[u8]) {
  let mut length = [0u8; 4];
  BigEndian::write_u32(&mut length, body.len() as u32);
  out.extend_from_slice(tag);
  out.extend_from_slice(&length);
  out.extend_from_slice(body);
}

#[cfg(test)]
mod test {

  use super::{Smf, SmfTrack};
  use crate::midi::messages::{Event, Message, Meta};

  #[test]
  pub fn empty_file() {
    let smf = Smf::new(480);
    assert_eq!(
      smf.to_bytes(),
      vec![b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 0, 0x01, 0xe0]
    );
  }

  #[test]
  pub fn track_deltas() {
    let mut track = SmfTrack::new();
    track
      .push(
        480,
        Event::Message(Message::NoteOff {
          channel: 0,
          key: 60,
          velocity: 0,
        }),
      )
      .push(
        0,
        Event::Message(Message::NoteOn {
          channel: 0,
          key: 60,
          velocity: 64,
        }),
      );
    let mut smf = Smf::new(480);
    smf.tracks.push(track);

    let data = smf.to_bytes();
    assert_eq!(&data[14..18], b"MTrk");
    assert_eq!(&data[18..22], &[0, 0, 0, 13]);
    assert_eq!(
      &data[22..],
      &[0x00, 0x90, 60, 64, 0x83, 0x60, 0x80, 60, 0, 0x00, 0xff, 0x2f, 0x00]
    );
  }
}
