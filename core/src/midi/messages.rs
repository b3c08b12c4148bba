use super::types::{U4, U7};

/// Channel messages written by the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
  NoteOff { channel: U4, key: U7, velocity: U7 },
  NoteOn { channel: U4, key: U7, velocity: U7 },
}

/// Meta events of a standard MIDI file track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Meta {
  TrackName(String),
  Lyric(String),
  /// Microseconds per quarter note.
  Tempo(u32),
  TimeSignature { numerator: u8, denominator: u8 },
  EndOfTrack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  Message(Message),
  Meta(Meta),
}
