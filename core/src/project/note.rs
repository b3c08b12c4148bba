use crate::config::NoteDefaults;
use crate::project::curve::Curve;

/// Timbre selector value meaning "follow the note pitch".
pub const TIMBRE_FOLLOW_PITCH: i32 = -1;

/// A sung note. Ticks are local to the owning segment, 480 per quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
  pub start: i32,
  pub length: i32,
  /// Semitone number, MIDI compatible (C4 = 60).
  pub pitch: i32,
  pub pinyin: String,
  pub hanzi: String,

  pub bend_depth: i32,
  pub bend_length: i32,
  pub portamento_head: i32,
  pub portamento_tail: i32,
  /// `TIMBRE_FOLLOW_PITCH` or a fixed formant slot (0 = T1, 1 = T2, ...).
  pub timbre: i32,

  pub vibrato_length: i32,
  pub vibrato_amplitude: Curve,
  pub vibrato_frequency: Curve,
  /// Rendered vibrato offset: time in ms from the note start, value in cents.
  pub vibrato_pitch: Curve,

  pub cross_lyric: String,
  pub cross_timbre: i32,

  /// Per-note block the format carries but nobody has decoded yet; kept
  /// verbatim so files survive a load/save cycle.
  pub opaque: Vec<u8>,
}

impl Note {
  pub fn new<P, H>(start: i32, length: i32, pitch: i32, pinyin: P, hanzi: H) -> Note
  where
    P: Into<String>,
    H: Into<String>,
  {
    Note {
      start,
      length,
      pitch,
      pinyin: pinyin.into(),
      hanzi: hanzi.into(),
      bend_depth: 0,
      bend_length: 0,
      portamento_head: 0,
      portamento_tail: 20,
      timbre: TIMBRE_FOLLOW_PITCH,
      vibrato_length: 0,
      vibrato_amplitude: Curve::new(),
      vibrato_frequency: Curve::new(),
      vibrato_pitch: Curve::new(),
      cross_lyric: String::new(),
      cross_timbre: TIMBRE_FOLLOW_PITCH,
      opaque: Vec::new(),
    }
  }

  pub fn with_defaults(mut self, defaults: &NoteDefaults) -> Note {
    self.portamento_head = defaults.portamento_head;
    self.portamento_tail = defaults.portamento_tail;
    self.bend_depth = defaults.bend_depth;
    self.bend_length = defaults.bend_length;
    self.timbre = defaults.timbre;
    self
  }

  pub fn end(&self) -> i32 {
    self.start + self.length
  }

  pub fn lyric(&self, use_hanzi: bool) -> &str {
    if use_hanzi {
      self.hanzi.as_str()
    } else {
      self.pinyin.as_str()
    }
  }
}
