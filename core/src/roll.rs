use crate::config::NoteDefaults;
use crate::project::{Note, Segment};
use crate::ust::UstFile;

/// Neutral piano-roll note in absolute project ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollNote {
  pub start: i32,
  pub length: i32,
  pub key: i32,
  pub lyric: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PianoRoll {
  pub notes: Vec<RollNote>,
}

impl PianoRoll {
  pub fn new() -> PianoRoll {
    PianoRoll::default()
  }

  pub fn from_segment(segment: &Segment, use_hanzi: bool) -> PianoRoll {
    let mut notes: Vec<RollNote> = segment
      .notes
      .iter()
      .map(|note| RollNote {
        start: segment.start + note.start,
        length: note.length,
        key: note.pitch,
        lyric: note.lyric(use_hanzi).to_string(),
      })
      .collect();
    notes.sort_by_key(|note| note.start);
    PianoRoll { notes }
  }

  /// A segment spanning exactly the notes.
  pub fn to_segment(&self, defaults: &NoteDefaults) -> Segment {
    let start = self.notes.iter().map(|note| note.start).min().unwrap_or(0);
    let end = self
      .notes
      .iter()
      .map(|note| note.start + note.length)
      .max()
      .unwrap_or(start);
    let mut segment = Segment::new(start, end - start);
    for roll_note in self.notes.iter() {
      let note = Note::new(
        roll_note.start - start,
        roll_note.length,
        roll_note.key,
        roll_note.lyric.as_str(),
        roll_note.lyric.as_str(),
      )
      .with_defaults(defaults);
      segment.add_note(note);
    }
    segment.sort();
    segment
  }
}

/// Foreign note sources a segment can be built from.
#[derive(Debug, Clone)]
pub enum Import {
  Ust(UstFile),
  PianoRoll(PianoRoll),
}

impl Import {
  pub fn into_segment(self, defaults: &NoteDefaults) -> Segment {
    match self {
      Import::Ust(ust) => ust.to_segment(defaults),
      Import::PianoRoll(roll) => roll.to_segment(defaults),
    }
  }
}

impl From<UstFile> for Import {
  fn from(ust: UstFile) -> Import {
    Import::Ust(ust)
  }
}

impl From<PianoRoll> for Import {
  fn from(roll: PianoRoll) -> Import {
    Import::PianoRoll(roll)
  }
}
