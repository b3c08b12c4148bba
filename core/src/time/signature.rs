use crate::time::ticks::TICKS_PER_WHOLE;

pub const NOTE_VALUES: [i32; 6] = [1, 2, 4, 8, 16, 32];

/// Time signature change at the start of `measure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
  measure: i32,
  num_beats: i32,  // numerator
  note_value: i32, // denominator
}

impl Signature {
  pub fn new(measure: i32, num_beats: i32, note_value: i32) -> Signature {
    assert!(Signature::is_valid_note_value(note_value));
    assert!(num_beats > 0);
    Signature {
      measure,
      num_beats,
      note_value,
    }
  }

  pub fn try_new(measure: i32, num_beats: i32, note_value: i32) -> Option<Signature> {
    if Signature::is_valid_note_value(note_value) && num_beats > 0 {
      Some(Signature {
        measure,
        num_beats,
        note_value,
      })
    } else {
      None
    }
  }

  pub fn is_valid_note_value(note_value: i32) -> bool {
    NOTE_VALUES.contains(&note_value)
  }

  pub fn get_measure(&self) -> i32 {
    self.measure
  }

  pub fn get_num_beats(&self) -> i32 {
    self.num_beats
  }

  pub fn get_note_value(&self) -> i32 {
    self.note_value
  }

  pub fn ticks_per_beat(&self) -> i32 {
    TICKS_PER_WHOLE / self.note_value
  }

  pub fn ticks_per_measure(&self) -> i32 {
    self.num_beats * TICKS_PER_WHOLE / self.note_value
  }
}

impl Default for Signature {
  fn default() -> Self {
    Signature::new(-3, 4, 4)
  }
}
