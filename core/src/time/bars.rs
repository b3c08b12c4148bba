use std::fmt;

use crate::time::{ticks::TICKS_PER_WHOLE, Signature};

/// Song position as shown by the editor: measure, 1-based beat and ticks into
/// the beat. Measures are numbered in the signature map's own numbering.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Position {
  bar: i32,
  beat: i32,
  ticks: i32,
}

impl Position {
  pub fn new(bar: i32, beat: i32, ticks: i32) -> Position {
    Position { bar, beat, ticks }
  }

  pub fn bar(bar: i32) -> Position {
    Position::new(bar, 1, 0)
  }

  pub fn get_bar(&self) -> i32 {
    self.bar
  }

  pub fn get_beat(&self) -> i32 {
    self.beat
  }

  pub fn get_ticks(&self) -> i32 {
    self.ticks
  }

  /// Ticks counted from the first signature's measure.
  pub fn to_ticks(&self, signatures: &[Signature]) -> i32 {
    let first = match signatures.first() {
      Some(first) => *first,
      None => Signature::default(),
    };
    let mut ticks = 0;
    let mut current = first;
    for signature in signatures.iter().skip(1) {
      if signature.get_measure() > self.bar {
        break;
      }
      ticks += measures_to_ticks(signature.get_measure() - current.get_measure(), &current);
      current = *signature;
    }
    ticks += measures_to_ticks(self.bar - current.get_measure(), &current);
    ticks + (self.beat - 1) * TICKS_PER_WHOLE / current.get_note_value() + self.ticks
  }

  pub fn from_ticks(ticks: i32, signatures: &[Signature]) -> Position {
    let first = match signatures.first() {
      Some(first) => *first,
      None => Signature::default(),
    };
    let mut offset = 0;
    let mut current = first;
    for signature in signatures.iter().skip(1) {
      let span = measures_to_ticks(signature.get_measure() - current.get_measure(), &current);
      if ticks < offset + span {
        break;
      }
      offset += span;
      current = *signature;
    }
    let measure_ticks = current.ticks_per_measure();
    let local = ticks - offset;
    let bar = current.get_measure() + local.div_euclid(measure_ticks);
    let rest = local.rem_euclid(measure_ticks);
    Position {
      bar,
      beat: rest / current.ticks_per_beat() + 1,
      ticks: rest % current.ticks_per_beat(),
    }
  }
}

fn measures_to_ticks(measures: i32, signature: &Signature) -> i32 {
  measures * signature.get_num_beats() * TICKS_PER_WHOLE / signature.get_note_value()
}

impl fmt::Debug for Position {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:04}:{:02}:{:03}", self.bar, self.beat, self.ticks)
  }
}
