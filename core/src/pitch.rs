//! Pitch contour rendering.
//!
//! Values are in cents (100 per semitone), one sample per tick over the
//! segment. Only the first tempo mark is honored.

use std::f64::consts::PI;

use crate::project::{Note, Segment};
use crate::time::{ticks::ticks_per_second, Tempo};

const PORTAMENTO_SCALE: f64 = 0.025;
const BEND_LEAD_SECONDS: f64 = 0.093_75;
const BEND_SHORT_SECONDS: f64 = 0.375;
const BEND_SECONDS_PER_STEP: f64 = 0.006_875;
const BEND_SHORT_LIMIT: i32 = 50;
const BEND_LENGTH_MAX: i32 = 100;
const BEND_SCALE: f64 = 3.0;

/// Base contour from the notes and their ornaments, without the segment's
/// pitch override.
pub fn basic_pitch(segment: &Segment, bpm: f64) -> Vec<f64> {
  let length = segment.length.max(0);
  let mut pitch = vec![0.0; length as usize];

  let mut notes: Vec<&Note> = segment.notes.iter().collect();
  notes.sort_by_key(|note| note.start);
  if notes.is_empty() {
    return pitch;
  }

  for (index, note) in notes.iter().enumerate() {
    let from = if index == 0 { 0 } else { note.start };
    let to = notes.get(index + 1).map_or(length, |next| next.start);
    let level = cents(note);
    for_ticks(length, f64::from(from), f64::from(to), |tick| {
      pitch[tick] = level
    });
  }

  for pair in notes.windows(2) {
    portamento(&mut pitch, pair[0], pair[1], bpm);
  }

  let rate = ticks_per_second(bpm);
  for note in notes.iter() {
    if note.bend_depth != 0 {
      bend(&mut pitch, note, rate);
    }
    vibrato(&mut pitch, note, rate);
  }
  pitch
}

/// Rendered pitch per tick: the base contour wherever the override curve is
/// zero, the override elsewhere.
pub fn synthesize_pitch_curve(segment: &Segment, tempo: &[Tempo]) -> Vec<i32> {
  let bpm = tempo
    .first()
    .map_or(Tempo::default().get_bpm(), |mark| mark.get_bpm());
  basic_pitch(segment, bpm)
    .into_iter()
    .enumerate()
    .map(|(tick, base)| {
      let authored = segment.pitch.value_at(tick as f64);
      let value = if authored != 0.0 { authored } else { base };
      value.round() as i32
    })
    .collect()
}

fn cents(note: &Note) -> f64 {
  100.0 * f64::from(note.pitch)
}

/// Visits the ticks in `[from, to)` that fall inside `[0, length)`.
fn for_ticks<F>(length: i32, from: f64, to: f64, mut f: F)
where
  F: FnMut(usize),
{
  let first = from.ceil().max(0.0) as i32;
  let last = to.ceil().min(f64::from(length)) as i32;
  for tick in first..last {
    f(tick as usize);
  }
}

fn portamento(pitch: &mut [f64], before: &Note, after: &Note, bpm: f64) {
  let boundary = f64::from(after.start);
  let shorter = f64::from(before.length.min(after.length)) / 2.0;
  let lead = shorter.min(PORTAMENTO_SCALE * f64::from(before.portamento_tail) * bpm);
  let trail = shorter.min(PORTAMENTO_SCALE * f64::from(after.portamento_head) * bpm);
  let window = lead + trail;
  if window <= 0.0 {
    return;
  }
  let (from, to) = (cents(before), cents(after));
  let begin = boundary - lead;
  let length = pitch.len() as i32;
  for_ticks(length, begin, boundary + trail, |tick| {
    let x = (tick as f64 - begin) / window;
    pitch[tick] = from + (to - from) * (1.0 - (PI * x).cos()) / 2.0;
  });
}

fn bend(pitch: &mut [f64], note: &Note, rate: f64) {
  let start = f64::from(note.start);
  let lead = (f64::from(note.length) / 2.0).min(BEND_LEAD_SECONDS * rate);
  let back_seconds = if note.bend_length < BEND_SHORT_LIMIT {
    BEND_SHORT_SECONDS
  } else {
    BEND_SECONDS_PER_STEP * f64::from(note.bend_length.min(BEND_LENGTH_MAX))
  };
  let back = back_seconds * rate;
  let scale = BEND_SCALE * f64::from(note.bend_depth);

  let length = (pitch.len() as i32).min(note.end());
  let dip = start + lead;
  for_ticks(length, start, dip + back, |tick| {
    let t = tick as f64;
    let shape = if t < dip {
      -(t - start) / lead
    } else {
      -(1.0 + (PI * (t - dip) / back).cos()) / 2.0
    };
    pitch[tick] += scale * shape;
  });
}

fn vibrato(pitch: &mut [f64], note: &Note, rate: f64) {
  if note.vibrato_pitch.is_empty() {
    return;
  }
  let start = f64::from(note.start);
  let length = (pitch.len() as i32).min(note.end());
  for_ticks(length, start, f64::from(note.end()), |tick| {
    let ms = (tick as f64 - start) * 1000.0 / rate;
    pitch[tick] += note.vibrato_pitch.sample(ms);
  });
}
