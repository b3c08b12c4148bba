use std::ops::Add;

use log::debug;

use crate::project::{curve::Curve, note::Note};
use crate::time::ticks::round_half_up;

pub const DEFAULT_VOLUME: i32 = 100;
pub const DEFAULT_PITCH: i32 = 0;
pub const DEFAULT_BREATH: i32 = 0;
pub const DEFAULT_GENDER: i32 = 0;

/// A run of notes sung by one voice bank.
///
/// `start` is in project ticks (counted from the first signature's measure,
/// normally three measures before the song starts); note ticks and curve
/// times are local to the segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
  pub start: i32,
  pub length: i32,
  pub name: String,
  pub singer: String,
  pub notes: Vec<Note>,

  pub volume: Curve,
  /// Absolute pitch override in cents, 0 where the synthesized pitch is used.
  pub pitch: Curve,
  pub breath: Curve,
  pub gender: Curve,
}

impl Segment {
  pub fn new(start: i32, length: i32) -> Segment {
    Segment {
      start,
      length,
      name: String::new(),
      singer: String::new(),
      notes: Vec::new(),
      volume: Curve::flat(length, DEFAULT_VOLUME),
      pitch: Curve::flat(length, DEFAULT_PITCH),
      breath: Curve::flat(length, DEFAULT_BREATH),
      gender: Curve::flat(length, DEFAULT_GENDER),
    }
  }

  pub fn set_name<T>(&mut self, name: T) -> &mut Self
  where
    T: Into<String>,
  {
    self.name = name.into();
    self
  }

  pub fn set_singer<T>(&mut self, singer: T) -> &mut Self
  where
    T: Into<String>,
  {
    self.singer = singer.into();
    self
  }

  pub fn add_note(&mut self, note: Note) -> &mut Self {
    self.notes.push(note);
    self
  }

  pub fn add_notes(&mut self, notes: Vec<Note>) -> &mut Self {
    self.notes.extend(notes);
    self
  }

  pub fn end(&self) -> i32 {
    self.start + self.length
  }

  pub fn curves(&self) -> [&Curve; 4] {
    [&self.volume, &self.pitch, &self.breath, &self.gender]
  }

  pub fn curves_mut(&mut self) -> [&mut Curve; 4] {
    [
      &mut self.volume,
      &mut self.pitch,
      &mut self.breath,
      &mut self.gender,
    ]
  }

  /// Changes the length and re-anchors the curves to the new span.
  pub fn set_length(&mut self, length: i32) -> &mut Self {
    self.length = length;
    self.cut_param()
  }

  /// Sorts notes by start tick, keeping the relative order of equal starts.
  pub fn sort(&mut self) -> &mut Self {
    self.notes.sort_by_key(|note| note.start);
    self
  }

  pub fn lyrics(&self, use_hanzi: bool, ignore: &[String]) -> Vec<String> {
    self
      .notes
      .iter()
      .map(|note| note.lyric(use_hanzi))
      .filter(|lyric| !ignore.iter().any(|ignored| ignored == lyric))
      .map(|lyric| lyric.to_string())
      .collect()
  }

  /// Joins two segments into one that spans both; the later segment's notes
  /// and curve points are moved into the earlier one's local time.
  ///
  /// The result ends at the later of the two ends, so a segment nested inside
  /// the other one never shortens it.
  pub fn concat(&self, other: &Segment) -> Segment {
    if other.start < self.start {
      return other.concat(self);
    }
    let delta = other.start - self.start;
    let length = (delta + other.length).max(self.length);

    let mut notes = self.notes.clone();
    notes.extend(other.notes.iter().cloned().map(|mut note| {
      note.start += delta;
      note
    }));

    Segment {
      start: self.start,
      length,
      name: self.name.clone(),
      singer: self.singer.clone(),
      notes,
      volume: concat_curve(&self.volume, &other.volume, delta, length),
      pitch: concat_curve(&self.pitch, &other.pitch, delta, length),
      breath: concat_curve(&self.breath, &other.breath, delta, length),
      gender: concat_curve(&self.gender, &other.gender, delta, length),
    }
  }

  /// Snaps note boundaries, in project ticks, to multiples of `divisor`.
  /// Notes that collapse to nothing are dropped.
  pub fn quantize(&mut self, divisor: i32) -> &mut Self {
    if divisor <= 0 {
      return self;
    }
    let origin = self.start;
    let notes = std::mem::replace(&mut self.notes, Vec::new());
    self.notes = notes
      .into_iter()
      .filter_map(|mut note| {
        let start = round_half_up(origin + note.start, divisor);
        let end = round_half_up(origin + note.end(), divisor);
        if end <= start {
          None
        } else {
          note.start = start - origin;
          note.length = end - start;
          Some(note)
        }
      })
      .collect();
    self
  }

  /// Removes notes the editor cannot render: anything entirely outside
  /// `[0, length)`, plus notes starting before 0 (`head`) or ending after
  /// `length` (`tail`).
  pub fn cut(&mut self, head: bool, tail: bool) -> &mut Self {
    let length = self.length;
    let before = self.notes.len();
    self.notes.retain(|note| {
      let outside = note.end() <= 0 || note.start >= length;
      let cut_head = head && note.start < 0;
      let cut_tail = tail && note.end() > length;
      !(outside || cut_head || cut_tail)
    });
    let removed = before - self.notes.len();
    if removed > 0 {
      debug!("Cut {} notes from segment {:?}", removed, self.name);
    }
    self
  }

  /// Re-anchors the four control curves to `[-1, length + 1]`.
  pub fn cut_param(&mut self) -> &mut Self {
    let length = self.length;
    for curve in self.curves_mut().iter_mut() {
      curve.anchor(length);
    }
    self
  }

  /// Keeps only the highest note of each start tick and shortens notes that
  /// run into their successor.
  pub fn fix_note_overlap(&mut self) -> &mut Self {
    self
      .notes
      .sort_by(|a, b| a.start.cmp(&b.start).then(b.pitch.cmp(&a.pitch)));
    self.notes.dedup_by(|later, kept| later.start == kept.start);
    for index in 1..self.notes.len() {
      let next_start = self.notes[index].start;
      let previous = &mut self.notes[index - 1];
      if previous.end() > next_start {
        previous.length = next_start - previous.start;
      }
    }
    self
  }

  /// Repairs the segment into a form the editor accepts.
  pub fn fix(&mut self) -> &mut Self {
    self.cut(true, true).cut_param().fix_note_overlap()
  }
}

fn concat_curve(first: &Curve, second: &Curve, delta: i32, length: i32) -> Curve {
  let mut points: Vec<_> = first
    .points()
    .iter()
    .filter(|&&(time, _)| time < delta)
    .cloned()
    .collect();
  points.extend(
    second
      .points()
      .iter()
      .filter(|&&(time, _)| time >= 0)
      .map(|&(time, value)| (time + delta, value)),
  );
  let mut curve = Curve::from_points(points);
  curve.anchor(length);
  curve
}

impl<'a> Add<&'a Segment> for &'a Segment {
  type Output = Segment;

  fn add(self, rhs: &'a Segment) -> Segment {
    self.concat(rhs)
  }
}

#[cfg(test)]
mod test {

  use super::{Segment, DEFAULT_VOLUME};
  use crate::project::{curve::Curve, note::Note};

  fn note(start: i32, length: i32, pitch: i32) -> Note {
    Note::new(start, length, pitch, "a", "啊")
  }

  fn starts(segment: &Segment) -> Vec<(i32, i32, i32)> {
    segment
      .notes
      .iter()
      .map(|note| (note.start, note.length, note.pitch))
      .collect()
  }

  #[test]
  pub fn segment_new() {
    let segment = Segment::new(1920, 960);
    assert_eq!(segment.end(), 2880);
    assert!(segment.notes.is_empty());
    assert_eq!(segment.volume, Curve::flat(960, DEFAULT_VOLUME));
    for curve in segment.curves().iter() {
      assert!(curve.is_anchored(960));
    }
  }

  #[test]
  pub fn concat_adjacent() {
    let mut first = Segment::new(0, 480);
    first.add_note(note(0, 480, 60));
    let mut second = Segment::new(480, 240);
    second.add_note(note(0, 240, 62));

    let merged = &first + &second;
    assert_eq!(merged.start, 0);
    assert_eq!(merged.length, 720);
    assert_eq!(starts(&merged), vec![(0, 480, 60), (480, 240, 62)]);
    for curve in merged.curves().iter() {
      assert!(curve.is_anchored(720));
    }
  }

  #[test]
  pub fn concat_is_order_independent() {
    let mut first = Segment::new(960, 480);
    first.add_note(note(0, 480, 60));
    let mut second = Segment::new(0, 480);
    second.add_note(note(0, 480, 67));

    let merged = first.concat(&second);
    assert_eq!(merged.start, 0);
    assert_eq!(merged.length, 1440);
    assert_eq!(starts(&merged), vec![(0, 480, 67), (960, 480, 60)]);
  }

  #[test]
  pub fn concat_nested_keeps_length() {
    let mut outer = Segment::new(0, 1920);
    outer.add_note(note(0, 480, 60));
    let mut inner = Segment::new(480, 240);
    inner.add_note(note(0, 240, 62));

    let merged = &outer + &inner;
    assert_eq!(merged.length, 1920);
    assert_eq!(starts(&merged), vec![(0, 480, 60), (480, 240, 62)]);
  }

  #[test]
  pub fn concat_merges_curves() {
    let mut first = Segment::new(0, 100);
    first.volume = Curve::from_points(vec![(-1, 10), (50, 20), (101, 30)]);
    let mut second = Segment::new(200, 100);
    second.volume = Curve::from_points(vec![(-1, 40), (50, 50), (101, 60)]);

    let merged = first.concat(&second);
    assert_eq!(
      merged.volume.points(),
      &[(-1, 10), (50, 20), (101, 30), (250, 50), (301, 60)]
    );
  }

  #[test]
  pub fn quantize_rounds_absolute_ticks() {
    let mut segment = Segment::new(10, 1920);
    segment.add_notes(vec![note(100, 250, 60), note(400, 30, 62), note(470, 480, 64)]);
    segment.quantize(240);
    assert_eq!(starts(&segment), vec![(-10, 480, 60), (470, 480, 64)]);
  }

  #[test]
  pub fn quantize_is_idempotent() {
    let mut segment = Segment::new(0, 1920);
    segment.add_notes(vec![note(13, 250, 60), note(290, 200, 62), note(700, 333, 64)]);
    segment.quantize(120);
    let once = segment.clone();
    segment.quantize(120);
    assert_eq!(segment, once);
  }

  #[test]
  pub fn cut_removes_outside_notes() {
    let mut segment = Segment::new(0, 960);
    segment.add_notes(vec![
      note(-480, 240, 60),
      note(-120, 240, 61),
      note(480, 960, 62),
      note(960, 240, 63),
    ]);
    segment.cut(false, false);
    assert_eq!(starts(&segment), vec![(-120, 240, 61), (480, 960, 62)]);
  }

  #[test]
  pub fn cut_head_and_tail() {
    let mut segment = Segment::new(0, 960);
    segment.add_notes(vec![note(-120, 240, 61), note(120, 240, 60), note(480, 960, 62)]);
    assert_eq!(
      starts(segment.clone().cut(false, true)),
      vec![(-120, 240, 61), (120, 240, 60)]
    );
    assert_eq!(
      starts(segment.cut(true, false)),
      vec![(120, 240, 60), (480, 960, 62)]
    );
  }

  #[test]
  pub fn cut_param_follows_length() {
    let mut segment = Segment::new(0, 960);
    segment.breath = Curve::from_points(vec![(-1, 0), (480, 100), (961, 0)]);
    segment.set_length(480);
    assert_eq!(segment.breath.points(), &[(-1, 0), (480, 100), (481, 100)]);
    assert!(segment.volume.is_anchored(480));
  }

  #[test]
  pub fn fix_note_overlap_keeps_highest() {
    let mut low_first = Segment::new(0, 1920);
    low_first.add_notes(vec![note(0, 480, 60), note(0, 480, 67)]);
    let mut high_first = Segment::new(0, 1920);
    high_first.add_notes(vec![note(0, 480, 67), note(0, 480, 60)]);

    low_first.fix_note_overlap();
    high_first.fix_note_overlap();
    assert_eq!(starts(&low_first), vec![(0, 480, 67)]);
    assert_eq!(low_first, high_first);
  }

  #[test]
  pub fn fix_note_overlap_truncates() {
    let mut segment = Segment::new(0, 1920);
    segment.add_notes(vec![note(480, 480, 62), note(0, 720, 60), note(960, 100, 64)]);
    segment.fix_note_overlap();
    assert_eq!(
      starts(&segment),
      vec![(0, 480, 60), (480, 480, 62), (960, 100, 64)]
    );
  }

  #[test]
  pub fn fix_composes() {
    let mut segment = Segment::new(0, 960);
    segment.volume = Curve::from_points(vec![(0, 50)]);
    segment.add_notes(vec![
      note(-240, 480, 60),
      note(0, 600, 62),
      note(480, 480, 64),
      note(720, 480, 65),
    ]);
    segment.fix();
    assert_eq!(starts(&segment), vec![(0, 480, 62), (480, 480, 64)]);
    assert_eq!(segment.volume.points(), &[(-1, 50), (0, 50), (961, 50)]);
  }

  #[test]
  pub fn lyrics_skip_ignored() {
    let mut segment = Segment::new(0, 1920);
    segment.add_notes(vec![
      Note::new(0, 480, 60, "la", "啦"),
      Note::new(480, 480, 60, "-", "-"),
      Note::new(960, 480, 60, "li", "哩"),
    ]);
    let ignore = vec!["-".to_string()];
    assert_eq!(segment.lyrics(false, &ignore), vec!["la", "li"]);
    assert_eq!(segment.lyrics(true, &[]), vec!["啦", "-", "哩"]);
  }
}
