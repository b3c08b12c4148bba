//! Timed lyrics (`.lrc`) from a vocal track.
//!
//! The user splits the track's lyrics into lines; each line is stamped with
//! the time of its first lyric, counted from the start of measure 1.

use crate::project::{Project, Track};
use crate::time::Position;

const HOLD_LYRIC: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct LyricEvent {
  pub seconds: f64,
  pub lyric: String,
}

/// Sung lyrics of a track in order, skipping held notes.
pub fn lyric_events(project: &Project, track: &Track, use_hanzi: bool) -> Vec<LyricEvent> {
  let mut track = track.clone();
  for segment in track.segments.iter_mut() {
    segment.cut(true, true);
  }
  let flat = track.flatten();
  let origin = project.tick_to_seconds(project.position_to_tick(Position::bar(1)));
  flat
    .notes
    .iter()
    .filter(|note| {
      let lyric = note.lyric(use_hanzi);
      !lyric.is_empty() && lyric != HOLD_LYRIC
    })
    .map(|note| LyricEvent {
      seconds: project.tick_to_seconds(flat.start + note.start) - origin,
      lyric: note.lyric(use_hanzi).to_string(),
    })
    .collect()
}

/// All lyrics joined, the text offered to the user for line breaking.
pub fn lyric_text(events: &[LyricEvent]) -> String {
  events.iter().map(|event| event.lyric.as_str()).collect()
}

pub fn timestamp(seconds: f64) -> String {
  let centis = (seconds.max(0.0) * 100.0).round() as i64;
  format!(
    "[{:02}:{:02}.{:02}]",
    centis / 6000,
    centis % 6000 / 100,
    centis % 100
  )
}

/// Stamps every line that contains the next unmatched lyric and consumes
/// all lyrics found in it. Lines without it are dropped.
pub fn make_lrc<S>(events: &[LyricEvent], lines: &[S]) -> String
where
  S: AsRef<str>,
{
  let mut lrc = String::new();
  let mut current = 0;
  for line in lines.iter().map(|line| line.as_ref().trim_end()) {
    if current >= events.len() {
      break;
    }
    if !line.contains(events[current].lyric.as_str()) {
      continue;
    }
    lrc.push_str(&timestamp(events[current].seconds));
    lrc.push_str(line);
    lrc.push('\n');

    let mut rest = line;
    while let Some(event) = events.get(current) {
      match rest.find(event.lyric.as_str()) {
        Some(index) => {
          rest = &rest[index + event.lyric.len()..];
          current += 1;
        }
        None => break,
      }
    }
  }
  lrc
}
