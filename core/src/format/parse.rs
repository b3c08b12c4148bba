use log::{debug, warn};

use crate::codec::{Point, Reader};
use crate::error::{DvError, Result};
use crate::format::constants::*;
use crate::project::{AccompanimentTrack, Curve, Note, Project, Segment, Track};
use crate::time::{Signature, Tempo};

pub fn parse_project(data: &[u8]) -> Result<Project> {
  let mut reader = Reader::new(data);

  let magic = reader.take(MAGIC.len())?;
  if magic != &MAGIC[..] {
    warn!("Unexpected magic tag {:?}", String::from_utf8_lossy(magic));
  }
  let version = reader.read_i32()?;
  if version != VERSION {
    debug!("Project file version {}", version);
  }
  // body length, filler and tempo block length are not trusted
  reader.skip(4 + BODY_FILLER.len() + 4)?;

  let tempo = parse_tempo(&mut reader)?;
  // signature block length
  reader.skip(4)?;
  let signatures = parse_signatures(&mut reader)?;

  let mut project = Project {
    tempo,
    signatures,
    tracks: Vec::new(),
    accompaniments: Vec::new(),
  };
  project.validate()?;

  let count = reader.read_count(4)?;
  debug!("Parsing {} tracks", count);
  for index in 0..count {
    let position = reader.position();
    match reader.read_i32()? {
      TRACK_SYNTHESIS => {
        let track = parse_track(&mut reader)?;
        project.tracks.push(track);
      }
      TRACK_ACCOMPANIMENT => {
        let accompaniments = parse_accompaniment(&mut reader)?;
        project.accompaniments.extend(accompaniments);
      }
      other => {
        return Err(DvError::malformed(format!(
          "unknown type {} for track {} at offset {}",
          other, index, position
        )));
      }
    }
  }

  if !reader.is_empty() {
    debug!("{} trailing bytes after the track list", reader.remaining());
  }
  Ok(project)
}

fn parse_tempo(reader: &mut Reader) -> Result<Vec<Tempo>> {
  let count = reader.read_count(8)?;
  let mut tempo = Vec::with_capacity(count);
  for _ in 0..count {
    let tick = reader.read_i32()?;
    let hundredths = reader.read_i32()?;
    tempo.push(Tempo::from_hundredths(tick, hundredths));
  }
  Ok(tempo)
}

fn parse_signatures(reader: &mut Reader) -> Result<Vec<Signature>> {
  let count = reader.read_count(12)?;
  let mut signatures = Vec::with_capacity(count);
  for _ in 0..count {
    let measure = reader.read_i32()?;
    let num_beats = reader.read_i32()?;
    let note_value = reader.read_i32()?;
    let signature = Signature::try_new(measure, num_beats, note_value).ok_or_else(|| {
      DvError::malformed(format!(
        "invalid signature {}/{} at measure {}",
        num_beats, note_value, measure
      ))
    })?;
    signatures.push(signature);
  }
  Ok(signatures)
}

fn parse_track(reader: &mut Reader) -> Result<Track> {
  let mut track = Track::new(reader.read_str()?);
  track.mute = reader.read_flag()?;
  track.solo = reader.read_flag()?;
  track.volume = reader.read_i32()?;
  track.balance = decode_balance(reader.read_i32()?);
  // segment list byte length
  reader.skip(4)?;

  let count = reader.read_count(8)?;
  debug!("Parsing {} segments of track {:?}", count, track.name);
  for _ in 0..count {
    let segment = parse_segment(reader)?;
    track.segments.push(segment);
  }
  Ok(track)
}

fn parse_segment(reader: &mut Reader) -> Result<Segment> {
  let position = reader.position();
  let start = reader.read_i32()?;
  let length = reader.read_i32()?;
  // curves span [-1, length + 1]
  if length < 0 || length == i32::max_value() {
    return Err(DvError::malformed(format!(
      "segment at offset {} has length {}",
      position, length
    )));
  }
  let mut segment = Segment::new(start, length);
  segment.name = reader.read_str()?;
  segment.singer = reader.read_str()?;
  // note list byte length
  reader.skip(4)?;

  let count = reader.read_count(4)?;
  debug!("Parsing {} notes of segment {:?}", count, segment.name);
  segment.notes.reserve(count);
  for _ in 0..count {
    let note = parse_note(reader)?;
    segment.notes.push(note);
  }

  segment.volume = parse_curve(reader, "volume")?;
  segment.pitch = parse_curve(reader, "pitch")?.map_values(decode_pitch);
  // regenerated on write
  parse_curve(reader, "neutral")?;
  segment.breath = parse_curve(reader, "breath")?;
  segment.gender = parse_curve(reader, "gender")?;

  reader.read_bytes()?;
  reader.read_bytes()?;
  Ok(segment)
}

fn parse_curve(reader: &mut Reader, name: &str) -> Result<Curve> {
  reader.skip(4)?;
  let points: Vec<Point> = reader.read_points()?;
  if points.len() < 2 {
    return Err(DvError::malformed(format!(
      "{} curve has {} points, at least the two boundaries are required",
      name,
      points.len()
    )));
  }
  Ok(Curve::from_points(points))
}

fn parse_note(reader: &mut Reader) -> Result<Note> {
  let position = reader.position();
  let start = reader.read_i32()?;
  let length = reader.read_i32()?;
  if length <= 0 {
    return Err(DvError::malformed(format!(
      "note at offset {} has length {}",
      position, length
    )));
  }
  let stored_pitch = reader.read_i32()?;
  let pitch = NOTE_PITCH_BASE.checked_sub(stored_pitch).ok_or_else(|| {
    DvError::malformed(format!(
      "note at offset {} has pitch word {}",
      position, stored_pitch
    ))
  })?;
  let vibrato_length = reader.read_i32()?;
  let pinyin = reader.read_str()?;
  let hanzi = reader.read_str()?;

  let mut note = Note::new(start, length, pitch, pinyin, hanzi);
  note.vibrato_length = vibrato_length;
  // unknown flag
  reader.skip(1)?;

  let mut vibrato = reader.read_block()?;
  note.vibrato_amplitude = Curve::from_points(vibrato.read_points()?);
  note.vibrato_frequency = Curve::from_points(vibrato.read_points()?);
  note.vibrato_pitch = negate(vibrato.read_points()?).ok_or_else(|| {
    DvError::malformed(format!(
      "note at offset {} has an unrepresentable vibrato value",
      position
    ))
  })?;

  note.opaque = reader.read_bytes()?.to_vec();
  reader.skip(PHONEME_PADDING.len())?;
  for _ in 0..PHONEME_SLOTS {
    let phoneme = reader.read_f32()?;
    if phoneme != PHONEME_UNSET {
      debug!("Note at offset {} carries phoneme value {}", position, phoneme);
    }
  }

  note.bend_depth = reader.read_i32()?;
  note.bend_length = reader.read_i32()?;
  note.portamento_tail = reader.read_i32()?;
  note.portamento_head = reader.read_i32()?;
  note.timbre = reader.read_i32()?;
  note.cross_lyric = reader.read_str()?;
  note.cross_timbre = reader.read_i32()?;
  Ok(note)
}

/// Vibrato pitch is stored with its sign flipped.
fn negate(points: Vec<Point>) -> Option<Curve> {
  points
    .into_iter()
    .map(|(time, value)| value.checked_neg().map(|value| (time, value)))
    .collect::<Option<Vec<Point>>>()
    .map(Curve::from_points)
}

fn parse_accompaniment(reader: &mut Reader) -> Result<Vec<AccompanimentTrack>> {
  let name = reader.read_str()?;
  let mute = reader.read_flag()?;
  let solo = reader.read_flag()?;
  let volume = reader.read_i32()?;
  // balance and clip block length
  reader.skip(4 + 4)?;

  let count = reader.read_count(16)?;
  let mut accompaniments = Vec::with_capacity(count);
  for _ in 0..count {
    let start = reader.read_i32()?;
    let length = reader.read_i32()?;
    // file name, derived from the path on write
    reader.read_bytes()?;
    let path = reader.read_str()?;
    accompaniments.push(AccompanimentTrack {
      name: name.clone(),
      start,
      length,
      path,
      volume,
      mute,
      solo,
    });
  }
  if count == 0 {
    debug!("Empty accompaniment track {:?}", name);
  }
  Ok(accompaniments)
}
