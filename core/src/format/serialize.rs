use log::debug;

use crate::codec::Writer;
use crate::format::constants::*;
use crate::project::{AccompanimentTrack, Curve, Note, Project, Segment, Track};

/// Encodes a project. Panics when an entity breaks an invariant the file
/// format relies on: empty tempo or signature maps, non-positive note
/// lengths, segment curves without their boundary points.
pub fn serialize_project(project: &Project) -> Vec<u8> {
  assert!(!project.tempo.is_empty(), "project has no tempo marks");
  assert!(!project.signatures.is_empty(), "project has no signatures");

  let mut writer = Writer::new();
  writer
    .write_raw(&MAGIC[..])
    .write_i32(VERSION)
    .write_block(|body| write_body(body, project));
  writer.into_bytes()
}

fn write_body(writer: &mut Writer, project: &Project) {
  writer
    .write_raw(&BODY_FILLER)
    .write_block(|block| {
      block.write_list(&project.tempo, |writer, tempo| {
        writer
          .write_i32(tempo.get_tick())
          .write_i32(tempo.get_hundredths());
      });
    })
    .write_block(|block| {
      block.write_list(&project.signatures, |writer, signature| {
        writer
          .write_i32(signature.get_measure())
          .write_i32(signature.get_num_beats())
          .write_i32(signature.get_note_value());
      });
    });

  debug!(
    "Writing {} tracks and {} accompaniments",
    project.tracks.len(),
    project.accompaniments.len()
  );
  writer.write_len(project.tracks.len() + project.accompaniments.len());
  for track in project.tracks.iter() {
    write_track(writer, track);
  }
  for accompaniment in project.accompaniments.iter() {
    write_accompaniment(writer, accompaniment);
  }
}

fn write_track(writer: &mut Writer, track: &Track) {
  writer
    .write_i32(TRACK_SYNTHESIS)
    .write_str(&track.name)
    .write_flag(track.mute)
    .write_flag(track.solo)
    .write_i32(track.volume)
    .write_i32(encode_balance(track.balance))
    .write_block(|block| {
      block.write_list(&track.segments, write_segment);
    });
}

fn write_segment(writer: &mut Writer, segment: &Segment) {
  writer
    .write_i32(segment.start)
    .write_i32(segment.length)
    .write_str(&segment.name)
    .write_str(&segment.singer)
    .write_block(|block| {
      block.write_list(&segment.notes, write_note);
    });

  let neutral = Curve::flat(segment.length, 0);
  write_curve(writer, &segment.volume, "volume");
  write_curve(writer, &segment.pitch.map_values(encode_pitch), "pitch");
  write_curve(writer, &neutral, "neutral");
  write_curve(writer, &segment.breath, "breath");
  write_curve(writer, &segment.gender, "gender");

  for _ in 0..2 {
    writer.write_block(|block| {
      block.write_i32(SEGMENT_OPAQUE);
    });
  }
}

fn write_curve(writer: &mut Writer, curve: &Curve, name: &str) {
  assert!(
    curve.len() >= 2,
    "{} curve needs its two boundary points, has {}",
    name,
    curve.len()
  );
  writer.write_block(|block| {
    block.write_points(curve.points());
  });
}

fn write_note(writer: &mut Writer, note: &Note) {
  assert!(
    note.length > 0,
    "note at tick {} has length {}",
    note.start,
    note.length
  );
  let vibrato_pitch = note.vibrato_pitch.map_values(|value| -value);
  writer
    .write_i32(note.start)
    .write_i32(note.length)
    .write_i32(NOTE_PITCH_BASE - note.pitch)
    .write_i32(note.vibrato_length)
    .write_str(&note.pinyin)
    .write_str(&note.hanzi)
    .write_u8(0)
    .write_block(|block| {
      block
        .write_points(note.vibrato_amplitude.points())
        .write_points(note.vibrato_frequency.points())
        .write_points(vibrato_pitch.points());
    })
    .write_bytes(&note.opaque)
    .write_raw(&PHONEME_PADDING);
  for _ in 0..PHONEME_SLOTS {
    writer.write_f32(PHONEME_UNSET);
  }
  writer
    .write_i32(note.bend_depth)
    .write_i32(note.bend_length)
    .write_i32(note.portamento_tail)
    .write_i32(note.portamento_head)
    .write_i32(note.timbre)
    .write_str(&note.cross_lyric)
    .write_i32(note.cross_timbre);
}

fn write_accompaniment(writer: &mut Writer, accompaniment: &AccompanimentTrack) {
  writer
    .write_i32(TRACK_ACCOMPANIMENT)
    .write_str(&accompaniment.name)
    .write_flag(accompaniment.mute)
    .write_flag(accompaniment.solo)
    .write_i32(accompaniment.volume)
    .write_i32(encode_balance(0))
    .write_block(|block| {
      block
        .write_i32(1)
        .write_i32(accompaniment.start)
        .write_i32(accompaniment.length)
        .write_str(&accompaniment.file_name())
        .write_str(&accompaniment.path);
    });
}
