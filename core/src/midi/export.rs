use log::debug;

use crate::config::Export;
use crate::project::Project;
use crate::time::{ticks::TICKS_PER_QUARTER, Position};

use super::messages::{Event, Message, Meta};
use super::smf::{Smf, SmfTrack};

/// Control track with tempo and signatures, then one track per synthesis
/// track with its lyrics and notes. Ticks map one to one.
pub fn project_to_smf(project: &Project, export: &Export) -> Smf {
  let mut smf = Smf::new(TICKS_PER_QUARTER as u16);

  let mut control = SmfTrack::new();
  control.push(0, Event::Meta(Meta::TrackName("Control".to_string())));
  for signature in project.signatures.iter() {
    let tick = project.position_to_tick(Position::bar(signature.get_measure()));
    control.push(
      tick.max(0) as u32,
      Event::Meta(Meta::TimeSignature {
        numerator: signature.get_num_beats() as u8,
        denominator: signature.get_note_value() as u8,
      }),
    );
  }
  for tempo in project.tempo.iter() {
    let micros = (60_000_000.0 / tempo.get_bpm()).round() as u32;
    control.push(tempo.get_tick().max(0) as u32, Event::Meta(Meta::Tempo(micros)));
  }
  smf.tracks.push(control);

  for (index, track) in project.tracks.iter().enumerate() {
    let channel = (index % 16) as u8;
    let mut flat = track.flatten();
    flat.quantize(export.quantize).fix_note_overlap();

    let mut events = SmfTrack::new();
    events.push(0, Event::Meta(Meta::TrackName(track.name.clone())));
    for note in flat.notes.iter() {
      let start = flat.start + note.start;
      if start < 0 {
        continue;
      }
      let (start, end) = (start as u32, (start + note.length) as u32);
      let key = note.pitch.max(0).min(127) as u8;
      let lyric = note.lyric(export.use_hanzi);
      if !export.ignore_lyrics.iter().any(|ignored| ignored == lyric) {
        events.push(start, Event::Meta(Meta::Lyric(lyric.to_string())));
      }
      events
        .push(
          start,
          Event::Message(Message::NoteOn {
            channel,
            key,
            velocity: export.velocity,
          }),
        )
        .push(
          end,
          Event::Message(Message::NoteOff {
            channel,
            key,
            velocity: 0,
          }),
        );
    }
    debug!(
      "Exported {} notes of track {:?} to channel {}",
      flat.notes.len(),
      track.name,
      channel
    );
    smf.tracks.push(events);
  }
  smf
}

impl Project {
  pub fn to_midi(&self, export: &Export) -> Vec<u8> {
    project_to_smf(self, export).to_bytes()
  }
}

#[cfg(test)]
mod test {

  use super::project_to_smf;
  use crate::config::Export;
  use crate::midi::messages::{Event, Message, Meta};
  use crate::project::{Note, Project, Segment, Track};

  fn project() -> Project {
    let mut segment = Segment::new(7680, 1920);
    segment.add_notes(vec![
      Note::new(0, 480, 60, "la", "啦"),
      Note::new(480, 480, 62, "-", "-"),
    ]);
    let mut track = Track::new("Vocal");
    track.add_segment(segment);
    let mut project = Project::new();
    project.add_track(track);
    project
  }

  #[test]
  pub fn control_track() {
    let smf = project_to_smf(&project(), &Export::default());
    assert_eq!(smf.tracks.len(), 2);
    assert_eq!(
      smf.tracks[0].events(),
      &[
        (0, Event::Meta(Meta::TrackName("Control".to_string()))),
        (
          0,
          Event::Meta(Meta::TimeSignature {
            numerator: 4,
            denominator: 4
          })
        ),
        (0, Event::Meta(Meta::Tempo(500_000))),
      ]
    );
  }

  #[test]
  pub fn notes_and_lyrics() {
    let smf = project_to_smf(&project(), &Export::default());
    let events = smf.tracks[1].events();
    assert_eq!(events.len(), 6);
    assert_eq!(events[1], (7680, Event::Meta(Meta::Lyric("la".to_string()))));
    assert_eq!(
      events[2],
      (
        7680,
        Event::Message(Message::NoteOn {
          channel: 0,
          key: 60,
          velocity: 64
        })
      )
    );
    assert_eq!(
      events[5],
      (
        8640,
        Event::Message(Message::NoteOff {
          channel: 0,
          key: 62,
          velocity: 0
        })
      )
    );
  }

  #[test]
  pub fn file_header() {
    let data = project().to_midi(&Export::default());
    assert_eq!(&data[0..4], b"MThd");
    assert_eq!(&data[10..12], &[0, 2]);
  }
}
