//! UTAU `.ust` sequence files.
//!
//! ```text
//! [#SETTING]
//! Tempo=120.00
//! [#0000]
//! Length=480
//! Lyric=a
//! NoteNum=60
//! [#TRACKEND]
//! ```

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::config::NoteDefaults;
use crate::error::{DvError, Result};
use crate::project::{Note, Project, Segment};

pub const REST_LYRIC: &str = "R";
pub const REST_NOTE_NUM: i32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct UstNote {
  pub length: i32,
  pub lyric: String,
  pub note_num: i32,
}

impl UstNote {
  pub fn new<T>(length: i32, lyric: T, note_num: i32) -> UstNote
  where
    T: Into<String>,
  {
    UstNote {
      length,
      lyric: lyric.into(),
      note_num,
    }
  }

  pub fn rest(length: i32) -> UstNote {
    UstNote::new(length, REST_LYRIC, REST_NOTE_NUM)
  }

  pub fn is_rest(&self) -> bool {
    let lyric = self.lyric.trim();
    lyric.is_empty() || lyric.eq_ignore_ascii_case(REST_LYRIC)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UstFile {
  pub tempo: f64,
  pub project_name: String,
  pub notes: Vec<UstNote>,
}

impl UstFile {
  pub fn new(tempo: f64) -> UstFile {
    UstFile {
      tempo,
      project_name: String::new(),
      notes: Vec::new(),
    }
  }

  pub fn parse(text: &str) -> Result<UstFile> {
    let mut ust = UstFile::new(120.0);
    let mut section = String::new();
    let mut note: Option<UstNote> = None;

    for (number, line) in text.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      if line.starts_with("[#") && line.ends_with(']') {
        if let Some(note) = note.take() {
          ust.push_note(note)?;
        }
        section = line[2..line.len() - 1].to_string();
        if section == "TRACKEND" {
          break;
        }
        if section.chars().all(|c| c.is_ascii_digit()) {
          note = Some(UstNote::new(0, "", REST_NOTE_NUM));
        }
        continue;
      }
      let (key, value) = match line.find('=') {
        Some(index) => (&line[..index], &line[index + 1..]),
        None => continue,
      };
      match (section.as_str(), note.as_mut()) {
        ("SETTING", _) => match key {
          "Tempo" => ust.tempo = parse_value(number, key, value)?,
          "ProjectName" => ust.project_name = value.to_string(),
          _ => (),
        },
        (_, Some(note)) => match key {
          "Length" => note.length = parse_value(number, key, value)?,
          "Lyric" => note.lyric = value.to_string(),
          "NoteNum" => note.note_num = parse_value(number, key, value)?,
          _ => (),
        },
        _ => (),
      }
    }
    if let Some(note) = note.take() {
      ust.push_note(note)?;
    }
    debug!("Parsed UST with {} notes", ust.notes.len());
    Ok(ust)
  }

  fn push_note(&mut self, note: UstNote) -> Result<()> {
    if note.length <= 0 {
      return Err(DvError::text(
        "UST",
        format!("note {} has length {}", self.notes.len(), note.length),
      ));
    }
    self.notes.push(note);
    Ok(())
  }

  /// Notes of the segment in local time; gaps become rests.
  pub fn from_segment(segment: &Segment, tempo: f64, use_hanzi: bool) -> UstFile {
    let mut ust = UstFile::new(tempo);
    ust.project_name = segment.name.clone();
    let mut notes: Vec<&Note> = segment.notes.iter().collect();
    notes.sort_by_key(|note| note.start);
    let mut time = 0;
    for note in notes {
      if note.start > time {
        ust.notes.push(UstNote::rest(note.start - time));
      }
      ust
        .notes
        .push(UstNote::new(note.length, note.lyric(use_hanzi), note.pitch));
      time = note.end();
    }
    ust
  }

  /// Lays the notes out back to back from tick 0, leaving rests as gaps.
  pub fn to_segment(&self, defaults: &NoteDefaults) -> Segment {
    let length = self.notes.iter().map(|note| note.length).sum();
    let mut segment = Segment::new(0, length);
    segment.set_name(self.project_name.as_str());
    let mut time = 0;
    for ust_note in self.notes.iter() {
      if !ust_note.is_rest() {
        let note = Note::new(
          time,
          ust_note.length,
          ust_note.note_num,
          ust_note.lyric.as_str(),
          ust_note.lyric.as_str(),
        )
        .with_defaults(defaults);
        segment.add_note(note);
      }
      time += ust_note.length;
    }
    segment
  }
}

fn parse_value<T>(line: usize, key: &str, value: &str) -> Result<T>
where
  T: FromStr,
{
  value.trim().parse().map_err(|_| {
    DvError::text(
      "UST",
      format!("invalid {} value {:?} on line {}", key, value, line + 1),
    )
  })
}

impl fmt::Display for UstFile {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "[#VERSION]\r\nUST Version1.2\r\n")?;
    write!(f, "[#SETTING]\r\nTempo={:.2}\r\nTracks=1\r\n", self.tempo)?;
    write!(f, "ProjectName={}\r\n", self.project_name)?;
    for (index, note) in self.notes.iter().enumerate() {
      write!(
        f,
        "[#{:04}]\r\nLength={}\r\nLyric={}\r\nNoteNum={}\r\n",
        index, note.length, note.lyric, note.note_num
      )?;
    }
    write!(f, "[#TRACKEND]\r\n")
  }
}

impl Project {
  /// One sequence per synthesis track, segments flattened.
  pub fn to_ust_files(&self, use_hanzi: bool) -> Vec<UstFile> {
    let bpm = self.get_bpm();
    self
      .tracks
      .iter()
      .map(|track| {
        let mut flat = track.flatten();
        flat.cut(true, true);
        let mut ust = UstFile::from_segment(&flat, bpm, use_hanzi);
        ust.project_name = track.name.clone();
        ust
      })
      .collect()
  }
}

#[cfg(test)]
mod test {

  use super::{UstFile, UstNote};
  use crate::config::NoteDefaults;
  use crate::error::DvError;
  use crate::project::{Note, Project, Segment, Track};

  const SAMPLE: &str = "[#VERSION]\r\nUST Version1.2\r\n[#SETTING]\r\nTempo=96.00\r\nTracks=1\r\n\
ProjectName=demo\r\n[#0000]\r\nLength=480\r\nLyric=R\r\nNoteNum=60\r\n\
[#0001]\r\nLength=240\r\nLyric=la\r\nNoteNum=64\r\nIntensity=100\r\n[#TRACKEND]\r\n";

  #[test]
  pub fn parse_sample() {
    let ust = UstFile::parse(SAMPLE).unwrap();
    assert_eq!(ust.tempo, 96.0);
    assert_eq!(ust.project_name, "demo");
    assert_eq!(
      ust.notes,
      vec![UstNote::rest(480), UstNote::new(240, "la", 64)]
    );
  }

  #[test]
  pub fn display_parses_back() {
    let ust = UstFile::parse(SAMPLE).unwrap();
    assert_eq!(ust.to_string(), SAMPLE.replace("\r\nIntensity=100", ""));
    assert_eq!(UstFile::parse(&ust.to_string()).unwrap(), ust);
  }

  #[test]
  pub fn parse_invalid_length() {
    match UstFile::parse("[#0000]\nLength=abc\n") {
      Err(DvError::MalformedText { format, .. }) => assert_eq!(format, "UST"),
      other => panic!("unexpected result {:?}", other),
    }
    assert!(UstFile::parse("[#0000]\nLyric=a\n").is_err());
  }

  #[test]
  pub fn segment_with_gaps() {
    let mut segment = Segment::new(0, 1920);
    segment.add_notes(vec![
      Note::new(960, 480, 62, "b", "波"),
      Note::new(240, 240, 60, "a", "啊"),
    ]);
    let ust = UstFile::from_segment(&segment, 120.0, true);
    assert_eq!(
      ust.notes,
      vec![
        UstNote::rest(240),
        UstNote::new(240, "啊", 60),
        UstNote::rest(480),
        UstNote::new(480, "波", 62),
      ]
    );

    let back = ust.to_segment(&NoteDefaults::default());
    assert_eq!(back.length, 1440);
    let notes: Vec<(i32, i32, i32)> = back
      .notes
      .iter()
      .map(|note| (note.start, note.length, note.pitch))
      .collect();
    assert_eq!(notes, vec![(240, 240, 60), (960, 480, 62)]);
    assert_eq!(back.notes[0].hanzi, "啊");
  }

  #[test]
  pub fn project_tracks() {
    let mut segment = Segment::new(480, 480);
    segment.add_note(Note::new(0, 480, 60, "a", "啊"));
    let mut track = Track::new("Vocal");
    track.add_segment(segment);
    let mut project = Project::new();
    project.add_track(track);

    let files = project.to_ust_files(false);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].project_name, "Vocal");
    assert_eq!(
      files[0].notes,
      vec![UstNote::rest(480), UstNote::new(480, "a", 60)]
    );
  }
}
