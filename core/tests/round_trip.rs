use dvfile_core::format::constants::{decode_pitch, encode_pitch, TRACK_ACCOMPANIMENT};
use dvfile_core::time::{Signature, Tempo};
use dvfile_core::{
  parse_project, serialize_project, AccompanimentTrack, Curve, DvError, Note, Project, Segment,
  Track,
};

fn rich_project() -> Project {
  let mut first = Note::new(0, 480, 60, "ni", "你");
  first.vibrato_length = 60;
  first.vibrato_amplitude = Curve::from_points(vec![(0, 0), (300, 40)]);
  first.vibrato_frequency = Curve::from_points(vec![(0, 55), (300, 60)]);
  first.vibrato_pitch = Curve::from_points(vec![(0, 0), (100, 35), (200, -35), (300, 0)]);
  first.opaque = vec![9, 8, 7, 6];

  let mut second = Note::new(480, 960, 64, "hao", "好");
  second.bend_depth = 25;
  second.bend_length = 80;
  second.portamento_head = 10;
  second.timbre = 1;
  second.cross_lyric = "ao".to_string();
  second.cross_timbre = 3;

  let mut segment = Segment::new(7680, 1920);
  segment
    .set_name("verse")
    .set_singer("demo")
    .add_note(first)
    .add_note(second);
  segment.volume = Curve::from_points(vec![(-1, 100), (480, 80), (1921, 90)]);
  segment.pitch = Curve::from_points(vec![(-1, 0), (600, 6400), (700, 6500), (1921, 0)]);
  segment.breath = Curve::from_points(vec![(-1, 10), (1921, 10)]);
  segment.gender = Curve::from_points(vec![(-1, -20), (960, 20), (1921, 0)]);

  let mut track = Track::new("Lead");
  track.volume = 70;
  track.balance = -25;
  track.solo = true;
  track.add_segment(segment).add_segment(Segment::new(11520, 960));

  let mut harmony = Track::new("Harmony");
  harmony.mute = true;

  let mut backing = AccompanimentTrack::new("Backing", "C:\\audio\\inst.wav", 7680, 38400);
  backing.volume = 50;
  backing.mute = true;

  let mut project = Project::new();
  project.tempo = vec![Tempo::new(0, 128.5), Tempo::new(15360, 96.0)];
  project.signatures = vec![Signature::new(-3, 4, 4), Signature::new(9, 6, 8)];
  project
    .add_track(track)
    .add_track(harmony)
    .add_accompaniment(backing);
  project
}

#[test]
fn rich_project_round_trip() {
  let project = rich_project();
  let data = serialize_project(&project);
  let parsed = parse_project(&data).unwrap();
  assert_eq!(parsed, project);
  assert_eq!(serialize_project(&parsed), data);
}

#[test]
fn tempo_round_trip() {
  let project = Project::new();
  let parsed = parse_project(&project.to_bytes()).unwrap();
  assert_eq!(parsed.tempo, vec![Tempo::new(0, 120.0)]);
  assert_eq!(parsed.tempo[0].get_bpm(), 120.0);
}

#[test]
fn header_is_48_bytes() {
  let data = serialize_project(&rich_project());
  assert_eq!(&data[0..8], b"SHARPKEY");
  // the tempo count follows the magic, version, body length, filler and
  // tempo block length
  assert_eq!(&data[48..52], &[2, 0, 0, 0]);
  assert_eq!(&data[52..56], &[0, 0, 0, 0]);
  assert_eq!(&data[56..60], &12850i32.to_le_bytes());
}

#[test]
fn unknown_track_type() {
  let mut project = Project::new();
  project.add_track(Track::new("Lead"));
  let mut data = project.to_bytes();
  // type discriminant of the only track sits after tempo and signature blocks
  let offset = 48 + 4 + 8 + 4 + 4 + 12 + 4;
  assert_eq!(&data[offset..offset + 4], &[0, 0, 0, 0]);
  data[offset..offset + 4].copy_from_slice(&2i32.to_le_bytes());
  match parse_project(&data) {
    Err(DvError::MalformedProject { .. }) => (),
    other => panic!("unexpected result {:?}", other.map(|_| ())),
  }
}

#[test]
fn accompaniment_lane() {
  let mut project = Project::new();
  project.add_accompaniment(AccompanimentTrack::new("Backing", "/audio/inst.wav", 0, 1920));
  let data = project.to_bytes();
  let offset = 48 + 4 + 8 + 4 + 4 + 12 + 4;
  assert_eq!(&data[offset..offset + 4], &TRACK_ACCOMPANIMENT.to_le_bytes());
  let parsed = parse_project(&data).unwrap();
  assert_eq!(parsed.accompaniments, project.accompaniments);
  assert!(parsed.tracks.is_empty());
}

#[test]
fn truncated_input() {
  let data = serialize_project(&rich_project());
  for &cut in &[4, 47, 100, data.len() / 2, data.len() - 1] {
    match parse_project(&data[..cut]) {
      Err(DvError::TruncatedInput { .. }) | Err(DvError::MalformedProject { .. }) => (),
      other => panic!("cut at {}: unexpected result {:?}", cut, other.map(|_| ())),
    }
  }
  match parse_project(&data[..data.len() - 1]) {
    Err(DvError::TruncatedInput {
      needed, available, ..
    }) => assert_eq!(needed, available + 1),
    other => panic!("unexpected result {:?}", other.map(|_| ())),
  }
}

fn single_note_project() -> Vec<u8> {
  let mut note = Note::new(0, 480, 60, "la", "啦");
  note.vibrato_pitch = Curve::from_points(vec![(0, 7)]);
  let mut segment = Segment::new(0, 480);
  segment.add_note(note);
  let mut track = Track::new("Lead");
  track.add_segment(segment);
  let mut project = Project::new();
  project.add_track(track);
  project.to_bytes()
}

// track type 84, name 88, flags 96, volume 98, balance 102, segment block 106,
// segment count 110, then the only segment
const SEGMENT_LENGTH: usize = 118;
// note count 134, note start 138, note length 142
const NOTE_PITCH: usize = 146;
// vibrato length 150, lyrics up to 167, flag 167, vibrato block 168,
// amplitude and frequency counts 172 and 176, pitch count 180, point 184
const VIBRATO_VALUE: usize = 188;

fn assert_malformed(data: &[u8]) {
  match parse_project(data) {
    Err(DvError::MalformedProject { .. }) => (),
    other => panic!("unexpected result {:?}", other.map(|_| ())),
  }
}

#[test]
fn single_note_offsets() {
  let data = single_note_project();
  assert_eq!(&data[SEGMENT_LENGTH..SEGMENT_LENGTH + 4], &480i32.to_le_bytes());
  assert_eq!(&data[NOTE_PITCH..NOTE_PITCH + 4], &55i32.to_le_bytes());
  assert_eq!(&data[VIBRATO_VALUE..VIBRATO_VALUE + 4], &(-7i32).to_le_bytes());
  let parsed = parse_project(&data).unwrap();
  assert_eq!(parsed.tracks[0].segments[0].notes[0].pitch, 60);
}

#[test]
fn phoneme_area_layout() {
  let data = single_note_project();
  // vibrato block ends at 192, empty opaque block at 192
  let area = 196;
  assert_eq!(&data[192..area], &[0, 0, 0, 0]);
  assert_eq!(&data[area..area + 2], &[0, 0]);
  for slot in 0..4 {
    let offset = area + 2 + slot * 4;
    assert_eq!(&data[offset..offset + 4], &(-1.0f32).to_le_bytes());
  }
}

#[test]
fn extreme_note_pitch_is_malformed() {
  let mut data = single_note_project();
  data[NOTE_PITCH..NOTE_PITCH + 4].copy_from_slice(&i32::min_value().to_le_bytes());
  assert_malformed(&data);
}

#[test]
fn extreme_vibrato_value_is_malformed() {
  let mut data = single_note_project();
  data[VIBRATO_VALUE..VIBRATO_VALUE + 4].copy_from_slice(&i32::min_value().to_le_bytes());
  assert_malformed(&data);
}

#[test]
fn unusable_segment_length_is_malformed() {
  for &length in &[i32::max_value(), -1, i32::min_value()] {
    let mut data = single_note_project();
    data[SEGMENT_LENGTH..SEGMENT_LENGTH + 4].copy_from_slice(&length.to_le_bytes());
    assert_malformed(&data);
  }
}

#[test]
fn corrupt_name_is_empty() {
  let project = rich_project();
  let mut data = serialize_project(&project);
  let needle = b"verse";
  let offset = data
    .windows(needle.len())
    .position(|window| window == needle)
    .unwrap();
  data[offset] = 0xff;
  data[offset + 1] = 0xfe;

  let parsed = parse_project(&data).unwrap();
  assert_eq!(parsed.tracks[0].segments[0].name, "");
  assert_eq!(parsed.tracks[0].segments[0].singer, "demo");
  assert_eq!(parsed.tracks[0].segments[0].notes, project.tracks[0].segments[0].notes);
}

#[test]
fn pitch_sign_symmetry() {
  assert_eq!(decode_pitch(encode_pitch(0)), 0);
  for value in (1..11550).step_by(37) {
    assert_eq!(decode_pitch(encode_pitch(value)), value);
  }
}

#[test]
fn fixed_project_still_serializes() {
  let mut project = rich_project();
  project.tracks[0].segments[0].add_note(Note::new(1800, 480, 67, "la", "啦"));
  project.fix();
  let notes = &project.tracks[0].segments[0].notes;
  assert_eq!(notes.len(), 2);
  let parsed = parse_project(&project.to_bytes()).unwrap();
  assert_eq!(parsed, project);
}
