use crate::project::segment::Segment;

pub const DEFAULT_TRACK_VOLUME: i32 = 30;

/// A synthesized vocal lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
  pub name: String,
  /// 0 ..= 100
  pub volume: i32,
  /// -50 (left) ..= 50 (right)
  pub balance: i32,
  pub mute: bool,
  pub solo: bool,
  /// Segments in absolute ticks, possibly overlapping.
  pub segments: Vec<Segment>,
}

impl Track {
  pub fn new<T>(name: T) -> Track
  where
    T: Into<String>,
  {
    Track {
      name: name.into(),
      volume: DEFAULT_TRACK_VOLUME,
      balance: 0,
      mute: false,
      solo: false,
      segments: Vec::new(),
    }
  }

  pub fn add_segment(&mut self, segment: Segment) -> &mut Self {
    self.segments.push(segment);
    self
  }

  pub fn sort(&mut self) -> &mut Self {
    self.segments.sort_by_key(|segment| segment.start);
    self
  }

  /// All segments merged into a single one starting at tick 0, so note
  /// starts become absolute project ticks.
  pub fn flatten(&self) -> Segment {
    let mut segments: Vec<&Segment> = self.segments.iter().collect();
    segments.sort_by_key(|segment| segment.start);
    let mut flat = segments
      .into_iter()
      .fold(Segment::new(0, 0), |flat, segment| &flat + segment);
    if let Some(first) = self.segments.first() {
      flat.set_singer(first.singer.as_str());
    }
    flat.set_name(self.name.as_str());
    flat
  }

  /// Applies `Segment::fix` to every segment.
  pub fn fix(&mut self) -> &mut Self {
    for segment in self.segments.iter_mut() {
      segment.fix();
    }
    self
  }

  pub fn note_count(&self) -> usize {
    self.segments.iter().map(|segment| segment.notes.len()).sum()
  }
}
