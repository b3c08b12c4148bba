pub mod accompaniment;
pub mod curve;
pub mod note;
pub mod segment;
pub mod track;

pub use self::accompaniment::AccompanimentTrack;
pub use self::curve::Curve;
pub use self::note::Note;
pub use self::segment::Segment;
pub use self::track::Track;

use crate::config::ProjectDefaults;
use crate::error::{DvError, Result};
use crate::time::{tempo, Position, Signature, Tempo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  pub tempo: Vec<Tempo>,
  pub signatures: Vec<Signature>,
  pub tracks: Vec<Track>,
  pub accompaniments: Vec<AccompanimentTrack>,
}

impl Default for Project {
  fn default() -> Self {
    Project::new()
  }
}

impl Project {
  pub fn new() -> Project {
    Project {
      tempo: vec![Tempo::default()],
      signatures: vec![Signature::default()],
      tracks: Vec::new(),
      accompaniments: Vec::new(),
    }
  }

  pub fn from_config(defaults: &ProjectDefaults) -> Result<Project> {
    let signature = Signature::try_new(
      defaults.signature_measure,
      defaults.beats_per_measure,
      defaults.beat_unit,
    )
    .ok_or_else(|| {
      DvError::malformed(format!(
        "invalid default signature {}/{}",
        defaults.beats_per_measure, defaults.beat_unit
      ))
    })?;
    Ok(Project {
      tempo: vec![Tempo::new(0, defaults.bpm)],
      signatures: vec![signature],
      tracks: Vec::new(),
      accompaniments: Vec::new(),
    })
  }

  pub fn add_track(&mut self, track: Track) -> &mut Self {
    self.tracks.push(track);
    self
  }

  pub fn add_accompaniment(&mut self, accompaniment: AccompanimentTrack) -> &mut Self {
    self.accompaniments.push(accompaniment);
    self
  }

  /// Tempo of the first mark, the one the pitch renderer honors.
  pub fn get_bpm(&self) -> f64 {
    self
      .tempo
      .first()
      .map_or(Tempo::default().get_bpm(), |tempo| tempo.get_bpm())
  }

  pub fn tick_to_seconds(&self, tick: i32) -> f64 {
    tempo::tick_to_seconds(&self.tempo, tick)
  }

  pub fn seconds_to_tick(&self, seconds: f64) -> i32 {
    tempo::seconds_to_tick(&self.tempo, seconds)
  }

  pub fn position_to_tick(&self, position: Position) -> i32 {
    position.to_ticks(&self.signatures)
  }

  pub fn tick_to_position(&self, tick: i32) -> Position {
    Position::from_ticks(tick, &self.signatures)
  }

  /// Checks the tempo and signature maps are non-empty and sorted.
  pub fn validate(&self) -> Result<()> {
    if self.tempo.is_empty() {
      return Err(DvError::malformed("empty tempo map"));
    }
    if self.signatures.is_empty() {
      return Err(DvError::malformed("empty signature map"));
    }
    if self
      .tempo
      .windows(2)
      .any(|pair| pair[0].get_tick() > pair[1].get_tick())
    {
      return Err(DvError::malformed("tempo map is not sorted by tick"));
    }
    if self
      .signatures
      .windows(2)
      .any(|pair| pair[0].get_measure() > pair[1].get_measure())
    {
      return Err(DvError::malformed("signature map is not sorted by measure"));
    }
    Ok(())
  }

  /// Repairs every segment of every track.
  pub fn fix(&mut self) -> &mut Self {
    for track in self.tracks.iter_mut() {
      track.fix();
    }
    self
  }
}
