use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  pub project: ProjectDefaults,
  pub note: NoteDefaults,
  pub export: Export,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      project: ProjectDefaults::default(),
      note: NoteDefaults::default(),
      export: Export::default(),
    }
  }
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

/// Tempo and signature of projects created from scratch.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ProjectDefaults {
  pub bpm: f64,
  pub beats_per_measure: i32,
  pub beat_unit: i32,
  pub signature_measure: i32,
}

impl Default for ProjectDefaults {
  fn default() -> ProjectDefaults {
    ProjectDefaults {
      bpm: 120.0,
      beats_per_measure: 4,
      beat_unit: 4,
      signature_measure: -3,
    }
  }
}

/// Ornament parameters given to notes created by the importers.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NoteDefaults {
  pub portamento_head: i32,
  pub portamento_tail: i32,
  pub bend_depth: i32,
  pub bend_length: i32,
  pub timbre: i32,
}

impl Default for NoteDefaults {
  fn default() -> NoteDefaults {
    NoteDefaults {
      portamento_head: 0,
      portamento_tail: 20,
      bend_depth: 0,
      bend_length: 0,
      timbre: -1,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Export {
  pub use_hanzi: bool,
  /// Quantization grid in ticks, 0 disables it.
  pub quantize: i32,
  pub velocity: u8,
  pub ignore_lyrics: Vec<String>,
}

impl Default for Export {
  fn default() -> Export {
    Export {
      use_hanzi: false,
      quantize: 0,
      velocity: 64,
      ignore_lyrics: vec!["-".to_string()],
    }
  }
}
