use std::path::Path;

/// Audio playback lane holding a single clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccompanimentTrack {
  pub name: String,
  pub start: i32,
  pub length: i32,
  pub path: String,
  pub volume: i32,
  pub mute: bool,
  pub solo: bool,
}

impl AccompanimentTrack {
  pub fn new<N, P>(name: N, path: P, start: i32, length: i32) -> AccompanimentTrack
  where
    N: Into<String>,
    P: Into<String>,
  {
    AccompanimentTrack {
      name: name.into(),
      start,
      length,
      path: path.into(),
      volume: 30,
      mute: false,
      solo: false,
    }
  }

  pub fn end(&self) -> i32 {
    self.start + self.length
  }

  /// Clip label written next to the path, the file name without directories.
  pub fn file_name(&self) -> String {
    Path::new(&self.path.replace('\\', "/"))
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }
}
