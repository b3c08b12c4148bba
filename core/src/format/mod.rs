//! The `SHARPKEY` project file.
//!
//! ```text
//! "SHARPKEY" | version | block(body)
//! body = filler[28] | block(list(tempo)) | block(list(signature)) | list(track)
//! ```
//!
//! All integers are 32 bit little-endian, blocks carry their byte length in
//! front and lists their element count.

pub mod constants;
pub mod parse;
pub mod serialize;

pub use self::parse::parse_project;
pub use self::serialize::serialize_project;

use log::info;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::project::Project;

impl Project {
  pub fn from_bytes(data: &[u8]) -> Result<Project> {
    parse_project(data)
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    serialize_project(self)
  }

  pub fn open<P>(path: P) -> Result<Project>
  where
    P: AsRef<Path>,
  {
    let data = fs::read(path.as_ref())?;
    let project = parse_project(&data)?;
    info!(
      "Loaded {:?}: {} tracks, {} accompaniments",
      path.as_ref(),
      project.tracks.len(),
      project.accompaniments.len()
    );
    Ok(project)
  }

  pub fn save<P>(&self, path: P) -> Result<()>
  where
    P: AsRef<Path>,
  {
    let data = serialize_project(self);
    fs::write(path.as_ref(), &data)?;
    info!("Saved {:?} ({} bytes)", path.as_ref(), data.len());
    Ok(())
  }
}
