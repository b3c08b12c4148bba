pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod lrc;
pub mod midi;
pub mod pitch;
pub mod project;
pub mod roll;
pub mod time;
pub mod toolbox;
pub mod ust;
pub mod voicebank;

pub use crate::error::{DvError, Result};
pub use crate::format::{parse_project, serialize_project};
pub use crate::pitch::{basic_pitch, synthesize_pitch_curve};
pub use crate::project::{AccompanimentTrack, Curve, Note, Project, Segment, Track};
