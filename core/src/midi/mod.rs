pub mod encoder;
pub mod export;
pub mod messages;
pub use messages::{Event, Message, Meta};
pub mod smf;
pub use smf::{Smf, SmfTrack};
pub mod types;

pub use export::project_to_smf;
