pub mod reader;
pub mod writer;

pub use self::reader::Reader;
pub use self::writer::Writer;

/// One `(time, value)` breakpoint of a curve as stored on disk.
pub type Point = (i32, i32);
