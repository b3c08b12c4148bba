use failure::Fail;

#[derive(Debug, Fail)]
pub enum DvError {
  #[fail(
    display = "Truncated input: needed {} bytes at offset {} but only {} remain",
    needed, position, available
  )]
  TruncatedInput {
    needed: usize,
    available: usize,
    position: usize,
  },

  #[fail(display = "Malformed project: {}", reason)]
  MalformedProject { reason: String },

  #[fail(display = "Malformed {} data: {}", format, reason)]
  MalformedText {
    format: &'static str,
    reason: String,
  },

  #[fail(display = "I/O error: {}", cause)]
  Io { cause: std::io::Error },

  #[fail(display = "Invalid voice bank descriptor: {}", cause)]
  Descriptor { cause: serde_json::Error },
}

impl DvError {
  pub fn malformed<T>(reason: T) -> DvError
  where
    T: Into<String>,
  {
    DvError::MalformedProject {
      reason: reason.into(),
    }
  }

  pub fn text<T>(format: &'static str, reason: T) -> DvError
  where
    T: Into<String>,
  {
    DvError::MalformedText {
      format,
      reason: reason.into(),
    }
  }
}

impl From<std::io::Error> for DvError {
  fn from(cause: std::io::Error) -> DvError {
    DvError::Io { cause }
  }
}

impl From<serde_json::Error> for DvError {
  fn from(cause: serde_json::Error) -> DvError {
    DvError::Descriptor { cause }
  }
}

pub type Result<T> = std::result::Result<T, DvError>;

#[cfg(test)]
mod test {

  use super::DvError;

  #[test]
  pub fn display_truncated() {
    let err = DvError::TruncatedInput {
      needed: 4,
      available: 2,
      position: 10,
    };
    assert_eq!(
      err.to_string(),
      "Truncated input: needed 4 bytes at offset 10 but only 2 remain"
    );
  }

  #[test]
  pub fn display_malformed() {
    let err = DvError::malformed("unknown track type 7");
    assert_eq!(err.to_string(), "Malformed project: unknown track type 7");
  }
}
