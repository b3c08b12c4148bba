//! Voice bank build settings (`.dvtb`).

use std::fs;
use std::path::Path;

use log::warn;

use crate::codec::{Reader, Writer};
use crate::error::Result;

pub const HEADER: &[u8; 27] = b"SHARPKEYTOOLBOX\x01\x00\x00\x00\x12\x13\x00\x00\x00\x00\x00\x00";

const LINE_SEPARATOR: &str = "\r\n";
const FIELD_SEPARATOR: &str = ",";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbox {
  /// (syllable, consonant, vowel)
  pub syllables: Vec<(String, String, String)>,
  /// (vowel, source)
  pub vowels: Vec<(String, String)>,
  pub voiced_consonants: Vec<String>,
  pub unvoiced_consonants: Vec<String>,
  pub independents: Vec<String>,
  pub tails: Vec<String>,
  pub wav_paths: Vec<String>,
  pub build_all_models: bool,
  pub build_which_models: String,
  pub model_path: String,
  pub output_path: String,
  pub pitches: Vec<String>,
  pub singer: String,
}

impl Default for Toolbox {
  fn default() -> Self {
    Toolbox {
      syllables: Vec::new(),
      vowels: Vec::new(),
      voiced_consonants: Vec::new(),
      unvoiced_consonants: Vec::new(),
      independents: Vec::new(),
      tails: Vec::new(),
      wav_paths: Vec::new(),
      build_all_models: true,
      build_which_models: String::new(),
      model_path: String::new(),
      output_path: String::new(),
      pitches: Vec::new(),
      singer: String::new(),
    }
  }
}

impl Toolbox {
  pub fn from_bytes(data: &[u8]) -> Result<Toolbox> {
    let mut reader = Reader::new(data);
    if reader.take(HEADER.len())? != &HEADER[..] {
      warn!("Unexpected toolbox header");
    }

    let syllables = split_lines(&reader.read_str()?)
      .filter_map(|line| match split_fields(line).as_slice() {
        [syllable, consonant, vowel] => Some((
          syllable.to_string(),
          consonant.to_string(),
          vowel.to_string(),
        )),
        _ => None,
      })
      .collect();
    let vowels = split_lines(&reader.read_str()?)
      .filter_map(|line| match split_fields(line).as_slice() {
        [vowel, source] => Some((vowel.to_string(), source.to_string())),
        _ => None,
      })
      .collect();
    let voiced_consonants = read_list(&mut reader)?;
    let unvoiced_consonants = read_list(&mut reader)?;
    let independents = read_list(&mut reader)?;
    let tails = read_list(&mut reader)?;

    let count = reader.read_count(4)?;
    let mut wav_paths = Vec::with_capacity(count);
    for _ in 0..count {
      wav_paths.push(reader.read_str()?);
    }

    Ok(Toolbox {
      syllables,
      vowels,
      voiced_consonants,
      unvoiced_consonants,
      independents,
      tails,
      wav_paths,
      build_all_models: reader.read_flag()?,
      build_which_models: reader.read_str()?,
      model_path: reader.read_str()?,
      output_path: reader.read_str()?,
      pitches: reader
        .read_str()?
        .split(FIELD_SEPARATOR)
        .filter(|pitch| !pitch.is_empty())
        .map(|pitch| pitch.to_string())
        .collect(),
      singer: reader.read_str()?,
    })
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    let syllables: Vec<String> = self
      .syllables
      .iter()
      .map(|(syllable, consonant, vowel)| {
        [syllable.as_str(), consonant.as_str(), vowel.as_str()].join(FIELD_SEPARATOR)
      })
      .collect();
    let vowels: Vec<String> = self
      .vowels
      .iter()
      .map(|(vowel, source)| [vowel.as_str(), source.as_str()].join(FIELD_SEPARATOR))
      .collect();

    let mut writer = Writer::new();
    writer
      .write_raw(&HEADER[..])
      .write_str(&syllables.join(LINE_SEPARATOR))
      .write_str(&vowels.join(LINE_SEPARATOR))
      .write_str(&self.voiced_consonants.join(LINE_SEPARATOR))
      .write_str(&self.unvoiced_consonants.join(LINE_SEPARATOR))
      .write_str(&self.independents.join(LINE_SEPARATOR))
      .write_str(&self.tails.join(LINE_SEPARATOR))
      .write_list(&self.wav_paths, |writer, path| {
        writer.write_str(path);
      })
      .write_flag(self.build_all_models)
      .write_str(&self.build_which_models)
      .write_str(&self.model_path)
      .write_str(&self.output_path)
      .write_str(&self.pitches.join(FIELD_SEPARATOR))
      .write_str(&self.singer);
    writer.into_bytes()
  }

  pub fn open<P>(path: P) -> Result<Toolbox>
  where
    P: AsRef<Path>,
  {
    Toolbox::from_bytes(&fs::read(path)?)
  }

  pub fn save<P>(&self, path: P) -> Result<()>
  where
    P: AsRef<Path>,
  {
    fs::write(path, self.to_bytes())?;
    Ok(())
  }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
  text.split(LINE_SEPARATOR).filter(|line| !line.is_empty())
}

fn split_fields(line: &str) -> Vec<&str> {
  line.split(FIELD_SEPARATOR).collect()
}

fn read_list(reader: &mut Reader) -> Result<Vec<String>> {
  Ok(
    split_lines(&reader.read_str()?)
      .map(|line| line.to_string())
      .collect(),
  )
}
