//! Read-only access to an installed voice bank: the `*.sksd` descriptor and
//! the phoneme tables and model list of its `SKI` index.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_derive::Deserialize;

use crate::codec::Reader;
use crate::error::Result;

pub const INDEX_FILE: &str = "SKI";
pub const DEFAULT_DESCRIPTOR: &str = "voice.sksd";

const INDEX_PADDING: usize = 56;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Descriptor {
  pub name: String,
  pub version: String,
}

impl Descriptor {
  pub fn from_str(content: &str) -> Result<Descriptor> {
    let content = content.trim_start_matches('\u{feff}');
    Ok(serde_json::from_str(content)?)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
  pub name: String,
  pub pitch: String,
  pub pointer: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoiceBank {
  pub path: PathBuf,
  pub singer: String,
  pub version: String,
  /// (syllable, consonant, vowel)
  pub syllables: Vec<(String, String, String)>,
  /// (vowel, source)
  pub vowels: Vec<(String, String)>,
  pub voiced_consonants: Vec<String>,
  pub unvoiced_consonants: Vec<String>,
  pub independents: Vec<String>,
  pub tails: Vec<String>,
  pub pitch: String,
  pub models: Vec<Model>,
}

/// Bytes before the pronunciation tables, per engine version.
pub fn header_length(version: &str) -> Option<usize> {
  match version {
    "6.1" => Some(68),
    "6.0" => Some(64),
    "5.1" => Some(56),
    "4.02" => Some(68),
    _ => None,
  }
}

impl VoiceBank {
  pub fn open<P>(dir: P) -> Result<VoiceBank>
  where
    P: AsRef<Path>,
  {
    let dir = dir.as_ref();
    let mut descriptors: Vec<PathBuf> = fs::read_dir(dir)?
      .filter_map(|entry| entry.ok().map(|entry| entry.path()))
      .filter(|path| path.extension().map_or(false, |ext| ext == "sksd"))
      .collect();
    descriptors.sort();
    let descriptor_path = descriptors
      .into_iter()
      .next()
      .unwrap_or_else(|| dir.join(DEFAULT_DESCRIPTOR));
    debug!("Reading voice bank descriptor {:?}", descriptor_path);

    let descriptor = Descriptor::from_str(&fs::read_to_string(&descriptor_path)?)?;
    let index = fs::read(dir.join(INDEX_FILE))?;
    let mut bank = VoiceBank::from_index(&descriptor, &index)?;
    bank.path = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    Ok(bank)
  }

  /// Decodes an `SKI` index. Unknown engine versions give empty tables.
  pub fn from_index(descriptor: &Descriptor, index: &[u8]) -> Result<VoiceBank> {
    let mut bank = VoiceBank {
      singer: descriptor.name.clone(),
      version: descriptor.version.clone(),
      ..VoiceBank::default()
    };
    let header = match header_length(&descriptor.version) {
      Some(header) => header,
      None => {
        warn!("Unsupported voice bank version {:?}", descriptor.version);
        return Ok(bank);
      }
    };

    let mut reader = Reader::new(index);
    reader.skip(header)?;
    let pronunciations = reader.read_str()?;
    let tables: Vec<&str> = pronunciations.split('|').collect();
    let table = |index: usize| tables.get(index).cloned().unwrap_or("");

    if descriptor.version.starts_with('6') {
      bank.syllables = syllables(table(0));
      bank.voiced_consonants = words(table(1));
      bank.unvoiced_consonants = words(table(2));
      bank.vowels = vowels(table(3));
      bank.independents = words(table(4));
      bank.tails = words(table(5));
    } else {
      bank.syllables = syllables(table(0));
      bank.voiced_consonants = words(table(1));
      bank.vowels = vowels(table(2));
      bank.tails = words(table(3));
      bank.unvoiced_consonants = unvoiced(&bank);
    }

    bank.pitch = reader.read_str()?;
    reader.skip(INDEX_PADDING)?;
    while reader.remaining() >= 4 {
      reader.skip(4 + 4)?;
      let name = reader.read_str()?;
      let pitch = reader.read_str()?;
      let pointer = reader.read_i32()?;
      reader.skip(4)?;
      bank.models.push(Model {
        name,
        pitch,
        pointer,
      });
    }
    debug!(
      "Voice bank {:?} {}: {} syllables, {} models",
      bank.singer,
      bank.version,
      bank.syllables.len(),
      bank.models.len()
    );
    Ok(bank)
  }
}

fn words(table: &str) -> Vec<String> {
  table
    .split(',')
    .filter(|word| !word.is_empty())
    .map(|word| word.to_string())
    .collect()
}

fn syllables(table: &str) -> Vec<(String, String, String)> {
  table
    .split(';')
    .filter_map(|line| match line.split(',').collect::<Vec<_>>().as_slice() {
      [syllable, consonant, vowel] => Some((
        syllable.to_string(),
        consonant.to_string(),
        vowel.to_string(),
      )),
      _ => None,
    })
    .collect()
}

fn vowels(table: &str) -> Vec<(String, String)> {
  table
    .split(';')
    .filter_map(|line| match line.split(',').collect::<Vec<_>>().as_slice() {
      [vowel, source] => Some((vowel.to_string(), source.to_string())),
      _ => None,
    })
    .collect()
}

/// Older engines only list voiced consonants; the rest are the syllable
/// consonants that are neither voiced nor vowels.
fn unvoiced(bank: &VoiceBank) -> Vec<String> {
  let voiced: BTreeSet<&str> = bank.voiced_consonants.iter().map(|c| c.as_str()).collect();
  let vowels: BTreeSet<&str> = bank.vowels.iter().map(|(vowel, _)| vowel.as_str()).collect();
  let consonants: BTreeSet<&str> = bank
    .syllables
    .iter()
    .map(|(_, consonant, _)| consonant.as_str())
    .filter(|consonant| !consonant.is_empty())
    .collect();
  consonants
    .into_iter()
    .filter(|consonant| !voiced.contains(consonant) && !vowels.contains(consonant))
    .map(|consonant| consonant.to_string())
    .collect()
}
