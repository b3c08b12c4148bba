use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dvtool", author, version, about = "Inspect and convert SHARPKEY singing projects")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print the tempo map, signatures and tracks of a project
  Info {
    /// Project file (.dv)
    file: PathBuf,
  },

  /// Sort and repair a project, then save it
  Fix {
    file: PathBuf,

    #[arg(short, long)]
    output: PathBuf,
  },

  /// Export vocal tracks as a standard MIDI file
  Midi {
    file: PathBuf,

    #[arg(short, long)]
    output: PathBuf,

    /// Write character lyrics instead of pinyin
    #[arg(long)]
    hanzi: bool,
  },

  /// Export one UST sequence per vocal track
  Ust {
    file: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long)]
    hanzi: bool,
  },

  /// Build a new project from UST sequences, one track each
  Import {
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,
  },

  /// Time the lyrics of a track against a text split into lines
  Lrc {
    file: PathBuf,

    /// Text file with the lyrics broken into lines. Without it the joined
    /// lyrics are printed.
    #[arg(short, long)]
    lines: Option<PathBuf>,

    /// Track number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    track: usize,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    hanzi: bool,
  },

  /// Print the synthesized pitch curve of a segment, one tick per line
  Pitch {
    file: PathBuf,

    /// Track number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    track: usize,

    /// Segment number within the track, starting at 1
    #[arg(short, long, default_value_t = 1)]
    segment: usize,
  },
}
