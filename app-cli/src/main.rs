use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, LevelFilter};

use failure::{Error, Fail};

use clap::Parser;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use dvfile_core::config::Config;
use dvfile_core::lrc::{lyric_events, lyric_text, make_lrc};
use dvfile_core::roll::Import;
use dvfile_core::time::Position;
use dvfile_core::ust::UstFile;
use dvfile_core::{synthesize_pitch_curve, Project, Track};

mod cli;
use crate::cli::{Cli, Commands};

const DVTOOL_CONFIG: &'static str = "DVTOOL_CONFIG";
const DEFAULT_DVTOOL_CONFIG: &'static str = "dvtool.toml";

const DVTOOL_LOG_CONFIG: &'static str = "DVTOOL_LOG_CONFIG";
const DEFAULT_DVTOOL_LOG_CONFIG: &'static str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Track {} not found, the project has {}", index, count)]
  NoSuchTrack { index: usize, count: usize },

  #[fail(display = "Segment {} not found, the track has {}", index, count)]
  NoSuchSegment { index: usize, count: usize },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config = init_config()?;

  let cli = Cli::parse();
  debug!("{:?}", cli);

  match cli.command {
    Commands::Info { file } => info_command(&file),
    Commands::Fix { file, output } => fix_command(&file, &output),
    Commands::Midi {
      file,
      output,
      hanzi,
    } => midi_command(&config, &file, &output, hanzi),
    Commands::Ust {
      file,
      output,
      hanzi,
    } => ust_command(&config, &file, &output, hanzi),
    Commands::Import { files, output } => import_command(&config, &files, &output),
    Commands::Lrc {
      file,
      lines,
      track,
      output,
      hanzi,
    } => lrc_command(
      &config,
      &file,
      lines.as_ref(),
      track,
      output.as_ref(),
      hanzi,
    ),
    Commands::Pitch {
      file,
      track,
      segment,
    } => pitch_command(&file, track, segment),
  }
}

fn init_logging() -> Result<(), MainError> {
  let log_config_path =
    env::var(DVTOOL_LOG_CONFIG).unwrap_or_else(|_| DEFAULT_DVTOOL_LOG_CONFIG.to_string());

  if Path::new(&log_config_path).exists() {
    log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
      MainError::LoggingInit {
        cause: err.to_string(),
      }
    })
  } else {
    let stderr = ConsoleAppender::builder()
      .target(log4rs::append::console::Target::Stderr)
      .encoder(Box::new(PatternEncoder::new("{h({l})} {t} - {m}{n}")))
      .build();
    let log_config = LogConfig::builder()
      .appender(Appender::builder().build("stderr", Box::new(stderr)))
      .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
      .map_err(|err| MainError::LoggingInit {
        cause: err.to_string(),
      })?;
    log4rs::init_config(log_config)
      .map(|_| ())
      .map_err(|err| MainError::LoggingInit {
        cause: err.to_string(),
      })
  }
}

fn init_config() -> Result<Config, Error> {
  let config_path =
    env::var(DVTOOL_CONFIG).unwrap_or_else(|_| DEFAULT_DVTOOL_CONFIG.to_string());

  if Path::new(&config_path).exists() {
    info!("Loading config from {} ...", config_path);
    Config::from_file(config_path.as_str())
  } else {
    debug!("No config at {}, using defaults", config_path);
    Ok(Config::default())
  }
}

fn info_command(file: &Path) -> Result<(), Error> {
  let project = Project::open(file)?;

  println!("Tempo:");
  for tempo in project.tempo.iter() {
    println!(
      "  {:?} {:.2} bpm",
      project.tick_to_position(tempo.get_tick()),
      tempo.get_bpm()
    );
  }
  println!("Signatures:");
  for signature in project.signatures.iter() {
    println!(
      "  measure {} {}/{}",
      signature.get_measure(),
      signature.get_num_beats(),
      signature.get_note_value()
    );
  }
  println!("Tracks:");
  for (index, track) in project.tracks.iter().enumerate() {
    println!(
      "  {}. {} (volume {}, balance {}{}{})",
      index + 1,
      track.name,
      track.volume,
      track.balance,
      if track.mute { ", muted" } else { "" },
      if track.solo { ", solo" } else { "" }
    );
    for (index, segment) in track.segments.iter().enumerate() {
      println!(
        "     {}. {:?} .. {:?} {:?} [{}] {} notes",
        index + 1,
        project.tick_to_position(segment.start),
        project.tick_to_position(segment.end()),
        segment.name,
        segment.singer,
        segment.notes.len()
      );
    }
  }
  if !project.accompaniments.is_empty() {
    println!("Accompaniment:");
    for accompaniment in project.accompaniments.iter() {
      println!(
        "  {} at {:?} ({}, volume {})",
        accompaniment.name,
        project.tick_to_position(accompaniment.start),
        accompaniment.file_name(),
        accompaniment.volume
      );
    }
  }
  Ok(())
}

fn fix_command(file: &Path, output: &Path) -> Result<(), Error> {
  let mut project = Project::open(file)?;
  project.fix();
  project.save(output)?;
  Ok(())
}

fn midi_command(config: &Config, file: &Path, output: &Path, hanzi: bool) -> Result<(), Error> {
  let project = Project::open(file)?;
  let mut export = config.export.clone();
  export.use_hanzi |= hanzi;
  fs::write(output, project.to_midi(&export))?;
  info!("Wrote {:?}", output);
  Ok(())
}

fn ust_command(config: &Config, file: &Path, output: &Path, hanzi: bool) -> Result<(), Error> {
  let project = Project::open(file)?;
  fs::create_dir_all(output)?;
  let use_hanzi = config.export.use_hanzi || hanzi;
  for (index, ust) in project.to_ust_files(use_hanzi).iter().enumerate() {
    let path = output.join(format!("{:02}_{}.ust", index + 1, ust.project_name));
    fs::write(&path, ust.to_string())?;
    info!("Wrote {:?}", path);
  }
  Ok(())
}

fn import_command(config: &Config, files: &[PathBuf], output: &Path) -> Result<(), Error> {
  let mut project = Project::from_config(&config.project)?;
  let start = project.position_to_tick(Position::bar(1));
  for file in files {
    let ust = UstFile::parse(&fs::read_to_string(file)?)?;
    let name = file
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default();
    let mut segment = Import::from(ust).into_segment(&config.note);
    segment.start = start;
    let mut track = Track::new(name);
    track.add_segment(segment);
    project.add_track(track);
  }
  project.save(output)?;
  Ok(())
}

fn lrc_command(
  config: &Config,
  file: &Path,
  lines: Option<&PathBuf>,
  track: usize,
  output: Option<&PathBuf>,
  hanzi: bool,
) -> Result<(), Error> {
  let project = Project::open(file)?;
  let selected = track
    .checked_sub(1)
    .and_then(|index| project.tracks.get(index))
    .ok_or_else(|| MainError::NoSuchTrack {
      index: track,
      count: project.tracks.len(),
    })?;
  let events = lyric_events(&project, selected, config.export.use_hanzi || hanzi);

  let lines = match lines {
    Some(lines) => fs::read_to_string(lines)?,
    None => {
      println!("{}", lyric_text(&events));
      return Ok(());
    }
  };
  let lines: Vec<&str> = lines.lines().collect();
  let lrc = make_lrc(&events, &lines);
  match output {
    Some(output) => fs::write(output, lrc)?,
    None => print!("{}", lrc),
  }
  Ok(())
}

fn pitch_command(file: &Path, track: usize, segment: usize) -> Result<(), Error> {
  let project = Project::open(file)?;
  let selected = track
    .checked_sub(1)
    .and_then(|index| project.tracks.get(index))
    .ok_or_else(|| MainError::NoSuchTrack {
      index: track,
      count: project.tracks.len(),
    })?;
  let selected = segment
    .checked_sub(1)
    .and_then(|index| selected.segments.get(index))
    .ok_or_else(|| MainError::NoSuchSegment {
      index: segment,
      count: selected.segments.len(),
    })?;

  for (tick, value) in synthesize_pitch_curve(selected, &project.tempo)
    .iter()
    .enumerate()
  {
    println!("{}\t{}", tick, value);
  }
  Ok(())
}
