use crate::time::ticks::ticks_per_second;

/// Tempo breakpoint. The bpm is kept in hundredths, the resolution of the
/// project file, so a mark always survives a save/load cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tempo {
  tick: i32,
  hundredths: i32,
}

impl Tempo {
  pub fn new(tick: i32, bpm: f64) -> Tempo {
    Tempo {
      tick,
      hundredths: (bpm * 100.0).round() as i32,
    }
  }

  pub fn from_hundredths(tick: i32, hundredths: i32) -> Tempo {
    Tempo { tick, hundredths }
  }

  pub fn get_tick(&self) -> i32 {
    self.tick
  }

  pub fn get_bpm(&self) -> f64 {
    f64::from(self.hundredths) / 100.0
  }

  pub fn get_hundredths(&self) -> i32 {
    self.hundredths
  }
}

impl Default for Tempo {
  fn default() -> Self {
    Tempo::new(0, 120.0)
  }
}

/// Seconds elapsed from tick 0 to `tick`. Ticks before the first mark run at
/// the first mark's tempo.
pub fn tick_to_seconds(tempo: &[Tempo], tick: i32) -> f64 {
  let first = match tempo.first() {
    Some(first) => first,
    None => return 0.0,
  };
  if tick <= first.tick {
    return f64::from(tick - first.tick) / ticks_per_second(first.get_bpm());
  }
  let mut seconds = 0.0;
  for (index, mark) in tempo.iter().enumerate() {
    if mark.tick >= tick {
      break;
    }
    let end = tempo
      .get(index + 1)
      .map_or(tick, |next| next.tick.min(tick));
    seconds += f64::from(end - mark.tick) / ticks_per_second(mark.get_bpm());
  }
  seconds
}

/// Inverse of `tick_to_seconds`, rounded to the nearest tick.
pub fn seconds_to_tick(tempo: &[Tempo], seconds: f64) -> i32 {
  let first = match tempo.first() {
    Some(first) => first,
    None => return 0,
  };
  if seconds <= 0.0 {
    return first.tick + (seconds * ticks_per_second(first.get_bpm())).round() as i32;
  }
  let mut elapsed = 0.0;
  for (index, mark) in tempo.iter().enumerate() {
    let rate = ticks_per_second(mark.get_bpm());
    if let Some(next) = tempo.get(index + 1) {
      let span = f64::from(next.tick - mark.tick) / rate;
      if elapsed + span < seconds {
        elapsed += span;
        continue;
      }
    }
    return mark.tick + ((seconds - elapsed) * rate).round() as i32;
  }
  first.tick
}

#[cfg(test)]
mod test {

  use super::{seconds_to_tick, tick_to_seconds, Tempo};

  #[test]
  pub fn tempo_new() {
    let tempo = Tempo::new(0, 120.0);
    assert_eq!(tempo.get_tick(), 0);
    assert_eq!(tempo.get_bpm(), 120.0);
    assert_eq!(tempo.get_hundredths(), 12000);
  }

  #[test]
  pub fn tempo_rounds_to_hundredths() {
    let tempo = Tempo::new(0, 123.456);
    assert_eq!(tempo.get_hundredths(), 12346);
    assert_eq!(tempo.get_bpm(), 123.46);
  }

  #[test]
  pub fn constant_tempo_seconds() {
    let tempo = vec![Tempo::new(0, 120.0)];
    assert_eq!(tick_to_seconds(&tempo, 960), 1.0);
    assert_eq!(tick_to_seconds(&tempo, 0), 0.0);
  }

  #[test]
  pub fn tempo_change_seconds() {
    let tempo = vec![Tempo::new(0, 120.0), Tempo::new(1920, 60.0)];
    assert_eq!(tick_to_seconds(&tempo, 1920), 2.0);
    assert_eq!(tick_to_seconds(&tempo, 2400), 3.0);
  }

  #[test]
  pub fn seconds_round_trip() {
    let tempo = vec![Tempo::new(0, 120.0), Tempo::new(1920, 60.0)];
    assert_eq!(seconds_to_tick(&tempo, 1.0), 960);
    assert_eq!(seconds_to_tick(&tempo, 3.0), 2400);
    assert_eq!(seconds_to_tick(&tempo, tick_to_seconds(&tempo, 5000)), 5000);
  }
}
