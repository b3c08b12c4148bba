use crate::codec::Point;

/// Piecewise-linear parameter curve, points sorted by time.
///
/// Segment curves carry sentinel points at tick `-1` and `length + 1` holding
/// the curve's edge values; note curves have no such requirement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Curve {
  points: Vec<Point>,
}

impl Curve {
  pub fn new() -> Curve {
    Curve::default()
  }

  pub fn from_points(points: Vec<Point>) -> Curve {
    Curve { points }
  }

  /// Constant curve made of the two boundary sentinels only.
  pub fn flat(length: i32, value: i32) -> Curve {
    Curve {
      points: vec![(-1, value), (length + 1, value)],
    }
  }

  pub fn points(&self) -> &[Point] {
    self.points.as_slice()
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn map_values<F>(&self, f: F) -> Curve
  where
    F: Fn(i32) -> i32,
  {
    Curve {
      points: self.points.iter().map(|&(time, value)| (time, f(value))).collect(),
    }
  }

  /// Linear interpolation between breakpoints, flat outside them.
  pub fn value_at(&self, time: f64) -> f64 {
    let (first, last) = match (self.points.first(), self.points.last()) {
      (Some(first), Some(last)) => (*first, *last),
      _ => return 0.0,
    };
    if time <= f64::from(first.0) {
      return f64::from(first.1);
    }
    if time >= f64::from(last.0) {
      return f64::from(last.1);
    }
    let index = self
      .points
      .iter()
      .position(|&(t, _)| f64::from(t) > time)
      .unwrap_or(self.points.len() - 1);
    let (t0, v0) = self.points[index - 1];
    let (t1, v1) = self.points[index];
    if t1 == t0 {
      return f64::from(v1);
    }
    let x = (time - f64::from(t0)) / f64::from(t1 - t0);
    f64::from(v0) + (f64::from(v1) - f64::from(v0)) * x
  }

  /// Like `value_at` but zero outside the breakpoints.
  pub fn sample(&self, time: f64) -> f64 {
    match (self.points.first(), self.points.last()) {
      (Some(first), Some(last)) if time >= f64::from(first.0) && time <= f64::from(last.0) => {
        self.value_at(time)
      }
      _ => 0.0,
    }
  }

  pub fn is_anchored(&self, length: i32) -> bool {
    match (self.points.first(), self.points.last()) {
      (Some(first), Some(last)) => self.points.len() >= 2 && first.0 == -1 && last.0 == length + 1,
      _ => false,
    }
  }

  /// Restricts the curve to `[-1, length + 1]`, replacing the boundary points
  /// with interpolated sentinels.
  pub fn anchor(&mut self, length: i32) -> &mut Self {
    let head = self.value_at(-1.0).round() as i32;
    let tail = self.value_at(f64::from(length + 1)).round() as i32;
    let mut points: Vec<Point> = self
      .points
      .iter()
      .filter(|&&(time, _)| time > -1 && time < length + 1)
      .cloned()
      .collect();
    points.insert(0, (-1, head));
    points.push((length + 1, tail));
    self.points = points;
    self
  }
}
