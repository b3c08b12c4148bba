pub const TICKS_PER_QUARTER: i32 = 480;
pub const TICKS_PER_WHOLE: i32 = TICKS_PER_QUARTER * 4;

/// Ticks elapsed per second at the given tempo (480 per beat).
pub fn ticks_per_second(bpm: f64) -> f64 {
  8.0 * bpm
}

/// Rounds `ticks` to the nearest multiple of `divisor`, halves rounding up.
pub fn round_half_up(ticks: i32, divisor: i32) -> i32 {
  if divisor <= 0 {
    return ticks;
  }
  (ticks + divisor / 2).div_euclid(divisor) * divisor
}
