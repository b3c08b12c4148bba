use log::warn;

pub const MAGIC: &[u8; 8] = b"SHARPKEY";
pub const VERSION: i32 = 1;

pub const BODY_FILLER: [u8; 28] = [0; 28];

pub const TRACK_SYNTHESIS: i32 = 0;
pub const TRACK_ACCOMPANIMENT: i32 = 1;

/// Stored note pitch is `NOTE_PITCH_BASE - pitch`.
pub const NOTE_PITCH_BASE: i32 = 115;

/// Phoneme area of a note: two zero bytes, then `PHONEME_SLOTS` floats
/// holding `PHONEME_UNSET`.
pub const PHONEME_PADDING: [u8; 2] = [0; 2];
pub const PHONEME_SLOTS: usize = 4;
pub const PHONEME_UNSET: f32 = -1.0;

/// Content written for each of the two segment blocks nobody decodes.
pub const SEGMENT_OPAQUE: i32 = 0;

pub const BALANCE_RANGE: i32 = 50;

/// Offset the pitch override curve is coded against. Overrides are stored as
/// `value - PITCH_ORIGIN`, so a non-negative word means "no override".
pub const PITCH_ORIGIN: i32 = 11550;

pub fn encode_balance(balance: i32) -> i32 {
  let balance = balance.max(-BALANCE_RANGE).min(BALANCE_RANGE);
  (balance as f32 / BALANCE_RANGE as f32).to_bits() as i32
}

pub fn decode_balance(code: i32) -> i32 {
  let ratio = f32::from_bits(code as u32);
  if !ratio.is_finite() {
    warn!("Unknown balance code {:#010x}, using center", code);
    return 0;
  }
  let balance = (f64::from(ratio) * f64::from(BALANCE_RANGE)).round();
  balance.max(-f64::from(BALANCE_RANGE)).min(f64::from(BALANCE_RANGE)) as i32
}

pub fn encode_pitch(value: i32) -> i32 {
  if value == 0 {
    0
  } else {
    value.max(1).min(PITCH_ORIGIN - 1) - PITCH_ORIGIN
  }
}

pub fn decode_pitch(stored: i32) -> i32 {
  if stored >= 0 {
    0
  } else {
    PITCH_ORIGIN + stored
  }
}

#[cfg(test)]
mod test {

  use super::*;

  #[test]
  pub fn balance_codes() {
    assert_eq!(encode_balance(0), 0);
    assert_eq!(encode_balance(50), 1.0f32.to_bits() as i32);
    assert_eq!(encode_balance(-50), (-1.0f32).to_bits() as i32);
    for balance in -50..=50 {
      assert_eq!(decode_balance(encode_balance(balance)), balance);
    }
  }

  #[test]
  pub fn balance_out_of_range() {
    assert_eq!(encode_balance(80), encode_balance(50));
    assert_eq!(decode_balance(2.0f32.to_bits() as i32), 50);
    assert_eq!(decode_balance(std::f32::NAN.to_bits() as i32), 0);
  }

  #[test]
  pub fn pitch_no_override() {
    assert_eq!(encode_pitch(0), 0);
    assert_eq!(decode_pitch(0), 0);
    assert_eq!(decode_pitch(1234), 0);
  }

  #[test]
  pub fn pitch_sign_symmetry() {
    for &value in &[1, 100, 4800, 6000, 6410, 11549] {
      let stored = encode_pitch(value);
      assert!(stored < 0);
      assert_eq!(decode_pitch(stored), value);
    }
  }
}
