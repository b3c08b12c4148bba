use byteorder::{ByteOrder, LittleEndian};

use crate::codec::Point;

/// Growable little-endian output buffer mirroring `Reader`.
pub struct Writer {
  data: Vec<u8>,
}

impl Default for Writer {
  fn default() -> Self {
    Writer { data: Vec::new() }
  }
}

impl Writer {
  pub fn new() -> Writer {
    Writer::default()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.data
  }

  pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
    self.data.extend_from_slice(bytes);
    self
  }

  pub fn write_u8(&mut self, value: u8) -> &mut Self {
    self.data.push(value);
    self
  }

  pub fn write_flag(&mut self, value: bool) -> &mut Self {
    self.write_u8(if value { 0x01 } else { 0x00 })
  }

  pub fn write_i32(&mut self, value: i32) -> &mut Self {
    let mut buf = [0u8; 4];
    LittleEndian::write_i32(&mut buf, value);
    self.write_raw(&buf)
  }

  pub fn write_f32(&mut self, value: f32) -> &mut Self {
    let mut buf = [0u8; 4];
    LittleEndian::write_f32(&mut buf, value);
    self.write_raw(&buf)
  }

  pub fn write_len(&mut self, length: usize) -> &mut Self {
    assert!(length <= i32::max_value() as usize);
    self.write_i32(length as i32)
  }

  pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
    self.write_len(bytes.len()).write_raw(bytes)
  }

  pub fn write_str(&mut self, text: &str) -> &mut Self {
    self.write_bytes(text.as_bytes())
  }

  /// Writes a pair-count followed by the flattened pairs.
  pub fn write_points(&mut self, points: &[Point]) -> &mut Self {
    self.write_len(points.len());
    for &(time, value) in points {
      self.write_i32(time).write_i32(value);
    }
    self
  }

  /// Writes an element count followed by each element's own encoding.
  pub fn write_list<T, F>(&mut self, items: &[T], mut encode: F) -> &mut Self
  where
    F: FnMut(&mut Writer, &T),
  {
    self.write_len(items.len());
    for item in items {
      encode(self, item);
    }
    self
  }

  /// Encodes `content` into a scratch buffer and emits it with its byte
  /// length in front.
  pub fn write_block<F>(&mut self, content: F) -> &mut Self
  where
    F: FnOnce(&mut Writer),
  {
    let mut block = Writer::new();
    content(&mut block);
    self.write_bytes(&block.data)
  }
}
