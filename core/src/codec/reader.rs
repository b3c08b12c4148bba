use byteorder::{ByteOrder, LittleEndian};
use log::warn;

use crate::codec::Point;
use crate::error::{DvError, Result};

/// Cursor over a little-endian, length-prefixed byte stream.
pub struct Reader<'a> {
  pos: usize,
  data: &'a [u8],
}

impl<'a> Reader<'a> {
  pub fn new(data: &'a [u8]) -> Reader<'a> {
    Reader { pos: 0, data }
  }

  pub fn position(&self) -> usize {
    self.pos
  }

  pub fn remaining(&self) -> usize {
    self.data.len() - self.pos
  }

  pub fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  pub fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
    let available = self.remaining();
    if needed > available {
      return Err(DvError::TruncatedInput {
        needed,
        available,
        position: self.pos,
      });
    }
    let slice = &self.data[self.pos..self.pos + needed];
    self.pos += needed;
    Ok(slice)
  }

  pub fn skip(&mut self, count: usize) -> Result<()> {
    self.take(count).map(|_| ())
  }

  pub fn read_u8(&mut self) -> Result<u8> {
    self.take(1).map(|bytes| bytes[0])
  }

  /// Flags are stored as one byte where only `0x01` means set.
  pub fn read_flag(&mut self) -> Result<bool> {
    self.read_u8().map(|byte| byte == 0x01)
  }

  pub fn read_i32(&mut self) -> Result<i32> {
    self.take(4).map(LittleEndian::read_i32)
  }

  pub fn read_f32(&mut self) -> Result<f32> {
    self.take(4).map(LittleEndian::read_f32)
  }

  /// Reads a byte length prefix. Negative lengths can never be satisfied.
  pub fn read_length(&mut self) -> Result<usize> {
    let position = self.pos;
    let length = self.read_i32()?;
    if length < 0 {
      return Err(DvError::malformed(format!(
        "negative length {} at offset {}",
        length, position
      )));
    }
    Ok(length as usize)
  }

  /// Reads an element count and checks that `count * min_item_size` bytes
  /// are still available before any element is decoded.
  pub fn read_count(&mut self, min_item_size: usize) -> Result<usize> {
    let position = self.pos;
    let count = self.read_i32()?;
    if count < 0 {
      return Err(DvError::malformed(format!(
        "negative count {} at offset {}",
        count, position
      )));
    }
    let count = count as usize;
    let fits = count
      .checked_mul(min_item_size)
      .map_or(false, |size| size <= self.remaining());
    if !fits {
      return Err(DvError::malformed(format!(
        "count {} at offset {} exceeds the remaining {} bytes",
        count,
        position,
        self.remaining()
      )));
    }
    Ok(count)
  }

  pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
    let length = self.read_length()?;
    self.take(length)
  }

  /// Decodes a length-prefixed UTF-8 string. Corrupt text yields an empty
  /// string and the stream stays aligned.
  pub fn read_str(&mut self) -> Result<String> {
    let position = self.pos;
    let bytes = self.read_bytes()?;
    match std::str::from_utf8(bytes) {
      Ok(text) => Ok(text.to_string()),
      Err(err) => {
        warn!("Invalid UTF-8 string at offset {}: {}", position, err);
        Ok(String::new())
      }
    }
  }

  /// Reads a pair-count followed by that many `(time, value)` pairs.
  pub fn read_points(&mut self) -> Result<Vec<Point>> {
    let count = self.read_count(8)?;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
      let time = self.read_i32()?;
      let value = self.read_i32()?;
      points.push((time, value));
    }
    Ok(points)
  }

  /// Splits off a length-prefixed block as its own reader.
  pub fn read_block(&mut self) -> Result<Reader<'a>> {
    self.read_bytes().map(Reader::new)
  }
}
