/// 4 bit value, used for channels.
pub type U4 = u8;

/// 7 bit data byte.
pub type U7 = u8;
