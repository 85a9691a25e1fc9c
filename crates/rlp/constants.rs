/// Single-byte string of length 0, and the encoding of the integer 0.
pub const RLP_NULL: u8 = 0x80;

/// Encoding of an empty list.
pub const RLP_EMPTY_LIST: u8 = 0xc0;
