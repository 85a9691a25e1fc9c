use super::encode::{encode_length, RLPEncode};
use bytes::BufMut;

/// Fluent builder for encoding a fixed sequence of fields as a single RLP list.
///
/// # Examples
///
/// ```
/// # use ferrite_rlp::structs::Encoder;
/// let mut buf = vec![];
/// Encoder::new(&mut buf).encode_field(&1u8).encode_field(&2u8).finish();
/// assert_eq!(&buf, &[0xc2, 1, 2]);
/// ```
#[must_use = "`Encoder` must be consumed with `finish` to perform the encoding"]
pub struct Encoder<'a> {
    buf: &'a mut dyn BufMut,
    temp_buf: Vec<u8>,
}

impl core::fmt::Debug for Encoder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Encoder")
            .field("buf", &"...")
            .field("temp_buf", &self.temp_buf)
            .finish()
    }
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut dyn BufMut) -> Self {
        Self {
            buf,
            temp_buf: Default::default(),
        }
    }

    /// Stores a field to be encoded.
    pub fn encode_field<T: RLPEncode>(mut self, value: &T) -> Self {
        <T as RLPEncode>::encode(value, &mut self.temp_buf);
        self
    }

    /// Adds a raw value to the buffer without RLP-encoding it, for items that
    /// are already RLP (e.g. an inlined child node's verbatim sub-list).
    pub fn encode_raw(mut self, value: &[u8]) -> Self {
        self.temp_buf.put_slice(value);
        self
    }

    /// Stores a field to be encoded as a byte string, bypassing the
    /// conflicting `Vec<T>`/`Vec<u8>` blanket impls.
    pub fn encode_bytes(mut self, value: &[u8]) -> Self {
        <[u8] as RLPEncode>::encode(value, &mut self.temp_buf);
        self
    }

    pub fn finish(self) {
        encode_length(self.temp_buf.len(), self.buf);
        self.buf.put_slice(&self.temp_buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_two_fields_as_a_list() {
        let mut buf = vec![];
        Encoder::new(&mut buf).encode_field(&1u8).encode_field(&2u8).finish();
        assert_eq!(buf, vec![0xc2, 1, 2]);
    }

    #[test]
    fn encode_raw_splices_bytes_verbatim() {
        let mut buf = vec![];
        Encoder::new(&mut buf)
            .encode_bytes(b"ab")
            .encode_raw(&[0xc2, 1, 2])
            .finish();
        assert_eq!(buf, vec![0xc5, 0x82, b'a', b'b', 0xc2, 1, 2]);
    }
}
