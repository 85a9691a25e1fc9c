use bytes::BufMut;
use ethereum_types::H256;

use super::constants::RLP_NULL;

/// Encodes a value to a freshly allocated buffer.
/// To encode into an existing buffer, use [`RLPEncode::encode`].
pub fn encode<T: RLPEncode>(value: T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.encode(&mut buf);
    buf
}

/// Struct implementing `BufMut`, but only counting the number of bytes pushed into the buffer.
#[derive(Debug, Clone, Copy, Default)]
struct ByteCounter {
    count: usize,
}

unsafe impl BufMut for ByteCounter {
    fn remaining_mut(&self) -> usize {
        usize::MAX - self.count
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.count += cnt;
    }

    fn chunk_mut(&mut self) -> &mut bytes::buf::UninitSlice {
        unreachable!(
            "shouldn't be reachable since all the functions that call this are reimplemented"
        )
    }

    fn put<T: bytes::buf::Buf>(&mut self, src: T)
    where
        Self: Sized,
    {
        self.count += src.remaining();
    }

    fn put_bytes(&mut self, _val: u8, cnt: usize) {
        self.count += cnt;
    }

    fn put_slice(&mut self, src: &[u8]) {
        self.count += src.len()
    }
}

pub trait RLPEncode {
    fn encode(&self, buf: &mut dyn BufMut);

    fn length(&self) -> usize {
        // Run the `encode` function, but only counting the bytes pushed.
        let mut counter = ByteCounter::default();
        self.encode(&mut counter);
        counter.count
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

impl RLPEncode for bool {
    #[inline(always)]
    fn encode(&self, buf: &mut dyn BufMut) {
        if *self {
            buf.put_u8(0x01);
        } else {
            buf.put_u8(RLP_NULL);
        }
    }

    #[inline(always)]
    fn length(&self) -> usize {
        1
    }
}

impl RLPEncode for u8 {
    fn encode(&self, buf: &mut dyn BufMut) {
        [*self].encode(buf)
    }
}

impl RLPEncode for u16 {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.to_be_bytes().as_slice().encode(buf)
    }
}

impl RLPEncode for u32 {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.to_be_bytes().as_slice().encode(buf)
    }
}

impl RLPEncode for u64 {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.to_be_bytes().as_slice().encode(buf)
    }
}

impl RLPEncode for usize {
    fn encode(&self, buf: &mut dyn BufMut) {
        (*self as u64).encode(buf)
    }
}

impl RLPEncode for [u8] {
    #[inline(always)]
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.len() == 1 && self[0] < RLP_NULL {
            buf.put_u8(self[0]);
        } else {
            encode_bytes_prefix(self.len(), buf);
            buf.put_slice(self);
        }
    }

    #[inline]
    fn length(&self) -> usize {
        if self.is_empty() {
            return 1;
        }
        bytes_length(self.len(), self[0])
    }
}

impl<const N: usize> RLPEncode for [u8; N] {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_slice().encode(buf)
    }

    #[inline]
    fn length(&self) -> usize {
        bytes_length(N, if N > 0 { self[0] } else { 0 })
    }
}

impl RLPEncode for Vec<u8> {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_slice().encode(buf)
    }

    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

impl RLPEncode for str {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }

    #[inline]
    fn length(&self) -> usize {
        RLPEncode::length(self.as_bytes())
    }
}

impl RLPEncode for String {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }

    #[inline]
    fn length(&self) -> usize {
        RLPEncode::length(self.as_bytes())
    }
}

impl RLPEncode for H256 {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }

    fn length(&self) -> usize {
        bytes_length(32, self.as_bytes()[0])
    }
}

impl<T: RLPEncode> RLPEncode for Vec<T> {
    #[inline(always)]
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.is_empty() {
            buf.put_u8(super::constants::RLP_EMPTY_LIST);
        } else {
            let payload_len: usize = self.iter().map(|item| item.length()).sum();
            encode_length(payload_len, buf);
            for item in self {
                item.encode(buf);
            }
        }
    }

    #[inline]
    fn length(&self) -> usize {
        if self.is_empty() {
            return 1;
        }
        let payload_len: usize = self.iter().map(|item| item.length()).sum();
        list_length(payload_len)
    }
}

/// Computes the length needed for a given list payload length (i.e. the length
/// the list prefix plus payload take up once encoded).
#[inline]
pub const fn list_length(payload_len: usize) -> usize {
    if payload_len < 56 {
        1 + payload_len
    } else {
        let be_len = payload_len.ilog2() / 8 + 1;
        1 + be_len as usize + payload_len
    }
}

/// Computes the encoded length of a byte string of `bytes_len` bytes whose
/// first byte (if any) is `first_byte`.
#[inline]
pub const fn bytes_length(bytes_len: usize, first_byte: u8) -> usize {
    if bytes_len == 1 && first_byte <= 0x7f {
        return 1;
    }
    if bytes_len < 56 {
        return 1 + bytes_len;
    }
    let be_len = bytes_len.ilog2() / 8 + 1;
    1 + be_len as usize + bytes_len
}

/// Writes the RLP prefix for a byte string of `len` bytes (the caller still
/// has to write the payload itself).
#[inline]
fn encode_bytes_prefix(len: usize, buf: &mut dyn BufMut) {
    if len < 56 {
        buf.put_u8(RLP_NULL + len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let start = bytes.iter().position(|&x| x != 0).unwrap_or(bytes.len() - 1);
        let len_of_len = bytes.len() - start;
        buf.put_u8(0xb7 + len_of_len as u8);
        buf.put_slice(&bytes[start..]);
    }
}

/// Writes the RLP list prefix for a list whose payload is `total_len` bytes long.
#[inline]
pub fn encode_length(total_len: usize, buf: &mut dyn BufMut) {
    if total_len < 56 {
        buf.put_u8(super::constants::RLP_EMPTY_LIST + total_len as u8);
    } else {
        let bytes = total_len.to_be_bytes();
        let start = bytes.iter().position(|&x| x != 0).unwrap_or(bytes.len() - 1);
        let len_of_len = bytes.len() - start;
        buf.put_u8(0xf7 + len_of_len as u8);
        buf.put_slice(&bytes[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_empty_string() {
        assert_eq!(Vec::<u8>::new().encode_to_vec(), vec![RLP_NULL]);
    }

    #[test]
    fn encodes_single_low_byte_verbatim() {
        assert_eq!(vec![0x42u8].encode_to_vec(), vec![0x42]);
    }

    #[test]
    fn encodes_short_string() {
        assert_eq!(b"dog".to_vec().encode_to_vec(), vec![0x83, b'd', b'o', b'g']);
    }

    #[test]
    fn encodes_empty_list() {
        let empty_list: Vec<Vec<u8>> = vec![];
        assert_eq!(empty_list.encode_to_vec(), vec![0xc0]);
    }

    #[test]
    fn encodes_list_of_strings() {
        let list = vec![b"dog".to_vec(), b"god".to_vec(), b"cat".to_vec()];
        let encoded = list.encode_to_vec();
        assert_eq!(
            encoded,
            vec![0xcc, 0x83, b'd', b'o', b'g', 0x83, b'g', b'o', b'd', 0x83, b'c', b'a', b't']
        );
    }

    #[test]
    fn long_string_uses_length_of_length_prefix() {
        let long = vec![0x61u8; 56];
        let encoded = long.encode_to_vec();
        assert_eq!(encoded[0], 0xb7 + 1);
        assert_eq!(encoded[1], 56);
        assert_eq!(&encoded[2..], long.as_slice());
    }
}
