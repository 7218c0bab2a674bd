//! Packing buffer bytes into FIFO words.
//!
//! Bytes are packed little-endian into the low bytes of the 32-bit data
//! register; the final word of a buffer may carry fewer bytes than the word
//! size.

use super::constants::DATA_REGISTER_BYTES;

/// Pack up to four bytes into a word, first byte least significant.
#[inline]
pub(crate) fn pack(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(DATA_REGISTER_BYTES)
        .enumerate()
        .fold(0u32, |word, (i, &b)| word | (u32::from(b) << (8 * i)))
}

/// Unpack the low `out.len()` bytes of a word, first byte least significant.
#[inline]
pub(crate) fn unpack(word: u32, out: &mut [u8]) {
    for (i, b) in out.iter_mut().take(DATA_REGISTER_BYTES).enumerate() {
        *b = (word >> (8 * i)) as u8;
    }
}
