//! Unsigned integer and EBML size descriptor encoding

use crate::{Error, Result};

/// Longest size descriptor EBML allows (and the header advertises as MaxSizeLength)
pub const MAX_SIZE_LENGTH: usize = 8;

/// Encodes `n` as the shortest big-endian byte string that holds it.
///
/// Zero encodes as a single zero byte.
pub fn encode_unsigned(n: u64) -> Vec<u8> {
    let len = unsigned_len(n);
    n.to_be_bytes()[8 - len..].to_vec()
}

/// Number of bytes [`encode_unsigned`] produces for `n`
pub fn unsigned_len(n: u64) -> usize {
    if n == 0 {
        1
    } else {
        (64 - n.leading_zeros() as usize).div_ceil(8)
    }
}

/// Number of bytes needed to describe a payload of `len` bytes.
///
/// A `k`-byte descriptor carries `7k` value bits. The all-ones value of each
/// width is reserved by EBML for "unknown size" and is never produced.
pub fn size_len(len: u64) -> usize {
    (1..MAX_SIZE_LENGTH)
        .find(|&k| len < (1u64 << (7 * k)) - 1)
        .unwrap_or(MAX_SIZE_LENGTH)
}

/// Encodes a payload length as an EBML variable-length size descriptor.
///
/// The width marker is a single set bit whose position (counted from the most
/// significant bit of the first byte) gives the descriptor length; the value
/// bits follow, left-padded with zeros.
pub fn encode_size(len: u64) -> Vec<u8> {
    let k = size_len(len);
    let marked = len | (1u64 << (7 * k));
    marked.to_be_bytes()[8 - k..].to_vec()
}

/// Decodes an EBML size descriptor at the start of `data`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_size(data: &[u8]) -> Result<(u64, usize)> {
    let first = *data.first().ok_or(Error::UnexpectedEof(0))?;
    let k = first.leading_zeros() as usize + 1;
    if k > MAX_SIZE_LENGTH {
        return Err(Error::InvalidVarint(0));
    }
    let bytes = data.get(..k).ok_or(Error::UnexpectedEof(data.len()))?;

    let mut value = u64::from(first) & ((1u64 << (8 - k)) - 1);
    for &b in &bytes[1..] {
        value = (value << 8) | u64::from(b);
    }
    Ok((value, k))
}

/// Decodes a big-endian unsigned integer of up to 8 bytes
pub fn decode_unsigned(data: &[u8]) -> Option<u64> {
    if data.len() > 8 {
        return None;
    }
    Some(data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}
