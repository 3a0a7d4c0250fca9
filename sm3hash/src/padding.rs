//! Merkle–Damgård strengthening for SM3.
//!
//! A message of `L` bytes is followed by a single `0x80` byte, the minimum
//! number of zero bytes so the length is congruent to 56 modulo 64, and the
//! 64-bit big-endian encoding of `L * 8`. The appended bytes are therefore
//! always between 9 and 72 bytes long.

use crate::error::{Result, Sm3Error};
use crate::{MessageBlock, BLOCK_SIZE};

/// Bytes taken by the length field at the end of the padding.
pub const LENGTH_FIELD_SIZE: usize = 8;

/// Offset within the final block at which the length field starts.
const LENGTH_FIELD_OFFSET: usize = BLOCK_SIZE - LENGTH_FIELD_SIZE;

/// A message together with its padding. The length is always a multiple of
/// [BLOCK_SIZE] and the buffer is never mutated after construction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PaddedMessage {
    bytes: Vec<u8>,
    message_len: usize,
}

impl PaddedMessage {
    /// The padded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total padded length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: padding appends at least 9 bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length of the message before padding.
    pub fn message_len(&self) -> usize {
        self.message_len
    }

    pub fn num_blocks(&self) -> usize {
        self.bytes.len() / BLOCK_SIZE
    }

    /// Iterates over the 64-byte blocks in order.
    pub fn blocks(&self) -> impl Iterator<Item = &MessageBlock> + '_ {
        self.bytes
            .chunks_exact(BLOCK_SIZE)
            .filter_map(|chunk| <&MessageBlock>::try_from(chunk).ok())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Number of zero bytes between the `0x80` marker and the length field for
/// a message of `len` bytes.
#[inline]
fn zero_fill_len(len: usize) -> usize {
    (BLOCK_SIZE + LENGTH_FIELD_OFFSET - (len + 1) % BLOCK_SIZE) % BLOCK_SIZE
}

#[inline]
fn bit_length(byte_len: u64) -> Result<u64> {
    byte_len
        .checked_mul(8)
        .ok_or(Sm3Error::LengthOverflow(byte_len))
}

fn append_padding(out: &mut Vec<u8>, message_len: usize, bit_len: u64) {
    out.push(0x80);
    out.resize(out.len() + zero_fill_len(message_len), 0x00);
    out.extend_from_slice(&bit_len.to_be_bytes());
}

/// Pads `message` as SM3 requires. Fails only if the bit length of the
/// message overflows 64 bits.
pub fn pad(message: &[u8]) -> Result<PaddedMessage> {
    pad_with_total_length(message, message.len() as u64)
}

/// Pads `message` but writes `total_len * 8` into the length field instead of
/// the message's own bit length.
///
/// This is what a hash over `prefix ‖ message` would see in its last blocks
/// when `prefix` is block aligned and `total_len = prefix.len() + message.len()`.
pub fn pad_with_total_length(message: &[u8], total_len: u64) -> Result<PaddedMessage> {
    let message_len = message.len() as u64;
    if total_len < message_len {
        return Err(Sm3Error::InvalidTotalLength {
            total: total_len,
            message: message_len,
        });
    }
    let bit_len = bit_length(total_len)?;

    let padded_len = (message.len() + 1 + LENGTH_FIELD_SIZE).div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    let mut bytes = Vec::with_capacity(padded_len);
    bytes.extend_from_slice(message);
    append_padding(&mut bytes, message.len(), bit_len);
    debug_assert_eq!(bytes.len(), padded_len);

    Ok(PaddedMessage {
        bytes,
        message_len: message.len(),
    })
}

/// Returns only the bytes that padding appends to a message of `len` bytes.
pub fn padding_for(len: u64) -> Result<Vec<u8>> {
    let bit_len = bit_length(len)?;
    let tail = (len % BLOCK_SIZE as u64) as usize;
    let mut out = Vec::with_capacity(1 + zero_fill_len(tail) + LENGTH_FIELD_SIZE);
    append_padding(&mut out, tail, bit_len);
    Ok(out)
}
