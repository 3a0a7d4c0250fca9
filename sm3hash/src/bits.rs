use crate::{MessageBlock, DIGEST_SIZE};

/// Packs a block into 16 big-endian words.
#[inline(always)]
pub fn pack_block(block: &MessageBlock) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    words
}

/// Serializes 8 state words big-endian.
#[inline]
pub fn state_to_bytes(words: &[u32; 8]) -> [u8; DIGEST_SIZE] {
    let mut out = [0u8; DIGEST_SIZE];
    for (bytes, word) in out.chunks_exact_mut(4).zip(words.iter()) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Inverse of [state_to_bytes].
#[inline]
pub fn state_from_bytes(bytes: &[u8; DIGEST_SIZE]) -> [u32; 8] {
    let mut words = [0u32; 8];
    for (word, b) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_block_is_big_endian() {
        let mut block = [0u8; 64];
        block[0..4].copy_from_slice(&[0x61, 0x62, 0x63, 0x80]);
        block[63] = 0x18;
        let words = pack_block(&block);
        assert_eq!(words[0], 0x6162_6380);
        assert_eq!(words[15], 0x0000_0018);
        assert!(words[1..15].iter().all(|w| *w == 0));
    }

    #[test]
    fn test_state_bytes_inverse() {
        let words = [
            0x7380_166f,
            0x4914_b2b9,
            0x1724_42d7,
            0xda8a_0600,
            0xa96f_30bc,
            0x1631_38aa,
            0xe38d_ee4d,
            0xb0fb_0e4e,
        ];
        let bytes = state_to_bytes(&words);
        assert_eq!(&bytes[..4], &[0x73, 0x80, 0x16, 0x6f]);
        assert_eq!(state_from_bytes(&bytes), words);
    }
}
