use crate::bits::{state_from_bytes, state_to_bytes};
use crate::digest::Sm3Digest;

/// The SM3 initialization vector.
pub const IV: [u32; 8] = [
    0x7380_166f,
    0x4914_b2b9,
    0x1724_42d7,
    0xda8a_0600,
    0xa96f_30bc,
    0x1631_38aa,
    0xe38d_ee4d,
    0xb0fb_0e4e,
];

/// The running 8-word chaining value of one digest computation.
///
/// The state is `Copy`: resuming from a published digest, as Merkle nodes and
/// length extensions do, always works on a copy. It only changes through
/// [CompressionStrategy::compress_block](crate::CompressionStrategy::compress_block).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HashState([u32; 8]);

impl Default for HashState {
    /// The default state is the initialization vector.
    fn default() -> HashState {
        HashState::initial()
    }
}

impl HashState {
    /// State before the first block of any message.
    pub const fn initial() -> HashState {
        HashState(IV)
    }

    pub const fn from_words(words: [u32; 8]) -> HashState {
        HashState(words)
    }

    /// Reconstructs the state a digest was serialized from.
    pub fn from_digest(digest: &Sm3Digest) -> HashState {
        HashState(state_from_bytes(digest.as_array()))
    }

    pub fn words(&self) -> &[u32; 8] {
        &self.0
    }

    pub(crate) fn words_mut(&mut self) -> &mut [u32; 8] {
        &mut self.0
    }

    /// Big-endian serialization of the state.
    pub fn to_digest(&self) -> Sm3Digest {
        Sm3Digest::from(state_to_bytes(&self.0))
    }
}

impl From<[u32; 8]> for HashState {
    fn from(words: [u32; 8]) -> Self {
        HashState(words)
    }
}

impl From<&Sm3Digest> for HashState {
    fn from(digest: &Sm3Digest) -> Self {
        HashState::from_digest(digest)
    }
}
