use tracing::trace;

use crate::compress::CompressionStrategy;
use crate::digest::Sm3Digest;
use crate::error::{Result, Sm3Error};
use crate::padding::pad;
use crate::state::HashState;
use crate::{MessageBlock, BLOCK_SIZE};

/// The digest façade: padding, block iteration, compression and
/// serialization, using one [CompressionStrategy].
///
/// The engine holds no per-message state, so a single engine can be shared
/// freely between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sm3Engine {
    strategy: CompressionStrategy,
}

impl Sm3Engine {
    pub const fn new(strategy: CompressionStrategy) -> Sm3Engine {
        Sm3Engine { strategy }
    }

    /// Builds an engine from a strategy name such as `"unrolled"`.
    pub fn from_name(name: &str) -> Result<Sm3Engine> {
        Ok(Sm3Engine::new(name.parse()?))
    }

    pub fn strategy(&self) -> CompressionStrategy {
        self.strategy
    }

    /// Computes the SM3 digest of `data`.
    pub fn hash(&self, data: &[u8]) -> Result<Sm3Digest> {
        Ok(self.state_after(data)?.0.to_digest())
    }

    /// Computes the digest of the bytes of `input` as a 64 character
    /// upper-case hex string.
    pub fn hash_hex(&self, input: &str) -> Result<String> {
        Ok(self.hash(input.as_bytes())?.hex())
    }

    /// Returns the internal state after the last padded block of `data`,
    /// together with the total padded length in bytes.
    pub fn state_after(&self, data: &[u8]) -> Result<(HashState, u64)> {
        let padded = pad(data)?;
        trace!(
            "sm3 {}: {} bytes in {} blocks",
            self.strategy,
            padded.message_len(),
            padded.num_blocks()
        );
        let mut state = HashState::initial();
        for block in padded.blocks() {
            self.strategy.compress_block(&mut state, block);
        }
        Ok((state, padded.len() as u64))
    }

    /// Compresses one block into `state`.
    #[inline]
    pub fn compress_block(&self, state: &mut HashState, block: &MessageBlock) {
        self.strategy.compress_block(state, block);
    }

    /// Resumes compression from `state` over bytes that are already padded.
    ///
    /// Fails with [Sm3Error::EmptyInput] when there is no block, and with
    /// [Sm3Error::UnalignedInput] when `padded` is not a whole number of
    /// blocks. `state` is left untouched on error.
    pub fn compress_padded(&self, state: &mut HashState, padded: &[u8]) -> Result<()> {
        if padded.is_empty() {
            return Err(Sm3Error::EmptyInput);
        }
        if padded.len() % BLOCK_SIZE != 0 {
            return Err(Sm3Error::UnalignedInput(padded.len()));
        }
        trace!(
            "sm3 {}: resuming over {} blocks",
            self.strategy,
            padded.len() / BLOCK_SIZE
        );
        for chunk in padded.chunks_exact(BLOCK_SIZE) {
            if let Ok(block) = <&MessageBlock>::try_from(chunk) {
                self.strategy.compress_block(state, block);
            }
        }
        Ok(())
    }
}

/// Computes the SM3 digest of `data` with the reference strategy.
///
/// ```ignore
/// let digest = sm3_hash("abc".as_bytes())?;
/// ```
pub fn sm3_hash(data: &[u8]) -> Result<Sm3Digest> {
    Sm3Engine::default().hash(data)
}

/// Computes the SM3 digest of `input` as upper-case hex.
pub fn sm3_hash_hex(input: &str) -> Result<String> {
    Sm3Engine::default().hash_hex(input)
}

/// Internal state and padded length after hashing `data`.
pub fn state_after(data: &[u8]) -> Result<(HashState, u64)> {
    Sm3Engine::default().state_after(data)
}
