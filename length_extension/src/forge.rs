use serde::{Deserialize, Serialize};
use sm3hash::{
    pad_with_total_length, padding_for, HashState, Result, Sm3Digest, Sm3Engine, Sm3Error,
};
use tracing::debug;

/// The outcome of extending a published digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgedExtension {
    /// Digest of `original ‖ glue_padding ‖ suffix`.
    pub digest: Sm3Digest,
    /// The padding the original message received; it becomes part of the
    /// forged message.
    pub glue_padding: Vec<u8>,
    pub suffix: Vec<u8>,
}

impl ForgedExtension {
    /// Length in bytes of the message the forged digest belongs to, given
    /// the length of the original message.
    pub fn forged_len(&self, original_len: usize) -> usize {
        original_len + self.glue_padding.len() + self.suffix.len()
    }

    /// Materializes `original ‖ glue_padding ‖ suffix`. Only someone who
    /// knows `original` can do this; it exists to check a forgery.
    pub fn forged_message(&self, original: &[u8]) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.forged_len(original.len()));
        message.extend_from_slice(original);
        message.extend_from_slice(&self.glue_padding);
        message.extend_from_slice(&self.suffix);
        message
    }
}

/**
 * Extends `published`, the digest of some unknown message of
 * `original_len` bytes, with `suffix`, compressing with `engine`.
 *
 * The chaining state is unpacked from the digest, and the suffix is padded as
 * if it ended a message of `original_len + |glue| + |suffix|` bytes. The
 * glue padding brings the original message to a block boundary, so the
 * suffix blocks follow on directly from the recovered state.
 */
pub fn forge_with(
    engine: Sm3Engine,
    published: &Sm3Digest,
    original_len: u64,
    suffix: &[u8],
) -> Result<ForgedExtension> {
    let glue_padding = padding_for(original_len)?;
    let forged_len = original_len
        .checked_add(glue_padding.len() as u64)
        .and_then(|l| l.checked_add(suffix.len() as u64))
        .ok_or(Sm3Error::LengthOverflow(original_len))?;
    let padded_suffix = pad_with_total_length(suffix, forged_len)?;

    let mut state = HashState::from_digest(published);
    engine.compress_padded(&mut state, padded_suffix.as_bytes())?;
    let digest = state.to_digest();
    debug!(
        "Extended {} ({} bytes) by {} bytes: forged message is {} bytes, digest {}",
        published,
        original_len,
        suffix.len(),
        forged_len,
        digest
    );

    Ok(ForgedExtension {
        digest,
        glue_padding,
        suffix: suffix.to_vec(),
    })
}

/// [forge_with] using the default engine.
pub fn forge(published: &Sm3Digest, original_len: u64, suffix: &[u8]) -> Result<ForgedExtension> {
    forge_with(Sm3Engine::default(), published, original_len, suffix)
}

/// [forge] from a digest given in hex, as it is usually published.
pub fn forge_from_hex(published: &str, original_len: u64, suffix: &[u8]) -> Result<ForgedExtension> {
    forge(&Sm3Digest::from_hex(published)?, original_len, suffix)
}
