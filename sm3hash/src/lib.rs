//! The sm3hash crate implements the SM3 cryptographic hash (GB/T 32905-2016)
//! and exposes both the one-shot digest API and the internal state machinery
//! it is built from.
//!
//! The [Sm3Digest] is a 256-bit value stored as 32 big-endian bytes. A
//! default constructor is provided to make the digest of 0s.
//! ```ignore
//! // creates a default digest value of all 0s
//! let digest = Sm3Digest::default();
//! ```
//!
//! For the common case, [sm3_hash] and [sm3_hash_hex] compute a digest over an
//! in-memory byte sequence using the reference compression strategy.
//! ```ignore
//! let digest = sm3_hash("abc".as_bytes())?;
//! assert_eq!(sm3_hash_hex("abc")?, digest.hex());
//! ```
//!
//! Callers that need to pick a specific compression strategy construct an
//! [Sm3Engine]. All strategies in [CompressionStrategy] produce bit-identical
//! output; they only differ in how the message schedule is computed.
//! ```ignore
//! let engine = Sm3Engine::new(CompressionStrategy::Unrolled);
//! let digest = engine.hash(data)?;
//! ```
//!
//! Unlike most hash crates, the raw 8-word [HashState] and the block
//! compression step are first class. [state_after] returns the state after
//! the last padded block, and [Sm3Engine::compress_padded] resumes compression
//! from any state. Merkle tree construction and length-extension analysis are
//! built on these.
//! ```ignore
//! let (state, padded_len) = state_after(message)?;
//! let mut resumed = HashState::from_digest(&published);
//! engine.compress_padded(&mut resumed, padded_suffix.as_bytes())?;
//! ```

#![cfg_attr(feature = "strict", deny(warnings))]

mod bits;
pub mod compress;
mod digest;
mod engine;
pub mod error;
pub mod padding;
pub mod schedule;
mod state;

pub use bits::{pack_block, state_from_bytes, state_to_bytes};
pub use compress::CompressionStrategy;
pub use digest::Sm3Digest;
pub use engine::{sm3_hash, sm3_hash_hex, state_after, Sm3Engine};
pub use error::{Result, Sm3Error};
pub use padding::{pad, pad_with_total_length, padding_for, PaddedMessage};
pub use schedule::{RingSchedule, Schedule};
pub use state::HashState;

/// Size in bytes of one compression block.
pub const BLOCK_SIZE: usize = 64;

/// Size in bytes of an SM3 digest.
pub const DIGEST_SIZE: usize = 32;

/// A read-only 64-byte block of a padded message.
pub type MessageBlock = [u8; BLOCK_SIZE];
