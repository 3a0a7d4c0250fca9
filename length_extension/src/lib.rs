//! Length-extension forgery against SM3.
//!
//! SM3 publishes its whole chaining state as the digest. Anyone who knows
//! `hash(m)` and `|m|` can therefore keep compressing from that state and
//! obtain `hash(m ‖ glue ‖ suffix)`, where `glue` is the padding `m` received,
//! without ever seeing `m`. This is why a bare `hash(secret ‖ data)` is not a
//! MAC.
//!
//! ```ignore
//! let published = sm3_hash(b"userid=1234")?;
//! let forged = forge(&published, 11, b"&admin=true")?;
//! assert_eq!(forged.digest, sm3_hash(&forged.forged_message(b"userid=1234"))?);
//! ```

#![cfg_attr(feature = "strict", deny(warnings))]

mod forge;

pub use forge::{forge, forge_from_hex, forge_with, ForgedExtension};
