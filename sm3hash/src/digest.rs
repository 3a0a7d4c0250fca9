use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write;
use std::ops::Deref;

use crate::error::{Result, Sm3Error};
use crate::DIGEST_SIZE;

/**************************************************************************/
/*                                                                        */
/*                               Sm3Digest                                */
/*                                                                        */
/**************************************************************************/

/// The Sm3Digest is a transparent 256-bit value stored as `[u8; 32]`, the
/// big-endian serialization of the final hash state.
///
/// [sm3_hash](crate::sm3_hash) and [Sm3Engine::hash](crate::Sm3Engine::hash)
/// are the two main ways in which a digest is computed.
///
/// Many convenient trait implementations are provided for printing, comparing,
/// and parsing.
///
/// ```ignore
/// let digest = sm3_hash("hello world".as_bytes())?;
/// println!("Hello Digest {}", digest);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sm3Digest([u8; DIGEST_SIZE]);

impl Deref for Sm3Digest {
    type Target = [u8; DIGEST_SIZE];
    #[inline(always)]
    fn deref(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }
}

impl From<[u8; DIGEST_SIZE]> for Sm3Digest {
    fn from(value: [u8; DIGEST_SIZE]) -> Self {
        Sm3Digest(value)
    }
}

impl From<&[u8; DIGEST_SIZE]> for Sm3Digest {
    fn from(value: &[u8; DIGEST_SIZE]) -> Self {
        Sm3Digest(*value)
    }
}

impl AsRef<[u8]> for Sm3Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Sm3Digest {
    /// Returns the upper-case hexadecimal printout of the digest.
    pub fn hex(&self) -> String {
        let mut out = String::with_capacity(2 * DIGEST_SIZE);
        for b in self.0.iter() {
            // writing into a String cannot fail
            let _ = write!(out, "{b:02X}");
        }
        out
    }

    /// Parses a hexadecimal string (upper or lower case) as a Sm3Digest,
    /// returning Err(Sm3Error::InvalidHex) on failure.
    pub fn from_hex(h: &str) -> Result<Sm3Digest> {
        if h.len() != 2 * DIGEST_SIZE || !h.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(Sm3Error::InvalidHex);
        }
        let mut ret = Sm3Digest::default();
        for (i, byte) in ret.0.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&h[2 * i..2 * i + 2], 16)
                .map_err(|_| Sm3Error::InvalidHex)?;
        }
        Ok(ret)
    }

    /// Returns the digest as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_array(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn from_slice(value: &[u8]) -> Result<Self> {
        <[u8; DIGEST_SIZE]>::try_from(value)
            .map(Sm3Digest)
            .map_err(|_| Sm3Error::InvalidDigestLength(value.len()))
    }
}

impl TryFrom<&[u8]> for Sm3Digest {
    type Error = Sm3Error;

    fn try_from(value: &[u8]) -> std::result::Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl From<Sm3Digest> for Vec<u8> {
    fn from(val: Sm3Digest) -> Self {
        val.as_bytes().into()
    }
}

impl From<&Sm3Digest> for Vec<u8> {
    fn from(val: &Sm3Digest) -> Self {
        val.as_bytes().into()
    }
}

impl fmt::LowerHex for Sm3Digest {
    /// Allow the Sm3Digest to be printed with
    /// `println!("{:x}", digest)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for Sm3Digest {
    /// Allow the Sm3Digest to be printed with
    /// `println!("{:X}", digest)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl fmt::Display for Sm3Digest {
    /// Allow the Sm3Digest to be printed with
    /// `println!("{}", digest)`
    /// This prints the upper-case hexadecimal representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl fmt::Debug for Sm3Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}
