use sm3hash::{Sm3Digest, Sm3Error};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Cannot build a Merkle tree without leaves")]
    EmptyInput,

    #[error("No leaf with hash {0}")]
    LeafNotFound(Sm3Digest),

    #[error("Leaf hash {hash} appears {count} times; prove by index instead")]
    AmbiguousLeaf { hash: Sm3Digest, count: usize },

    #[error("Leaf index {index} out of range for {count} leaves")]
    LeafIndexOutOfRange { index: usize, count: usize },

    #[error("Hash error: {0}")]
    Hash(#[from] Sm3Error),
}

// Define our own result type here (this seems to be the standard).
pub type Result<T> = std::result::Result<T, MerkleError>;
