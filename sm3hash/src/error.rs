use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Sm3Error {
    #[error("Message of {0} bytes has a bit length that does not fit in 64 bits")]
    LengthOverflow(u64),

    #[error("Total length {total} is smaller than the message length {message}")]
    InvalidTotalLength { total: u64, message: u64 },

    #[error("No blocks to compress")]
    EmptyInput,

    #[error("Padded input of {0} bytes is not a multiple of the block size")]
    UnalignedInput(usize),

    #[error("Invalid bytes input for Sm3Digest: expected 32 bytes, got {0}")]
    InvalidDigestLength(usize),

    #[error("Invalid hex input for Sm3Digest")]
    InvalidHex,

    #[error("Unknown compression strategy: {0}")]
    UnknownStrategy(String),
}

// Define our own result type here (this seems to be the standard).
pub type Result<T> = std::result::Result<T, Sm3Error>;
