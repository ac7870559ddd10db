//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is an invalid pak archive: {0}
    #[error("file is an invalid pak archive: {0}")]
    MalformedHeader(String),

    /// entry is shorter than its declared size
    #[error("entry 0x{hash:08X} is truncated: expected {expected} bytes, {available} available")]
    TruncatedEntry {
        /// Hash of the offending entry
        hash: u32,
        /// Number of bytes the entry declares
        expected: u64,
        /// Number of bytes actually present
        available: u64,
    },

    /// compressed block ended early
    #[error("compressed block ended after {decoded} of {expected} bytes")]
    TruncatedBlock {
        /// Decompressed size declared by the block header
        expected: u64,
        /// Number of bytes decoded before input ran out
        decoded: u64,
    },

    /// {0}
    #[error("invalid compressed block: {0}")]
    InvalidCompressedBlock(String),

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by hash {0:08X}
    #[error("by hash 0x{0:08X}")]
    Hash(u32),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
