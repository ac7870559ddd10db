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

    /// Transparent warpper for [`wog_pak::error::Error`], raised while decompressing
    #[error(transparent)]
    PakError(#[from] wog_pak::error::Error),

    /// file is an invalid texture
    #[error("file is an invalid texture: {0}")]
    MalformedHeader(String),

    /// texel data is shorter than the header declares
    #[error("texture is truncated: expected {expected} texel bytes, {available} available")]
    TruncatedTexture {
        /// Number of texel bytes the header declares
        expected: u64,
        /// Number of texel bytes actually present
        available: u64,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
