//! This library handles reading **PAK** archives used by *World of Goo* on the Wii.
//!
//! # PAK Archive Format Documentation
//!
//! This crate provides utilities to read and extract data from the **PAK** archive format used by
//! the Wii release of *World of Goo* (`master.pak` and friends). A PAK file stores every game asset
//! in a single file, identifying each one only by a 32-bit hash of its path.
//!
//! ## File Structure
//!
//! A PAK file consists of a header, followed immediately by the entry directory, followed by the
//! data blocks the directory points at.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Entry Count            | 4 bytes: Number of entries in the directory                |
//! | 0x0004         | Seed                   | 4 bytes: Initial accumulator for path hashes               |
//! | 0x0008         | Compressed             | 4 bytes: Boolean, non-zero when every block is LZ11 packed |
//! | 0x000C         | Directory              | Entry Count * 16 bytes                                     |
//!
//! ### Directory
//!
//! Each directory entry has the following structure:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Hash                   | 4 bytes: Path hash, see [`hash::path_hash`]              |
//! | 0x0004         | Data Offset            | 4 bytes: Absolute offset of the data block              |
//! | 0x0008         | Size                   | 4 bytes: Size of the stored data                        |
//! | 0x000C         | Meta                   | 4 bytes: Unknown                                        |
//!
//! Paths are not stored. They are recovered by hashing a list of known paths with the archive's
//! seed and matching the results against the directory, see [`dictionary::PathDictionary`].
//! Entries that cannot be resolved are named `0x{hash:08X}`.
//!
//! ### Data Blocks
//!
//! When the compressed flag is set every block is a Nintendo LZ11 stream which carries its own
//! decompressed size, see [`compression`]. Otherwise a block is exactly `Size` raw bytes.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.pak`
//! - **Endianness**: Big-endian for all header and directory integers
//!

pub mod compression;
pub mod dictionary;
pub mod error;
pub mod hash;
pub mod read;
pub mod types;

pub use compression::CompressionMethod;
pub use dictionary::PathDictionary;
pub use read::PakArchive;
pub use types::PakEntry;
