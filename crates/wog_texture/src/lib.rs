//! This library decodes the packed-channel textures (`.png.binbig`) used by *World of Goo* on the Wii.
//!
//! # Texture Format Documentation
//!
//! A texture payload is always LZ11 compressed on its own, independent of the archive it was
//! extracted from. Once decompressed it consists of a fixed header followed by the texel data.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Padded Width           | 4 bytes: Stored width, rounded up                          |
//! | 0x0004         | Padded Height          | 4 bytes: Stored height, rounded up                         |
//! | 0x0008         | Used Width             | 4 bytes: Width of the region holding image content         |
//! | 0x000C         | Used Height            | 4 bytes: Height of the region holding image content        |
//! | 0x0010         | Original Width         | 4 bytes: Width of the source image before conversion       |
//! | 0x0014         | Original Height        | 4 bytes: Height of the source image before conversion      |
//! | 0x0018         | Channel Map            | 4 bytes: Source plane for the B, G, R and A outputs        |
//! | 0x001C         | Reserved               | 4 bytes: Unused                                            |
//! | 0x0020         | Texel Data             | Padded Width * Padded Height * distinct planes bytes       |
//!
//! ### Texel Data
//!
//! The texel data is a run of bitplanes, one byte per pixel each, `Padded Width * Padded Height`
//! bytes long. Only as many planes as there are distinct values in the channel map are stored; a
//! greyscale texture stores a single plane referenced by all four outputs.
//!
//! ### Arrangement
//!
//! Some releases store every plane delta encoded with a gradient predictor to make the data
//! friendlier to LZ11. See [`raster::Arrangement`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.png.binbig`
//! - **Endianness**: Big-endian for all header integers
//!

pub mod error;
pub mod raster;
pub mod read;
pub mod types;

pub use raster::Arrangement;
pub use read::Texture;
pub use types::TextureHeader;
