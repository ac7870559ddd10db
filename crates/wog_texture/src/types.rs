//! Base types for structure of texture payloads.

use binrw::BinRead;

use crate::error::{Error, Result};

/// Texture header
///
/// Defines the fixed 32 byte header of a decompressed texture payload.
/// All data is stored in big endian format
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct TextureHeader {
    /// Texture width, padded
    pub padded_width: u32,

    /// Texture height, padded
    pub padded_height: u32,

    /// Width of the region holding image content
    pub used_width: u32,

    /// Height of the region holding image content
    pub used_height: u32,

    /// Original image width before conversion. NOT the stored texture width
    pub original_width: u32,

    /// Original image height before conversion. NOT the stored texture height
    pub original_height: u32,

    /// Source plane for the blue, green, red and alpha outputs, in that order
    #[br(pad_after = 4)]
    pub channel_map: [u8; 4],
}

impl TextureHeader {
    /// Size of the header on disk
    pub const SIZE: usize = 32;

    /// Number of bitplanes physically stored, one per distinct channel map value
    pub fn plane_count(&self) -> usize {
        let mut planes = self.channel_map;
        planes.sort_unstable();
        1 + planes.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Size in bytes of a single bitplane
    pub fn plane_size(&self) -> u64 {
        self.padded_width as u64 * self.padded_height as u64
    }

    /// Size in bytes of the texel data following the header
    pub fn texel_size(&self) -> Result<u64> {
        self.plane_size()
            .checked_mul(self.plane_count() as u64)
            .ok_or_else(|| {
                Error::MalformedHeader(format!(
                    "texel data size overflows for padded extent {}x{}",
                    self.padded_width, self.padded_height
                ))
            })
    }

    /// Check the header is internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.used_width > self.padded_width || self.used_height > self.padded_height {
            return Err(Error::MalformedHeader(format!(
                "used extent {}x{} exceeds padded extent {}x{}",
                self.used_width, self.used_height, self.padded_width, self.padded_height
            )));
        }

        let planes = self.plane_count();
        if let Some(plane) = self.channel_map.iter().find(|&&p| p as usize >= planes) {
            return Err(Error::MalformedHeader(format!(
                "channel map references plane {plane} but only {planes} are stored"
            )));
        }

        self.texel_size()?;
        Ok(())
    }
}
