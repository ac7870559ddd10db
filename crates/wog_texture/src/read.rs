//! Types for reading texture payloads
//!

use std::io::{self, Cursor, Read};

use binrw::BinRead;
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    types::TextureHeader,
};

/// A decoded texture: its header and the raw bitplanes.
///
/// ```no_run
/// use std::fs::File;
///
/// fn convert(path: &str) -> wog_texture::error::Result<()> {
///     let texture = wog_texture::Texture::from_compressed(File::open(path)?)?;
///     let image = texture.to_image(wog_texture::Arrangement::Plain);
///     println!("{}x{}", image.width(), image.height());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    header: TextureHeader,
    texels: Vec<u8>,
}

impl Texture {
    /// Decode an already decompressed texture payload.
    #[instrument(skip(reader), err)]
    pub fn decode<R: Read>(mut reader: R) -> Result<Texture> {
        let mut raw = [0u8; TextureHeader::SIZE];
        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                Error::MalformedHeader("payload is too short for a header".into())
            }
            _ => e.into(),
        })?;

        let header = TextureHeader::read(&mut Cursor::new(raw))?;
        header.validate()?;
        debug!("{:?}", header);

        let expected = header.texel_size()?;
        let mut texels = Vec::new();
        reader.by_ref().take(expected).read_to_end(&mut texels)?;
        if (texels.len() as u64) < expected {
            return Err(Error::TruncatedTexture {
                expected,
                available: texels.len() as u64,
            });
        }

        Ok(Texture { header, texels })
    }

    /// Decompress an LZ11 packed texture and decode it.
    pub fn from_compressed<R: Read>(mut reader: R) -> Result<Texture> {
        let payload = wog_pak::compression::decompress(&mut reader)?;
        Self::decode(payload.as_slice())
    }

    /// Get the texture header
    pub fn header(&self) -> &TextureHeader {
        &self.header
    }

    /// Get every stored bitplane, back to back
    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    /// Get a single stored bitplane
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`TextureHeader::plane_count`].
    pub fn plane(&self, index: u8) -> &[u8] {
        let size = self.header.plane_size() as usize;
        let start = index as usize * size;
        &self.texels[start..start + size]
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{
        error::{Error, Result},
        read::Texture,
    };

    #[rustfmt::skip]
    const HEADER_2X2_GREY: [u8; 32] = [
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x04,
        0x00, 0x00, 0x00, 0x04,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn decode_single_plane() -> Result<()> {
        let mut input = HEADER_2X2_GREY.to_vec();
        input.extend_from_slice(&[1, 2, 3, 4]);

        let texture = Texture::decode(input.as_slice())?;
        assert_eq!(texture.header().original_width, 4);
        assert_eq!(texture.header().plane_count(), 1);
        assert_eq!(texture.plane(0), &[1, 2, 3, 4]);

        Ok(())
    }

    #[test]
    fn trailing_bytes_are_ignored() -> Result<()> {
        let mut input = HEADER_2X2_GREY.to_vec();
        input.extend_from_slice(&[1, 2, 3, 4, 5, 6]);

        let texture = Texture::decode(input.as_slice())?;
        assert_eq!(texture.texels(), &[1, 2, 3, 4]);

        Ok(())
    }

    #[test]
    fn truncated_texels() {
        let mut input = HEADER_2X2_GREY.to_vec();
        input.extend_from_slice(&[1, 2, 3]);

        let result = Texture::decode(input.as_slice());
        assert!(matches!(
            result,
            Err(Error::TruncatedTexture {
                expected: 4,
                available: 3
            })
        ));
    }

    #[test]
    fn oversized_extent() {
        #[rustfmt::skip]
        let input = [
            0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x01, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x00,
        ];

        let result = Texture::decode(input.as_slice());
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn truncated_header() {
        let result = Texture::decode(&HEADER_2X2_GREY[..20]);
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn decode_compressed() -> Result<()> {
        // 32 header bytes + 4 texels as literals, flag bytes every eight
        let mut input = vec![0x11, 0x24, 0x00, 0x00];
        let mut payload = HEADER_2X2_GREY.to_vec();
        payload.extend_from_slice(&[9, 8, 7, 6]);
        for group in payload.chunks(8) {
            input.push(0x00);
            input.extend_from_slice(group);
        }

        let texture = Texture::from_compressed(input.as_slice())?;
        assert_eq!(texture.texels(), &[9, 8, 7, 6]);

        Ok(())
    }
}
