//! Assembling decoded bitplanes into an RGBA image.

use image::RgbaImage;
use tracing::instrument;

use crate::{read::Texture, types::TextureHeader};

/// Byte within an RGBA pixel written by each channel map slot; slots are B, G, R, A.
const SLOT_TO_RGBA: [usize; 4] = [2, 1, 0, 3];

/// Neighbour value assumed before the first pixel of a plane
const PREDICTOR_SEED: u8 = 127;

/// How texel planes are stored
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Arrangement {
    /// Every byte is the final sample
    #[default]
    Plain,

    /// Every byte is a delta against a gradient prediction from already decoded neighbours.
    ///
    /// For each pixel the left, up and diagonal neighbours are looked up, falling back to
    /// whichever neighbour exists on the first row and column. When `|left - diag|` is smaller
    /// than `|up - diag|` the prediction is `up`, otherwise `left`. The sample is the prediction
    /// plus the stored byte, wrapping at 256.
    Gradient,
}

impl Texture {
    /// Interleave the bitplanes into a `padded_width` x `padded_height` RGBA image.
    ///
    /// Only the used region is written; padding pixels are left transparent black.
    #[instrument(skip(self))]
    pub fn to_image(&self, arrangement: Arrangement) -> RgbaImage {
        let header = self.header();
        let mut image = RgbaImage::new(header.padded_width, header.padded_height);
        let mut samples = vec![0u8; header.plane_size() as usize];

        for (slot, &plane) in header.channel_map.iter().enumerate() {
            let source = self.plane(plane);
            match arrangement {
                Arrangement::Plain => copy_plane(header, source, &mut samples),
                Arrangement::Gradient => reverse_gradient(header, source, &mut samples),
            }

            let width = header.padded_width as usize;
            for y in 0..header.used_height {
                for x in 0..header.used_width {
                    let sample = samples[y as usize * width + x as usize];
                    image.get_pixel_mut(x, y).0[SLOT_TO_RGBA[slot]] = sample;
                }
            }
        }

        image
    }
}

fn copy_plane(header: &TextureHeader, source: &[u8], samples: &mut [u8]) {
    let width = header.padded_width as usize;
    for y in 0..header.used_height as usize {
        let row = y * width;
        let used = row..row + header.used_width as usize;
        samples[used.clone()].copy_from_slice(&source[used]);
    }
}

fn reverse_gradient(header: &TextureHeader, source: &[u8], samples: &mut [u8]) {
    let width = header.padded_width as usize;

    let mut left = PREDICTOR_SEED;
    let mut up = PREDICTOR_SEED;
    let mut diag = PREDICTOR_SEED;

    for y in 0..header.used_height as usize {
        for x in 0..header.used_width as usize {
            let i = y * width + x;

            if x > 0 {
                left = samples[i - 1];
            } else if y > 0 {
                left = samples[i - width];
            }

            if y > 0 {
                up = samples[i - width];
            } else if x > 0 {
                up = samples[i - 1];
            }

            if x > 0 && y > 0 {
                diag = samples[i - width - 1];
            } else if y > 0 {
                diag = samples[i - width];
            } else if x > 0 {
                diag = samples[i - 1];
            }

            let vertical = i32::from(left) - i32::from(diag);
            let horizontal = i32::from(up) - i32::from(diag);
            let base = if vertical.abs() < horizontal.abs() {
                up
            } else {
                left
            };

            samples[i] = base.wrapping_add(source[i]);
        }
    }
}

#[cfg(test)]
mod test {
    use image::Rgba;
    use pretty_assertions::assert_eq;

    use crate::{error::Result, raster::Arrangement, read::Texture};

    fn texture(
        padded: (u32, u32),
        used: (u32, u32),
        channel_map: [u8; 4],
        texels: &[u8],
    ) -> Result<Texture> {
        let mut input = Vec::new();
        for value in [padded.0, padded.1, used.0, used.1, used.0, used.1] {
            input.extend_from_slice(&value.to_be_bytes());
        }
        input.extend_from_slice(&channel_map);
        input.extend_from_slice(&[0; 4]);
        input.extend_from_slice(texels);
        Texture::decode(input.as_slice())
    }

    fn grey(image: &image::RgbaImage) -> Vec<u8> {
        image
            .pixels()
            .map(|p| {
                assert!(p.0.iter().all(|&c| c == p.0[0]));
                p.0[0]
            })
            .collect()
    }

    #[test]
    fn plain_maps_slots_to_bgra() -> Result<()> {
        #[rustfmt::skip]
        let texels = [
            10, 11,  // plane 0
            20, 21,  // plane 1
            30, 31,  // plane 2
            40, 41,  // plane 3
        ];
        let image = texture((2, 1), (2, 1), [0, 1, 2, 3], &texels)?.to_image(Arrangement::Plain);

        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0), &Rgba([30, 20, 10, 40]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([31, 21, 11, 41]));

        Ok(())
    }

    #[test]
    fn plain_respects_plane_indices() -> Result<()> {
        let texels = [1, 2];
        let image = texture((1, 1), (1, 1), [1, 0, 1, 0], &texels)?.to_image(Arrangement::Plain);

        assert_eq!(image.get_pixel(0, 0), &Rgba([2, 1, 2, 1]));

        Ok(())
    }

    #[test]
    fn padding_is_left_untouched() -> Result<()> {
        #[rustfmt::skip]
        let texels = [
            5, 6, 7, 8,
            9, 9, 9, 9,
        ];
        let image = texture((4, 2), (2, 1), [0, 0, 0, 0], &texels)?.to_image(Arrangement::Plain);

        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(grey(&image), vec![5, 6, 0, 0, 0, 0, 0, 0]);
        assert_eq!(image.get_pixel(2, 0), &Rgba([0, 0, 0, 0]));

        Ok(())
    }

    #[test]
    fn aliased_channels_are_identical() -> Result<()> {
        let texels = [0, 64, 128, 255, 3, 200];
        let texture = texture((3, 2), (3, 2), [0, 0, 0, 0], &texels)?;

        for arrangement in [Arrangement::Plain, Arrangement::Gradient] {
            let image = texture.to_image(arrangement);
            for pixel in image.pixels() {
                let [r, g, b, a] = pixel.0;
                assert_eq!((r, g, b), (a, a, a));
            }
        }

        Ok(())
    }

    #[test]
    fn gradient_wraps_and_picks_up() -> Result<()> {
        // (0,0): 127 + 123 = 250
        // (1,0): left 250 + 10 = 260 -> 4
        // (0,1): left 250 + 5 = 255
        // (1,1): |255 - 250| < |4 - 250|, so up 4 + 3 = 7
        let texels = [123, 10, 5, 3];
        let image = texture((2, 2), (2, 2), [0, 0, 0, 0], &texels)?.to_image(Arrangement::Gradient);

        assert_eq!(grey(&image), vec![250, 4, 255, 7]);

        Ok(())
    }

    #[test]
    fn gradient_picks_left_on_ties_and_larger_vertical() -> Result<()> {
        // (0,0): 127, (1,0): 137, (0,1): 147
        // (1,1): |147 - 127| >= |137 - 127|, so left 147 + 0
        let texels = [0, 10, 20, 0];
        let image = texture((2, 2), (2, 2), [0, 0, 0, 0], &texels)?.to_image(Arrangement::Gradient);

        assert_eq!(grey(&image), vec![127, 137, 147, 147]);

        Ok(())
    }

    #[test]
    fn gradient_resets_per_channel() -> Result<()> {
        #[rustfmt::skip]
        let texels = [
            1, 1, // plane 0
            2, 2, // plane 1
        ];
        let image = texture((2, 1), (2, 1), [0, 1, 0, 1], &texels)?.to_image(Arrangement::Gradient);

        // B/R from plane 0: 128, 129; G/A from plane 1: 129, 131
        assert_eq!(image.get_pixel(0, 0), &Rgba([128, 129, 128, 129]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([129, 131, 129, 131]));

        Ok(())
    }

    #[test]
    fn gradient_ignores_padding_in_history() -> Result<()> {
        #[rustfmt::skip]
        let texels = [
            1, 1, 99,
            1, 1, 99,
        ];
        let image = texture((3, 2), (2, 2), [0, 0, 0, 0], &texels)?.to_image(Arrangement::Gradient);

        assert_eq!(grey(&image), vec![128, 129, 0, 129, 130, 0]);

        Ok(())
    }

    #[test]
    fn decode_is_idempotent() -> Result<()> {
        let texels = [17, 250, 3, 99, 0, 255, 128, 1];
        let first = texture((2, 2), (2, 2), [0, 1, 1, 0], &texels)?;
        let second = texture((2, 2), (2, 2), [0, 1, 1, 0], &texels)?;

        assert_eq!(first, second);
        assert_eq!(
            first.to_image(Arrangement::Gradient).into_raw(),
            second.to_image(Arrangement::Gradient).into_raw()
        );

        Ok(())
    }
}
