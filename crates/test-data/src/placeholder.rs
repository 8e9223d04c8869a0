//! Solid-color placeholder images encoded as PNG data URIs.
//!
//! Placeholders fill image columns with visually distinct content so that
//! storefront pages can be eyeballed without real product photos.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header prepended to every generated payload.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum PlaceholderError {
    #[error("Invalid image dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Image dimensions {width}x{height} are too large to allocate")]
    TooLarge { width: u32, height: u32 },
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
    #[error("Not a PNG data URI")]
    NotPngDataUri,
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Pixel dimensions of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of bytes in the raw 8-bit RGB buffer.
    fn rgb_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(3)
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(100, 100)
    }
}

/// A single-color raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderImage {
    size: ImageSize,
    color: [u8; 3],
}

impl PlaceholderImage {
    /// Creates a placeholder of the given size filled with `color`.
    pub fn solid(size: ImageSize, color: [u8; 3]) -> Result<Self, PlaceholderError> {
        if size.width == 0 || size.height == 0 {
            return Err(PlaceholderError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
        if size.rgb_len().is_none() {
            return Err(PlaceholderError::TooLarge {
                width: size.width,
                height: size.height,
            });
        }

        Ok(Self { size, color })
    }

    /// Creates a placeholder with each channel drawn uniformly from `0..=255`.
    pub fn random(size: ImageSize, rng: &mut impl Rng) -> Result<Self, PlaceholderError> {
        let color = [rng.r#gen::<u8>(), rng.r#gen::<u8>(), rng.r#gen::<u8>()];
        Self::solid(size, color)
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    /// Encodes the image as an 8-bit RGB PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, PlaceholderError> {
        let len = self.size.rgb_len().ok_or(PlaceholderError::TooLarge {
            width: self.size.width,
            height: self.size.height,
        })?;
        let pixels: Vec<u8> = self.color.iter().copied().cycle().take(len).collect();

        let mut bytes = Vec::new();
        let mut encoder = png::Encoder::new(&mut bytes, self.size.width, self.size.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;

        Ok(bytes)
    }

    /// Encodes the image as a `data:image/png;base64,...` URI.
    pub fn to_data_uri(&self) -> Result<String, PlaceholderError> {
        let png = self.encode_png()?;
        Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png)))
    }
}

/// Generates a random solid-color PNG data URI of the given size.
pub fn generate_data_uri(size: ImageSize, rng: &mut impl Rng) -> Result<String, PlaceholderError> {
    PlaceholderImage::random(size, rng)?.to_data_uri()
}

/// Returns the PNG bytes embedded in a data URI produced by [`generate_data_uri`].
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, PlaceholderError> {
    let payload = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or(PlaceholderError::NotPngDataUri)?;
    Ok(STANDARD.decode(payload)?)
}
