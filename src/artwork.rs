use anyhow::{Context, Result};
use egui::{Color32, ColorImage};

/// Where the artwork currently on screen came from.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ArtworkSource {
    /// Decoded from the media item's metadata
    MediaMetadata,
    /// The configured default artwork
    Default,
}

/// A still image shown in place of video.
#[derive(PartialEq, Clone, Debug)]
pub struct Artwork {
    /// Decoded pixels
    pub image: ColorImage,
}

impl Artwork {
    /// Wrap an already decoded image.
    pub fn from_image(image: ColorImage) -> Self {
        Self { image }
    }

    /// Solid color artwork, mostly useful as a placeholder default.
    pub fn solid(size: [usize; 2], color: Color32) -> Self {
        Self::from_image(ColorImage::new(size, color))
    }

    /// Decode an encoded (png/jpeg) image.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .context("failed to decode artwork")?
            .to_rgba8();
        let size = [img.width() as usize, img.height() as usize];
        Ok(Self::from_image(ColorImage::from_rgba_unmultiplied(
            size,
            img.as_raw(),
        )))
    }

    /// Width and height in pixels.
    pub fn size(&self) -> [usize; 2] {
        self.image.size
    }

    /// Width over height, only when both are positive.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let [w, h] = self.size();
        (w > 0 && h > 0).then(|| w as f32 / h as f32)
    }
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let artwork = Artwork::decode(&encode_png(4, 2)).unwrap();
        assert_eq!(artwork.size(), [4, 2]);
        assert_eq!(artwork.aspect_ratio(), Some(2.0));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(Artwork::decode(b"definitely not an image").is_err());
        assert!(Artwork::decode(&[]).is_err());
    }

    #[test]
    fn test_empty_image_has_no_ratio() {
        let artwork = Artwork::solid([0, 16], Color32::WHITE);
        assert_eq!(artwork.aspect_ratio(), None);
    }
}
