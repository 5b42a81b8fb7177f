//! Image payload decoding for the resource cache.
//!
//! Only the container signature and, where cheap, the pixel dimensions are
//! read. Pixel data stays in the original encoding.

use bytes::Bytes;

use super::{Decode, ResourceKey};
use crate::Error;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = &[0xff, 0xd8, 0xff];

/// Image container formats recognized by [`ImageDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// A decoded image, shared read-only out of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub format: ImageFormat,
    /// Width and height in pixels, when the header carries them.
    pub dimensions: Option<(u32, u32)>,
    pub bytes: Bytes,
}

impl Image {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Sniffs the image container and validates its header.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl Decode for ImageDecoder {
    type Output = Image;

    fn decode(&self, key: &ResourceKey, bytes: Bytes) -> Result<Image, Error> {
        if bytes.is_empty() {
            return Err(Error::Decode(format!("empty payload for {key}")));
        }

        let (format, dimensions) = if bytes.starts_with(PNG_SIGNATURE) {
            (ImageFormat::Png, Some(png_dimensions(&bytes)?))
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            (ImageFormat::Jpeg, None)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            (ImageFormat::Gif, Some(gif_dimensions(&bytes)?))
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            (ImageFormat::Webp, None)
        } else {
            return Err(Error::Decode(format!("unrecognized image format for {key}")));
        };

        Ok(Image { format, dimensions, bytes })
    }
}

/// Width/height from the IHDR chunk, which must directly follow the signature.
fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32), Error> {
    if bytes.len() < 24 || &bytes[12..16] != b"IHDR" {
        return Err(Error::Decode("truncated PNG header".into()));
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Ok((width, height))
}

fn gif_dimensions(bytes: &[u8]) -> Result<(u32, u32), Error> {
    if bytes.len() < 10 {
        return Err(Error::Decode("truncated GIF header".into()));
    }
    let width = u16::from_le_bytes([bytes[6], bytes[7]]);
    let height = u16::from_le_bytes([bytes[8], bytes[9]]);
    Ok((u32::from(width), u32::from(height)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal PNG header (signature + IHDR) for the given size.
    pub(crate) fn png_header(width: u32, height: u32) -> Bytes {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        Bytes::from(data)
    }

    fn key() -> ResourceKey {
        ResourceKey::parse("https://avatars.example.com/u/1").unwrap()
    }

    #[test]
    fn test_decode_png() {
        let image = ImageDecoder.decode(&key(), png_header(460, 240)).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.dimensions, Some((460, 240)));
        assert_eq!(image.format.mime_type(), "image/png");
    }

    #[test]
    fn test_decode_gif() {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&[0x20, 0x00, 0x10, 0x00]);
        let image = ImageDecoder.decode(&key(), Bytes::from(data)).unwrap();
        assert_eq!(image.format, ImageFormat::Gif);
        assert_eq!(image.dimensions, Some((32, 16)));
    }

    #[test]
    fn test_decode_jpeg_and_webp() {
        let jpeg = Bytes::from_static(&[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]);
        let image = ImageDecoder.decode(&key(), jpeg).unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.dimensions, None);

        let webp = Bytes::from_static(b"RIFF\x24\x00\x00\x00WEBPVP8 ");
        let image = ImageDecoder.decode(&key(), webp).unwrap();
        assert_eq!(image.format, ImageFormat::Webp);
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let full = png_header(1, 1);
        let truncated = full.slice(..16);
        let err = ImageDecoder.decode(&key(), truncated).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_rejects_empty_and_unknown() {
        assert!(ImageDecoder.decode(&key(), Bytes::new()).unwrap_err().is_decode());
        let html = Bytes::from_static(b"<!doctype html><html></html>");
        assert!(ImageDecoder.decode(&key(), html).unwrap_err().is_decode());
    }
}
