use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;

use crate::queue::PreviewSource;

const DEFAULT_PREVIEW_SIZE: u32 = 160;

/// Generate a downscaled thumbnail for image bytes
fn generate_image_thumbnail(data: &[u8], size: u32) -> Result<(Vec<u8>, &'static str), String> {
    let img = image::load_from_memory(data).map_err(|e| format!("Failed to load image: {}", e))?;

    // Resize maintaining aspect ratio
    let thumbnail = img.resize(size, size, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());

    // Try WebP first, fallback to PNG
    if thumbnail.write_to(&mut buffer, ImageFormat::WebP).is_ok() {
        return Ok((buffer.into_inner(), "image/webp"));
    }

    buffer = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| format!("Failed to encode thumbnail: {}", e))?;

    Ok((buffer.into_inner(), "image/png"))
}

/// Render a preview as a `data:` URL.
///
/// Formats the decoder does not understand (HEIC, AVIF, ...) are passed
/// through untouched with their declared media type.
pub fn render_preview(source: &PreviewSource, size: Option<u32>) -> String {
    let size = size.unwrap_or(DEFAULT_PREVIEW_SIZE);

    match generate_image_thumbnail(&source.bytes, size) {
        Ok((data, media_type)) => format!("data:{};base64,{}", media_type, STANDARD.encode(data)),
        Err(e) => {
            tracing::debug!("Preview passthrough ({}): {}", source.media_type, e);
            format!(
                "data:{};base64,{}",
                source.media_type,
                STANDARD.encode(&source.bytes)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::Arc;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 120, 200, 255]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_thumbnail_is_downscaled() {
        let (data, _) = generate_image_thumbnail(&png_bytes(640, 320), 64).unwrap();
        let thumb = image::load_from_memory(&data).unwrap();
        assert_eq!(thumb.width(), 64);
        assert_eq!(thumb.height(), 32);
    }

    #[test]
    fn test_render_preview_data_url() {
        let source = PreviewSource {
            media_type: "image/png".to_string(),
            bytes: Arc::from(png_bytes(8, 8)),
        };
        let url = render_preview(&source, None);
        assert!(url.starts_with("data:image/"));
        assert!(url.contains(";base64,"));
    }

    #[test]
    fn test_render_preview_passthrough_for_undecodable() {
        let source = PreviewSource {
            media_type: "image/heic".to_string(),
            bytes: Arc::from(&b"not really heic"[..]),
        };
        let url = render_preview(&source, Some(32));
        assert_eq!(
            url,
            format!("data:image/heic;base64,{}", STANDARD.encode(b"not really heic"))
        );
    }
}
