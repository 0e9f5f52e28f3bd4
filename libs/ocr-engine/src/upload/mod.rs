use anyhow::Result;
use image::DynamicImage;

/// Decodes raw encoded image bytes (png, jpeg, gif, webp, tiff, bmp, ...) into a `DynamicImage`.
pub fn bytes_to_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(anyhow::anyhow!("image data is empty"));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| anyhow::anyhow!("Unrecognized image format: {}", e))?;
    log::trace!("Decoding {} bytes as {:?}", bytes.len(), format);

    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))
}
