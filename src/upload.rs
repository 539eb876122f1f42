use std::path::Path;

use crate::{
    error::{BannerError, Result},
    models::InlineImage,
};

/// The two bitmap formats accepted for reference and person photos.
pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// The MIME type a file declares through its extension.
pub fn declared_mime_type(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        Some("png") => Some("image/png"),
        _ => None,
    }
}

/// Wrap already-read bytes, rejecting any declared type outside the two
/// accepted formats before touching the data.
pub fn image_from_parts(mime_type: &str, bytes: &[u8]) -> Result<InlineImage> {
    if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
        return Err(BannerError::UnsupportedImageType(mime_type.to_string()));
    }
    Ok(InlineImage::from_bytes(mime_type, bytes))
}

/// Load a user-selected image file. Type validation happens before any
/// I/O; a read failure surfaces as a generic read error.
pub async fn load_image_file(path: &Path) -> Result<InlineImage> {
    let mime_type = declared_mime_type(path).ok_or_else(|| {
        BannerError::UnsupportedImageType(path.display().to_string())
    })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| BannerError::ImageRead(e.to_string()))?;

    Ok(InlineImage::from_bytes(mime_type, &bytes))
}
