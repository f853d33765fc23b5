//! Avatar validation and normalization.
//!
//! Uploads are screened before any pixel work: the declared filename
//! must carry an allow-listed extension (case-sensitive suffix match)
//! and the payload must fit the size cap. Accepted bytes are then
//! decoded, scaled to a fixed square (width and height independently,
//! not aspect-preserving), and re-encoded as PNG. Decode and encode are
//! CPU-bound, so normalization runs on a blocking task.

use std::io::Cursor;

use image::{ImageFormat, imageops::FilterType};

/// Upload size cap in bytes.
pub const MAX_AVATAR_BYTES: usize = 1_000_000;

/// Stored avatars are always this many pixels on each side.
pub const AVATAR_DIMENSIONS: u32 = 250;

/// Content type every stored avatar is served with.
pub const AVATAR_CONTENT_TYPE: &str = "image/png";

const ALLOWED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Upload rejections get their own error path, distinct from ordinary
/// handler failures: they arise while the request body is being
/// consumed, before any avatar state changes.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload an image (jpg, jpeg, or png)")]
    UnsupportedType,

    #[error("Image must be at most {MAX_AVATAR_BYTES} bytes")]
    TooLarge,

    #[error("Multipart field \"avatar\" is missing")]
    MissingField,

    #[error("Unable to process the uploaded image")]
    Undecodable,

    /// The normalization task itself failed, not the input.
    #[error("image processing failed")]
    Processing,
}

/// Screen an upload by declared filename and byte size.
pub fn validate_upload(
    filename: Option<&str>,
    len: usize,
) -> Result<(), UploadError> {
    let name = filename.ok_or(UploadError::UnsupportedType)?;
    if !ALLOWED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return Err(UploadError::UnsupportedType);
    }
    if len > MAX_AVATAR_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}

/// Decode, scale to [`AVATAR_DIMENSIONS`] square, and re-encode as PNG.
pub async fn normalize(bytes: Vec<u8>) -> Result<Vec<u8>, UploadError> {
    tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes)
            .map_err(|_| UploadError::Undecodable)?;
        let resized = img.resize_exact(
            AVATAR_DIMENSIONS,
            AVATAR_DIMENSIONS,
            FilterType::Triangle,
        );

        let mut out = Cursor::new(Vec::new());
        resized
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|_| UploadError::Undecodable)?;
        Ok(out.into_inner())
    })
    .await
    .map_err(|_| UploadError::Processing)?
}
