use crate::Integrity;
use image::{ImageError, ImageFormat, ImageReader};
use std::path::Path;

/// Extensions that get a full structural decode.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "dds"];

/// Decodes the whole image at `path`.
///
/// The format is sniffed from the content, falling back to `extension` (cached
/// payloads rarely carry their own). Decoding and truncation failures mean
/// [`Integrity::Corrupt`]. A file that cannot be opened, or a format this
/// build has no decoder for, is [`Integrity::Unchecked`].
pub fn check(path: impl AsRef<Path>, extension: &str) -> Integrity {
    let path = path.as_ref();
    let mut reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Unable to open image");
            return Integrity::Unchecked;
        },
    };
    if reader.format().is_none()
        && let Some(format) = ImageFormat::from_extension(extension)
    {
        reader.set_format(format);
    }
    match reader.decode() {
        Ok(_) => Integrity::Intact,
        Err(ImageError::Unsupported(e)) => {
            tracing::debug!(path = %path.display(), error = %e, "No decoder available for image");
            Integrity::Unchecked
        },
        Err(ImageError::Limits(e)) => {
            tracing::debug!(path = %path.display(), error = %e, "Image exceeds decoder limits");
            Integrity::Unchecked
        },
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Image failed to decode");
            Integrity::Corrupt
        },
    }
}
