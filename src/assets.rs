//! Startup assets.
//!
//! The sidebar can show an optional decorative image. It is read once,
//! fully, before the server starts and embedded as a `data:` URI; any read
//! failure aborts startup.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::DashError;

/// An image held in memory for the lifetime of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl EmbeddedImage {
    /// `data:<mime>;base64,<payload>` for inline use in markup.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Read an image file completely into memory.
pub fn load_image(path: &Path) -> Result<EmbeddedImage, DashError> {
    let bytes = fs::read(path).map_err(|source| DashError::ResourceLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(EmbeddedImage {
        mime: mime_for(path),
        bytes,
    })
}

/// Guess an image MIME type from the file extension.
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("gif") => "image/gif",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_encodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spinner.GIF");
        fs::write(&path, b"GIF89a").unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.mime, "image/gif");
        assert_eq!(image.data_uri(), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn missing_file_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, DashError::ResourceLoad { .. }));
    }

    #[test]
    fn unknown_extension_falls_back() {
        assert_eq!(mime_for(Path::new("blob.bin")), "application/octet-stream");
        assert_eq!(mime_for(Path::new("photo.jpeg")), "image/jpeg");
    }
}
