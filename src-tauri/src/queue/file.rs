use std::path::Path;
use std::sync::Arc;

/// Extensions offered by the file picker
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "heic", "heif", "avif",
];

/// Check if a file extension is one the picker accepts
pub fn is_accepted_extension(ext: Option<&str>) -> bool {
    match ext {
        Some(e) => {
            let e = e.to_lowercase();
            ACCEPTED_EXTENSIONS.contains(&e.as_str())
        }
        None => false,
    }
}

/// An ingested file: original name, declared media type and bytes.
///
/// Cloning is cheap, the payload is shared.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, declaring its media type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, media_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}
