use std::path::Path;

use anyhow::{Context, Result};
use recetario::form::SelectedImage;

/// Sniff the MIME type from the file content, falling back to the extension.
pub fn detect_mime_type(bytes: &[u8], path: &Path) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Read an image from disk. Type and size are checked by the form, not here.
pub async fn load_image(path: &Path) -> Result<SelectedImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Reading image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(SelectedImage {
        mime_type: detect_mime_type(&bytes, path),
        file_name,
        bytes,
    })
}
