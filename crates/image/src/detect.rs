//! Supported formats, extension lookup and magic-byte detection.

use crate::{ImageError, Result};
use std::path::Path;

/// Formats accepted by the optimization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image
    Gif,
    /// SVG document
    Svg,
    /// WebP image
    WebP,
}

impl ImageFormat {
    /// Every supported format.
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::Svg,
        ImageFormat::WebP,
    ];

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Get the file extensions for this format, lowercase and without the dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Svg => &["svg"],
            ImageFormat::WebP => &["webp"],
        }
    }

    /// Look up a format by extension, case-insensitively. A leading dot is allowed.
    ///
    /// ```
    /// use optidash_image::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_extension(".JPEG").unwrap(), ImageFormat::Jpeg);
    /// assert!(ImageFormat::from_extension("txt").is_err());
    /// ```
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
            .ok_or(ImageError::UnsupportedExtension(ext))
    }

    /// Look up a format from the extension of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_extension(ext).ok())
    }
}

/// Whether the file at `path` has an extension the optimization service accepts.
pub fn is_optimizable(path: impl AsRef<Path>) -> bool {
    ImageFormat::from_path(path).is_some()
}

/// Detect image format from magic bytes.
///
/// # Arguments
/// * `data` - First few bytes of the file (at least 12 bytes recommended)
///
/// # Example
/// ```
/// use optidash_image::{detect_format, ImageFormat};
///
/// let png_data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert!(matches!(detect_format(&png_data), Ok(ImageFormat::Png)));
/// ```
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 4 {
        return Err(ImageError::InvalidData("Not enough data for format detection".into()));
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok(ImageFormat::Jpeg);
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Ok(ImageFormat::Png);
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Ok(ImageFormat::Gif);
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Ok(ImageFormat::WebP);
    }

    if looks_like_svg(data) {
        return Ok(ImageFormat::Svg);
    }

    Err(ImageError::UnknownFormat)
}

/// SVG has no magic number; look for an `<svg` tag near the start of the text.
fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let start = head.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(head.len());
    let head = &head[start..];

    if !head.starts_with(b"<") {
        return false;
    }
    head.windows(4).any(|w| w.eq_ignore_ascii_case(b"<svg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(detect_format(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        assert_eq!(detect_format(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_gif() {
        let data = b"GIF89a\x00\x00\x00\x00";
        assert_eq!(detect_format(data).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_detect_webp() {
        let data = b"RIFF\x00\x00\x00\x00WEBP";
        assert_eq!(detect_format(data).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_detect_svg() {
        let data = b"\n  <?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";
        assert_eq!(detect_format(data).unwrap(), ImageFormat::Svg);

        let bare = b"<SVG width=\"10\"/>";
        assert_eq!(detect_format(bare).unwrap(), ImageFormat::Svg);
    }

    #[test]
    fn test_html_is_not_svg() {
        let data = b"<html><body>hello</body></html>";
        assert!(matches!(detect_format(data), Err(ImageError::UnknownFormat)));
    }

    #[test]
    fn test_unknown_format() {
        let data = [0x00, 0x00, 0x00, 0x00];
        assert!(detect_format(&data).is_err());
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(detect_format(&[0xFF]), Err(ImageError::InvalidData(_))));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!(ImageFormat::WebP.mime_type(), "image/webp");
    }

    #[test]
    fn test_extension_allow_list() {
        for ext in ["jpg", "jpeg", "png", "gif", "svg", "webp"] {
            assert!(ImageFormat::from_extension(ext).is_ok(), "{ext} should be accepted");
        }
        for ext in ["txt", "bmp", "tiff", "avif", ""] {
            assert!(ImageFormat::from_extension(ext).is_err(), "{ext} should be rejected");
        }
    }

    #[test]
    fn test_path_lookup_is_case_insensitive() {
        assert_eq!(ImageFormat::from_path("assets/Photo.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("icons/logo.Svg"), Some(ImageFormat::Svg));
        assert!(is_optimizable("a/b/c.WebP"));
        assert!(!is_optimizable("notes.txt"));
        assert!(!is_optimizable("Makefile"));
        assert!(!is_optimizable(".png"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ImageFormat::WebP).unwrap(), "\"webp\"");
    }
}
