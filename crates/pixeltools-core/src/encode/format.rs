//! Output format naming.

use serde::{Deserialize, Serialize};

/// Raster formats the encoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::WebP];

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
        }
    }

    /// Whether the encoder honours a quality setting for this format.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    /// Parse a MIME type such as `image/jpeg`. Case-insensitive; parameters
    /// after `;` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(OutputFormat::Png),
            "image/jpeg" | "image/jpg" => Some(OutputFormat::Jpeg),
            "image/webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    /// Parse a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    /// Replace (or append) the extension of `file_name` with this format's.
    pub fn rename(self, file_name: &str) -> String {
        let stem = match file_name.rfind('.') {
            Some(idx) if idx > 0 => &file_name[..idx],
            _ => file_name,
        };
        format!("{stem}.{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_png() {
        assert_eq!(OutputFormat::default().mime_type(), "image/png");
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(OutputFormat::from_mime("image/jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_mime("IMAGE/WEBP"), Some(OutputFormat::WebP));
        assert_eq!(
            OutputFormat::from_mime("image/png; charset=binary"),
            Some(OutputFormat::Png)
        );
        assert_eq!(OutputFormat::from_mime("image/gif"), None);
        assert_eq!(OutputFormat::from_mime(""), None);
    }

    #[test]
    fn test_mime_round_trip() {
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::from_mime(format.mime_type()), Some(format));
            assert_eq!(OutputFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(OutputFormat::from_extension(".JPEG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("tiff"), None);
    }

    #[test]
    fn test_rename() {
        assert_eq!(OutputFormat::WebP.rename("holiday.photo.jpg"), "holiday.photo.webp");
        assert_eq!(OutputFormat::Png.rename("scan"), "scan.png");
        assert_eq!(OutputFormat::Jpeg.rename(".hidden"), ".hidden.jpg");
    }

    #[test]
    fn test_capabilities() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(!OutputFormat::Jpeg.supports_alpha());
        assert!(OutputFormat::WebP.supports_alpha());
        assert!(!OutputFormat::Png.is_lossy());
    }
}
