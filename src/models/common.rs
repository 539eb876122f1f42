use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{BannerError, Result};

/// A self-describing image payload: MIME type plus base64-encoded bytes.
///
/// Produced by the thumbnail fetcher, the local image loader, and the
/// generative clients; never mutated once created, only replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, data))
    }

    /// Render as a data URL, directly usable as a display source.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.data)
            .map_err(|e| BannerError::Response(format!("invalid base64 image data: {}", e)))
    }
}

/// One of the five fixed width:height ratios offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Square,
    Standard,
    Social,
}

impl AspectRatio {
    pub const fn all() -> [AspectRatio; 5] {
        [
            AspectRatio::Landscape,
            AspectRatio::Portrait,
            AspectRatio::Square,
            AspectRatio::Standard,
            AspectRatio::Social,
        ]
    }

    /// The width:height value sent to the synthesizer.
    pub fn value(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Social => "3:4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "Landscape",
            AspectRatio::Portrait => "Portrait",
            AspectRatio::Square => "Square",
            AspectRatio::Standard => "Standard",
            AspectRatio::Social => "Social",
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Landscape
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for AspectRatio {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            "4:3" => Ok(AspectRatio::Standard),
            "3:4" => Ok(AspectRatio::Social),
            other => Err(BannerError::Response(format!(
                "unknown aspect ratio: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_image_round_trip() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let image = InlineImage::from_bytes("image/jpeg", &bytes);
        assert_eq!(image.decode().unwrap(), bytes);
    }

    #[test]
    fn test_data_url_round_trip() {
        let image = InlineImage::from_bytes("image/png", &[1, 2, 3]);
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        let parsed = InlineImage::from_data_url(&url).unwrap();
        assert_eq!(parsed, image);
    }

    #[test]
    fn test_from_data_url_rejects_malformed() {
        assert!(InlineImage::from_data_url("not-a-data-url").is_none());
        assert!(InlineImage::from_data_url("data:image/png,rawdata").is_none());
        assert!(InlineImage::from_data_url("data:;base64,abcd").is_none());
    }

    #[test]
    fn test_aspect_ratio_values() {
        assert_eq!(AspectRatio::all().len(), 5);
        assert_eq!(AspectRatio::Landscape.value(), "16:9");
        assert_eq!(AspectRatio::Social.value(), "3:4");
        assert_eq!(AspectRatio::Square.label(), "Square");
        assert_eq!(AspectRatio::default(), AspectRatio::Landscape);
    }

    #[test]
    fn test_aspect_ratio_parsing() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape);
        assert_eq!("3:4".parse::<AspectRatio>().unwrap(), AspectRatio::Social);
        assert!("21:9".parse::<AspectRatio>().is_err());
        for ratio in AspectRatio::all() {
            assert_eq!(ratio.value().parse::<AspectRatio>().unwrap(), ratio);
        }
    }
}
