use crate::{
    error::{BannerError, Result},
    models::InlineImage,
};

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
const PRIMARY_VARIANT: &str = "maxresdefault.jpg";
const FALLBACK_VARIANT: &str = "hqdefault.jpg";
const VIDEO_ID_LEN: usize = 11;

/// Extract the 11-character video identifier from the common link shapes:
/// short links (`youtu.be/<id>`), embed links (`/embed/<id>`), watch links
/// (`watch?v=<id>` and `&v=<id>`), plus the `/v/<id>` and `/u/<c>/<id>`
/// forms. Returns `None` when no identifier can be found.
pub fn extract_video_id(url: &str) -> Option<String> {
    const MARKERS: [&str; 5] = ["youtu.be/", "/embed/", "watch?v=", "&v=", "/v/"];

    for marker in MARKERS {
        if let Some(pos) = url.find(marker) {
            if let Some(id) = take_id(&url[pos + marker.len()..]) {
                return Some(id);
            }
        }
    }

    // The /u/<single char>/<id> channel-upload form.
    if let Some(pos) = url.find("/u/") {
        let rest = &url[pos + 3..];
        let mut chars = rest.char_indices();
        if let (Some(_), Some((slash_idx, '/'))) = (chars.next(), chars.next()) {
            if let Some(id) = take_id(&rest[slash_idx + 1..]) {
                return Some(id);
            }
        }
    }

    None
}

/// The identifier runs until `#`, `&`, `?`, or end of string, and must be
/// exactly 11 characters.
fn take_id(candidate: &str) -> Option<String> {
    let id = candidate
        .split(|c| c == '#' || c == '&' || c == '?')
        .next()
        .unwrap_or("");
    if id.chars().count() == VIDEO_ID_LEN {
        Some(id.to_string())
    } else {
        None
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("{}/{}/{}", THUMBNAIL_BASE, video_id, PRIMARY_VARIANT)
}

pub fn fallback_url(primary: &str) -> String {
    primary.replace(PRIMARY_VARIANT, FALLBACK_VARIANT)
}

/// Maximum resolution first, then the lower-resolution variant. The fetch
/// attempts these in order and stops at the first success, so at most one
/// fallback request is ever issued.
pub fn attempt_urls(video_id: &str) -> [String; 2] {
    let primary = thumbnail_url(video_id);
    let fallback = fallback_url(&primary);
    [primary, fallback]
}

/// Retrieves video preview images and converts them to inline images.
#[derive(Clone)]
pub struct ThumbnailFetcher {
    http: reqwest::Client,
}

impl ThumbnailFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the preview image for a video link. Fails with `InvalidLink`
    /// before any network call when no identifier can be extracted, and
    /// with `ThumbnailUnavailable` when both resolution variants fail.
    pub async fn fetch(&self, link: &str) -> Result<InlineImage> {
        let video_id = extract_video_id(link).ok_or(BannerError::InvalidLink)?;

        for (attempt, url) in attempt_urls(&video_id).iter().enumerate() {
            match self.fetch_image(url).await {
                Ok(image) => return Ok(image),
                Err(e) => {
                    log::warn!("Thumbnail attempt {} failed for {}: {}", attempt + 1, url, e);
                }
            }
        }

        Err(BannerError::ThumbnailUnavailable)
    }

    async fn fetch_image(&self, url: &str) -> Result<InlineImage> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BannerError::ImageRead(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BannerError::ImageRead(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BannerError::ImageRead(e.to_string()))?;

        Ok(InlineImage::from_bytes(mime_type, &bytes))
    }
}

impl Default for ThumbnailFetcher {
    fn default() -> Self {
        Self::new()
    }
}
