use serde::{Deserialize, Serialize};

use super::common::{AspectRatio, InlineImage};

/// Everything the user supplies for one generation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub use_deep_research: bool,
    pub reference_image: Option<InlineImage>,
    pub person_image: Option<InlineImage>,
}

impl BannerRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio,
            use_deep_research: false,
            reference_image: None,
            person_image: None,
        }
    }

    pub fn with_deep_research(mut self, enabled: bool) -> Self {
        self.use_deep_research = enabled;
        self
    }

    pub fn with_reference_image(mut self, image: InlineImage) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn with_person_image(mut self, image: InlineImage) -> Self {
        self.person_image = Some(image);
        self
    }
}

/// The four quick preset filters offered alongside free-text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditFilter {
    Vintage,
    Noir,
    Vibrant,
    Cinematic,
}

impl EditFilter {
    pub const fn all() -> [EditFilter; 4] {
        [
            EditFilter::Vintage,
            EditFilter::Noir,
            EditFilter::Vibrant,
            EditFilter::Cinematic,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditFilter::Vintage => "Vintage",
            EditFilter::Noir => "Noir",
            EditFilter::Vibrant => "Vibrant",
            EditFilter::Cinematic => "Cinematic",
        }
    }

    /// The fixed edit instruction sent to the editor for this preset.
    pub fn instruction(&self) -> &'static str {
        match self {
            EditFilter::Vintage => {
                "Apply a warm, faded vintage filter. Desaturate the colors slightly and add subtle grain and light leaks."
            }
            EditFilter::Noir => {
                "Convert the image to a high-contrast black and white noir style. Deepen the blacks and brighten the highlights to create a dramatic, moody atmosphere."
            }
            EditFilter::Vibrant => {
                "Boost the color saturation and vibrancy to make the image pop. Increase contrast for a more dynamic and energetic look."
            }
            EditFilter::Cinematic => {
                "Apply a cinematic color grade. Add a slight teal and orange look to the shadows and highlights. Add subtle cinematic letterboxing."
            }
        }
    }
}

/// Filename offered for a "download image" action: the first 20 characters
/// of the prompt with whitespace collapsed to underscores, fixed extension.
pub fn download_file_name(prompt: &str) -> String {
    let stem: String = prompt
        .chars()
        .take(20)
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("ai-banner-{}.jpeg", stem)
}
