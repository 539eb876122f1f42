use std::fmt;

use thiserror::Error;

/// Category of a failure reported by the generative service.
///
/// The kind is determined exactly once, at the boundary where the raw
/// transport or API failure is caught, so callers never re-derive it from
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request was rejected by the service's safety policy.
    SafetyBlocked,
    /// The held API key was rejected.
    InvalidCredential,
    /// Rate limit or quota exhaustion.
    Overloaded,
    /// Upstream server fault.
    ServerFault,
    /// Anything the classifier could not recognize.
    Other,
}

impl FailureKind {
    /// Classify a raw failure message into a category.
    ///
    /// Matching is case-insensitive substring search, tolerant of the
    /// message being embedded in surrounding text (HTTP status lines,
    /// JSON error bodies).
    pub fn classify(detail: &str) -> Self {
        let lower = detail.to_lowercase();
        if lower.contains("safety") {
            FailureKind::SafetyBlocked
        } else if lower.contains("api key not valid") {
            FailureKind::InvalidCredential
        } else if lower.contains("429") || lower.contains("resource has been exhausted") {
            FailureKind::Overloaded
        } else if lower.contains("500") || lower.contains("internal error") {
            FailureKind::ServerFault
        } else {
            FailureKind::Other
        }
    }
}

/// A classified service failure: the category plus the raw detail text.
#[derive(Debug, Clone)]
pub struct ServiceFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl ServiceFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: FailureKind::classify(&detail),
            detail,
        }
    }

    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::SafetyBlocked => {
                "The request was blocked for safety reasons. Please modify your prompt and try again."
                    .to_string()
            }
            FailureKind::InvalidCredential => {
                "The server is incorrectly configured. API key is invalid.".to_string()
            }
            FailureKind::Overloaded => {
                "The service is currently overloaded. Please wait a moment and try again."
                    .to_string()
            }
            FailureKind::ServerFault => {
                "An unexpected server error occurred. Please try again later.".to_string()
            }
            FailureKind::Other => format!("Failed to generate banner. Details: {}", self.detail),
        }
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service failure ({:?}): {}", self.kind, self.detail)
    }
}

#[derive(Debug, Error)]
pub enum BannerError {
    #[error("invalid video link")]
    InvalidLink,
    #[error("could not fetch thumbnail image, even with fallback")]
    ThumbnailUnavailable,
    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),
    #[error("failed to read image: {0}")]
    ImageRead(String),
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("edit instruction must not be empty")]
    EmptyInstruction,
    #[error("no banner available")]
    MissingBanner,
    #[error("another operation is in flight")]
    Busy,
    #[error("API key is not configured")]
    MissingApiKey,
    #[error("no image was produced by the edit response")]
    NoImageProduced,
    #[error("unexpected response: {0}")]
    Response(String),
    #[error("{0}")]
    Service(ServiceFailure),
}

impl BannerError {
    /// Wrap a raw collaborator failure, classifying it once.
    pub fn service(detail: impl Into<String>) -> Self {
        BannerError::Service(ServiceFailure::new(detail))
    }

    /// The string shown to the user in place of a result.
    pub fn user_message(&self) -> String {
        match self {
            BannerError::InvalidLink => {
                "Invalid YouTube URL. Please check the link and try again.".to_string()
            }
            BannerError::ThumbnailUnavailable => {
                "Could not fetch thumbnail image, even with fallback.".to_string()
            }
            BannerError::UnsupportedImageType(_) => {
                "Please upload a valid image file (JPEG or PNG).".to_string()
            }
            BannerError::ImageRead(_) => "Failed to read the image file.".to_string(),
            BannerError::EmptyPrompt => {
                "Please describe the banner before generating.".to_string()
            }
            BannerError::EmptyInstruction => "Please enter an edit instruction.".to_string(),
            BannerError::MissingBanner => "Generate a banner before editing.".to_string(),
            BannerError::Busy => "Another operation is already in progress.".to_string(),
            BannerError::MissingApiKey => {
                "The server is incorrectly configured. API key is missing.".to_string()
            }
            BannerError::NoImageProduced => {
                "No image was generated from the edit. Please try a different prompt.".to_string()
            }
            BannerError::Response(detail) => {
                format!("Received an unexpected response. Details: {}", detail)
            }
            BannerError::Service(failure) => failure.user_message(),
        }
    }

    /// The failure category, when the error came from the service boundary.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            BannerError::Service(failure) => Some(failure.kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BannerError>;
