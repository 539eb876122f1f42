//! Bannerforge: AI-assisted banner creation.
//!
//! The crate wraps three collaborator calls to a hosted generative API
//! (prompt composition with web-search grounding, single-image banner
//! synthesis, and instruction-driven image editing) behind a session that
//! holds all transient state and keeps the flows mutually exclusive.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod session;
pub mod thumbnail;
pub mod upload;

pub use config::GeminiConfig;
pub use error::{BannerError, FailureKind, Result, ServiceFailure};
pub use gemini::GeminiClient;
pub use models::{AspectRatio, BannerRequest, EditFilter, InlineImage};
pub use session::{BannerBackend, BannerSession, Phase};
pub use thumbnail::ThumbnailFetcher;
