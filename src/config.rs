use std::env;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PROMPT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_DEEP_RESEARCH_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";

/// Connection settings for the generative API.
///
/// The API key is the single server-held credential; all generation and
/// edit attempts fail up front without it.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub prompt_model: String,
    pub deep_research_model: String,
    pub image_model: String,
    pub edit_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            prompt_model: DEFAULT_PROMPT_MODEL.to_string(),
            deep_research_model: DEFAULT_DEEP_RESEARCH_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = env::var("GEMINI_API_KEY").ok();
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = env::var("GEMINI_PROMPT_MODEL") {
            config.prompt_model = model;
        }
        if let Ok(model) = env::var("GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Ok(model) = env::var("GEMINI_EDIT_MODEL") {
            config.edit_model = model;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_prompt_models(
        mut self,
        prompt_model: impl Into<String>,
        deep_research_model: impl Into<String>,
    ) -> Self {
        self.prompt_model = prompt_model.into();
        self.deep_research_model = deep_research_model.into();
        self
    }

    pub fn with_image_model(mut self, image_model: impl Into<String>) -> Self {
        self.image_model = image_model.into();
        self
    }

    pub fn with_edit_model(mut self, edit_model: impl Into<String>) -> Self {
        self.edit_model = edit_model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::new();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.prompt_model, "gemini-2.5-flash");
        assert_eq!(config.deep_research_model, "gemini-2.5-pro");
    }

    #[test]
    fn test_builder_methods() {
        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_base_url("http://localhost:8080")
            .with_image_model("imagen-next");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.image_model, "imagen-next");
        assert_eq!(config.edit_model, DEFAULT_EDIT_MODEL);
    }
}
