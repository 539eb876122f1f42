use crate::{
    config::GeminiConfig,
    error::{BannerError, Result},
    models::InlineImage,
};

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

/// Full instruction wrapped around the user's edit request.
pub fn edit_instruction(instruction: &str) -> String {
    format!(
        "You are an expert photo editor. Edit the provided image based on this instruction: \"{}\". Only output the final edited image.",
        instruction
    )
}

/// Edits an existing banner according to a natural-language instruction.
#[derive(Debug, Clone)]
pub struct EditClient {
    http: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl EditClient {
    pub fn new(http: reqwest::Client, api_key: String, config: GeminiConfig) -> Self {
        Self {
            http,
            api_key,
            config,
        }
    }

    /// Returns the edited image. The response is expected to carry exactly
    /// one image part; the first inline image wins, and its absence is the
    /// distinct `NoImageProduced` error rather than a service failure.
    pub async fn edit(&self, image: &InlineImage, instruction: &str) -> Result<InlineImage> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::inline(image), Part::text(edit_instruction(instruction))],
            }],
            tools: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                thinking_config: None,
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.edit_model
        );
        log::info!("Editing banner with model: {}", self.config.edit_model);

        let response: GenerateContentResponse =
            super::post_json(&self.http, &url, &self.api_key, &body).await?;

        response
            .first_inline_image()
            .ok_or(BannerError::NoImageProduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_instruction_wraps_user_text() {
        let full = edit_instruction("make it black and white");
        assert!(full.starts_with("You are an expert photo editor."));
        assert!(full.contains("\"make it black and white\""));
        assert!(full.ends_with("Only output the final edited image."));
    }
}
