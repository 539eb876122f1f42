use crate::{
    config::GeminiConfig,
    error::{BannerError, Result},
    models::BannerRequest,
};

use super::types::{
    google_search_tool, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, ThinkingConfig,
};

const DEEP_RESEARCH_THINKING_BUDGET: u32 = 32768;

const BASE_INSTRUCTION: &str = r#"Your task is to act as a world-class prompt engineer for a high-end text-to-image AI model (Imagen 4). You must generate a single, highly-detailed, descriptive text prompt that will be used to create a stunning banner. Your prompt must be a masterpiece of descriptive language.

Analyze all the provided inputs (user's core idea, reference images, aspect ratio) and perform a Google Search to understand current visual trends related to the topic. Synthesize all this information into a single, cohesive prompt.

**AESTHETIC GOAL:** The final image should feel like it was professionally shot and edited by a human for a high-end campaign (e.g., for Behance). It MUST NOT have an "AI-generated" look. Prioritize natural textures, realistic lighting, and subtle, film-like color grading. Avoid overly perfect, plastic-looking surfaces or hyper-saturated colors.

**CRITICAL RULES:**
1.  **Output ONLY the final text prompt.** Do not include any other text, labels, or explanations.
2.  The prompt should be a single, dense paragraph.
3.  Describe the scene, subject, environment, lighting, colors, and composition with extreme detail.
4.  Incorporate cinematic and photographic terms like "shallow depth of field," "tack-sharp focus," "rule of thirds," "cinematic lighting," "8k," etc.
5.  Specify the exact aspect ratio required within the prompt itself (e.g., "a cinematic widescreen 16:9 aspect ratio").
---
"#;

/// Build the full instruction text for one composition request.
///
/// When a person image is present the user's prompt is folded into the
/// integration task segment; otherwise it stands on its own.
pub fn compose_instruction(request: &BannerRequest) -> String {
    let mut instruction = BASE_INSTRUCTION.to_string();

    if request.person_image.is_some() {
        instruction.push_str(&format!(
            "\n**TASK:** Integrate the person from the provided image into a new scene based on the user's prompt: \"{}\". The person must be seamlessly blended. The final prompt you generate should describe this person within the new, highly detailed scene.",
            request.prompt
        ));
    }

    if request.reference_image.is_some() {
        instruction.push_str(
            "\n**INSPIRATION:** Analyze the provided reference image for its mood, color palette, and composition. DO NOT copy the image. Instead, use its successful elements as inspiration for the new scene. If there is a person in the reference image, create a completely new and unique person in your generated prompt.",
        );
    }

    if request.person_image.is_none() {
        instruction.push_str(&format!("\n**USER'S PROMPT:** \"{}\"", request.prompt));
    }

    instruction.push_str(&format!(
        "\n**ASPECT RATIO:** The final image MUST be {}. Embed this requirement in your prompt.",
        request.aspect_ratio.value()
    ));

    instruction
}

/// Instruction text first, then the person image, then the reference image.
pub fn build_parts(request: &BannerRequest) -> Vec<Part> {
    let mut parts = vec![Part::text(compose_instruction(request))];
    if let Some(person) = &request.person_image {
        parts.push(Part::inline(person));
    }
    if let Some(reference) = &request.reference_image {
        parts.push(Part::inline(reference));
    }
    parts
}

/// Composes a single richly detailed image-generation prompt from the
/// user's intent and optional reference/person images, with web-search
/// grounding always enabled.
#[derive(Debug, Clone)]
pub struct PromptClient {
    http: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl PromptClient {
    pub fn new(http: reqwest::Client, api_key: String, config: GeminiConfig) -> Self {
        Self {
            http,
            api_key,
            config,
        }
    }

    fn model(&self, use_deep_research: bool) -> &str {
        if use_deep_research {
            &self.config.deep_research_model
        } else {
            &self.config.prompt_model
        }
    }

    pub async fn compose(&self, request: &BannerRequest) -> Result<String> {
        let model = self.model(request.use_deep_research);
        let thinking_config = request.use_deep_research.then(|| ThinkingConfig {
            thinking_budget: DEEP_RESEARCH_THINKING_BUDGET,
        });

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: build_parts(request),
            }],
            tools: Some(vec![google_search_tool()]),
            generation_config: thinking_config.map(|tc| GenerationConfig {
                response_modalities: None,
                thinking_config: Some(tc),
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        );
        log::info!("Composing image prompt with model: {}", model);

        let response: GenerateContentResponse =
            super::post_json(&self.http, &url, &self.api_key, &body).await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| BannerError::Response("no text in composition response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, InlineImage};

    fn image() -> InlineImage {
        InlineImage::new("image/jpeg", "aGVsbG8=")
    }

    #[test]
    fn test_instruction_without_images() {
        let request = BannerRequest::new("a red kite over a beach", AspectRatio::Landscape);
        let instruction = compose_instruction(&request);
        assert!(instruction.contains("**USER'S PROMPT:** \"a red kite over a beach\""));
        assert!(instruction.contains("MUST be 16:9"));
        assert!(!instruction.contains("**TASK:**"));
        assert!(!instruction.contains("**INSPIRATION:**"));
    }

    #[test]
    fn test_instruction_with_person_folds_prompt_into_task() {
        let request =
            BannerRequest::new("surfers at sunset", AspectRatio::Portrait).with_person_image(image());
        let instruction = compose_instruction(&request);
        assert!(instruction.contains("**TASK:**"));
        assert!(instruction.contains("\"surfers at sunset\""));
        assert!(!instruction.contains("**USER'S PROMPT:**"));
        assert!(instruction.contains("MUST be 9:16"));
    }

    #[test]
    fn test_instruction_with_reference_adds_inspiration() {
        let request =
            BannerRequest::new("tech review", AspectRatio::Square).with_reference_image(image());
        let instruction = compose_instruction(&request);
        assert!(instruction.contains("**INSPIRATION:**"));
        assert!(instruction.contains("**USER'S PROMPT:** \"tech review\""));
    }

    #[test]
    fn test_parts_order_is_instruction_person_reference() {
        let request = BannerRequest::new("p", AspectRatio::Landscape)
            .with_person_image(InlineImage::new("image/png", "cA=="))
            .with_reference_image(InlineImage::new("image/jpeg", "cg=="));
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 3);
        assert!(parts[0].text.is_some());
        assert_eq!(
            parts[1].inline_data.as_ref().unwrap().mime_type,
            "image/png"
        );
        assert_eq!(
            parts[2].inline_data.as_ref().unwrap().mime_type,
            "image/jpeg"
        );
    }

    #[test]
    fn test_parts_without_images_is_just_instruction() {
        let request = BannerRequest::new("p", AspectRatio::Landscape);
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].inline_data.is_none());
    }
}
