use crate::{
    config::GeminiConfig,
    error::{BannerError, Result},
    models::{AspectRatio, InlineImage},
};

use super::types::{PredictInstance, PredictParameters, PredictRequest, PredictResponse};

const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Synthesizes exactly one banner image from a composed prompt.
#[derive(Debug, Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl ImageClient {
    pub fn new(http: reqwest::Client, api_key: String, config: GeminiConfig) -> Self {
        Self {
            http,
            api_key,
            config,
        }
    }

    /// Request one image at the given aspect ratio. The prompt is passed
    /// through verbatim. Failures are classified once at the boundary and
    /// never retried automatically.
    pub async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<InlineImage> {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.value().to_string(),
                output_mime_type: OUTPUT_MIME_TYPE.to_string(),
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:predict",
            self.config.base_url, self.config.image_model
        );
        log::info!(
            "Generating {} banner with model: {}",
            aspect_ratio.value(),
            self.config.image_model
        );

        let response: PredictResponse =
            super::post_json(&self.http, &url, &self.api_key, &body).await?;

        let prediction = response
            .predictions
            .into_iter()
            .next()
            .ok_or(BannerError::NoImageProduced)?;
        let data = prediction
            .bytes_base64_encoded
            .ok_or(BannerError::NoImageProduced)?;

        Ok(InlineImage::new(
            prediction
                .mime_type
                .unwrap_or_else(|| OUTPUT_MIME_TYPE.to_string()),
            data,
        ))
    }
}
