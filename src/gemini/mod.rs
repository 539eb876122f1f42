pub mod edit_client;
pub mod image_client;
pub mod prompt_client;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    config::GeminiConfig,
    error::{BannerError, Result},
    models::{AspectRatio, BannerRequest, InlineImage},
    session::BannerBackend,
};

pub use edit_client::EditClient;
pub use image_client::ImageClient;
pub use prompt_client::PromptClient;

/// POST a JSON body and parse the JSON response.
///
/// This is the single boundary where raw transport and API failures are
/// caught: non-success statuses and connection errors are folded into one
/// detail string and classified exactly once.
pub(crate) async fn post_json<B, T>(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<T>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let response = http
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| BannerError::service(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BannerError::service(e.to_string()))?;

    if !status.is_success() {
        log::error!("Generative API returned {}: {}", status, text);
        return Err(BannerError::service(format!("HTTP {}: {}", status, text)));
    }

    serde_json::from_str(&text).map_err(|e| BannerError::Response(e.to_string()))
}

/// Facade over the three collaborator calls: prompt composition, banner
/// synthesis, and banner editing.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    prompt_client: PromptClient,
    image_client: ImageClient,
    edit_client: EditClient,
}

impl GeminiClient {
    /// Fails up front if the configuration holds no API key; no network
    /// call is ever attempted without the credential.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(BannerError::MissingApiKey)?;
        let http = reqwest::Client::new();

        Ok(Self {
            prompt_client: PromptClient::new(http.clone(), api_key.clone(), config.clone()),
            image_client: ImageClient::new(http.clone(), api_key.clone(), config.clone()),
            edit_client: EditClient::new(http, api_key, config),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn prompt(&self) -> &PromptClient {
        &self.prompt_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn edit(&self) -> &EditClient {
        &self.edit_client
    }

    /// Compose a prompt and synthesize the banner in one chained call. The
    /// composed text goes to the synthesizer verbatim.
    pub async fn generate_banner(&self, request: &BannerRequest) -> Result<InlineImage> {
        let composed = self.prompt_client.compose(request).await?;
        log::debug!("Composed prompt ({} chars)", composed.len());
        self.image_client
            .generate(&composed, request.aspect_ratio)
            .await
    }
}

#[async_trait]
impl BannerBackend for GeminiClient {
    async fn compose_prompt(&self, request: &BannerRequest) -> Result<String> {
        self.prompt_client.compose(request).await
    }

    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<InlineImage> {
        self.image_client.generate(prompt, aspect_ratio).await
    }

    async fn edit_image(&self, image: &InlineImage, instruction: &str) -> Result<InlineImage> {
        self.edit_client.edit(image, instruction).await
    }
}
