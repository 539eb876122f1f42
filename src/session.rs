use std::path::Path;

use async_trait::async_trait;

use crate::{
    error::{BannerError, Result},
    models::{banner::download_file_name, AspectRatio, BannerRequest, EditFilter, InlineImage},
    thumbnail::{extract_video_id, ThumbnailFetcher},
    upload,
};

/// The collaborator seam: everything the session needs from the
/// generative service. Implemented by `GeminiClient`, mocked in tests.
#[async_trait]
pub trait BannerBackend: Send + Sync {
    async fn compose_prompt(&self, request: &BannerRequest) -> Result<String>;
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio)
        -> Result<InlineImage>;
    async fn edit_image(&self, image: &InlineImage, instruction: &str) -> Result<InlineImage>;
}

/// Which flow is currently in flight. A single enum rather than
/// independent booleans, so mutual exclusion is enforced centrally and a
/// stale flow can never interleave with a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FetchingThumbnail,
    Generating,
    Editing,
}

/// All transient, session-scoped state plus the flow orchestration.
/// Nothing here survives the session; results are only replaced, never
/// mutated in place.
pub struct BannerSession<B: BannerBackend> {
    backend: B,
    thumbnails: ThumbnailFetcher,
    phase: Phase,
    prompt: String,
    aspect_ratio: AspectRatio,
    use_deep_research: bool,
    edit_prompt: String,
    reference_image: Option<InlineImage>,
    person_image: Option<InlineImage>,
    banner: Option<InlineImage>,
    error: Option<String>,
}

impl<B: BannerBackend> BannerSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            thumbnails: ThumbnailFetcher::new(),
            phase: Phase::Idle,
            prompt: String::new(),
            aspect_ratio: AspectRatio::default(),
            use_deep_research: false,
            edit_prompt: String::new(),
            reference_image: None,
            person_image: None,
            banner: None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn banner(&self) -> Option<&InlineImage> {
        self.banner.as_ref()
    }

    pub fn reference_image(&self) -> Option<&InlineImage> {
        self.reference_image.as_ref()
    }

    pub fn person_image(&self) -> Option<&InlineImage> {
        self.person_image.as_ref()
    }

    /// The user-facing message for the most recent failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn edit_prompt(&self) -> &str {
        &self.edit_prompt
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn set_deep_research(&mut self, enabled: bool) {
        self.use_deep_research = enabled;
    }

    pub fn set_edit_prompt(&mut self, edit_prompt: impl Into<String>) {
        self.edit_prompt = edit_prompt.into();
    }

    pub fn set_person_image(&mut self, image: InlineImage) {
        self.person_image = Some(image);
    }

    pub fn clear_reference_image(&mut self) {
        self.reference_image = None;
    }

    pub fn clear_person_image(&mut self) {
        self.person_image = None;
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.phase == Phase::Idle {
            Ok(())
        } else {
            Err(BannerError::Busy)
        }
    }

    fn record_failure(&mut self, error: BannerError) -> BannerError {
        log::error!("Operation failed: {}", error);
        self.error = Some(error.user_message());
        error
    }

    /// Fetch a video thumbnail to use as the reference image. An invalid
    /// link fails before the flow enters its in-flight phase; any held
    /// reference image is cleared as soon as the fetch starts.
    pub async fn fetch_thumbnail(&mut self, link: &str) -> Result<()> {
        self.ensure_idle()?;
        if extract_video_id(link).is_none() {
            return Err(self.record_failure(BannerError::InvalidLink));
        }

        self.error = None;
        self.reference_image = None;
        self.phase = Phase::FetchingThumbnail;
        let outcome = self.thumbnails.fetch(link).await;
        self.phase = Phase::Idle;

        match outcome {
            Ok(image) => {
                self.reference_image = Some(image);
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Load a person photo from disk. Rejected types leave the current
    /// person image untouched.
    pub async fn load_person_image(&mut self, path: &Path) -> Result<()> {
        match upload::load_image_file(path).await {
            Ok(image) => {
                self.person_image = Some(image);
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    fn build_request(&self) -> BannerRequest {
        BannerRequest {
            prompt: self.prompt.clone(),
            aspect_ratio: self.aspect_ratio,
            use_deep_research: self.use_deep_research,
            reference_image: self.reference_image.clone(),
            person_image: self.person_image.clone(),
        }
    }

    /// Run the full generation flow: compose a prompt, pass it verbatim
    /// to the synthesizer, and replace the banner. An empty prompt is a
    /// no-op guard failure with no state change and no network call.
    pub async fn generate(&mut self) -> Result<()> {
        self.ensure_idle()?;
        if self.prompt.trim().is_empty() {
            return Err(BannerError::EmptyPrompt);
        }

        self.error = None;
        self.banner = None;
        self.edit_prompt.clear();
        self.phase = Phase::Generating;

        let request = self.build_request();
        let outcome = match self.backend.compose_prompt(&request).await {
            Ok(composed) => {
                self.backend
                    .generate_image(&composed, request.aspect_ratio)
                    .await
            }
            Err(e) => Err(e),
        };
        self.phase = Phase::Idle;

        match outcome {
            Ok(image) => {
                self.banner = Some(image);
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Edit the current banner with a free-text instruction. A failed
    /// edit, including the distinct no-image-produced outcome, leaves the
    /// prior banner untouched.
    pub async fn edit(&mut self, instruction: &str) -> Result<()> {
        self.ensure_idle()?;
        if instruction.trim().is_empty() {
            return Err(BannerError::EmptyInstruction);
        }
        let base = match &self.banner {
            Some(banner) => banner.clone(),
            None => return Err(BannerError::MissingBanner),
        };

        self.error = None;
        self.phase = Phase::Editing;
        let outcome = self.backend.edit_image(&base, instruction).await;
        self.phase = Phase::Idle;

        match outcome {
            Ok(image) => {
                self.banner = Some(image);
                self.edit_prompt.clear();
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Submit the free-text edit field.
    pub async fn apply_edit_prompt(&mut self) -> Result<()> {
        let instruction = self.edit_prompt.clone();
        self.edit(&instruction).await
    }

    /// Apply one of the quick preset filters; the free-text field is
    /// neither required nor consulted.
    pub async fn apply_filter(&mut self, filter: EditFilter) -> Result<()> {
        self.edit(filter.instruction()).await
    }

    /// Filename offered when saving the current banner.
    pub fn download_file_name(&self) -> String {
        download_file_name(&self.prompt)
    }

    /// Decode the current banner and write it to disk.
    pub async fn save_banner(&self, path: &Path) -> Result<()> {
        let banner = self.banner.as_ref().ok_or(BannerError::MissingBanner)?;
        let bytes = banner.decode()?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| BannerError::ImageRead(e.to_string()))
    }

    #[cfg(test)]
    fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Compose {
            prompt: String,
            deep_research: bool,
            has_reference: bool,
            has_person: bool,
        },
        Generate {
            prompt: String,
            aspect_ratio: AspectRatio,
        },
        Edit {
            instruction: String,
            base_data: String,
        },
    }

    #[derive(Default)]
    struct MockBackend {
        calls: Mutex<Vec<Call>>,
        compose_error: Option<String>,
        edit_produces_no_image: bool,
    }

    impl MockBackend {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BannerBackend for MockBackend {
        async fn compose_prompt(&self, request: &BannerRequest) -> Result<String> {
            self.calls.lock().unwrap().push(Call::Compose {
                prompt: request.prompt.clone(),
                deep_research: request.use_deep_research,
                has_reference: request.reference_image.is_some(),
                has_person: request.person_image.is_some(),
            });
            if let Some(detail) = &self.compose_error {
                return Err(BannerError::service(detail.clone()));
            }
            Ok(format!("a dense composed prompt for: {}", request.prompt))
        }

        async fn generate_image(
            &self,
            prompt: &str,
            aspect_ratio: AspectRatio,
        ) -> Result<InlineImage> {
            self.calls.lock().unwrap().push(Call::Generate {
                prompt: prompt.to_string(),
                aspect_ratio,
            });
            Ok(InlineImage::new("image/jpeg", "Z2VuZXJhdGVk"))
        }

        async fn edit_image(&self, image: &InlineImage, instruction: &str) -> Result<InlineImage> {
            self.calls.lock().unwrap().push(Call::Edit {
                instruction: instruction.to_string(),
                base_data: image.data.clone(),
            });
            if self.edit_produces_no_image {
                return Err(BannerError::NoImageProduced);
            }
            Ok(InlineImage::new("image/png", "ZWRpdGVk"))
        }
    }

    #[tokio::test]
    async fn test_generate_passes_composed_prompt_through_verbatim() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("a red kite over a beach");
        session.set_aspect_ratio(AspectRatio::Landscape);

        session.generate().await.unwrap();

        let calls = session.backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            Call::Compose {
                prompt: "a red kite over a beach".into(),
                deep_research: false,
                has_reference: false,
                has_person: false,
            }
        );
        assert_eq!(
            calls[1],
            Call::Generate {
                prompt: "a dense composed prompt for: a red kite over a beach".into(),
                aspect_ratio: AspectRatio::Landscape,
            }
        );
        assert!(session.banner().is_some());
        assert!(session.error().is_none());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_generate_clears_previous_result_and_error_first() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("first");
        session.generate().await.unwrap();
        assert!(session.banner().is_some());
        session.error = Some("stale error".into());
        session.set_edit_prompt("leftover edit");

        session.set_prompt("second");
        session.generate().await.unwrap();

        assert!(session.banner().is_some());
        assert!(session.error().is_none());
        assert_eq!(session.edit_prompt(), "");
    }

    #[tokio::test]
    async fn test_generate_with_empty_prompt_is_a_noop() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("   ");

        let err = session.generate().await.unwrap_err();

        assert!(matches!(err, BannerError::EmptyPrompt));
        assert!(session.backend.calls().is_empty());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.banner().is_none());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_generate_failure_stores_classified_message() {
        let backend = MockBackend {
            compose_error: Some("blocked by safety filters".into()),
            ..Default::default()
        };
        let mut session = BannerSession::new(backend);
        session.set_prompt("something risky");

        let err = session.generate().await.unwrap_err();

        assert!(matches!(err, BannerError::Service(_)));
        assert!(session.error().unwrap().contains("safety"));
        assert!(session.banner().is_none());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_noir_filter_sends_fixed_instruction_with_current_image() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("city skyline");
        session.generate().await.unwrap();
        let base_data = session.banner().unwrap().data.clone();

        session.apply_filter(EditFilter::Noir).await.unwrap();

        let calls = session.backend.calls();
        assert_eq!(
            calls[2],
            Call::Edit {
                instruction: EditFilter::Noir.instruction().into(),
                base_data,
            }
        );
        assert_eq!(session.banner().unwrap().data, "ZWRpdGVk");
    }

    #[tokio::test]
    async fn test_edit_without_image_part_keeps_prior_banner() {
        let backend = MockBackend {
            edit_produces_no_image: true,
            ..Default::default()
        };
        let mut session = BannerSession::new(backend);
        session.set_prompt("city skyline");
        session.generate().await.unwrap();
        let before = session.banner().unwrap().clone();

        let err = session.apply_filter(EditFilter::Noir).await.unwrap_err();

        assert!(matches!(err, BannerError::NoImageProduced));
        assert_eq!(session.banner(), Some(&before));
        assert!(session
            .error()
            .unwrap()
            .contains("No image was generated"));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_edit_requires_existing_banner_and_instruction() {
        let mut session = BannerSession::new(MockBackend::default());

        let err = session.edit("make it pop").await.unwrap_err();
        assert!(matches!(err, BannerError::MissingBanner));

        session.set_prompt("p");
        session.generate().await.unwrap();
        let err = session.edit("  ").await.unwrap_err();
        assert!(matches!(err, BannerError::EmptyInstruction));
    }

    #[tokio::test]
    async fn test_successful_edit_clears_edit_prompt() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("p");
        session.generate().await.unwrap();

        session.set_edit_prompt("add a retro filter");
        session.apply_edit_prompt().await.unwrap();

        assert_eq!(session.edit_prompt(), "");
        assert_eq!(session.banner().unwrap().mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_busy_guard_rejects_overlapping_flows() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("p");
        session.force_phase(Phase::Generating);

        assert!(matches!(
            session.generate().await.unwrap_err(),
            BannerError::Busy
        ));
        assert!(matches!(
            session.edit("x").await.unwrap_err(),
            BannerError::Busy
        ));
        assert!(matches!(
            session.fetch_thumbnail("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err(),
            BannerError::Busy
        ));
        assert!(session.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_thumbnail_link_sets_error_without_clearing_reference() {
        let mut session = BannerSession::new(MockBackend::default());
        session.reference_image = Some(InlineImage::new("image/jpeg", "cmVm"));

        let err = session.fetch_thumbnail("https://example.com/").await.unwrap_err();

        assert!(matches!(err, BannerError::InvalidLink));
        assert!(session.error().unwrap().contains("Invalid YouTube URL"));
        // The flow never started, so the held reference image survives.
        assert!(session.reference_image().is_some());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_rejected_person_upload_keeps_existing_image() {
        let mut session = BannerSession::new(MockBackend::default());
        let existing = InlineImage::new("image/png", "b2xk");
        session.set_person_image(existing.clone());

        let err = session
            .load_person_image(Path::new("/tmp/photo.gif"))
            .await
            .unwrap_err();

        assert!(matches!(err, BannerError::UnsupportedImageType(_)));
        assert_eq!(session.person_image(), Some(&existing));
        assert!(session.error().unwrap().contains("JPEG or PNG"));
    }

    #[tokio::test]
    async fn test_deep_research_and_images_reach_the_composer() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("p");
        session.set_deep_research(true);
        session.set_person_image(InlineImage::new("image/png", "cGVyc29u"));

        session.generate().await.unwrap();

        match &session.backend.calls()[0] {
            Call::Compose {
                deep_research,
                has_person,
                has_reference,
                ..
            } => {
                assert!(deep_research);
                assert!(has_person);
                assert!(!has_reference);
            }
            other => panic!("unexpected first call: {:?}", other),
        }
    }

    #[test]
    fn test_download_file_name_uses_prompt() {
        let mut session = BannerSession::new(MockBackend::default());
        session.set_prompt("a red kite over a beach");
        assert_eq!(
            session.download_file_name(),
            "ai-banner-a_red_kite_over_a_be.jpeg"
        );
    }
}
