use std::sync::Arc;

use tracing::info;

use crate::ai::images::{ImageProbe, ImageValidator};
use crate::ai::parse::{excerpt_of, extract_draft};
use crate::ai::prompt::drafting_prompt;
use crate::ai::provider::{DraftProvider, ProviderKind};
use crate::domain::draft::GeneratedDraft;
use crate::domain::error::DomainError;

pub(crate) struct DraftService<P: ImageProbe> {
    openarena: Arc<dyn DraftProvider>,
    gemini: Arc<dyn DraftProvider>,
    images: ImageValidator<P>,
}

impl<P: ImageProbe> DraftService<P> {
    pub(crate) fn new(
        openarena: Arc<dyn DraftProvider>,
        gemini: Arc<dyn DraftProvider>,
        images: ImageValidator<P>,
    ) -> Self {
        Self {
            openarena,
            gemini,
            images,
        }
    }

    /// One upstream call, then local recovery only: extraction strategies
    /// and image fallback never fail the request once a reply is in hand.
    pub(crate) async fn generate(
        &self,
        idea: &str,
        provider: ProviderKind,
    ) -> Result<GeneratedDraft, DomainError> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(DomainError::Validation {
                field: "idea",
                message: "must not be empty",
            });
        }

        let prompt = drafting_prompt(idea);
        let reply = self.provider(provider).generate(&prompt).await?;

        let mut draft = extract_draft(idea, &reply);
        if draft.excerpt.is_empty() {
            draft.excerpt = excerpt_of(&draft.content);
        }

        let (featured, images) = self
            .images
            .validate(draft.featured_image.take(), std::mem::take(&mut draft.images), idea)
            .await;
        draft.featured_image = Some(featured);
        draft.images = images;

        info!(provider = provider.as_str(), title = %draft.title, "blog draft generated");
        Ok(draft)
    }

    fn provider(&self, kind: ProviderKind) -> &dyn DraftProvider {
        match kind {
            ProviderKind::OpenArena => self.openarena.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
        }
    }
}
