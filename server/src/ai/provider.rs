use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// Which upstream model family serves a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ProviderKind {
    #[default]
    OpenArena,
    Gemini,
}

impl ProviderKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenArena => "openarena",
            ProviderKind::Gemini => "gemini",
        }
    }
}

/// One outbound drafting call: the prompt goes upstream, the raw model
/// reply comes back. Transport failures and timeouts surface as
/// `DomainError::Upstream`; recovery is the caller's problem.
#[async_trait]
pub(crate) trait DraftProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}
