use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::portfolio::Portfolio;

#[async_trait]
pub(crate) trait PortfolioRepository: Send + Sync {
    async fn get(&self) -> Result<Option<Portfolio>, DomainError>;
    /// Whole-document swap; creates the record when none exists yet.
    async fn replace(&self, portfolio: Portfolio) -> Result<Portfolio, DomainError>;
}
