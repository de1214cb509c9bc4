use crate::data::portfolio_repository::PortfolioRepository;
use crate::domain::error::DomainError;
use crate::domain::portfolio::{
    Experience, PersonalInfo, Portfolio, Project, SkillCategory,
};

pub(crate) struct PortfolioService<R: PortfolioRepository> {
    repo: R,
}

impl<R: PortfolioRepository> PortfolioService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn portfolio(&self) -> Result<Portfolio, DomainError> {
        self.load().await
    }

    pub(crate) async fn personal_info(&self) -> Result<PersonalInfo, DomainError> {
        Ok(self.load().await?.personal_info)
    }

    pub(crate) async fn skills(&self) -> Result<Vec<SkillCategory>, DomainError> {
        Ok(self.load().await?.skills)
    }

    pub(crate) async fn projects(&self) -> Result<Vec<Project>, DomainError> {
        Ok(self.load().await?.projects)
    }

    pub(crate) async fn experience(&self) -> Result<Vec<Experience>, DomainError> {
        Ok(self.load().await?.experience)
    }

    pub(crate) async fn replace(&self, portfolio: Portfolio) -> Result<Portfolio, DomainError> {
        let portfolio = portfolio.validate()?;
        self.repo.replace(portfolio).await
    }

    async fn load(&self) -> Result<Portfolio, DomainError> {
        self.repo
            .get()
            .await?
            .ok_or_else(|| DomainError::NotFound("portfolio".to_string()))
    }
}
