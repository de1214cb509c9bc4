use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::data::portfolio_repository::PortfolioRepository;
use crate::domain::error::DomainError;
use crate::domain::portfolio::{Experience, PersonalInfo, Portfolio, Project, SkillCategory};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPortfolioRepository {
    pool: PgPool,
}

impl PostgresPortfolioRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PortfolioRow {
    personal_info: Json<PersonalInfo>,
    skills: Json<Vec<SkillCategory>>,
    projects: Json<Vec<Project>>,
    experience: Json<Vec<Experience>>,
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Portfolio {
            personal_info: row.personal_info.0,
            skills: row.skills.0,
            projects: row.projects.0,
            experience: row.experience.0,
        }
    }
}

#[async_trait]
impl PortfolioRepository for PostgresPortfolioRepository {
    async fn get(&self) -> Result<Option<Portfolio>, DomainError> {
        let row = sqlx::query_as::<_, PortfolioRow>(
            r#"
            SELECT personal_info, skills, projects, experience
            FROM portfolio
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(row.map(Portfolio::from))
    }

    async fn replace(&self, portfolio: Portfolio) -> Result<Portfolio, DomainError> {
        let row = sqlx::query_as::<_, PortfolioRow>(
            r#"
            INSERT INTO portfolio (id, personal_info, skills, projects, experience)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                personal_info = EXCLUDED.personal_info,
                skills = EXCLUDED.skills,
                projects = EXCLUDED.projects,
                experience = EXCLUDED.experience,
                updated_at = now()
            RETURNING personal_info, skills, projects, experience
            "#,
        )
        .bind(Json(&portfolio.personal_info))
        .bind(Json(&portfolio.skills))
        .bind(Json(&portfolio.projects))
        .bind(Json(&portfolio.experience))
        .fetch_one(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(row.into())
    }
}
