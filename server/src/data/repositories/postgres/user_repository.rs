use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{Role, User};

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    id: i64,
    username: String,
    email: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, DomainError> {
        let role = Role::parse(&self.role)?;
        User::new(self.id, self.username, self.email, role, self.created_at)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}

impl UserCredentialsRow {
    fn into_credentials(self) -> Result<UserCredentials, DomainError> {
        let role = Role::parse(&self.role)?;
        let user = User::new(self.id, self.username, self.email, role, self.created_at)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(UserCredentials {
            user,
            password_hash: self.password_hash,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, role, created_at
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.into_user()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT id, username, email, role, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(UserCredentialsRow::into_credentials).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT id, username, email, role, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(UserCredentialsRow::into_credentials).transpose()
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_user_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        let resource = match db_err.constraint() {
            Some("users_username_key") => "username",
            Some("users_email_key") => "email",
            _ => "user",
        };
        return DomainError::AlreadyExists(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
