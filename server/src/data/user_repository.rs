use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{Role, User};

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, DomainError>;
}
