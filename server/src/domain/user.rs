use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    User,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub(crate) fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(DomainError::Unexpected(format!("unknown role: {value}"))),
        }
    }

    pub(crate) fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = normalize_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            role,
            created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(Self {
            username,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = normalize_email(&self.email)?;
        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChangePasswordRequest {
    pub(crate) current_password: String,
    pub(crate) new_password: String,
}

impl ChangePasswordRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.current_password.is_empty() {
            return Err(DomainError::Validation {
                field: "current_password",
                message: "must not be empty",
            });
        }
        validate_password(&self.new_password)?;
        Ok(self)
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(8..=128).contains(&len) {
        return Err(DomainError::Validation {
            field: "password",
            message: "must be 8..128 chars",
        });
    }
    Ok(())
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 50 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..50 chars",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}
