use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::domain::user::{Role, User};

#[derive(Debug, Error)]
pub(crate) enum TokenError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("token type mismatch: expected {expected}, got {actual}")]
    WrongType {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("token decode/validation failed")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TokenKind {
    Access,
    Refresh,
    PasswordReset,
}

impl TokenKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by access and refresh tokens; the two differ only in
/// `token_type` and lifetime.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct SessionClaims {
    pub(crate) sub: i64,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) exp: i64,
    pub(crate) token_type: TokenKind,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct ResetClaims {
    pub(crate) email: String,
    pub(crate) exp: i64,
    pub(crate) token_type: TokenKind,
}

/// Issues and verifies the three token variants over one symmetric secret.
/// Stateless; every check is a function of the secret and the current time.
pub(crate) struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    const RESET_TTL_HOURS: i64 = 1;
    const DEFAULT_ACCESS_TTL_MINUTES: i64 = 30;
    const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

    pub(crate) fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        let access_ttl_minutes = if access_ttl_minutes > 0 {
            access_ttl_minutes
        } else {
            Self::DEFAULT_ACCESS_TTL_MINUTES
        };
        let refresh_ttl_days = if refresh_ttl_days > 0 {
            refresh_ttl_days
        } else {
            Self::DEFAULT_REFRESH_TTL_DAYS
        };

        TokenService {
            secret: secret.into(),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    pub(crate) fn issue_access(&self, user: &User) -> Result<String, TokenError> {
        self.issue_session(user, TokenKind::Access, self.access_ttl)
    }

    pub(crate) fn issue_refresh(&self, user: &User) -> Result<String, TokenError> {
        self.issue_session(user, TokenKind::Refresh, self.refresh_ttl)
    }

    pub(crate) fn issue_reset(&self, email: &str) -> Result<String, TokenError> {
        let claims = ResetClaims {
            email: email.to_string(),
            exp: (Utc::now() + Duration::hours(Self::RESET_TTL_HOURS)).timestamp(),
            token_type: TokenKind::PasswordReset,
        };
        self.encode_claims(&claims)
    }

    /// Decodes a session token and requires its type tag to match
    /// `expected`; a refresh token is never accepted as an access token
    /// and vice versa.
    pub(crate) fn verify_session(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<SessionClaims, TokenError> {
        let claims: SessionClaims = self.decode_claims(token)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongType {
                expected,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }

    /// Verifies a password-reset token and returns the embedded email.
    pub(crate) fn verify_reset(&self, token: &str) -> Result<String, TokenError> {
        let claims: ResetClaims = self.decode_claims(token)?;
        if claims.token_type != TokenKind::PasswordReset {
            return Err(TokenError::WrongType {
                expected: TokenKind::PasswordReset,
                actual: claims.token_type,
            });
        }
        Ok(claims.email)
    }

    fn issue_session(
        &self,
        user: &User,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + ttl).timestamp(),
            token_type: kind,
        };
        self.encode_claims(&claims)
    }

    fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Encode)
    }

    fn decode_claims<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        decode::<T>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{TokenError, TokenKind, TokenService};
    use crate::domain::user::{Role, User};

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, 30, 7)
    }

    fn sample_user() -> User {
        User::new(7, "valid_user", "user@example.com", Role::Admin, Utc::now())
            .expect("sample user must be valid")
    }

    #[test]
    fn access_token_round_trips() {
        let svc = service("0123456789abcdef0123456789abcdef");
        let token = svc.issue_access(&sample_user()).expect("must encode");

        let claims = svc
            .verify_session(&token, TokenKind::Access)
            .expect("must verify");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.token_type, TokenKind::Access);
    }

    #[test]
    fn refresh_token_is_rejected_where_access_is_expected() {
        let svc = service("0123456789abcdef0123456789abcdef");
        let token = svc.issue_refresh(&sample_user()).expect("must encode");

        let err = svc
            .verify_session(&token, TokenKind::Access)
            .expect_err("type mismatch must fail");
        assert!(matches!(
            err,
            TokenError::WrongType {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh,
            }
        ));
    }

    #[test]
    fn access_token_is_rejected_where_refresh_is_expected() {
        let svc = service("0123456789abcdef0123456789abcdef");
        let token = svc.issue_access(&sample_user()).expect("must encode");

        assert!(matches!(
            svc.verify_session(&token, TokenKind::Refresh),
            Err(TokenError::WrongType { .. })
        ));
    }

    #[test]
    fn expired_token_fails_with_expiry_classification() {
        // negative TTL is clamped by new(), so build the service by hand
        let svc = TokenService {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_ttl: chrono::Duration::seconds(-3600),
            refresh_ttl: chrono::Duration::days(7),
        };
        let token = svc.issue_access(&sample_user()).expect("must encode");

        let err = svc
            .verify_session(&token, TokenKind::Access)
            .expect_err("expired token must fail");
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn foreign_secret_fails_regardless_of_claims() {
        let issuer = service("0123456789abcdef0123456789abcdef");
        let verifier = service("fedcba9876543210fedcba9876543210");
        let token = issuer.issue_access(&sample_user()).expect("must encode");

        let err = verifier
            .verify_session(&token, TokenKind::Access)
            .expect_err("foreign signature must fail");
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn reset_token_round_trips_and_is_type_checked() {
        let svc = service("0123456789abcdef0123456789abcdef");
        let token = svc.issue_reset("user@example.com").expect("must encode");

        let email = svc.verify_reset(&token).expect("must verify");
        assert_eq!(email, "user@example.com");

        // a session token must not pass as a reset token
        let session = svc.issue_access(&sample_user()).expect("must encode");
        assert!(svc.verify_reset(&session).is_err());
    }
}
