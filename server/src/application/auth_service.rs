use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::warn;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, Role, User, validate_password,
};
use crate::infrastructure::mail::Mailer;
use crate::infrastructure::token::{TokenKind, TokenService};

/// Token pair plus the user summary returned by every issuance path.
#[derive(Debug, Clone)]
pub(crate) struct AuthSession {
    pub(crate) user: User,
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

pub(crate) struct AuthService<R: UserRepository, M: Mailer> {
    repo: R,
    tokens: Arc<TokenService>,
    mailer: M,
}

impl<R: UserRepository, M: Mailer> AuthService<R, M> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, tokens: Arc<TokenService>, mailer: M) -> Self {
        Self {
            repo,
            tokens,
            mailer,
        }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthSession, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
                role: Role::User,
            })
            .await?;

        self.issue_session(user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthSession, DomainError> {
        let req = req.validate()?;

        let creds = match self.repo.find_by_email(&req.email).await? {
            Some(creds) => creds,
            None => {
                // keep "no such user" and "wrong password" indistinguishable,
                // timing included
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &creds.password_hash)?;

        self.issue_session(creds.user)
    }

    /// Trades a refresh token for a fresh pair. The presented token must
    /// actually be a refresh token; access tokens fail closed here.
    pub(crate) async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, DomainError> {
        let claims = self
            .tokens
            .verify_session(refresh_token, TokenKind::Refresh)
            .map_err(|_| DomainError::InvalidCredentials)?;

        let creds = self
            .repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        self.issue_session(creds.user)
    }

    pub(crate) async fn current_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .map(|creds| creds.user)
            .ok_or_else(|| DomainError::NotFound(format!("user id: {user_id}")))
    }

    pub(crate) async fn change_password(
        &self,
        user_id: i64,
        req: ChangePasswordRequest,
    ) -> Result<(), DomainError> {
        let req = req.validate()?;

        let creds = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {user_id}")))?;

        self.verify_password(&req.current_password, &creds.password_hash)?;

        let password_hash = self.hash_password(&req.new_password)?;
        self.repo
            .update_password_hash(user_id, &password_hash)
            .await?;

        if let Err(err) = self
            .mailer
            .send_password_changed(&creds.user.email, &creds.user.username)
            .await
        {
            warn!(error = %err, "password changed mail not sent");
        }

        Ok(())
    }

    /// Always answers Ok so the endpoint is no oracle for which emails
    /// have accounts; the reset mail only goes out when one exists.
    pub(crate) async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        let email = email.trim().to_lowercase();

        let Some(creds) = self.repo.find_by_email(&email).await? else {
            return Ok(());
        };

        let reset_token = self
            .tokens
            .issue_reset(&creds.user.email)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        if let Err(err) = self
            .mailer
            .send_password_reset(&creds.user.email, &creds.user.username, &reset_token)
            .await
        {
            warn!(error = %err, "password reset mail not sent");
        }

        Ok(())
    }

    pub(crate) async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        validate_password(new_password)?;

        let email = self
            .tokens
            .verify_reset(reset_token)
            .map_err(|_| DomainError::InvalidCredentials)?;

        let creds = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let password_hash = self.hash_password(new_password)?;
        self.repo
            .update_password_hash(creds.user.id, &password_hash)
            .await?;

        if let Err(err) = self
            .mailer
            .send_password_changed(&creds.user.email, &creds.user.username)
            .await
        {
            warn!(error = %err, "password changed mail not sent");
        }

        Ok(())
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, DomainError> {
        let access_token = self
            .tokens
            .issue_access(&user)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        let refresh_token = self
            .tokens
            .issue_refresh(&user)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(AuthSession {
            user,
            access_token,
            refresh_token,
        })
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::AuthService;
    use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, Role, User};
    use crate::infrastructure::mail::{MailError, Mailer};
    use crate::infrastructure::token::{TokenKind, TokenService};

    #[derive(Clone)]
    struct FakeUserRepo {
        created_input: Arc<Mutex<Option<NewUser>>>,
        credentials: Arc<Mutex<Option<UserCredentials>>>,
        updated_hash: Arc<Mutex<Option<(i64, String)>>>,
        create_user_out: User,
    }

    impl FakeUserRepo {
        fn new(create_user_out: User) -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                credentials: Arc::new(Mutex::new(None)),
                updated_hash: Arc::new(Mutex::new(None)),
                create_user_out,
            }
        }

        fn set_credentials(&self, creds: Option<UserCredentials>) {
            *self.credentials.lock().expect("credentials mutex poisoned") = creds;
        }

        fn take_created_input(&self) -> Option<NewUser> {
            self.created_input
                .lock()
                .expect("created input mutex poisoned")
                .take()
        }

        fn updated_hash(&self) -> Option<(i64, String)> {
            self.updated_hash
                .lock()
                .expect("updated hash mutex poisoned")
                .clone()
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created input mutex poisoned") = Some(input);
            Ok(self.create_user_out.clone())
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<UserCredentials>, DomainError> {
            Ok(self
                .credentials
                .lock()
                .expect("credentials mutex poisoned")
                .clone())
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<UserCredentials>, DomainError> {
            Ok(self
                .credentials
                .lock()
                .expect("credentials mutex poisoned")
                .clone())
        }

        async fn update_password_hash(
            &self,
            user_id: i64,
            password_hash: &str,
        ) -> Result<bool, DomainError> {
            *self
                .updated_hash
                .lock()
                .expect("updated hash mutex poisoned") = Some((user_id, password_hash.to_string()));
            Ok(true)
        }
    }

    #[derive(Clone, Default)]
    struct FakeMailer {
        reset_sent: Arc<Mutex<Vec<(String, String)>>>,
        changed_sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send_password_reset(
            &self,
            email: &str,
            _username: &str,
            reset_token: &str,
        ) -> Result<(), MailError> {
            self.reset_sent
                .lock()
                .expect("reset mutex poisoned")
                .push((email.to_string(), reset_token.to_string()));
            Ok(())
        }

        async fn send_password_changed(
            &self,
            email: &str,
            _username: &str,
        ) -> Result<(), MailError> {
            self.changed_sent
                .lock()
                .expect("changed mutex poisoned")
                .push(email.to_string());
            Ok(())
        }
    }

    fn sample_user(id: i64, username: &str, email: &str) -> User {
        User::new(id, username, email, Role::User, Utc::now()).expect("sample user must be valid")
    }

    fn test_tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new("0123456789abcdef0123456789abcdef", 30, 7))
    }

    fn service(
        repo: FakeUserRepo,
        mailer: FakeMailer,
    ) -> AuthService<FakeUserRepo, FakeMailer> {
        AuthService::new(repo, test_tokens(), mailer)
    }

    #[tokio::test]
    async fn register_creates_user_and_returns_token_pair() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let svc = service(repo.clone(), FakeMailer::default());

        let req = RegisterRequest {
            username: "  valid_user  ".to_string(),
            email: "  VALID@EXAMPLE.COM  ".to_string(),
            password: "very-secure-password".to_string(),
        };

        let session = svc.register(req).await.expect("register must succeed");

        assert_eq!(session.user.username, "valid_user");
        assert!(!session.access_token.is_empty());
        assert!(!session.refresh_token.is_empty());
        assert_ne!(session.access_token, session.refresh_token);

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        assert_eq!(created.username, "valid_user");
        assert_eq!(created.email, "valid@example.com");
        assert_eq!(created.role, Role::User);
        assert!(!created.password_hash.is_empty());
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.set_credentials(None);
        let svc = service(repo, FakeMailer::default());

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "some-password".to_string(),
        };

        let err = svc.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_wrong_password() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let svc = service(repo.clone(), FakeMailer::default());

        let hash = svc
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = svc.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_pair_for_valid_credentials() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let svc = service(repo.clone(), FakeMailer::default());

        let hash = svc
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "correct-password".to_string(),
        };

        let session = svc.login(req).await.expect("login must succeed");
        assert_eq!(session.user.id, 1);
        assert!(!session.access_token.is_empty());
    }

    #[tokio::test]
    async fn hashing_is_salted_and_verification_detects_mutation() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let svc = service(repo, FakeMailer::default());

        let first = svc.hash_password("secret-password").expect("must hash");
        let second = svc.hash_password("secret-password").expect("must hash");
        assert_ne!(first, second);

        assert!(svc.verify_password("secret-password", &first).is_ok());
        let err = svc
            .verify_password("secret-passwore", &first)
            .expect_err("mutated password must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let user = sample_user(1, "valid_user", "valid@example.com");
        repo.set_credentials(Some(UserCredentials {
            user: user.clone(),
            password_hash: "unused".to_string(),
        }));
        let tokens = test_tokens();
        let svc = AuthService::new(repo, tokens.clone(), FakeMailer::default());

        let access = tokens.issue_access(&user).expect("must encode");
        let err = svc
            .refresh(&access)
            .await
            .expect_err("access token must not refresh");
        assert!(matches!(err, DomainError::InvalidCredentials));

        let refresh = tokens.issue_refresh(&user).expect("must encode");
        let session = svc.refresh(&refresh).await.expect("refresh must succeed");
        assert!(
            tokens
                .verify_session(&session.access_token, TokenKind::Access)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn forgot_password_is_silent_for_unknown_email() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.set_credentials(None);
        let mailer = FakeMailer::default();
        let svc = service(repo, mailer.clone());

        svc.forgot_password("nobody@example.com")
            .await
            .expect("must not fail");
        assert!(mailer.reset_sent.lock().expect("mutex poisoned").is_empty());
    }

    #[tokio::test]
    async fn forgot_password_sends_reset_token_for_known_email() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: "unused".to_string(),
        }));
        let mailer = FakeMailer::default();
        let tokens = test_tokens();
        let svc = AuthService::new(repo, tokens.clone(), mailer.clone());

        svc.forgot_password("  VALID@example.com ")
            .await
            .expect("must not fail");

        let sent = mailer.reset_sent.lock().expect("mutex poisoned").clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "valid@example.com");
        let email = tokens.verify_reset(&sent[0].1).expect("token must verify");
        assert_eq!(email, "valid@example.com");
    }

    #[tokio::test]
    async fn reset_password_updates_hash_for_valid_token() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: "old-hash".to_string(),
        }));
        let tokens = test_tokens();
        let svc = AuthService::new(repo.clone(), tokens.clone(), FakeMailer::default());

        let token = tokens
            .issue_reset("valid@example.com")
            .expect("must encode");
        svc.reset_password(&token, "brand-new-password")
            .await
            .expect("reset must succeed");

        let (user_id, new_hash) = repo.updated_hash().expect("hash must be updated");
        assert_eq!(user_id, 1);
        assert!(svc.verify_password("brand-new-password", &new_hash).is_ok());
    }

    #[tokio::test]
    async fn reset_password_rejects_garbage_tokens() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let svc = service(repo, FakeMailer::default());

        let err = svc
            .reset_password("not-a-token", "brand-new-password")
            .await
            .expect_err("must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let mailer = FakeMailer::default();
        let svc = service(repo.clone(), mailer.clone());

        let hash = svc.hash_password("current-password").expect("must hash");
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: hash,
        }));

        let err = svc
            .change_password(
                1,
                ChangePasswordRequest {
                    current_password: "wrong-password".to_string(),
                    new_password: "brand-new-password".to_string(),
                },
            )
            .await
            .expect_err("wrong current password must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));

        svc.change_password(
            1,
            ChangePasswordRequest {
                current_password: "current-password".to_string(),
                new_password: "brand-new-password".to_string(),
            },
        )
        .await
        .expect("change must succeed");

        assert!(repo.updated_hash().is_some());
        assert_eq!(
            mailer.changed_sent.lock().expect("mutex poisoned").len(),
            1
        );
    }
}
