use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail seam. The SMTP transport itself lives outside this
/// service; implementations compose the messages and hand them off.
#[async_trait]
pub(crate) trait Mailer: Send + Sync {
    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        reset_token: &str,
    ) -> Result<(), MailError>;

    async fn send_password_changed(&self, email: &str, username: &str) -> Result<(), MailError>;
}

/// Mailer that writes the composed message to the log instead of a wire.
/// Stands in wherever no SMTP relay is configured.
pub(crate) struct LogMailer {
    frontend_url: String,
}

impl LogMailer {
    pub(crate) fn new(frontend_url: &str) -> Self {
        Self {
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    fn reset_url(&self, reset_token: &str) -> String {
        format!("{}/reset-password?token={}", self.frontend_url, reset_token)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        reset_token: &str,
    ) -> Result<(), MailError> {
        let reset_url = self.reset_url(reset_token);
        info!(
            to = %email,
            %username,
            subject = "Password Reset Request",
            %reset_url,
            "password reset mail composed; link expires in 1 hour"
        );
        Ok(())
    }

    async fn send_password_changed(&self, email: &str, username: &str) -> Result<(), MailError> {
        info!(
            to = %email,
            %username,
            subject = "Password Changed Successfully",
            "password changed confirmation mail composed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::LogMailer;

    #[test]
    fn reset_url_points_at_frontend_reset_page() {
        let mailer = LogMailer::new("https://example.com/");
        assert_eq!(
            mailer.reset_url("tok123"),
            "https://example.com/reset-password?token=tok123"
        );
    }
}
