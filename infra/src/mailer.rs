//! Mailer adapters.
//!
//! The real deployment would wire an SMTP or provider-API transport
//! here; the shipping adapter writes the delivery to the log, which is
//! enough for development and for the integration tests.

use async_trait::async_trait;
use tracing::info;

use cl_core::errors::DomainResult;
use cl_core::services::Mailer;

/// Mailer that records deliveries in the application log
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &str, raw_token: &str) -> DomainResult<()> {
        // The raw secret appears nowhere else; operators can copy it from
        // here when no mail transport is configured.
        info!(email = %email, token = %raw_token, "Password reset token issued");
        Ok(())
    }
}
