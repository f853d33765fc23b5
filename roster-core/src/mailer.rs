//! Signup notification port.
//!
//! Delivery is a collaborator concern: registration only requires that a
//! welcome notification is dispatched fire-and-forget, never that it
//! succeeds. The default implementation logs instead of sending.

use async_trait::async_trait;

/// Outbound account notifications.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, email: &str, name: &str) -> anyhow::Result<()>;
}

/// Mailer that records the notification in the log stream. Used in tests
/// and in deployments without an outbound mail relay.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_welcome(&self, email: &str, name: &str) -> anyhow::Result<()> {
        tracing::info!(%email, %name, "welcome notification dispatched");
        Ok(())
    }
}
