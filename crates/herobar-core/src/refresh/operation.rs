use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

/// The host's refresh work, run once per accepted pull gesture
///
/// The controller only looks at success or failure. Failures are reported to
/// the host as events and never retried.
#[async_trait]
pub trait RefreshOperation: Send + Sync {
    async fn refresh(&self) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> RefreshOperation for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn refresh(&self) -> anyhow::Result<()> {
        (self)().await
    }
}

/// Stand-in refresh that waits a fixed time, optionally failing afterwards
#[derive(Debug, Clone)]
pub struct DelayRefresh {
    delay: Duration,
    failure: Option<String>,
}

impl DelayRefresh {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl RefreshOperation for DelayRefresh {
    async fn refresh(&self) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;
        match &self.failure {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}
