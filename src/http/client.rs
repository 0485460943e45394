use super::throttle::Throttle;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// HTTP client with a per-request timeout and request spacing
pub struct ThrottledClient {
    client: Client,
    throttle: Throttle,
}

impl ThrottledClient {
    pub fn new(user_agent: &str, timeout_secs: u64, min_interval_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let throttle = Throttle::new(min_interval_ms);

        Ok(Self { client, throttle })
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &mut self,
        url: &str,
        body: &B,
    ) -> reqwest::Result<reqwest::Response> {
        self.throttle.wait().await;
        self.client.post(url).json(body).send().await
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}
