use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::kernel::{BasePushNotificationService, PushPayload};

const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Expo accepts at most 100 recipients per push request
const MAX_TOKENS_PER_REQUEST: usize = 100;

/// Expo Push Notification Client
/// Sends push notifications to artisans' mobile devices
pub struct ExpoClient {
    client: Client,
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExpoMessage<'a> {
    to: &'a [String],
    title: &'a str,
    body: &'a str,
    data: &'a serde_json::Value,
    sound: &'static str,
    priority: &'static str,
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: Vec<ExpoTicket>,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    #[allow(dead_code)]
    id: Option<String>,
    message: Option<String>,
}

impl ExpoClient {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            access_token,
        }
    }

    async fn send_chunk(&self, tokens: &[String], payload: &PushPayload) -> Result<()> {
        let message = ExpoMessage {
            to: tokens,
            title: &payload.title,
            body: &payload.body,
            data: &payload.data,
            sound: "default",
            priority: "high",
        };

        let mut request = self.client.post(EXPO_PUSH_URL).json(&message);

        // Access token raises the rate limit; optional
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("Expo push failed {}: {}", status, body);
            anyhow::bail!("Expo push API error {}: {}", status, body);
        }

        let expo_response: ExpoResponse = response.json().await?;

        // Individual ticket errors (stale tokens) don't fail the multicast
        let failed: Vec<_> = expo_response
            .data
            .iter()
            .filter(|t| t.status == "error")
            .collect();

        if !failed.is_empty() {
            warn!(
                failed = failed.len(),
                total = expo_response.data.len(),
                first_error = ?failed[0].message,
                "Some Expo push tickets were rejected"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl BasePushNotificationService for ExpoClient {
    async fn send_multicast(&self, tokens: &[String], payload: PushPayload) -> Result<()> {
        if tokens.is_empty() {
            return Ok(());
        }

        info!(
            recipients = tokens.len(),
            title = %payload.title,
            "Sending Expo multicast push"
        );

        for chunk in tokens.chunks(MAX_TOKENS_PER_REQUEST) {
            self.send_chunk(chunk, &payload).await?;
        }

        Ok(())
    }
}
