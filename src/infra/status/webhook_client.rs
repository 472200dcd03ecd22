use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use crate::core::presence::{StatusError, StatusReporter};

pub const DEFAULT_STATUS_WEBHOOK_URL: &str =
    "https://joeuausysodgfannjzwp.supabase.co/functions/v1/bot-status";

/// Header the dashboard checks the shared secret against.
const SECRET_HEADER: &str = "x-webhook-secret";

/// Keeps a slow dashboard from holding up shutdown or the ready handler.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct StatusPayload {
    is_online: bool,
}

/// Posts `{"is_online": bool}` to the status dashboard.
pub struct WebhookStatusReporter {
    client: Client,
    url: String,
}

impl WebhookStatusReporter {
    pub fn new(url: impl Into<String>, secret: &str) -> Result<Self, StatusError> {
        Self::with_builder(url, secret, Client::builder())
    }

    fn with_builder(
        url: impl Into<String>,
        secret: &str,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, StatusError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            SECRET_HEADER,
            HeaderValue::from_str(secret).map_err(|e| StatusError::Transport(e.to_string()))?,
        );

        let client = builder
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StatusError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Build a reporter only when a secret is configured.
    pub fn from_secret(url: &str, secret: Option<&str>) -> Result<Option<Self>, StatusError> {
        match secret {
            Some(secret) if !secret.is_empty() => Self::new(url, secret).map(Some),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl StatusReporter for WebhookStatusReporter {
    async fn report(&self, is_online: bool) -> Result<(), StatusError> {
        let response = self
            .client
            .post(&self.url)
            .json(&StatusPayload { is_online })
            .send()
            .await
            .map_err(|e| StatusError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(StatusError::Rejected(status.as_u16())),
        }
    }
}
