use super::traits::TokenizerBackend;
use super::SchemeError;
use crate::core::Result;
use crate::envconfig::HostedConfig;
use anyhow::bail;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct HostedRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct HostedResponse {
    tokens: Vec<String>,
}

/// Remote tokenizer reached over HTTP with a bearer credential.
pub struct HostedBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HostedBackend {
    pub fn from_config(config: &HostedConfig) -> std::result::Result<Self, SchemeError> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => return Err(SchemeError::MissingCredential("TOKVIZ_HOSTED_API_KEY")),
        };
        let endpoint = match config.endpoint.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => return Err(SchemeError::MissingEndpoint("TOKVIZ_HOSTED_URL")),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| SchemeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TokenizerBackend for HostedBackend {
    async fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&HostedRequest {
                model: &self.model,
                text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Hosted tokenizer returned {}", response.status());
        }

        let body: HostedResponse = response.json().await?;
        Ok(body.tokens)
    }

    fn describe(&self) -> String {
        format!("hosted {} ({})", self.model, self.endpoint)
    }
}
