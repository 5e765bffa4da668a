use anyhow::{bail, Result};

pub mod types;

pub use types::{
    ErrorResponse, HealthResponse, SchemeInfo, SchemeResult, TokenizeRequest, TokenizeResponse,
};

/// Client for a running tokviz server.
pub struct Client {
    base_url: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut host = std::env::var("TOKVIZ_HOST").unwrap_or_else(|_| {
            format!(
                "{}:{}",
                crate::envconfig::DEFAULT_HOST,
                crate::envconfig::DEFAULT_PORT
            )
        });

        if !host.starts_with("http://") && !host.starts_with("https://") {
            host = format!("http://{}", host);
        }

        Ok(Self::new(host))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn tokenize(&self, request: &TokenizeRequest) -> Result<TokenizeResponse> {
        let url = format!("{}/api/tokenize", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            match response.json::<ErrorResponse>().await {
                Ok(body) => bail!("Tokenize failed: {} ({})", body.error, status),
                Err(_) => bail!("Tokenize failed: {}", status),
            }
        }

        Ok(response.json().await?)
    }

    pub async fn schemes(&self) -> Result<Vec<SchemeInfo>> {
        let url = format!("{}/api/schemes", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            bail!("Listing schemes failed: {}", response.status());
        }

        Ok(response.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.json().await?)
    }
}
