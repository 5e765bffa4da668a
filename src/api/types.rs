use crate::core::{ColoredToken, Scheme, SchemeOutcome, SchemeStatus};
use serde::{Deserialize, Serialize};

fn all_schemes() -> Vec<Scheme> {
    Scheme::ALL.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "all_schemes")]
    pub schemes: Vec<Scheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TokenizeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            schemes: all_schemes(),
            seed: None,
        }
    }

    pub fn schemes(mut self, schemes: Vec<Scheme>) -> Self {
        self.schemes = schemes;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeResult {
    pub scheme_id: Scheme,
    pub name: String,
    pub status: SchemeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub tokens: Vec<ColoredToken>,
    pub token_count: usize,
}

impl SchemeResult {
    pub fn from_outcome(outcome: SchemeOutcome, tokens: Vec<ColoredToken>) -> Self {
        Self {
            scheme_id: outcome.scheme,
            name: outcome.scheme.display_name().to_string(),
            status: outcome.status,
            detail: outcome.detail,
            token_count: tokens.len(),
            tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub results: Vec<SchemeResult>,
}

impl TokenizeResponse {
    pub fn get(&self, scheme: Scheme) -> Option<&SchemeResult> {
        self.results.iter().find(|r| r.scheme_id == scheme)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeInfo {
    pub scheme_id: Scheme,
    pub name: String,
}

impl From<Scheme> for SchemeInfo {
    fn from(scheme: Scheme) -> Self {
        Self {
            scheme_id: scheme,
            name: scheme.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
