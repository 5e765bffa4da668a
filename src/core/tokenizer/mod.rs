pub mod traits;
pub mod bpe;
pub mod sentencepiece;
pub mod hosted;
pub mod fallback;

pub use traits::{Scheme, SchemeOutcome, SchemeStatus, TokenizerBackend};
pub use bpe::TiktokenBackend;
pub use sentencepiece::SubwordBackend;
pub use hosted::HostedBackend;

use crate::envconfig::EnvConfig;
use futures::future::join_all;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("No text provided")]
    EmptyText,
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),
    #[error("missing endpoint: set {0}")]
    MissingEndpoint(&'static str),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// A backend that loaded, or the reason it did not.
#[derive(Clone)]
pub enum BackendSlot {
    Ready(Arc<dyn TokenizerBackend>),
    Missing(String),
}

impl BackendSlot {
    pub fn ready(backend: impl TokenizerBackend + 'static) -> Self {
        BackendSlot::Ready(Arc::new(backend))
    }

    pub fn missing(reason: impl ToString) -> Self {
        BackendSlot::Missing(reason.to_string())
    }

    fn from_result<B, E>(result: std::result::Result<B, E>) -> Self
    where
        B: TokenizerBackend + 'static,
        E: std::fmt::Display,
    {
        match result {
            Ok(backend) => Self::ready(backend),
            Err(e) => Self::Missing(e.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, BackendSlot::Ready(_))
    }
}

/// Routes text to the backend for each scheme. Built once and shared
/// read-only between requests.
#[derive(Clone)]
pub struct Dispatcher {
    byte_pair: BackendSlot,
    subword: BackendSlot,
    hosted: BackendSlot,
}

impl Dispatcher {
    pub fn new(byte_pair: BackendSlot, subword: BackendSlot, hosted: BackendSlot) -> Self {
        Self {
            byte_pair,
            subword,
            hosted,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        let byte_pair = BackendSlot::from_result(TiktokenBackend::gpt2());

        let subword = match &config.subword_tokenizer {
            Some(path) => BackendSlot::from_result(SubwordBackend::from_file(path)),
            None => BackendSlot::missing("no subword tokenizer configured (TOKVIZ_SUBWORD_TOKENIZER)"),
        };

        let hosted = BackendSlot::from_result(HostedBackend::from_config(&config.hosted));

        for (scheme, slot) in [
            (Scheme::BytePair, &byte_pair),
            (Scheme::Subword, &subword),
            (Scheme::HostedModel, &hosted),
        ] {
            match slot {
                BackendSlot::Ready(backend) => {
                    tracing::info!("{} backend ready: {}", scheme, backend.describe())
                }
                BackendSlot::Missing(reason) => {
                    tracing::warn!("{} backend not loaded: {}", scheme, reason)
                }
            }
        }

        Self::new(byte_pair, subword, hosted)
    }

    pub async fn tokenize(&self, text: &str, scheme: Scheme) -> SchemeOutcome {
        match scheme {
            Scheme::BytePair => {
                self.with_fallback(scheme, &self.byte_pair, text, fallback::split_byte_pair)
                    .await
            }
            Scheme::Subword => {
                self.with_fallback(scheme, &self.subword, text, fallback::split_subword)
                    .await
            }
            Scheme::HostedModel => match &self.hosted {
                BackendSlot::Ready(backend) => match backend.tokenize(text).await {
                    Ok(tokens) => SchemeOutcome::ok(scheme, tokens),
                    Err(e) => {
                        tracing::warn!("{} request failed: {:#}", scheme, e);
                        SchemeOutcome::unavailable(scheme, format!("{:#}", e))
                    }
                },
                BackendSlot::Missing(reason) => SchemeOutcome::unavailable(scheme, reason.clone()),
            },
            Scheme::NaiveWord => SchemeOutcome::ok(scheme, fallback::split_words(text)),
        }
    }

    /// Runs the requested schemes concurrently. Results come back in
    /// canonical scheme order with duplicates removed; an empty selection
    /// means every scheme.
    pub async fn tokenize_all(
        &self,
        text: &str,
        schemes: &[Scheme],
    ) -> std::result::Result<Vec<SchemeOutcome>, SchemeError> {
        if text.is_empty() {
            return Err(SchemeError::EmptyText);
        }

        let selected = Scheme::ALL
            .iter()
            .copied()
            .filter(|s| schemes.is_empty() || schemes.contains(s));

        Ok(join_all(selected.map(|scheme| self.tokenize(text, scheme))).await)
    }

    async fn with_fallback(
        &self,
        scheme: Scheme,
        slot: &BackendSlot,
        text: &str,
        splitter: fn(&str) -> Vec<String>,
    ) -> SchemeOutcome {
        let reason = match slot {
            BackendSlot::Ready(backend) => match backend.tokenize(text).await {
                Ok(tokens) if !tokens.is_empty() || text.is_empty() => {
                    return SchemeOutcome::ok(scheme, tokens);
                }
                Ok(_) => format!("{} returned no tokens", backend.describe()),
                Err(e) => format!("{:#}", e),
            },
            BackendSlot::Missing(reason) => reason.clone(),
        };

        tracing::warn!("{} falling back to local splitter: {}", scheme, reason);
        SchemeOutcome::degraded(scheme, splitter(text), reason)
    }
}
