use crate::core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An external tokenizer that turns text into display pieces.
#[async_trait]
pub trait TokenizerBackend: Send + Sync {
    /// Pieces in text order, boundary markers left in place.
    async fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Short label used in logs and status details.
    fn describe(&self) -> String;
}

/// The fixed set of tokenization schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    BytePair,
    Subword,
    HostedModel,
    NaiveWord,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [
        Scheme::BytePair,
        Scheme::Subword,
        Scheme::HostedModel,
        Scheme::NaiveWord,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Scheme::BytePair => "byte_pair",
            Scheme::Subword => "subword",
            Scheme::HostedModel => "hosted_model",
            Scheme::NaiveWord => "naive_word",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Scheme::BytePair => "GPT-2/GPT-3 (BPE via tiktoken)",
            Scheme::Subword => "T5/UL2 (SentencePiece)",
            Scheme::HostedModel => "Hosted model tokenizer",
            Scheme::NaiveWord => "Whisper/CLIP (Custom)",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Scheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "byte_pair" | "bpe" | "gpt2" => Ok(Scheme::BytePair),
            "subword" | "sentencepiece" | "spm" | "t5" => Ok(Scheme::Subword),
            "hosted_model" | "hosted" => Ok(Scheme::HostedModel),
            "naive_word" | "word" | "whisper" => Ok(Scheme::NaiveWord),
            other => anyhow::bail!("Unknown scheme: {}", other),
        }
    }
}

/// How a scheme's tokens were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeStatus {
    Ok,
    /// Tokens came from a local fallback splitter.
    Degraded,
    /// No tokens; the scheme could not run.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct SchemeOutcome {
    pub scheme: Scheme,
    pub status: SchemeStatus,
    pub detail: Option<String>,
    pub tokens: Vec<String>,
}

impl SchemeOutcome {
    pub fn ok(scheme: Scheme, tokens: Vec<String>) -> Self {
        Self {
            scheme,
            status: SchemeStatus::Ok,
            detail: None,
            tokens,
        }
    }

    pub fn degraded(scheme: Scheme, tokens: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            scheme,
            status: SchemeStatus::Degraded,
            detail: Some(detail.into()),
            tokens,
        }
    }

    pub fn unavailable(scheme: Scheme, detail: impl Into<String>) -> Self {
        Self {
            scheme,
            status: SchemeStatus::Unavailable,
            detail: Some(detail.into()),
            tokens: Vec::new(),
        }
    }
}
