use super::traits::TokenizerBackend;
use crate::core::Result;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// GPT-2 byte-level BPE backed by tiktoken's `r50k_base` ranks.
pub struct TiktokenBackend {
    bpe: Arc<CoreBPE>,
    encoding: &'static str,
}

impl TiktokenBackend {
    pub fn gpt2() -> Result<Self> {
        let bpe = tiktoken_rs::r50k_base().context("Failed to load r50k_base encoding")?;
        Ok(Self {
            bpe: Arc::new(bpe),
            encoding: "r50k_base",
        })
    }
}

/// Decodes ids one at a time. An id whose bytes end mid code point is
/// held back and joined with the following ids until the bytes decode.
fn split_pieces(bpe: &CoreBPE, text: &str) -> Result<Vec<String>> {
    let ids = bpe.encode_ordinary(text);
    let mut pieces = Vec::with_capacity(ids.len());
    let mut pending = Vec::new();

    for id in ids {
        pending.push(id);
        if let Ok(piece) = bpe.decode(pending.clone()) {
            pieces.push(piece);
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(anyhow!(
            "{} trailing token ids did not decode to UTF-8",
            pending.len()
        ));
    }

    Ok(pieces)
}

#[async_trait]
impl TokenizerBackend for TiktokenBackend {
    async fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let bpe = Arc::clone(&self.bpe);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || split_pieces(&bpe, &text)).await?
    }

    fn describe(&self) -> String {
        format!("tiktoken {}", self.encoding)
    }
}
