use super::traits::TokenizerBackend;
use crate::core::Result;
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::fallback::WORD_BOUNDARY;

/// Subword tokenizer loaded from a HuggingFace `tokenizer.json`
/// (for example a T5 SentencePiece export).
pub struct SubwordBackend {
    tokenizer: Arc<Tokenizer>,
    source: PathBuf,
}

impl SubwordBackend {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("Tokenizer file not found: {}", path.display());
        }

        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Failed to load {}: {}", path.display(), e))?;

        Ok(Self {
            tokenizer: Arc::new(tokenizer),
            source: path.to_path_buf(),
        })
    }
}

/// Encodes `text` and returns the slice of the input each token covers.
///
/// Metaspace tokenizers put `▁` in place of the space, so the model's own
/// token strings do not join back into the input. Text a token does not
/// cover (collapsed whitespace, stripped characters) is carried by the next
/// piece, and tokens that only repeat already-covered bytes (byte fallback)
/// are folded into the piece before them.
fn encode_pieces(tokenizer: &Tokenizer, text: &str) -> Result<Vec<String>> {
    let encoding = tokenizer
        .encode(text, false)
        .map_err(|e| anyhow!("Subword encoding failed: {}", e))?;

    match pieces_from_offsets(text, encoding.get_offsets()) {
        Some(pieces) => Ok(pieces),
        None => Ok(encoding
            .get_tokens()
            .iter()
            .map(|t| t.replace(WORD_BOUNDARY, " "))
            .collect()),
    }
}

/// `None` when an offset does not fall on a char boundary of `text`.
fn pieces_from_offsets(text: &str, offsets: &[(usize, usize)]) -> Option<Vec<String>> {
    let mut pieces: Vec<String> = Vec::with_capacity(offsets.len());
    let mut cursor = 0;

    for &(_, end) in offsets {
        let end = end.min(text.len());
        if end <= cursor {
            continue;
        }
        pieces.push(text.get(cursor..end)?.to_string());
        cursor = end;
    }

    if cursor < text.len() {
        let rest = text.get(cursor..)?;
        match pieces.last_mut() {
            Some(last) => last.push_str(rest),
            None => pieces.push(rest.to_string()),
        }
    }

    Some(pieces)
}

#[async_trait]
impl TokenizerBackend for SubwordBackend {
    async fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || encode_pieces(&tokenizer, &text)).await?
    }

    fn describe(&self) -> String {
        format!("tokenizers {}", self.source.display())
    }
}
