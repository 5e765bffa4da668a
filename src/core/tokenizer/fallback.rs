//! Deterministic local splitters.
//!
//! These run when an external tokenizer cannot be reached, and the naive word
//! splitter doubles as a scheme of its own. None of them need a vocabulary.

/// Boundary marker prepended to word-initial pieces in SentencePiece output.
pub const WORD_BOUNDARY: char = '\u{2581}';

pub const FAILED_TOKEN: &str = "[Tokenization failed]";

const SUBWORD_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];
const NAIVE_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}',
];

// Words longer than this are cut once, after the first two characters.
const BPE_SPLIT_THRESHOLD: usize = 3;
const BPE_HEAD_CHARS: usize = 2;

/// Approximates BPE output: whitespace is kept as single tokens and longer
/// words are cut into a two-character head and a tail.
pub fn split_byte_pair(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            push_bpe_word(&mut tokens, &mut word);
            tokens.push(c.to_string());
        } else {
            word.push(c);
        }
    }
    push_bpe_word(&mut tokens, &mut word);

    if tokens.is_empty() {
        tokens.push(FAILED_TOKEN.to_string());
    }
    tokens
}

fn push_bpe_word(tokens: &mut Vec<String>, word: &mut String) {
    if word.is_empty() {
        return;
    }
    if word.chars().count() > BPE_SPLIT_THRESHOLD {
        let cut = word
            .char_indices()
            .nth(BPE_HEAD_CHARS)
            .map(|(i, _)| i)
            .unwrap_or(word.len());
        tokens.push(word[..cut].to_string());
        tokens.push(word[cut..].to_string());
    } else {
        tokens.push(word.clone());
    }
    word.clear();
}

/// Splits on whitespace and sentence punctuation, then marks every
/// non-whitespace piece with [`WORD_BOUNDARY`] the way SentencePiece does.
pub fn split_subword(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() || SUBWORD_PUNCTUATION.contains(&c) {
            flush(&mut pieces, &mut word);
            pieces.push(c.to_string());
        } else {
            word.push(c);
        }
    }
    flush(&mut pieces, &mut word);

    pieces
        .into_iter()
        .map(|piece| {
            if piece.chars().all(char::is_whitespace) {
                piece
            } else {
                format!("{}{}", WORD_BOUNDARY, piece)
            }
        })
        .collect()
}

/// Word split that drops plain spaces but keeps other whitespace
/// (newlines, tabs) and every bracket or punctuation mark as its own token.
pub fn split_words(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            flush(&mut tokens, &mut word);
            if c != ' ' {
                tokens.push(c.to_string());
            }
        } else if NAIVE_PUNCTUATION.contains(&c) {
            flush(&mut tokens, &mut word);
            tokens.push(c.to_string());
        } else {
            word.push(c);
        }
    }
    flush(&mut tokens, &mut word);

    tokens
}

fn flush(tokens: &mut Vec<String>, word: &mut String) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

/// Joins tokens back into text with boundary markers removed.
pub fn reconstruct(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| t.replace(WORD_BOUNDARY, ""))
        .collect()
}
