//! Post-processing for replies from the upstream chat model.
//!
//! The transport to the model is supplied by the caller through
//! [`ChatBackend`]. [`ChatProxy`] strips rich-text markers from replies and
//! answers with a canned message when the upstream quota is exhausted.

use crate::config::ChatConfig;
use crate::{Error, Result};

/// Failure reported by an upstream chat backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("upstream quota exhausted")]
    QuotaExceeded,

    #[error("upstream error: {0}")]
    Upstream(String),
}

/// A text-generation service
pub trait ChatBackend {
    fn complete(&self, prompt: &str) -> std::result::Result<String, ChatError>;
}

/// Chat proxy wrapping a backend
pub struct ChatProxy<B> {
    backend: B,
    config: ChatConfig,
}

impl<B: ChatBackend> ChatProxy<B> {
    pub fn new(backend: B, config: ChatConfig) -> Self {
        Self { backend, config }
    }

    /// Ask the backend and return a plain-text reply
    pub fn reply(&self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidInput { field: "message" });
        }

        match self.backend.complete(message) {
            Ok(raw) => Ok(strip_formatting(&raw)),
            Err(ChatError::QuotaExceeded) => {
                tracing::warn!("Chat quota exhausted, returning fallback reply");
                Ok(self.config.quota_fallback_reply.clone())
            }
            Err(ChatError::Upstream(detail)) => Err(Error::Chat(detail)),
        }
    }
}

/// Remove markdown emphasis, inline code and heading markers
///
/// Single underscores are kept since they appear inside ordinary words.
pub fn strip_formatting(text: &str) -> String {
    text.lines()
        .map(|line| {
            let without_heading = line.trim_start_matches('#');
            let line = if without_heading.len() != line.len() {
                without_heading.trim_start()
            } else {
                line
            };
            line.replace("**", "")
                .replace("__", "")
                .replace(['*', '`'], "")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
