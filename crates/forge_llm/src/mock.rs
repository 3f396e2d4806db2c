//! Configurable mock generation backend for tests.
//!
//! Captures every payload it receives and returns scripted replies, so
//! tests can drive retry and fallback behaviour without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::backend::GenerationBackend;
use crate::error::{LlmError, LlmResult};

/// One scripted outcome for a `generate` call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Transient(String),
    Terminal { status: u16, message: String },
    NotConfigured,
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        ScriptedReply::Text(text.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        ScriptedReply::Transient(message.into())
    }

    pub fn terminal(status: u16, message: impl Into<String>) -> Self {
        ScriptedReply::Terminal {
            status,
            message: message.into(),
        }
    }

    pub fn not_configured() -> Self {
        ScriptedReply::NotConfigured
    }

    fn into_result(self) -> LlmResult<String> {
        match self {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Transient(message) => Err(LlmError::Transient(message)),
            ScriptedReply::Terminal { status, message } => {
                Err(LlmError::Terminal { status, message })
            }
            ScriptedReply::NotConfigured => Err(LlmError::NotConfigured),
        }
    }
}

/// Mock backend with scripted replies and call capture.
///
/// Replies are consumed in order; once the script runs out the last reply
/// repeats, which keeps "always failing" setups a one-liner.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<RwLock<Vec<ScriptedReply>>>,
    reply_index: Arc<AtomicUsize>,
    captured: Arc<RwLock<Vec<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.replies.write().push(reply);
        self
    }

    pub fn with_replies(self, replies: Vec<ScriptedReply>) -> Self {
        *self.replies.write() = replies;
        self
    }

    /// Script an endless stream of transient failures.
    pub fn always_transient(self, message: impl Into<String>) -> Self {
        self.with_reply(ScriptedReply::transient(message))
    }

    pub fn call_count(&self) -> usize {
        self.captured.read().len()
    }

    pub fn captured_payloads(&self) -> Vec<String> {
        self.captured.read().clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        let replies = self.replies.read();
        if replies.is_empty() {
            return ScriptedReply::text("");
        }
        let index = self.reply_index.fetch_add(1, Ordering::SeqCst);
        replies
            .get(index.min(replies.len() - 1))
            .cloned()
            .unwrap_or_else(|| ScriptedReply::text(""))
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, payload: &str) -> LlmResult<String> {
        self.captured.write().push(payload.to_string());
        self.next_reply().into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let backend = MockBackend::new().with_replies(vec![
            ScriptedReply::text("first"),
            ScriptedReply::text("second"),
        ]);

        assert_eq!(backend.generate("a").await.unwrap(), "first");
        assert_eq!(backend.generate("b").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn last_reply_repeats_after_script_ends() {
        let backend = MockBackend::new().always_transient("down");

        for _ in 0..5 {
            assert!(backend.generate("x").await.is_err());
        }
        assert_eq!(backend.call_count(), 5);
    }

    #[tokio::test]
    async fn payloads_are_captured() {
        let backend = MockBackend::new();

        let _ = backend.generate("hello").await;
        let _ = backend.generate("world").await;

        assert_eq!(backend.captured_payloads(), vec!["hello", "world"]);
    }
}
