//! Correlated request/response against the background compute workers.
//!
//! A worker receives `{...params, uid, action}` and answers with an event
//! object carrying the same `uid`. [`proxy::WorkerProxy`] pairs the two;
//! [`emoji::EmojiLookup`] and [`translation::TranslationLookup`] are the typed
//! lookups built on it.

pub mod channel;
pub mod emoji;
pub mod proxy;
pub mod translation;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreResult;

pub use emoji::EmojiLookup;
pub use proxy::WorkerProxy;
pub use translation::TranslationLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerAction {
    #[serde(rename = "emoji")]
    Emoji,
    #[serde(rename = "emoji_list")]
    EmojiList,
    #[serde(rename = "getMessage")]
    GetMessage,
}

/// Message posted to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub uid: String,
    pub action: WorkerAction,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl WorkerRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

/// Outbound half of a compute worker. Responses come back on the event
/// stream handed to [`WorkerProxy::spawn`].
pub trait WorkerPort: Send + Sync {
    fn post_message(&self, request: WorkerRequest) -> CoreResult<()>;
}

/// Shared workers injected into every bus handler.
pub struct Workers {
    pub emoji: EmojiLookup,
    pub translation: std::sync::Arc<TranslationLookup>,
}
