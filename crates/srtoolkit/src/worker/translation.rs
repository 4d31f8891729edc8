use async_trait::async_trait;
use moka::sync::Cache;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::worker::{WorkerAction, WorkerProxy};

/// Source of translated UI and command strings.
#[async_trait]
pub trait Translate: Send + Sync {
    async fn message(&self, lang_id: &str, key: &str) -> CoreResult<String>;
}

/// Translation lookups with a read-through memo in front of the worker.
///
/// The memo is keyed by `(langId, key)` and never evicts; the keyspace is the
/// extension's fixed set of UI strings.
pub struct TranslationLookup {
    proxy: WorkerProxy,
    memo: Cache<(String, String), String>,
}

impl TranslationLookup {
    pub fn new(proxy: WorkerProxy) -> Self {
        Self {
            proxy,
            memo: Cache::builder().build(),
        }
    }

    pub fn memo_len(&self) -> u64 {
        self.memo.run_pending_tasks();
        self.memo.entry_count()
    }
}

#[async_trait]
impl Translate for TranslationLookup {
    async fn message(&self, lang_id: &str, key: &str) -> CoreResult<String> {
        let memo_key = (lang_id.to_string(), key.to_string());
        if let Some(message) = self.memo.get(&memo_key) {
            return Ok(message);
        }

        let mut params = Map::new();
        params.insert("langId".to_string(), Value::from(lang_id));
        params.insert("key".to_string(), Value::from(key));
        let event = self.proxy.request(WorkerAction::GetMessage, params).await?;
        let message = event
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "translation worker returned no message for {lang_id}/{key}"
                ))
            })?
            .to_string();
        self.memo.insert(memo_key, message.clone());
        Ok(message)
    }
}
