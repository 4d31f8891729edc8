use serde_json::{Map, Value};

use crate::error::CoreResult;
use crate::worker::{WorkerAction, WorkerProxy};

/// Emoji resolution offloaded to the emoji worker.
#[derive(Clone)]
pub struct EmojiLookup {
    proxy: WorkerProxy,
}

impl EmojiLookup {
    pub fn new(proxy: WorkerProxy) -> Self {
        Self { proxy }
    }

    /// Emoji for a spoken name; `null` when the worker knows none.
    pub async fn emoji(&self, lang_id: &str, emoji_name: &str) -> CoreResult<Value> {
        let mut params = Map::new();
        params.insert("langId".to_string(), Value::from(lang_id));
        params.insert("emojiName".to_string(), Value::from(emoji_name));
        let mut event = self.proxy.request(WorkerAction::Emoji, params).await?;
        Ok(take_field(&mut event, "emoji"))
    }

    pub async fn emoji_list(&self, lang_id: &str) -> CoreResult<Value> {
        let mut params = Map::new();
        params.insert("langId".to_string(), Value::from(lang_id));
        let mut event = self.proxy.request(WorkerAction::EmojiList, params).await?;
        Ok(take_field(&mut event, "emojiList"))
    }
}

fn take_field(event: &mut Value, field: &str) -> Value {
    event
        .as_object_mut()
        .and_then(|object| object.remove(field))
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::channel::spawn_worker;
    use serde_json::json;
    use tokio::time::Duration;

    fn lookup() -> EmojiLookup {
        let proxy = spawn_worker("emoji", Duration::from_secs(5), |request| {
            let mut fields = Map::new();
            match request.action {
                WorkerAction::Emoji => {
                    let emoji = match request.param("emojiName") {
                        Some("smile") => json!("😄"),
                        _ => Value::Null,
                    };
                    fields.insert("emoji".to_string(), emoji);
                }
                WorkerAction::EmojiList => {
                    fields.insert(
                        "emojiList".to_string(),
                        json!([{ "name": "smile", "char": "😄" }]),
                    );
                }
                WorkerAction::GetMessage => return None,
            }
            Some(fields)
        })
        .expect("spawn");
        EmojiLookup::new(proxy)
    }

    #[tokio::test]
    async fn resolves_emoji_by_name() {
        let lookup = lookup();
        assert_eq!(lookup.emoji("en", "smile").await.expect("emoji"), json!("😄"));
        assert_eq!(lookup.emoji("en", "unknown").await.expect("emoji"), Value::Null);
    }

    #[tokio::test]
    async fn resolves_emoji_list() {
        let list = lookup().emoji_list("en").await.expect("list");
        assert_eq!(list[0]["name"], "smile");
    }
}
