use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::{timeout, Duration};

use crate::error::{CoreError, CoreResult};
use crate::utils::guid::generate_guid;
use crate::worker::{WorkerAction, WorkerPort, WorkerRequest};

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<Value>>>>;

/// Pairs worker requests with their responses by `uid`.
///
/// Every pending entry is removed either when its response arrives or when
/// the request times out.
#[derive(Clone)]
pub struct WorkerProxy {
    name: Arc<str>,
    port: Arc<dyn WorkerPort>,
    pending: PendingMap,
    timeout: Duration,
}

impl WorkerProxy {
    /// Start routing `events` to pending requests. Must be called inside a
    /// tokio runtime.
    pub fn spawn(
        name: &str,
        port: Arc<dyn WorkerPort>,
        mut events: mpsc::UnboundedReceiver<Value>,
        timeout: Duration,
    ) -> Self {
        let name: Arc<str> = Arc::from(name);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let pending_clone = pending.clone();
        let worker = name.clone();

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(uid) = event.get("uid").and_then(Value::as_str).map(str::to_owned) else {
                    tracing::warn!(worker = %worker, "worker event without uid: {event}");
                    continue;
                };
                match pending_clone.lock().await.remove(&uid) {
                    Some(tx) => {
                        let _ = tx.send(event);
                    }
                    None => {
                        tracing::debug!(
                            worker = %worker,
                            uid = %uid,
                            "ignoring worker event for unknown uid"
                        );
                    }
                }
            }
            tracing::debug!(worker = %worker, "worker event stream closed");
        });

        Self {
            name,
            port,
            pending,
            timeout,
        }
    }

    /// Post `{...params, uid, action}` and wait for the event with the same uid.
    pub async fn request(
        &self,
        action: WorkerAction,
        params: Map<String, Value>,
    ) -> CoreResult<Value> {
        let uid = generate_guid();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(uid.clone(), tx);

        let request = WorkerRequest {
            uid: uid.clone(),
            action,
            params,
        };
        if let Err(error) = self.port.post_message(request) {
            self.pending.lock().await.remove(&uid);
            return Err(error);
        }
        tracing::debug!(worker = %self.name, uid = %uid, ?action, "posted worker request");

        match timeout(self.timeout, rx).await {
            Ok(Ok(event)) => Ok(event),
            Ok(Err(_)) => Err(CoreError::Internal(format!(
                "{} worker dropped response {uid}",
                self.name
            ))),
            Err(_) => {
                self.pending.lock().await.remove(&uid);
                Err(CoreError::Timeout {
                    what: format!("{} worker request {action:?}", self.name),
                    after: self.timeout,
                })
            }
        }
    }

    /// Number of requests still waiting for a response.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as SyncMutex;
    use serde_json::json;

    /// Port that hands posted requests to the test instead of a worker.
    struct ScriptedPort {
        posted: mpsc::UnboundedSender<WorkerRequest>,
    }

    impl WorkerPort for ScriptedPort {
        fn post_message(&self, request: WorkerRequest) -> CoreResult<()> {
            self.posted
                .send(request)
                .map_err(|_| CoreError::MissingTarget("worker gone".to_string()))
        }
    }

    struct ClosedPort {
        attempts: SyncMutex<usize>,
    }

    impl WorkerPort for ClosedPort {
        fn post_message(&self, _request: WorkerRequest) -> CoreResult<()> {
            *self.attempts.lock() += 1;
            Err(CoreError::MissingTarget("worker terminated".to_string()))
        }
    }

    fn scripted(
        timeout: Duration,
    ) -> (
        WorkerProxy,
        mpsc::UnboundedReceiver<WorkerRequest>,
        mpsc::UnboundedSender<Value>,
    ) {
        let (posted_tx, posted_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let proxy = WorkerProxy::spawn(
            "emoji",
            Arc::new(ScriptedPort { posted: posted_tx }),
            events_rx,
            timeout,
        );
        (proxy, posted_rx, events_tx)
    }

    fn params(name: &str) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("emojiName".to_string(), json!(name));
        params
    }

    #[tokio::test]
    async fn reverse_order_responses_reach_their_own_callers() {
        let (proxy, mut posted, events) = scripted(Duration::from_secs(5));

        let worker = async move {
            let first = posted.recv().await.expect("first request");
            let second = posted.recv().await.expect("second request");
            for request in [second, first] {
                let name = request.param("emojiName").unwrap_or_default().to_string();
                events
                    .send(json!({ "uid": request.uid, "emoji": format!("<{name}>") }))
                    .expect("send event");
            }
        };

        let (smile, heart, ()) = tokio::join!(
            proxy.request(WorkerAction::Emoji, params("smile")),
            proxy.request(WorkerAction::Emoji, params("heart")),
            worker,
        );

        assert_eq!(smile.expect("smile")["emoji"], "<smile>");
        assert_eq!(heart.expect("heart")["emoji"], "<heart>");
        assert_eq!(proxy.pending_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_uid_is_ignored() {
        let (proxy, mut posted, events) = scripted(Duration::from_secs(5));

        let worker = async move {
            let request = posted.recv().await.expect("request");
            events
                .send(json!({ "uid": "someone-else", "emoji": "wrong" }))
                .expect("send stray");
            events
                .send(json!({ "uid": request.uid, "emoji": "right" }))
                .expect("send event");
        };

        let (result, ()) = tokio::join!(proxy.request(WorkerAction::Emoji, params("x")), worker);
        assert_eq!(result.expect("result")["emoji"], "right");
    }

    #[tokio::test]
    async fn timeout_releases_pending_entry() {
        let (proxy, _posted, _events) = scripted(Duration::from_millis(20));

        let err = proxy
            .request(WorkerAction::EmojiList, Map::new())
            .await
            .expect_err("timeout");
        assert!(matches!(err, CoreError::Timeout { .. }));
        assert_eq!(proxy.pending_count().await, 0);
    }

    #[tokio::test]
    async fn failed_post_releases_pending_entry() {
        let (_events_tx, events_rx) = mpsc::unbounded_channel();
        let port = Arc::new(ClosedPort {
            attempts: SyncMutex::new(0),
        });
        let proxy = WorkerProxy::spawn(
            "translation",
            port.clone(),
            events_rx,
            Duration::from_secs(1),
        );

        let err = proxy
            .request(WorkerAction::GetMessage, Map::new())
            .await
            .expect_err("closed");
        assert!(matches!(err, CoreError::MissingTarget(_)));
        assert_eq!(*port.attempts.lock(), 1);
        assert_eq!(proxy.pending_count().await, 0);
    }
}
