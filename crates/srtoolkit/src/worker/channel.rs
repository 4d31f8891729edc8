use std::sync::Arc;
use std::thread;

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::worker::{WorkerPort, WorkerProxy, WorkerRequest};

/// Port posting into an in-process worker thread.
pub struct ChannelPort {
    name: String,
    tx: mpsc::UnboundedSender<WorkerRequest>,
}

impl WorkerPort for ChannelPort {
    fn post_message(&self, request: WorkerRequest) -> CoreResult<()> {
        self.tx
            .send(request)
            .map_err(|_| CoreError::MissingTarget(format!("{} worker terminated", self.name)))
    }
}

/// Run `compute` on its own OS thread and return a proxy talking to it.
///
/// `compute` returns the response fields for a request; the worker adds the
/// request's `uid`. Returning `None` leaves the request unanswered.
pub fn spawn_worker<F>(name: &str, timeout: Duration, compute: F) -> CoreResult<WorkerProxy>
where
    F: Fn(&WorkerRequest) -> Option<Map<String, Value>> + Send + 'static,
{
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Value>();

    thread::Builder::new()
        .name(format!("{name}-worker"))
        .spawn(move || {
            while let Some(request) = request_rx.blocking_recv() {
                let Some(mut fields) = compute(&request) else {
                    continue;
                };
                fields.insert("uid".to_string(), Value::String(request.uid));
                if event_tx.send(Value::Object(fields)).is_err() {
                    break;
                }
            }
        })
        .map_err(|error| CoreError::Internal(format!("failed to spawn {name} worker: {error}")))?;

    let port = Arc::new(ChannelPort {
        name: name.to_string(),
        tx: request_tx,
    });
    Ok(WorkerProxy::spawn(name, port, event_rx, timeout))
}
