//! Console host for the background router.
//!
//! Reads newline-delimited input from stdin. A line holding a request
//! envelope (`{"topic": "/toggle_sr"}`) goes through the message bus and its
//! response is printed; `say <words>` plays a transcript through the speech
//! engine; anything else is handled as typed text.
//!
//! Everything delivered to the tab or the browser surfaces is written to
//! stdout as JSON. Diagnostics go to stderr.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use srtoolkit::command::BuiltinCommands;
use srtoolkit::host::{HostSurface, PermissionState, SpeechEngine, TabPort, TranscriptCallback};
use srtoolkit::storage::{FileStore, SharedStore};
use srtoolkit::worker::channel::spawn_worker;
use srtoolkit::worker::{EmojiLookup, TranslationLookup, WorkerAction, WorkerRequest};
use srtoolkit::{
    load_or_create_config, BackgroundRouter, Collaborators, CoreError, CoreResult, Request,
    TabMessage, Workers,
};

const CONFIG_DIR_ENV: &str = "SRTOOLKIT_CONFIG_DIR";

fn emit(target: &str, body: Value) {
    println!("{}", json!({ "to": target, "body": body }));
}

struct StdoutTabs;

#[async_trait]
impl TabPort for StdoutTabs {
    async fn send_to_active_tab(&self, message: &TabMessage) -> CoreResult<Option<Value>> {
        let body = serde_json::to_value(message).map_err(|error| {
            CoreError::Internal(format!("failed to encode tab message: {error}"))
        })?;
        emit("tab", body);
        Ok(None)
    }
}

#[derive(Default)]
struct ConsoleSpeech {
    callbacks: Mutex<Vec<TranscriptCallback>>,
}

impl ConsoleSpeech {
    fn hear(&self, transcript: &str) {
        let callbacks = self.callbacks.lock().clone();
        for callback in callbacks {
            callback(transcript.to_string());
        }
    }
}

#[async_trait]
impl SpeechEngine for ConsoleSpeech {
    fn add_command(&self, pattern: &str, callback: TranscriptCallback) {
        tracing::debug!(pattern, "speech command registered");
        self.callbacks.lock().push(callback);
    }

    async fn start(&self) -> CoreResult<()> {
        emit("speech", json!({ "event": "start" }));
        Ok(())
    }

    async fn stop(&self) -> CoreResult<()> {
        emit("speech", json!({ "event": "stop" }));
        Ok(())
    }

    async fn set_language(&self, code: &str) -> CoreResult<()> {
        emit("speech", json!({ "event": "set_language", "code": code }));
        Ok(())
    }

    async fn speak(&self, text: &str, lang: &str) -> CoreResult<()> {
        emit("speech", json!({ "event": "speak", "text": text, "lang": lang }));
        Ok(())
    }

    async fn permission_granted(&self) -> CoreResult<PermissionState> {
        Ok(PermissionState::Granted)
    }
}

struct ConsoleHost;

#[async_trait]
impl HostSurface for ConsoleHost {
    async fn open_help_page(&self, sub_path: &str) -> CoreResult<()> {
        emit("host", json!({ "event": "open_help_page", "subPath": sub_path }));
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> CoreResult<()> {
        emit("host", json!({ "event": "create_tab", "url": url }));
        Ok(())
    }

    async fn update_context_menu(&self, menu_id: &str, title: &str) -> CoreResult<()> {
        emit(
            "host",
            json!({ "event": "update_context_menu", "id": menu_id, "title": title }),
        );
        Ok(())
    }

    fn extension_url(&self, page: &str) -> String {
        format!("chrome-extension://srtoolkit/{page}")
    }
}

fn translate(request: &WorkerRequest) -> Option<Map<String, Value>> {
    let message = match request.param("key")? {
        "command_go_to_label" => "go to",
        "command_go_to_description" => "Open a website in the current tab",
        _ => return None,
    };
    let mut fields = Map::new();
    fields.insert("message".to_string(), json!(message));
    Some(fields)
}

fn lookup_emoji(request: &WorkerRequest) -> Option<Map<String, Value>> {
    const EMOJI: [(&str, &str); 3] = [("smile", "😄"), ("heart", "❤️"), ("thumbs up", "👍")];
    let mut fields = Map::new();
    match request.action {
        WorkerAction::Emoji => {
            let name = request.param("emojiName")?.to_lowercase();
            let emoji = EMOJI
                .iter()
                .find(|(known, _)| *known == name)
                .map(|(_, emoji)| json!(emoji))
                .unwrap_or(Value::Null);
            fields.insert("emoji".to_string(), emoji);
        }
        WorkerAction::EmojiList => {
            let list: Vec<Value> = EMOJI
                .iter()
                .map(|(name, emoji)| json!({ "name": name, "char": emoji }))
                .collect();
            fields.insert("emojiList".to_string(), Value::Array(list));
        }
        WorkerAction::GetMessage => return None,
    }
    Some(fields)
}

#[tokio::main]
async fn main() -> CoreResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_dir = std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".srtoolkit"));
    let config = load_or_create_config(&config_dir)?;
    let store: SharedStore = Arc::new(FileStore::new(config_dir.join("store")));

    let timeout = config.worker_timeout();
    let translation = Arc::new(TranslationLookup::new(spawn_worker(
        "translation",
        timeout,
        translate,
    )?));
    let workers = Workers {
        emoji: EmojiLookup::new(spawn_worker("emoji", timeout, lookup_emoji)?),
        translation: translation.clone(),
    };

    let speech = Arc::new(ConsoleSpeech::default());
    let collaborators = Collaborators {
        speech: speech.clone(),
        host: Arc::new(ConsoleHost),
        tabs: Arc::new(StdoutTabs),
        store,
        commands: Arc::new(BuiltinCommands::new(translation)),
    };
    let router = BackgroundRouter::start(config, collaborators, workers).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|error| CoreError::Internal(format!("failed to read stdin: {error}")))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(transcript) = line.strip_prefix("say ") {
            speech.hear(transcript);
            continue;
        }
        let request = match serde_json::from_str::<Request>(line) {
            Ok(request) => request,
            Err(_) if line.starts_with('{') => {
                tracing::warn!("ignoring malformed request envelope");
                continue;
            }
            Err(_) => Request::ProcessInput {
                text: line.to_string(),
            },
        };
        let topic = request.topic();
        let response = router.bus().send_message(request).await;
        emit(
            "caller",
            json!({ "topic": topic.as_str(), "response": response }),
        );
    }

    tracing::info!("stdin closed; shutting down");
    Ok(())
}
