//! The background context: owns all background state and answers every
//! inbound topic.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

use crate::bus::{Handler, InputMode, MessageBus, Request, Responder, TabChannel, Topic};
use crate::command::{CommandListEntry, CommandRegistry, CommandSource};
use crate::config::ToolkitConfig;
use crate::error::{CoreError, CoreResult};
use crate::host::{HostSurface, SpeechEngine, TabPort, WILDCARD_PATTERN};
use crate::input::{InputOutcome, InputProcessor};
use crate::mic::MicController;
use crate::settings::Settings;
use crate::storage::SharedStore;
use crate::worker::translation::Translate;
use crate::worker::Workers;


/// External collaborators the background context talks to.
pub struct Collaborators {
    pub speech: Arc<dyn SpeechEngine>,
    pub host: Arc<dyn HostSurface>,
    pub tabs: Arc<dyn TabPort>,
    pub store: SharedStore,
    pub commands: Arc<dyn CommandSource>,
}

pub struct BackgroundRouter {
    config: ToolkitConfig,
    settings: Settings,
    registry: Arc<CommandRegistry>,
    input: InputProcessor,
    mic: MicController,
    speech: Arc<dyn SpeechEngine>,
    host: Arc<dyn HostSurface>,
    commands: Arc<dyn CommandSource>,
    bus: Arc<MessageBus<Workers>>,
}

impl BackgroundRouter {
    /// Build the background context: inject the workers into the bus, load
    /// settings and the command set, hook the speech engine and register a
    /// handler for every inbound topic.
    pub async fn start(
        config: ToolkitConfig,
        collaborators: Collaborators,
        workers: Workers,
    ) -> CoreResult<Arc<Self>> {
        let Collaborators {
            speech,
            host,
            tabs,
            store,
            commands,
        } = collaborators;

        let tab = TabChannel::new(tabs);
        let bus = Arc::new(MessageBus::new(tab.clone()));
        bus.set_options(workers);

        let settings = Settings::new(store);
        settings.seed_defaults(&config.default_language).await?;

        let registry = Arc::new(CommandRegistry::new());
        let language = settings.default_language().await?;
        registry.reload(commands.as_ref(), &language.code).await?;

        let input = InputProcessor::new(settings.clone(), registry.clone(), tab);
        input.reload_replacements().await?;

        let mic = MicController::new(settings.clone(), speech.clone(), host.clone(), &config);

        let router = Arc::new(Self {
            config,
            settings,
            registry,
            input,
            mic,
            speech,
            host,
            commands,
            bus,
        });

        let (transcripts, mut heard) = mpsc::unbounded_channel::<String>();
        router.speech.add_command(
            WILDCARD_PATTERN,
            Arc::new(move |text: String| {
                if transcripts.send(text).is_err() {
                    tracing::debug!("background router stopped; dropping transcript");
                }
            }),
        );
        let weak = Arc::downgrade(&router);
        tokio::spawn(async move {
            while let Some(text) = heard.recv().await {
                let Some(router) = weak.upgrade() else {
                    break;
                };
                if let Err(error) = router.process_input(&text, InputMode::Speech).await {
                    tracing::warn!("failed to process speech input: {error}");
                }
            }
        });

        let handler: Arc<dyn Handler<Workers>> = Arc::new(RouteHandler {
            router: Arc::downgrade(&router),
        });
        for topic in Topic::INBOUND {
            router.bus.on(topic, handler.clone())?;
        }
        tracing::info!(lang_id = %language.code, "background router started");

        Ok(router)
    }

    pub fn bus(&self) -> &Arc<MessageBus<Workers>> {
        &self.bus
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Normalize and dispatch `text`; see [`InputProcessor::process_input`].
    pub async fn process_input(&self, text: &str, mode: InputMode) -> CoreResult<InputOutcome> {
        self.input.process_input(text, mode).await
    }

    async fn handle(
        &self,
        request: Request,
        responder: Responder,
        workers: Option<Arc<Workers>>,
    ) -> CoreResult<()> {
        match request {
            Request::ProcessInput { text } => {
                self.process_input(&text, InputMode::Text).await?;
            }
            Request::NavigationReq { sub_path } => {
                self.host.open_help_page(&sub_path).await?;
            }
            Request::SetSelectedText { data } => {
                self.settings.set_data(data).await?;
            }
            Request::GetData => {
                let data = self.settings.data().await?;
                responder.respond(Value::Object(data));
            }
            Request::StartSpeechRecognition => {
                self.mic.start().await?;
            }
            Request::StopSpeechRecognition => {
                self.mic.stop().await?;
            }
            Request::ToggleSr => {
                let status = self.mic.toggle().await?;
                responder.respond(json!(status));
            }
            Request::RestartSr => {
                let (language, listening) = self.settings.restart_settings().await?;
                self.registry
                    .reload(self.commands.as_ref(), &language.code)
                    .await?;
                self.mic.restart_if_listening(&language, listening).await?;
            }
            Request::SpeakSr { text } => {
                let language = self.settings.default_language().await?;
                self.speech.speak(&text, &language.code).await?;
            }
            Request::GetCsMountAck => {
                let mount_ack_id = self.settings.mount_ack_id().await?;
                responder.respond(json!({ "mountAckId": mount_ack_id }));
            }
            Request::GetEmoji {
                lang_id,
                emoji_name,
            } => {
                let emoji = require_workers(workers)?
                    .emoji
                    .emoji(&lang_id, &emoji_name)
                    .await?;
                responder.respond(emoji);
            }
            Request::GetEmojiList { lang_id } => {
                let list = require_workers(workers)?.emoji.emoji_list(&lang_id).await?;
                responder.respond(list);
            }
            Request::GetTranslatedMessage { lang_id, key } => {
                let message = require_workers(workers)?
                    .translation
                    .message(&lang_id, &key)
                    .await?;
                responder.respond(Value::String(message));
            }
            Request::OpenTextReplacementView { text } => {
                let url = format!(
                    "{}?path=textReplacer&text={}",
                    self.host.extension_url(&self.config.option_page),
                    urlencoding::encode(&text)
                );
                self.host.create_tab(&url).await?;
            }
            Request::UpdateTextReplacementObj => {
                self.input.reload_replacements().await?;
            }
            Request::CommandsListTranslated { lang_id } => {
                let rows: Vec<CommandListEntry> = self
                    .commands
                    .get_all_commands(&lang_id)
                    .await?
                    .iter()
                    .map(|command| command.list_entry())
                    .collect();
                responder.respond(json!(rows));
            }
        }
        Ok(())
    }
}

fn require_workers(workers: Option<Arc<Workers>>) -> CoreResult<Arc<Workers>> {
    workers.ok_or_else(|| CoreError::Config("bus options are missing the workers".to_string()))
}

/// Bus-side entry into the router. Holds a weak reference so the bus the
/// router owns does not keep it alive.
struct RouteHandler {
    router: Weak<BackgroundRouter>,
}

#[async_trait]
impl Handler<Workers> for RouteHandler {
    async fn handle(
        &self,
        request: Request,
        responder: Responder,
        options: Option<Arc<Workers>>,
    ) -> CoreResult<()> {
        let router = self
            .router
            .upgrade()
            .ok_or_else(|| CoreError::MissingTarget("background router stopped".to_string()))?;
        router.handle(request, responder, options).await
    }
}
