//! Listening state machine kept in sync with the store and the context menu.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{ContextMenuConfig, ToolkitConfig};
use crate::error::CoreResult;
use crate::host::{HostSurface, PermissionState, SpeechEngine};
use crate::settings::{Language, Settings};

/// Response of `/toggle_sr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicStatus {
    #[serde(rename = "isMicListening")]
    pub is_mic_listening: bool,
}

pub struct MicController {
    settings: Settings,
    speech: Arc<dyn SpeechEngine>,
    host: Arc<dyn HostSurface>,
    menu: ContextMenuConfig,
    permissions_sub_path: String,
}

impl MicController {
    pub fn new(
        settings: Settings,
        speech: Arc<dyn SpeechEngine>,
        host: Arc<dyn HostSurface>,
        config: &ToolkitConfig,
    ) -> Self {
        Self {
            settings,
            speech,
            host,
            menu: config.context_menu.clone(),
            permissions_sub_path: config.permissions_sub_path.clone(),
        }
    }

    /// Start recognition if the speech permission is granted, otherwise send
    /// the user to the permissions help page. Returns whether it started.
    pub async fn start(&self) -> CoreResult<bool> {
        let permission = self.speech.permission_granted().await?;
        if permission != PermissionState::Granted {
            tracing::info!(?permission, "speech permission missing; opening help page");
            self.host.open_help_page(&self.permissions_sub_path).await?;
            return Ok(false);
        }
        let language = self.settings.default_language().await?;
        self.listen(&language).await?;
        Ok(true)
    }

    pub async fn stop(&self) -> CoreResult<()> {
        self.speech.stop().await
    }

    /// Flip between listening and idle. Responds with the new state.
    pub async fn toggle(&self) -> CoreResult<MicStatus> {
        let listening = self.settings.is_mic_listening().await?;
        let title = if listening {
            self.speech.stop().await?;
            &self.menu.start_title
        } else {
            let language = self.settings.default_language().await?;
            self.listen(&language).await?;
            &self.menu.stop_title
        };

        let is_mic_listening = !listening;
        self.settings.set_mic_listening(is_mic_listening).await?;
        if let Err(error) = self.host.update_context_menu(&self.menu.id, title).await {
            tracing::warn!("failed to relabel context menu: {error}");
        }
        tracing::info!(is_mic_listening, "speech recognition toggled");
        Ok(MicStatus { is_mic_listening })
    }

    /// Restart recognition in `language` if currently listening. Never
    /// changes the persisted flag.
    pub async fn restart_if_listening(
        &self,
        language: &Language,
        listening: bool,
    ) -> CoreResult<bool> {
        if !listening {
            return Ok(false);
        }
        self.speech.stop().await?;
        self.listen(language).await?;
        Ok(true)
    }

    async fn listen(&self, language: &Language) -> CoreResult<()> {
        self.speech.set_language(&language.code).await?;
        self.speech.start().await
    }
}
