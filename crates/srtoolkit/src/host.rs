//! Ports to the collaborators the background context drives but does not own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::bus::message::TabMessage;
use crate::error::CoreResult;

/// Callback receiving every transcript that matches a registered pattern.
pub type TranscriptCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Pattern matching every transcript; the captured text is passed whole.
pub const WILDCARD_PATTERN: &str = "*text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// Platform speech-recognition wrapper.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn add_command(&self, pattern: &str, callback: TranscriptCallback);
    async fn start(&self) -> CoreResult<()>;
    async fn stop(&self) -> CoreResult<()>;
    async fn set_language(&self, code: &str) -> CoreResult<()>;
    async fn speak(&self, text: &str, lang: &str) -> CoreResult<()>;
    async fn permission_granted(&self) -> CoreResult<PermissionState>;
}

/// Delivery to the content script of the currently focused tab.
#[async_trait]
pub trait TabPort: Send + Sync {
    /// Returns the content script's reply, if it sent one. A missing tab is
    /// reported as [`crate::CoreError::MissingTarget`].
    async fn send_to_active_tab(&self, message: &TabMessage) -> CoreResult<Option<Value>>;
}

/// Browser surfaces: extension pages, tabs and the native context menu.
#[async_trait]
pub trait HostSurface: Send + Sync {
    async fn open_help_page(&self, sub_path: &str) -> CoreResult<()>;
    async fn create_tab(&self, url: &str) -> CoreResult<()>;
    async fn update_context_menu(&self, menu_id: &str, title: &str) -> CoreResult<()>;
    fn extension_url(&self, page: &str) -> String;
}
