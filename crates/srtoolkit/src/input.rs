//! Single entry point for recognized and typed text.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::bus::{InputMode, SrTextPayload, TabChannel, TabMessage};
use crate::command::{CommandRegistry, ExecContext};
use crate::error::CoreResult;
use crate::settings::Settings;

/// What [`InputProcessor::process_input`] did with a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// A command ran; `message` was relayed under `/message` if present.
    Command { id: String, message: Option<String> },
    /// No command matched; the payload was relayed under `/sr_text`.
    PassThrough(SrTextPayload),
}

pub struct InputProcessor {
    settings: Settings,
    registry: Arc<CommandRegistry>,
    replacements: RwLock<HashMap<String, String>>,
    tab: TabChannel,
}

impl InputProcessor {
    pub fn new(settings: Settings, registry: Arc<CommandRegistry>, tab: TabChannel) -> Self {
        Self {
            settings,
            registry,
            replacements: RwLock::new(HashMap::new()),
            tab,
        }
    }

    /// Refresh the cached text-replacement map from the store.
    pub async fn reload_replacements(&self) -> CoreResult<()> {
        let map = self.settings.text_replacement_map().await?;
        tracing::debug!(entries = map.len(), "text replacement map reloaded");
        *self.replacements.write() = map;
        Ok(())
    }

    /// Apply the whole-string replacement, or else capitalization.
    pub fn normalize(&self, text: &str, capitalization: bool) -> String {
        let replacement = self
            .replacements
            .read()
            .get(text)
            .filter(|value| !value.is_empty())
            .cloned();
        match replacement {
            Some(value) => value,
            None if capitalization => capitalize_first(text),
            None => text.to_string(),
        }
    }

    pub async fn process_input(&self, text: &str, mode: InputMode) -> CoreResult<InputOutcome> {
        let (language, capitalization) = self.settings.input_settings().await?;
        let text = self.normalize(text, capitalization);

        let set = self.registry.current();
        if let Some(matched) = set.find_match(&text) {
            let id = matched.command.id.clone();
            tracing::debug!(command = %id, content = %matched.command_content, "command matched");
            let context = ExecContext {
                original_text: matched.original_text.clone(),
                tab: self.tab.clone(),
            };
            let message = matched
                .command
                .exec(&matched.command_content, &context)
                .await?;
            if let Some(message) = &message {
                self.tab
                    .send(TabMessage::Message {
                        message: message.clone(),
                    })
                    .await;
            }
            return Ok(InputOutcome::Command { id, message });
        }

        let payload = SrTextPayload {
            text,
            lang_id: language.code,
            lang_label: language.label,
            mode,
        };
        self.tab.send(TabMessage::SrText(payload.clone())).await;
        Ok(InputOutcome::PassThrough(payload))
    }
}

/// Upper-cases the first non-whitespace character; leading whitespace stays.
fn capitalize_first(text: &str) -> String {
    let body = text.trim_start();
    let indent = &text[..text.len() - body.len()];
    let mut chars = body.chars();
    match chars.next() {
        Some(first) => indent
            .chars()
            .chain(first.to_uppercase())
            .chain(chars)
            .collect(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("hello world"), "Hello world");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first("ß"), "SS");
    }

    #[test]
    fn capitalize_skips_leading_whitespace() {
        assert_eq!(capitalize_first(" hello world"), " Hello world");
        assert_eq!(capitalize_first("\thello"), "\tHello");
        assert_eq!(capitalize_first("   "), "   ");
    }
}
