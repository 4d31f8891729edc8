use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::bus::TabChannel;
use crate::error::CoreResult;

/// How recognized text is compared against a command's aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// Text begins with one of the aliases; the rest is the command content.
    StartsWith(Vec<String>),
    /// Text is exactly one of the aliases.
    Phrases(Vec<String>),
}

impl MatchRule {
    pub fn aliases(&self) -> &[String] {
        match self {
            Self::StartsWith(aliases) | Self::Phrases(aliases) => aliases,
        }
    }
}

/// Where a command is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandSourceTag {
    /// Executed by the background context.
    Backend,
    /// Executed by the content script inside the page.
    Frontend,
}

pub struct ExecContext {
    pub original_text: String,
    pub tab: TabChannel,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command. The returned message, if any, is shown in the page.
    async fn exec(&self, content: &str, context: &ExecContext) -> CoreResult<Option<String>>;
}

#[derive(Clone)]
pub struct CommandDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rule: MatchRule,
    pub source: CommandSourceTag,
    handler: Arc<dyn CommandHandler>,
}

/// `[aliases, description, id]`, the row shape of the command list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandListEntry(pub String, pub String, pub String);

impl CommandDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        rule: MatchRule,
        source: CommandSourceTag,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            rule,
            source,
            handler,
        }
    }

    pub async fn exec(&self, content: &str, context: &ExecContext) -> CoreResult<Option<String>> {
        self.handler.exec(content, context).await
    }

    pub fn list_entry(&self) -> CommandListEntry {
        CommandListEntry(
            self.rule.aliases().join(", "),
            self.description.clone(),
            self.id.clone(),
        )
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rule", &self.rule)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
