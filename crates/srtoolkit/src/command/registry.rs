use parking_lot::RwLock;
use std::sync::Arc;

use super::descriptor::{CommandDescriptor, CommandSourceTag};
use super::matcher::{get_matching_command, MatchedCommand};
use super::source::CommandSource;
use crate::error::CoreResult;

/// Ordered commands for one language.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    pub lang_id: String,
    pub commands: Vec<CommandDescriptor>,
}

impl CommandSet {
    pub fn new(lang_id: impl Into<String>, commands: Vec<CommandDescriptor>) -> Self {
        Self {
            lang_id: lang_id.into(),
            commands,
        }
    }

    pub fn find_match(&self, text: &str) -> Option<MatchedCommand<'_>> {
        get_matching_command(&self.commands, text)
    }
}

/// Holds the active command set. Sets are replaced wholesale, never diffed.
#[derive(Default)]
pub struct CommandRegistry {
    current: RwLock<Arc<CommandSet>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Arc<CommandSet> {
        self.current.read().clone()
    }

    pub fn replace(&self, set: CommandSet) {
        *self.current.write() = Arc::new(set);
    }

    /// Fetch the backend commands for `lang_id` and make them current.
    pub async fn reload(&self, source: &dyn CommandSource, lang_id: &str) -> CoreResult<usize> {
        let commands = source
            .get_commands(lang_id, CommandSourceTag::Backend)
            .await?;
        let count = commands.len();
        self.replace(CommandSet::new(lang_id, commands));
        tracing::info!(lang_id, count, "loaded command set");
        Ok(count)
    }
}
