use async_trait::async_trait;
use std::sync::Arc;

use super::descriptor::{CommandDescriptor, CommandSourceTag};
use super::go_to::go_to_command;
use crate::error::CoreResult;
use crate::worker::translation::Translate;

#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Commands of one source for `lang_id`, in match precedence order.
    async fn get_commands(
        &self,
        lang_id: &str,
        tag: CommandSourceTag,
    ) -> CoreResult<Vec<CommandDescriptor>>;

    /// Commands of every source for `lang_id`.
    async fn get_all_commands(&self, lang_id: &str) -> CoreResult<Vec<CommandDescriptor>>;
}

/// Commands shipped with the extension, labelled through the translator.
///
/// Every built-in command runs in the background; the page-side set is
/// empty.
pub struct BuiltinCommands {
    translator: Arc<dyn Translate>,
}

impl BuiltinCommands {
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self { translator }
    }
}

#[async_trait]
impl CommandSource for BuiltinCommands {
    async fn get_commands(
        &self,
        lang_id: &str,
        tag: CommandSourceTag,
    ) -> CoreResult<Vec<CommandDescriptor>> {
        match tag {
            CommandSourceTag::Backend => {
                Ok(vec![go_to_command(lang_id, self.translator.as_ref()).await?])
            }
            CommandSourceTag::Frontend => Ok(Vec::new()),
        }
    }

    async fn get_all_commands(&self, lang_id: &str) -> CoreResult<Vec<CommandDescriptor>> {
        let mut commands = self
            .get_commands(lang_id, CommandSourceTag::Backend)
            .await?;
        commands.extend(
            self.get_commands(lang_id, CommandSourceTag::Frontend)
                .await?,
        );
        Ok(commands)
    }
}
