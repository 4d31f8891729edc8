use async_trait::async_trait;
use std::sync::Arc;

use super::descriptor::{
    CommandDescriptor, CommandHandler, CommandSourceTag, ExecContext, MatchRule,
};
use crate::bus::TabMessage;
use crate::error::CoreResult;
use crate::worker::translation::Translate;

pub const GO_TO_ID: &str = "59A7532E-805F-8882-A6F1-6BF822E96612";

/// "go to <site>": navigates the active tab.
pub async fn go_to_command(
    lang_id: &str,
    translator: &dyn Translate,
) -> CoreResult<CommandDescriptor> {
    let alias = translator.message(lang_id, "command_go_to_label").await?;
    let description = translator
        .message(lang_id, "command_go_to_description")
        .await?;
    Ok(CommandDescriptor::new(
        GO_TO_ID,
        alias.clone(),
        description,
        MatchRule::StartsWith(vec![alias]),
        CommandSourceTag::Backend,
        Arc::new(GoTo),
    ))
}

struct GoTo;

#[async_trait]
impl CommandHandler for GoTo {
    async fn exec(&self, content: &str, context: &ExecContext) -> CoreResult<Option<String>> {
        let url = content.trim().to_lowercase();
        tracing::debug!(url = %url, "go to");
        context.tab.send(TabMessage::GoTo { url }).await;
        Ok(None)
    }
}
