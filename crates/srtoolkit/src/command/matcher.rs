use super::descriptor::{CommandDescriptor, MatchRule};

/// First command whose rule matches, with the text it was matched against.
#[derive(Debug, Clone)]
pub struct MatchedCommand<'a> {
    pub command: &'a CommandDescriptor,
    pub original_text: String,
    /// Remainder after the trigger alias, trimmed and lower-cased.
    pub command_content: String,
}

/// Resolve `text` to at most one command.
///
/// Descriptors are tried in order and the first match wins; comparison is
/// case-insensitive on the trimmed text. `None` means the text is passed
/// through to the page.
pub fn get_matching_command<'a>(
    commands: &'a [CommandDescriptor],
    text: &str,
) -> Option<MatchedCommand<'a>> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    commands.iter().find_map(|command| {
        let content = match &command.rule {
            MatchRule::StartsWith(aliases) => aliases
                .iter()
                .find_map(|alias| strip_alias(&normalized, alias)),
            MatchRule::Phrases(aliases) => {
                let phrase = normalized.trim_end_matches(|c: char| c.is_ascii_punctuation());
                aliases
                    .iter()
                    .any(|alias| alias.trim().to_lowercase() == phrase)
                    .then(String::new)
            }
        }?;
        Some(MatchedCommand {
            command,
            original_text: text.to_string(),
            command_content: content,
        })
    })
}

/// The content after `alias` when `normalized` starts with it as whole words.
fn strip_alias(normalized: &str, alias: &str) -> Option<String> {
    let alias = alias.trim().to_lowercase();
    if alias.is_empty() {
        return None;
    }
    let rest = normalized.strip_prefix(alias.as_str())?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim().to_string())
}
