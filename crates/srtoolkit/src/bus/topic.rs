use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Route names shared by the background, popup and content-script contexts.
///
/// The path-style names are stable identifiers, not hierarchical routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "/process_input")]
    ProcessInput,
    #[serde(rename = "/navigation_req")]
    NavigationReq,
    #[serde(rename = "/set_selected_text")]
    SetSelectedText,
    #[serde(rename = "/get_data")]
    GetData,
    #[serde(rename = "/start_speech_recognition")]
    StartSpeechRecognition,
    #[serde(rename = "/stop_speech_recognition")]
    StopSpeechRecognition,
    #[serde(rename = "/toggle_sr")]
    ToggleSr,
    #[serde(rename = "/restart_sr")]
    RestartSr,
    #[serde(rename = "/speak_sr")]
    SpeakSr,
    #[serde(rename = "/get_cs_mountAck")]
    GetCsMountAck,
    #[serde(rename = "/get_emoji")]
    GetEmoji,
    #[serde(rename = "/get_emoji_list")]
    GetEmojiList,
    #[serde(rename = "/get_translated_message")]
    GetTranslatedMessage,
    #[serde(rename = "/open_text_replacement_view")]
    OpenTextReplacementView,
    #[serde(rename = "/update_text_replacement_obj")]
    UpdateTextReplacementObj,
    #[serde(rename = "/commands_list_translated")]
    CommandsListTranslated,
    #[serde(rename = "/message")]
    Message,
    #[serde(rename = "/sr_text")]
    SrText,
    #[serde(rename = "/go_to")]
    GoTo,
}

impl Topic {
    /// Topics answered by the background context.
    pub const INBOUND: [Topic; 16] = [
        Topic::ProcessInput,
        Topic::NavigationReq,
        Topic::SetSelectedText,
        Topic::GetData,
        Topic::StartSpeechRecognition,
        Topic::StopSpeechRecognition,
        Topic::ToggleSr,
        Topic::RestartSr,
        Topic::SpeakSr,
        Topic::GetCsMountAck,
        Topic::GetEmoji,
        Topic::GetEmojiList,
        Topic::GetTranslatedMessage,
        Topic::OpenTextReplacementView,
        Topic::UpdateTextReplacementObj,
        Topic::CommandsListTranslated,
    ];

    /// Topics sent from the background to the active tab.
    pub const OUTBOUND: [Topic; 3] = [Topic::Message, Topic::SrText, Topic::GoTo];

    /// Render the topic to wire format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProcessInput => "/process_input",
            Self::NavigationReq => "/navigation_req",
            Self::SetSelectedText => "/set_selected_text",
            Self::GetData => "/get_data",
            Self::StartSpeechRecognition => "/start_speech_recognition",
            Self::StopSpeechRecognition => "/stop_speech_recognition",
            Self::ToggleSr => "/toggle_sr",
            Self::RestartSr => "/restart_sr",
            Self::SpeakSr => "/speak_sr",
            Self::GetCsMountAck => "/get_cs_mountAck",
            Self::GetEmoji => "/get_emoji",
            Self::GetEmojiList => "/get_emoji_list",
            Self::GetTranslatedMessage => "/get_translated_message",
            Self::OpenTextReplacementView => "/open_text_replacement_view",
            Self::UpdateTextReplacementObj => "/update_text_replacement_obj",
            Self::CommandsListTranslated => "/commands_list_translated",
            Self::Message => "/message",
            Self::SrText => "/sr_text",
            Self::GoTo => "/go_to",
        }
    }

    /// Parse a topic from wire format. Matching is exact.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::INBOUND
            .into_iter()
            .chain(Self::OUTBOUND)
            .find(|topic| topic.as_str() == raw)
    }

    pub fn is_outbound(self) -> bool {
        Self::OUTBOUND.contains(&self)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| CoreError::InvalidInput(format!("unknown topic `{raw}`")))
    }
}
