use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::topic::Topic;

/// Envelope payloads answered by the background context, keyed by topic.
///
/// Wire form is `{"topic": "<path>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum Request {
    #[serde(rename = "/process_input")]
    ProcessInput { text: String },
    #[serde(rename = "/navigation_req")]
    NavigationReq { sub_path: String },
    #[serde(rename = "/set_selected_text")]
    SetSelectedText { data: Value },
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
    SpeakSr { text: String },
    #[serde(rename = "/get_cs_mountAck")]
    GetCsMountAck,
    #[serde(rename = "/get_emoji")]
    GetEmoji {
        #[serde(rename = "langId")]
        lang_id: String,
        #[serde(rename = "emojiName")]
        emoji_name: String,
    },
    #[serde(rename = "/get_emoji_list")]
    GetEmojiList {
        #[serde(rename = "langId")]
        lang_id: String,
    },
    #[serde(rename = "/get_translated_message")]
    GetTranslatedMessage {
        #[serde(rename = "langId")]
        lang_id: String,
        key: String,
    },
    #[serde(rename = "/open_text_replacement_view")]
    OpenTextReplacementView { text: String },
    #[serde(rename = "/update_text_replacement_obj")]
    UpdateTextReplacementObj,
    #[serde(rename = "/commands_list_translated")]
    CommandsListTranslated {
        #[serde(rename = "langId")]
        lang_id: String,
    },
}

impl Request {
    pub fn topic(&self) -> Topic {
        match self {
            Self::ProcessInput { .. } => Topic::ProcessInput,
            Self::NavigationReq { .. } => Topic::NavigationReq,
            Self::SetSelectedText { .. } => Topic::SetSelectedText,
            Self::GetData => Topic::GetData,
            Self::StartSpeechRecognition => Topic::StartSpeechRecognition,
            Self::StopSpeechRecognition => Topic::StopSpeechRecognition,
            Self::ToggleSr => Topic::ToggleSr,
            Self::RestartSr => Topic::RestartSr,
            Self::SpeakSr { .. } => Topic::SpeakSr,
            Self::GetCsMountAck => Topic::GetCsMountAck,
            Self::GetEmoji { .. } => Topic::GetEmoji,
            Self::GetEmojiList { .. } => Topic::GetEmojiList,
            Self::GetTranslatedMessage { .. } => Topic::GetTranslatedMessage,
            Self::OpenTextReplacementView { .. } => Topic::OpenTextReplacementView,
            Self::UpdateTextReplacementObj => Topic::UpdateTextReplacementObj,
            Self::CommandsListTranslated { .. } => Topic::CommandsListTranslated,
        }
    }
}

/// How a piece of text entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Speech,
    Text,
}

/// Recognized text forwarded to the page when no command matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrTextPayload {
    pub text: String,
    #[serde(rename = "langId")]
    pub lang_id: String,
    #[serde(rename = "langLabel")]
    pub lang_label: String,
    pub mode: InputMode,
}

/// Messages the background sends to the active tab's content script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum TabMessage {
    #[serde(rename = "/message")]
    Message { message: String },
    #[serde(rename = "/sr_text")]
    SrText(SrTextPayload),
    #[serde(rename = "/go_to")]
    GoTo { url: String },
}

impl TabMessage {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Message { .. } => Topic::Message,
            Self::SrText(_) => Topic::SrText,
            Self::GoTo { .. } => Topic::GoTo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_content_script_envelope() {
        let request: Request = serde_json::from_value(json!({
            "topic": "/get_emoji",
            "payload": { "langId": "en", "emojiName": "smile" }
        }))
        .expect("parse");
        assert_eq!(
            request,
            Request::GetEmoji {
                lang_id: "en".to_string(),
                emoji_name: "smile".to_string(),
            }
        );
        assert_eq!(request.topic(), Topic::GetEmoji);
    }

    #[test]
    fn parses_payloadless_envelope() {
        let request: Request =
            serde_json::from_value(json!({ "topic": "/toggle_sr" })).expect("parse");
        assert_eq!(request, Request::ToggleSr);
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let result: Result<Request, _> =
            serde_json::from_value(json!({ "topic": "/sr_text", "payload": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn sr_text_uses_wire_field_names() {
        let message = TabMessage::SrText(SrTextPayload {
            text: "hello world".to_string(),
            lang_id: "en".to_string(),
            lang_label: "English".to_string(),
            mode: InputMode::Speech,
        });
        assert_eq!(
            serde_json::to_value(&message).expect("serialize"),
            json!({
                "topic": "/sr_text",
                "payload": {
                    "text": "hello world",
                    "langId": "en",
                    "langLabel": "English",
                    "mode": "speech"
                }
            })
        );
    }
}
