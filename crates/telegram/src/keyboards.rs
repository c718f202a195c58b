//! Outbound message shapes for the Bot API.

use serde::Serialize;

use jobwatch_core::wizard::Prompt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl OutboundMessage {
    pub fn text_only(chat_id: i64, text: impl Into<String>) -> Self {
        Self { chat_id, text: text.into(), reply_markup: None }
    }
}

/// Renders a wizard prompt as a chat message with an inline keyboard.
pub fn message_for(chat_id: i64, prompt: &Prompt) -> OutboundMessage {
    let rows: Vec<Vec<InlineKeyboardButton>> = prompt
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|option| InlineKeyboardButton {
                    text: option.label.clone(),
                    callback_data: option.token.clone(),
                })
                .collect()
        })
        .collect();

    OutboundMessage {
        chat_id,
        text: prompt.text.clone(),
        reply_markup: if rows.is_empty() {
            None
        } else {
            Some(InlineKeyboardMarkup { inline_keyboard: rows })
        },
    }
}

/// Same prompt, prefixed with a one-line notice. Used to re-show the
/// current step after a validation failure.
pub fn message_with_notice(chat_id: i64, notice: &str, prompt: &Prompt) -> OutboundMessage {
    let mut message = message_for(chat_id, prompt);
    message.text = format!("{notice}\n\n{}", message.text);
    message
}

#[cfg(test)]
mod tests {
    use jobwatch_core::domain::alert::FilterDraft;
    use jobwatch_core::wizard::{prompts, Step};

    use super::{message_for, message_with_notice};

    #[test]
    fn prompt_buttons_map_to_callback_data() {
        let prompt = prompts::prompt_for(Step::MainMenu, &FilterDraft::default());
        let message = message_for(42, &prompt);

        let markup = message.reply_markup.expect("main menu has a keyboard");
        assert_eq!(markup.inline_keyboard[0][0].callback_data, "menu_new_alert");
        assert_eq!(message.chat_id, 42);
    }

    #[test]
    fn serialized_shape_matches_bot_api_field_names() {
        let prompt = prompts::prompt_for(Step::MainMenu, &FilterDraft::default());
        let json = serde_json::to_value(message_for(7, &prompt)).expect("serialize message");

        assert_eq!(json["chat_id"], 7);
        assert!(json["reply_markup"]["inline_keyboard"].is_array());
        assert!(json["reply_markup"]["inline_keyboard"][0][0]["callback_data"].is_string());
    }

    #[test]
    fn notice_is_prefixed_to_the_prompt_body() {
        let prompt = prompts::prompt_for(Step::AskKeywords, &FilterDraft::default());
        let message = message_with_notice(7, "Keywords cannot be empty.", &prompt);

        assert!(message.text.starts_with("Keywords cannot be empty.\n\n"));
    }
}
