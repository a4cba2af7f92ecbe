use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::api::models::{Channel, Gift};
use crate::platform::JoinButton;
use crate::utils::datetime::format_moscow;

pub const ADD_CHANNEL: &str = "add_channel";
pub const ADD_GIFT: &str = "add_gift";
pub const SAVE_GIFT: &str = "save_gift";
pub const NOOP: &str = "noop";
pub const DELETE_CHANNEL_PREFIX: &str = "delete_channel_";
pub const EDIT_GIFT_PREFIX: &str = "edit_gift_";
pub const PICK_CHANNEL_PREFIX: &str = "add_channel_to_gift_";
pub const END_GIFT_PREFIX: &str = "add_gift_end_post_";

pub fn join_keyboard(button: &JoinButton) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        button.label.clone(),
        button.callback.clone(),
    )]])
}

/// Channels with a delete button each, then "add channel".
pub fn channel_list(channels: &[Channel]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = channels
        .iter()
        .map(|channel| {
            vec![
                InlineKeyboardButton::callback(channel.channelname.clone(), NOOP),
                InlineKeyboardButton::callback("Удалить", format!("{DELETE_CHANNEL_PREFIX}{}", channel.id)),
            ]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("Добавить канал", ADD_CHANNEL)]);
    InlineKeyboardMarkup::new(rows)
}

/// Button label of a campaign in the list: Moscow start time and status.
pub fn gift_label(gift: &Gift) -> String {
    let date = gift
        .start_post_date
        .as_ref()
        .map(format_moscow)
        .unwrap_or_else(|| "??.??.?? ??:??".to_string());
    let status = if gift.is_active() { "Активный" } else { "Завершен" };
    format!("Конкурс от {date} ({status})")
}

pub fn gift_list(gifts: &[Gift]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = gifts
        .iter()
        .map(|gift| {
            vec![InlineKeyboardButton::callback(
                gift_label(gift),
                format!("{EDIT_GIFT_PREFIX}{}", gift.id),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("Добавить конкурс", ADD_GIFT)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn channel_picker(channels: &[Channel]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = channels
        .iter()
        .map(|channel| {
            vec![InlineKeyboardButton::callback(
                channel.channelname.clone(),
                format!("{PICK_CHANNEL_PREFIX}{}", channel.id),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("Завершить создание", SAVE_GIFT)]);
    InlineKeyboardMarkup::new(rows)
}

/// Campaign menu; ending is offered only while no end post exists.
pub fn gift_menu(gift: &Gift) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    if !gift.has_end_post() {
        rows.push(vec![InlineKeyboardButton::callback(
            "Завершить конкурс",
            format!("{END_GIFT_PREFIX}{}", gift.id),
        )]);
    }
    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callbacks(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_gift_label_uses_moscow_time() {
        let gift: Gift = serde_json::from_value(json!({
            "id": "gift-1",
            "startPostDate": "2024-12-25T15:00:00Z",
            "status": "COMPLETED"
        }))
        .unwrap();
        assert_eq!(gift_label(&gift), "Конкурс от 25.12.24 18:00 (Завершен)");
    }

    #[test]
    fn test_channel_list_has_delete_and_add_buttons() {
        let channels = vec![Channel { id: "-1001".into(), channelname: "@example_channel".into() }];
        let markup = channel_list(&channels);
        assert_eq!(callbacks(&markup), vec!["noop", "delete_channel_-1001", "add_channel"]);
    }

    #[test]
    fn test_gift_menu_hides_end_button_once_end_post_exists() {
        let open: Gift = serde_json::from_value(json!({"id": "gift-1"})).unwrap();
        assert_eq!(callbacks(&gift_menu(&open)), vec!["add_gift_end_post_gift-1"]);

        let ended: Gift = serde_json::from_value(json!({"id": "gift-1", "endPostContent": "Winners!"})).unwrap();
        assert!(callbacks(&gift_menu(&ended)).is_empty());
    }
}
