use std::str::FromStr;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{show_reply, HandlerResult};
use crate::bot::keyboards::{
    ADD_CHANNEL, ADD_GIFT, DELETE_CHANNEL_PREFIX, EDIT_GIFT_PREFIX, END_GIFT_PREFIX, NOOP,
    PICK_CHANNEL_PREFIX, SAVE_GIFT,
};
use crate::bot::messages::registration_alert;
use crate::conversation::{Conversation, Reply};
use crate::error::BotResult;
use crate::platform::JOIN_CALLBACK_PREFIX;
use crate::services::membership::{ButtonOrigin, JoinRequest, MembershipGuard};

/// Decoded inline button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    AddChannel,
    AddGift,
    SaveGift,
    Noop,
    DeleteChannel(String),
    EditGift(String),
    PickChannel(String),
    EndGift(String),
    Join { channel_handle: String, gift_id: String },
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            ADD_CHANNEL => return Ok(CallbackAction::AddChannel),
            ADD_GIFT => return Ok(CallbackAction::AddGift),
            SAVE_GIFT => return Ok(CallbackAction::SaveGift),
            NOOP => return Ok(CallbackAction::Noop),
            _ => {}
        }

        let id_after = |prefix: &str| {
            data.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
        };

        if let Some(id) = id_after(PICK_CHANNEL_PREFIX) {
            return Ok(CallbackAction::PickChannel(id));
        }
        if let Some(id) = id_after(DELETE_CHANNEL_PREFIX) {
            return Ok(CallbackAction::DeleteChannel(id));
        }
        if let Some(id) = id_after(END_GIFT_PREFIX) {
            return Ok(CallbackAction::EndGift(id));
        }
        if let Some(id) = id_after(EDIT_GIFT_PREFIX) {
            return Ok(CallbackAction::EditGift(id));
        }
        if let Some(rest) = data.strip_prefix(JOIN_CALLBACK_PREFIX) {
            return match rest.split_once(':') {
                Some((channel, gift)) if channel.starts_with('@') && !gift.is_empty() => {
                    Ok(CallbackAction::Join {
                        channel_handle: channel.to_string(),
                        gift_id: gift.to_string(),
                    })
                }
                _ => Err(format!("Malformed join payload '{data}'")),
            };
        }

        Err(format!("Unknown callback '{data}'"))
    }
}

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    conversation: Arc<Conversation>,
    membership: Arc<MembershipGuard>,
) -> HandlerResult {
    let user_id = q.from.id.0;
    let username = q.from.username.as_ref().map_or("unknown", |v| v);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    tracing::info!("Callback received: '{}' from user {} ({})", data, username, user_id);

    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!("{}", e);
            bot.answer_callback_query(q.id).text("Неизвестное действие").await?;
            return Ok(());
        }
    };

    if let CallbackAction::Join { channel_handle, gift_id } = action {
        let request = JoinRequest {
            user_id,
            username: q.from.username.clone(),
            channel_handle,
            gift_id,
        };
        let origin = q.message.as_ref().map(|m| ButtonOrigin {
            chat: m.chat.id.0.to_string(),
            message_id: m.id.0,
        });

        let outcome = membership.join(&request, origin.as_ref()).await;
        tracing::info!("Join of {} to gift {}: {:?}", user_id, request.gift_id, outcome);
        bot.answer_callback_query(q.id)
            .text(registration_alert(outcome))
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let reply = match admin_action(&conversation, user_id, action).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Callback '{}' from {} failed: {}", data, user_id, e);
            Reply::Failure
        }
    };
    bot.answer_callback_query(q.id).await?;

    // Menus are edited in place; everything else is a private reply to the admin
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(ChatId(user_id as i64));
    let edit = q.message.as_ref().map(|m| m.id);
    show_reply(&bot, chat_id, &reply, edit).await
}

async fn admin_action(conversation: &Conversation, admin_id: u64, action: CallbackAction) -> BotResult<Reply> {
    match action {
        CallbackAction::AddChannel => conversation.begin_add_channel(admin_id).await,
        CallbackAction::AddGift => conversation.begin_gift(admin_id).await,
        CallbackAction::SaveGift => conversation.finish_gift(admin_id).await,
        CallbackAction::Noop => Ok(Reply::Ignored),
        CallbackAction::DeleteChannel(id) => conversation.delete_channel(admin_id, &id).await,
        CallbackAction::EditGift(id) => conversation.open_gift(&id).await,
        CallbackAction::PickChannel(id) => conversation.select_channel(admin_id, &id).await,
        CallbackAction::EndGift(id) => conversation.begin_end_post(admin_id, &id).await,
        CallbackAction::Join { .. } => Ok(Reply::Ignored),
    }
}
