use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::{show_reply, HandlerResult};
use crate::api::models::{Media, MediaKind};
use crate::bot::commands::Command;
use crate::conversation::{Conversation, Incoming, Reply};
use crate::utils::feedback::{CommandFeedback, FeedbackType};
use crate::utils::logging::{log_command_error, log_command_start};

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    conversation: Arc<Conversation>,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0;
    let username = user.username.clone();
    let display = username.as_deref().unwrap_or("unknown");
    log_command_start(&format!("{cmd:?}"), display, user_id, None);

    let result = match &cmd {
        Command::Help => {
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .send(FeedbackType::Info, &Command::descriptions().to_string())
                .await?;
            return Ok(());
        }
        Command::Start => conversation.register_admin(user_id, username.clone()).await,
        Command::Channel => conversation.show_channels(user_id).await,
        Command::Gift => conversation.show_gifts(user_id).await,
    };

    let reply = result.unwrap_or_else(|e| {
        log_command_error(&format!("{cmd:?}"), display, user_id, &e.to_string());
        Reply::Failure
    });
    show_reply(&bot, msg.chat.id, &reply, None).await
}

/// Free-form admin input: posts, dates and channel handles.
pub async fn content_handler(bot: Bot, msg: Message, conversation: Arc<Conversation>) -> HandlerResult {
    if !msg.chat.is_private() {
        return Ok(());
    }
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let admin_id = user.id.0;

    let input = incoming_from(&msg);
    let reply = match conversation.handle_input(admin_id, input).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(
                "Failed to handle input from {} in state {}: {}",
                admin_id,
                conversation.state(admin_id),
                e
            );
            Reply::Failure
        }
    };

    if reply == Reply::Ignored && msg.text().is_some_and(|t| t.starts_with('/')) {
        CommandFeedback::new(bot, msg.chat.id)
            .send(FeedbackType::Warning, "Неизвестная команда. Список команд: /help")
            .await?;
        return Ok(());
    }

    show_reply(&bot, msg.chat.id, &reply, None).await
}

/// What the conversation cares about in a message.
pub fn incoming_from(msg: &Message) -> Incoming {
    if let Some(text) = msg.text() {
        return Incoming::Text {
            text: text.to_string(),
            entities: msg.entities().map(|e| e.to_vec()).unwrap_or_default(),
        };
    }

    let media = if let Some(sizes) = msg.photo() {
        // Largest size comes last
        sizes.last().map(|size| Media {
            file_id: size.file.id.clone(),
            kind: MediaKind::Photo,
        })
    } else {
        msg.video().map(|video| Media {
            file_id: video.file.id.clone(),
            kind: MediaKind::Video,
        })
    };

    match media {
        Some(media) => Incoming::Media {
            media,
            caption: msg.caption().map(str::to_string),
            entities: msg.caption_entities().map(|e| e.to_vec()).unwrap_or_default(),
            group_id: msg.media_group_id().map(str::to_string),
        },
        None => Incoming::Other,
    }
}
