use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, InputFile, MessageId, Recipient};

use super::{JoinButton, MemberStatus, Messenger, OutgoingPost};
use crate::api::models::MediaKind;
use crate::bot::keyboards::join_keyboard;
use crate::error::PlatformError;

/// [`Messenger`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// `@handle` addresses a public chat, anything else must be a numeric id.
pub fn recipient(chat: &str) -> Result<Recipient, PlatformError> {
    if chat.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat.to_string()));
    }
    chat.parse::<i64>()
        .map(|id| Recipient::Id(ChatId(id)))
        .map_err(|_| PlatformError::InvalidChat(chat.to_string()))
}

impl From<ChatMemberStatus> for MemberStatus {
    fn from(status: ChatMemberStatus) -> Self {
        match status {
            ChatMemberStatus::Owner => MemberStatus::Owner,
            ChatMemberStatus::Administrator => MemberStatus::Administrator,
            ChatMemberStatus::Member => MemberStatus::Member,
            ChatMemberStatus::Restricted => MemberStatus::Restricted,
            ChatMemberStatus::Left => MemberStatus::Left,
            ChatMemberStatus::Banned => MemberStatus::Banned,
        }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn resolve_channel(&self, handle: &str) -> Result<i64, PlatformError> {
        let chat = self.bot.get_chat(recipient(handle)?).await?;
        Ok(chat.id.0)
    }

    async fn member_status(&self, chat: &str, user_id: u64) -> Result<MemberStatus, PlatformError> {
        let member = self.bot.get_chat_member(recipient(chat)?, UserId(user_id)).await?;
        Ok(member.kind.status().into())
    }

    async fn latest_profile_photo(&self, user_id: u64) -> Result<Option<String>, PlatformError> {
        let photos = self.bot.get_user_profile_photos(UserId(user_id)).await?;
        Ok(photos
            .photos
            .first()
            .and_then(|sizes| sizes.last())
            .map(|size| size.file.id.clone()))
    }

    async fn send_post(&self, chat: &str, post: &OutgoingPost) -> Result<i32, PlatformError> {
        let to = recipient(chat)?;
        let content = &post.content;
        let markup = post.button.as_ref().map(join_keyboard);

        let message = match &content.media {
            Some(media) if media.kind == MediaKind::Photo => {
                let mut req = self
                    .bot
                    .send_photo(to, InputFile::file_id(media.file_id.clone()))
                    .caption(content.text.clone())
                    .caption_entities(content.entities.clone());
                if let Some(markup) = markup {
                    req = req.reply_markup(markup);
                }
                req.await?
            }
            Some(media) => {
                let mut req = self
                    .bot
                    .send_video(to, InputFile::file_id(media.file_id.clone()))
                    .caption(content.text.clone())
                    .caption_entities(content.entities.clone());
                if let Some(markup) = markup {
                    req = req.reply_markup(markup);
                }
                req.await?
            }
            None => {
                let mut req = self
                    .bot
                    .send_message(to, content.text.clone())
                    .entities(content.entities.clone());
                if let Some(markup) = markup {
                    req = req.reply_markup(markup);
                }
                req.await?
            }
        };

        Ok(message.id.0)
    }

    async fn set_join_button(
        &self,
        chat: &str,
        message_id: i32,
        button: Option<JoinButton>,
    ) -> Result<(), PlatformError> {
        let mut req = self.bot.edit_message_reply_markup(recipient(chat)?, MessageId(message_id));
        if let Some(button) = button {
            req = req.reply_markup(join_keyboard(&button));
        }
        req.await?;
        Ok(())
    }
}
