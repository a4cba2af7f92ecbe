//! Per-admin multi-step flows: adding a channel, drafting a campaign's start
//! post, and drafting its end post.
//!
//! Every method takes the admin's platform id, works out what the admin's
//! current state allows, and returns a [`Reply`] for the bot layer to render.
//! Validation and rights problems are replies, not errors; an `Err` means a
//! backend, platform or draft store call failed.

pub mod album;
pub mod reply;
pub mod state;

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::api::models::{Channel, GiftPatch, GiftStatus, NewAdmin, NewGift, PostContent, PostKind, PostStatus};
use crate::api::Backend;
use crate::drafts::Drafts;
use crate::error::BotResult;
use crate::platform::Messenger;
use crate::utils::logging::{log_transition, log_validation_error};
use crate::utils::validation::{validate_channel_handle, validate_post_date, validate_post_text};

pub use album::AlbumGuard;
pub use reply::{Incoming, Reply};
pub use state::{ConversationState, SessionStore};

pub struct Conversation {
    backend: Arc<dyn Backend>,
    messenger: Arc<dyn Messenger>,
    drafts: Drafts,
    sessions: SessionStore,
    albums: AlbumGuard,
}

fn caller(admin_id: u64) -> String {
    admin_id.to_string()
}

impl Conversation {
    pub fn new(
        backend: Arc<dyn Backend>,
        messenger: Arc<dyn Messenger>,
        drafts: Drafts,
        albums: AlbumGuard,
    ) -> Self {
        Self {
            backend,
            messenger,
            drafts,
            sessions: SessionStore::new(),
            albums,
        }
    }

    pub fn state(&self, admin_id: u64) -> ConversationState {
        self.sessions.get(admin_id)
    }

    fn transition(&self, admin_id: u64, next: ConversationState) {
        let to = next.label();
        let from = self.sessions.set(admin_id, next);
        log_transition(admin_id, from.label(), to);
    }

    // Menus

    pub async fn register_admin(&self, admin_id: u64, username: Option<String>) -> BotResult<Reply> {
        self.backend
            .create_admin(&caller(admin_id), &NewAdmin { username })
            .await?;
        Ok(Reply::Welcome)
    }

    pub async fn show_channels(&self, admin_id: u64) -> BotResult<Reply> {
        let channels = self.backend.list_channels(&caller(admin_id)).await?;
        Ok(Reply::ChannelList(channels))
    }

    pub async fn begin_add_channel(&self, admin_id: u64) -> BotResult<Reply> {
        self.transition(admin_id, ConversationState::WaitChannel);
        Ok(Reply::AskChannelHandle)
    }

    pub async fn delete_channel(&self, admin_id: u64, channel_id: &str) -> BotResult<Reply> {
        self.backend.delete_channel(&caller(admin_id), channel_id).await?;
        self.show_channels(admin_id).await
    }

    pub async fn show_gifts(&self, admin_id: u64) -> BotResult<Reply> {
        let gifts = self.backend.list_gifts(&caller(admin_id)).await?;
        Ok(Reply::GiftList(gifts))
    }

    pub async fn open_gift(&self, gift_id: &str) -> BotResult<Reply> {
        let gift = self.backend.find_gift(gift_id).await?;
        Ok(Reply::GiftMenu(gift))
    }

    // Flow entry points

    pub async fn begin_gift(&self, admin_id: u64) -> BotResult<Reply> {
        let channels = self.backend.list_channels(&caller(admin_id)).await?;
        if channels.is_empty() {
            return Ok(Reply::NoChannelsForGift);
        }

        self.drafts.clear_side(admin_id, PostKind::Start).await?;
        self.transition(admin_id, ConversationState::WaitStartPost);
        Ok(Reply::AskStartPost)
    }

    pub async fn begin_end_post(&self, admin_id: u64, gift_id: &str) -> BotResult<Reply> {
        self.drafts.clear_side(admin_id, PostKind::End).await?;
        self.transition(
            admin_id,
            ConversationState::WaitEndPost { gift_id: gift_id.to_string() },
        );
        Ok(Reply::AskEndPost)
    }

    // Channel selection

    pub async fn select_channel(&self, admin_id: u64, channel_id: &str) -> BotResult<Reply> {
        if self.state(admin_id) != ConversationState::WaitStartPostChannels {
            return Ok(Reply::Ignored);
        }

        self.drafts.push_channel(admin_id, channel_id).await?;
        let selected = self.drafts.selected_channels(admin_id).await?;
        let channels = self.backend.list_channels(&caller(admin_id)).await?;
        Ok(Reply::ChannelPicker(unselected(channels, &selected)))
    }

    pub async fn finish_gift(&self, admin_id: u64) -> BotResult<Reply> {
        if self.state(admin_id) != ConversationState::WaitStartPostChannels {
            return Ok(Reply::Ignored);
        }

        let draft = self.drafts.load(admin_id, PostKind::Start).await?;
        if draft.channels.is_empty() {
            return Ok(Reply::NoChannelsSelected);
        }

        let start_post_date = match draft.date {
            Some(date) if !draft.content.text.trim().is_empty() => date,
            _ => {
                self.transition(admin_id, ConversationState::Idle);
                return Ok(Reply::DraftExpired);
            }
        };

        let (media, media_kind) = match draft.content.media {
            Some(media) => (Some(media.file_id), Some(media.kind)),
            None => (None, None),
        };
        let gift = NewGift {
            start_post_media: media,
            start_post_content: draft.content.text,
            start_post_date,
            start_post_content_entities: draft.content.entities,
            start_post_media_type: media_kind,
            start_post_status: PostStatus::Awaiting,
            status: GiftStatus::Active,
            channels: dedup_in_order(draft.channels),
        };
        self.backend.create_gift(&caller(admin_id), &gift).await?;

        tracing::info!(
            "Admin {} created a campaign starting {} in {} channel(s)",
            admin_id,
            gift.start_post_date,
            gift.channels.len()
        );
        self.transition(admin_id, ConversationState::Idle);
        Ok(Reply::GiftSaved)
    }

    // Free-form input

    pub async fn handle_input(&self, admin_id: u64, input: Incoming) -> BotResult<Reply> {
        match self.state(admin_id) {
            ConversationState::Idle | ConversationState::WaitStartPostChannels => Ok(Reply::Ignored),
            ConversationState::WaitChannel => self.receive_channel(admin_id, &input).await,
            ConversationState::WaitStartPost => {
                self.receive_post(admin_id, PostKind::Start, input, ConversationState::WaitStartPostDate)
                    .await
            }
            ConversationState::WaitEndPost { gift_id } => {
                self.receive_post(admin_id, PostKind::End, input, ConversationState::WaitEndPostDate { gift_id })
                    .await
            }
            ConversationState::WaitStartPostDate => self.receive_start_date(admin_id, &input).await,
            ConversationState::WaitEndPostDate { gift_id } => {
                self.receive_end_date(admin_id, &gift_id, &input).await
            }
        }
    }

    async fn receive_channel(&self, admin_id: u64, input: &Incoming) -> BotResult<Reply> {
        let raw = input.as_text().unwrap_or_default();
        let handle = match validate_channel_handle(raw) {
            Ok(handle) => handle,
            Err(e) => {
                log_validation_error("WAIT_CHANNEL", raw, &e.to_string(), admin_id);
                return Ok(Reply::ChannelFormatError);
            }
        };

        let reply = self.verify_and_add_channel(admin_id, &handle).await;
        self.transition(admin_id, ConversationState::Idle);
        reply
    }

    async fn verify_and_add_channel(&self, admin_id: u64, handle: &str) -> BotResult<Reply> {
        let channel_id = match self.messenger.resolve_channel(handle).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Cannot resolve channel {} for admin {}: {}", handle, admin_id, e);
                return Ok(Reply::ChannelAccessError);
            }
        };

        match self.messenger.member_status(handle, admin_id).await {
            Ok(status) if status.is_privileged() => {}
            Ok(status) => {
                tracing::info!("Admin {} is {:?} in {}, not an administrator", admin_id, status, handle);
                return Ok(Reply::ChannelRightsError);
            }
            Err(e) => {
                tracing::warn!("Cannot check rights of admin {} in {}: {}", admin_id, handle, e);
                return Ok(Reply::ChannelAccessError);
            }
        }

        let channel = Channel {
            id: channel_id.to_string(),
            channelname: handle.to_string(),
        };
        if let Err(e) = self.backend.add_channel(&caller(admin_id), &channel).await {
            tracing::warn!("Backend refused channel {} for admin {}: {}", handle, admin_id, e);
            return Ok(Reply::ChannelAccessError);
        }

        self.show_channels(admin_id).await
    }

    async fn receive_post(
        &self,
        admin_id: u64,
        side: PostKind,
        input: Incoming,
        next: ConversationState,
    ) -> BotResult<Reply> {
        let content = match input {
            Incoming::Media { group_id: Some(group_id), .. } => {
                return Ok(if self.albums.admit(&group_id) {
                    Reply::SingleMediaOnly
                } else {
                    Reply::Ignored
                });
            }
            Incoming::Text { text, entities } => match validate_post_text(Some(&text)) {
                Ok(_) => PostContent { text, entities, media: None },
                Err(_) => return Ok(Reply::EmptyContent),
            },
            Incoming::Media { media, caption, entities, group_id: None } => {
                match validate_post_text(caption.as_deref()) {
                    Ok(text) => PostContent {
                        text: text.to_string(),
                        entities,
                        media: Some(media),
                    },
                    Err(_) => return Ok(Reply::EmptyContent),
                }
            }
            Incoming::Other => return Ok(Reply::EmptyContent),
        };

        self.drafts.store_content(admin_id, side, &content).await?;
        self.transition(admin_id, next);
        Ok(Reply::AskPostDate)
    }

    fn parse_date(&self, admin_id: u64, input: &Incoming) -> Option<DateTime<Utc>> {
        let raw = input.as_text().unwrap_or_default();
        match validate_post_date(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                log_validation_error(self.state(admin_id).label(), raw, &e.to_string(), admin_id);
                None
            }
        }
    }

    async fn receive_start_date(&self, admin_id: u64, input: &Incoming) -> BotResult<Reply> {
        let Some(date) = self.parse_date(admin_id, input) else {
            return Ok(Reply::DateFormatError);
        };

        self.drafts.store_date(admin_id, PostKind::Start, date).await?;
        let channels = self.backend.list_channels(&caller(admin_id)).await?;
        self.transition(admin_id, ConversationState::WaitStartPostChannels);
        Ok(Reply::ChannelPicker(channels))
    }

    async fn receive_end_date(&self, admin_id: u64, gift_id: &str, input: &Incoming) -> BotResult<Reply> {
        let Some(date) = self.parse_date(admin_id, input) else {
            return Ok(Reply::DateFormatError);
        };

        self.drafts.store_date(admin_id, PostKind::End, date).await?;
        let draft = self.drafts.load(admin_id, PostKind::End).await?;
        if draft.content.text.trim().is_empty() {
            self.transition(admin_id, ConversationState::Idle);
            return Ok(Reply::DraftExpired);
        }

        self.backend
            .update_gift(gift_id, &GiftPatch::end_post(draft.content, date))
            .await?;
        self.transition(admin_id, ConversationState::Idle);

        // The end post is saved at this point; clearing buttons is best effort
        let gift = match self.backend.find_gift(gift_id).await {
            Ok(gift) => gift,
            Err(e) => {
                tracing::error!("Could not reload gift {} to remove join buttons: {}", gift_id, e);
                return Ok(Reply::EndPostSaved);
            }
        };
        for channel in &gift.channels {
            let Some(message_id) = gift.start_message_in(&channel.id) else {
                continue;
            };
            if let Err(e) = self.messenger.set_join_button(&channel.id, message_id, None).await {
                tracing::warn!(
                    "Could not remove join button of gift {} in {}: {}",
                    gift_id,
                    channel.channelname,
                    e
                );
            }
        }

        Ok(Reply::EndPostSaved)
    }
}

/// Channels not yet picked, in the admin's channel order.
pub fn unselected(channels: Vec<Channel>, selected: &[String]) -> Vec<Channel> {
    channels
        .into_iter()
        .filter(|c| !selected.contains(&c.id))
        .collect()
}

/// Keep the first occurrence of each id.
fn dedup_in_order(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
