//! In-memory stand-ins for the backend and the messaging platform.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use giveaway_bot::api::models::*;
use giveaway_bot::api::Backend;
use giveaway_bot::conversation::{AlbumGuard, Conversation};
use giveaway_bot::drafts::{Drafts, InMemoryDraftStore};
use giveaway_bot::error::{ApiError, PlatformError};
use giveaway_bot::platform::{JoinButton, MemberStatus, Messenger, OutgoingPost};

pub const ADMIN: u64 = 1001;

pub fn channel(id: &str, handle: &str) -> Channel {
    Channel {
        id: id.to_string(),
        channelname: handle.to_string(),
    }
}

/// Backend keeping everything in vectors, with the claim implemented as a
/// compare-and-set on the stored campaign.
#[derive(Default)]
pub struct FakeBackend {
    pub admins: Mutex<Vec<(String, NewAdmin)>>,
    pub channels: Mutex<Vec<Channel>>,
    pub gifts: Mutex<Vec<Gift>>,
    pub created: Mutex<Vec<NewGift>>,
    pub patches: Mutex<Vec<(String, GiftPatch)>>,
    pub claims: Mutex<Vec<(String, PostKind)>>,
    pub members: Mutex<Vec<(String, NewMember)>>,
    /// Refuse `add_channel` with this status
    pub reject_channels: Mutex<Option<u16>>,
    /// Fail `find_gift` as if the backend were down
    pub lookups_down: Mutex<bool>,
}

impl FakeBackend {
    pub fn with_channels(channels: Vec<Channel>) -> Self {
        let backend = Self::default();
        *backend.channels.lock().unwrap() = channels;
        backend
    }

    pub fn gift(&self, id: &str) -> Option<Gift> {
        self.gifts.lock().unwrap().iter().find(|g| g.id == id).cloned()
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            body: format!("gift {id} not found"),
        }
    }
}

fn apply_patch(gift: &mut Gift, patch: &GiftPatch) {
    if let Some(id) = &patch.start_message_id {
        gift.start_message_id = Some(id.clone());
    }
    if let Some(map) = &patch.start_messages {
        gift.start_messages = Some(map.clone());
    }
    if let Some(status) = patch.start_post_status {
        gift.start_post_status = Some(status);
    }
    if let Some(media) = &patch.end_post_media {
        gift.end_post_media = media.clone();
    }
    if let Some(text) = &patch.end_post_content {
        gift.end_post_content = Some(text.clone());
    }
    if let Some(entities) = &patch.end_post_content_entities {
        gift.end_post_content_entities = Some(entities.clone());
    }
    if let Some(date) = patch.end_post_date {
        gift.end_post_date = Some(date);
    }
    if let Some(kind) = patch.end_post_media_type {
        gift.end_post_media_type = kind;
    }
    if let Some(status) = patch.end_post_status {
        gift.end_post_status = Some(status);
    }
    if let Some(status) = patch.status {
        gift.status = Some(status);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn create_admin(&self, caller: &str, admin: &NewAdmin) -> Result<(), ApiError> {
        self.admins.lock().unwrap().push((caller.to_string(), admin.clone()));
        Ok(())
    }

    async fn list_channels(&self, _caller: &str) -> Result<Vec<Channel>, ApiError> {
        Ok(self.channels.lock().unwrap().clone())
    }

    async fn add_channel(&self, _caller: &str, channel: &Channel) -> Result<(), ApiError> {
        if let Some(status) = *self.reject_channels.lock().unwrap() {
            return Err(ApiError::Status { status, body: "rejected".into() });
        }
        self.channels.lock().unwrap().push(channel.clone());
        Ok(())
    }

    async fn delete_channel(&self, _caller: &str, channel_id: &str) -> Result<(), ApiError> {
        self.channels.lock().unwrap().retain(|c| c.id != channel_id);
        Ok(())
    }

    async fn list_gifts(&self, _caller: &str) -> Result<Vec<Gift>, ApiError> {
        Ok(self.gifts.lock().unwrap().clone())
    }

    async fn find_gift(&self, gift_id: &str) -> Result<Gift, ApiError> {
        if *self.lookups_down.lock().unwrap() {
            return Err(ApiError::Status { status: 503, body: "unavailable".into() });
        }
        self.gift(gift_id).ok_or_else(|| Self::not_found(gift_id))
    }

    async fn create_gift(&self, _caller: &str, gift: &NewGift) -> Result<(), ApiError> {
        let known = self.channels.lock().unwrap().clone();
        let mut gifts = self.gifts.lock().unwrap();

        let mut value = serde_json::to_value(gift).unwrap();
        value["id"] = serde_json::json!(format!("gift-{}", gifts.len() + 1));
        value["channels"] = serde_json::to_value(
            gift.channels
                .iter()
                .filter_map(|id| known.iter().find(|c| &c.id == id).cloned())
                .collect::<Vec<_>>(),
        )
        .unwrap();

        gifts.push(serde_json::from_value(value).unwrap());
        self.created.lock().unwrap().push(gift.clone());
        Ok(())
    }

    async fn update_gift(&self, gift_id: &str, patch: &GiftPatch) -> Result<(), ApiError> {
        let mut gifts = self.gifts.lock().unwrap();
        let gift = gifts
            .iter_mut()
            .find(|g| g.id == gift_id)
            .ok_or_else(|| Self::not_found(gift_id))?;
        apply_patch(gift, patch);
        self.patches.lock().unwrap().push((gift_id.to_string(), patch.clone()));
        Ok(())
    }

    async fn due_for_start(&self) -> Result<Vec<Gift>, ApiError> {
        Ok(self.gifts.lock().unwrap().clone())
    }

    async fn due_for_end(&self) -> Result<Vec<Gift>, ApiError> {
        Ok(self.gifts.lock().unwrap().clone())
    }

    async fn claim_post(&self, gift_id: &str, post: PostKind) -> Result<bool, ApiError> {
        self.claims.lock().unwrap().push((gift_id.to_string(), post));
        let mut gifts = self.gifts.lock().unwrap();
        let gift = gifts
            .iter_mut()
            .find(|g| g.id == gift_id)
            .ok_or_else(|| Self::not_found(gift_id))?;

        let status = match post {
            PostKind::Start => &mut gift.start_post_status,
            PostKind::End => &mut gift.end_post_status,
        };
        if status.unwrap_or(PostStatus::Awaiting) != PostStatus::Awaiting {
            return Ok(false);
        }
        *status = Some(PostStatus::Publishing);
        Ok(true)
    }

    async fn add_member(&self, caller: &str, member: &NewMember) -> Result<Registration, ApiError> {
        let mut members = self.members.lock().unwrap();
        if members
            .iter()
            .any(|(c, m)| c == caller && m.gift_id == member.gift_id)
        {
            return Err(ApiError::Status { status: 409, body: "duplicate".into() });
        }
        members.push((caller.to_string(), member.clone()));
        drop(members);

        let mut gifts = self.gifts.lock().unwrap();
        if let Some(gift) = gifts.iter_mut().find(|g| g.id == member.gift_id) {
            gift.members.push(Member {
                telegram_id: Some(caller.to_string()),
                username: member.username.clone(),
                picture: member.picture.clone(),
                gift_id: Some(member.gift_id.clone()),
            });
        }
        Ok(Registration::Registered)
    }
}

/// Platform double: handles resolve through a fixed table and every call is
/// recorded by name.
#[derive(Default)]
pub struct FakeMessenger {
    pub chats: Mutex<HashMap<String, i64>>,
    pub statuses: Mutex<HashMap<(String, u64), MemberStatus>>,
    pub calls: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<(String, OutgoingPost)>>,
    pub buttons: Mutex<Vec<(String, i32, Option<JoinButton>)>>,
    /// Chats whose sends always fail
    pub broken_chats: Mutex<Vec<String>>,
}

impl FakeMessenger {
    pub fn with_channel(handle: &str, chat_id: i64, admin: u64, status: MemberStatus) -> Self {
        let messenger = Self::default();
        messenger.add_channel(handle, chat_id, admin, status);
        messenger
    }

    pub fn add_channel(&self, handle: &str, chat_id: i64, user: u64, status: MemberStatus) {
        self.chats.lock().unwrap().insert(handle.to_string(), chat_id);
        self.statuses
            .lock()
            .unwrap()
            .insert((handle.to_string(), user), status);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn resolve_channel(&self, handle: &str) -> Result<i64, PlatformError> {
        self.record("resolve_channel");
        self.chats
            .lock()
            .unwrap()
            .get(handle)
            .copied()
            .ok_or_else(|| PlatformError::InvalidChat(handle.to_string()))
    }

    async fn member_status(&self, chat: &str, user_id: u64) -> Result<MemberStatus, PlatformError> {
        self.record("member_status");
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(&(chat.to_string(), user_id))
            .copied()
            .unwrap_or(MemberStatus::Left))
    }

    async fn latest_profile_photo(&self, _user_id: u64) -> Result<Option<String>, PlatformError> {
        self.record("latest_profile_photo");
        Ok(None)
    }

    async fn send_post(&self, chat: &str, post: &OutgoingPost) -> Result<i32, PlatformError> {
        self.record("send_post");
        if self.broken_chats.lock().unwrap().iter().any(|c| c == chat) {
            return Err(PlatformError::InvalidChat(chat.to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((chat.to_string(), post.clone()));
        Ok(100 + sent.len() as i32)
    }

    async fn set_join_button(
        &self,
        chat: &str,
        message_id: i32,
        button: Option<JoinButton>,
    ) -> Result<(), PlatformError> {
        self.record("set_join_button");
        self.buttons
            .lock()
            .unwrap()
            .push((chat.to_string(), message_id, button));
        Ok(())
    }
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub messenger: Arc<FakeMessenger>,
    pub store: Arc<InMemoryDraftStore>,
    pub conversation: Conversation,
}

pub fn harness(backend: FakeBackend, messenger: FakeMessenger) -> Harness {
    let backend = Arc::new(backend);
    let messenger = Arc::new(messenger);
    let store = Arc::new(InMemoryDraftStore::new());
    let conversation = Conversation::new(
        backend.clone(),
        messenger.clone(),
        Drafts::new(store.clone()),
        AlbumGuard::default(),
    );
    Harness {
        backend,
        messenger,
        store,
        conversation,
    }
}
