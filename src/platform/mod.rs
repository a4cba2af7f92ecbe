//! Messaging-platform operations the bot needs besides replying to admins.
//!
//! Chats are addressed by string: a public handle (`@name`) or a numeric
//! chat id.

pub mod telegram;

use async_trait::async_trait;

use crate::api::models::{Gift, PostContent};
use crate::error::PlatformError;

pub use telegram::TelegramMessenger;

/// Callback prefix of the join button.
pub const JOIN_CALLBACK_PREFIX: &str = "add_member_";

/// A user's standing in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// May configure the channel (owner or administrator).
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberStatus::Owner | MemberStatus::Administrator)
    }

    /// Currently receives the channel's posts.
    pub fn is_subscribed(self) -> bool {
        !matches!(self, MemberStatus::Left | MemberStatus::Banned)
    }
}

/// The single "join" button under a start post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinButton {
    pub label: String,
    pub callback: String,
}

impl JoinButton {
    pub fn new(channel_handle: &str, gift_id: &str, participants: usize) -> Self {
        Self {
            label: format!("Участвовать ({participants})"),
            callback: format!("{JOIN_CALLBACK_PREFIX}{channel_handle}:{gift_id}"),
        }
    }

    pub fn for_gift(channel_handle: &str, gift: &Gift) -> Self {
        Self::new(channel_handle, &gift.id, gift.participant_count())
    }
}

/// A post ready to be sent to one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingPost {
    pub content: PostContent,
    pub button: Option<JoinButton>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Resolve a public handle to the numeric chat id.
    async fn resolve_channel(&self, handle: &str) -> Result<i64, PlatformError>;

    async fn member_status(&self, chat: &str, user_id: u64) -> Result<MemberStatus, PlatformError>;

    /// File id of the largest size of the user's newest profile picture.
    async fn latest_profile_photo(&self, user_id: u64) -> Result<Option<String>, PlatformError>;

    /// Send a post and return the platform message id.
    async fn send_post(&self, chat: &str, post: &OutgoingPost) -> Result<i32, PlatformError>;

    /// Replace the keyboard under a message; `None` removes it.
    async fn set_join_button(
        &self,
        chat: &str,
        message_id: i32,
        button: Option<JoinButton>,
    ) -> Result<(), PlatformError>;
}
