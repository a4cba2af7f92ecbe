use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use teloxide::types::MessageEntity;

/// Body of `POST /admin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmin {
    pub username: Option<String>,
}

/// A channel an admin publishes campaigns into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Numeric platform chat id, kept as a string like the backend does
    pub id: String,
    /// Public handle including the leading `@`
    pub channelname: String,
}

/// Publication state of one side (start or end) of a campaign.
///
/// Declaration order is the lifecycle order; a status only ever moves to a
/// later variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PostStatus {
    #[serde(rename = "AWAITING")]
    Awaiting,
    #[serde(rename = "PUBLISHING")]
    Publishing,
    #[serde(rename = "PUBLISH", alias = "PUBLISHED")]
    Published,
}

/// Overall campaign state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GiftStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "COMPLETED")]
    Completed,
}

/// Kind of attachment carried by a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "PHOTO")]
    Photo,
    #[serde(rename = "VIDEO")]
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "PHOTO",
            MediaKind::Video => "VIDEO",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHOTO" => Ok(MediaKind::Photo),
            "VIDEO" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind '{other}'")),
        }
    }
}

/// Which of the two posts of a campaign an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostKind {
    #[serde(rename = "START")]
    Start,
    #[serde(rename = "END")]
    End,
}

impl PostKind {
    /// Prefix used for draft keys and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Start => "start",
            PostKind::End => "end",
        }
    }
}

/// Attachment reference of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub file_id: String,
    pub kind: MediaKind,
}

/// Everything needed to render one post, independent of where it goes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostContent {
    pub text: String,
    pub entities: Vec<MessageEntity>,
    pub media: Option<Media>,
}

fn media_of(file_id: &Option<String>, kind: Option<MediaKind>) -> Option<Media> {
    match (file_id, kind) {
        (Some(file_id), Some(kind)) if !file_id.is_empty() => Some(Media {
            file_id: file_id.clone(),
            kind,
        }),
        _ => None,
    }
}

/// A registered participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub telegram_id: Option<String>,
    pub username: Option<String>,
    pub picture: Option<String>,
    pub gift_id: Option<String>,
}

/// Body of `POST /member`; the participant identity travels in the caller header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub username: Option<String>,
    pub gift_id: String,
    pub picture: Option<String>,
}

/// A giveaway campaign as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: String,

    #[serde(default)]
    pub start_post_media: Option<String>,
    #[serde(default)]
    pub start_post_content: Option<String>,
    #[serde(default)]
    pub start_post_content_entities: Option<Vec<MessageEntity>>,
    #[serde(default)]
    pub start_post_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_post_status: Option<PostStatus>,
    #[serde(default)]
    pub start_post_media_type: Option<MediaKind>,
    #[serde(default)]
    pub start_message_id: Option<String>,
    /// Start message id per channel id
    #[serde(default)]
    pub start_messages: Option<BTreeMap<String, i32>>,

    #[serde(default)]
    pub end_post_media: Option<String>,
    #[serde(default)]
    pub end_post_content: Option<String>,
    #[serde(default)]
    pub end_post_content_entities: Option<Vec<MessageEntity>>,
    #[serde(default)]
    pub end_post_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_post_status: Option<PostStatus>,
    #[serde(default)]
    pub end_post_media_type: Option<MediaKind>,

    #[serde(default)]
    pub status: Option<GiftStatus>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub admin_id: Option<String>,
}

impl Gift {
    pub fn start_post(&self) -> PostContent {
        PostContent {
            text: self.start_post_content.clone().unwrap_or_default(),
            entities: self.start_post_content_entities.clone().unwrap_or_default(),
            media: media_of(&self.start_post_media, self.start_post_media_type),
        }
    }

    /// `None` until the admin has drafted an end post.
    pub fn end_post(&self) -> Option<PostContent> {
        let text = self.end_post_content.as_ref().filter(|t| !t.is_empty())?;
        Some(PostContent {
            text: text.clone(),
            entities: self.end_post_content_entities.clone().unwrap_or_default(),
            media: media_of(&self.end_post_media, self.end_post_media_type),
        })
    }

    pub fn has_end_post(&self) -> bool {
        self.end_post().is_some()
    }

    pub fn participant_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_active(&self) -> bool {
        self.status != Some(GiftStatus::Completed)
    }

    /// Message id of the start post in `channel_id`.
    ///
    /// Message ids are only meaningful inside their own chat, so the single
    /// campaign-wide id is used only for records without a per-channel map.
    pub fn start_message_in(&self, channel_id: &str) -> Option<i32> {
        match &self.start_messages {
            Some(messages) => messages.get(channel_id).copied(),
            None => self.start_message_id.as_deref().and_then(|id| id.parse().ok()),
        }
    }
}

/// Body of `POST /gift`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGift {
    pub start_post_media: Option<String>,
    pub start_post_content: String,
    pub start_post_date: DateTime<Utc>,
    pub start_post_content_entities: Vec<MessageEntity>,
    pub start_post_media_type: Option<MediaKind>,
    pub start_post_status: PostStatus,
    pub status: GiftStatus,
    pub channels: Vec<String>,
}

/// Body of `PATCH /gift/{id}`; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_messages: Option<BTreeMap<String, i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_post_status: Option<PostStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_post_media: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_post_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_post_content_entities: Option<Vec<MessageEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_post_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_post_media_type: Option<Option<MediaKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_post_status: Option<PostStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GiftStatus>,
}

impl GiftPatch {
    /// Patch recording a finished start-post dispatch.
    pub fn start_published(first_message_id: Option<i32>, per_channel: BTreeMap<String, i32>) -> Self {
        Self {
            start_message_id: first_message_id.map(|id| id.to_string()),
            start_messages: Some(per_channel),
            start_post_status: Some(PostStatus::Published),
            ..Self::default()
        }
    }

    /// Patch recording a finished end-post dispatch. The campaign completes in
    /// the same write as the end post is marked published.
    pub fn end_published() -> Self {
        Self {
            end_post_status: Some(PostStatus::Published),
            status: Some(GiftStatus::Completed),
            ..Self::default()
        }
    }

    /// Patch merging a drafted end post into an existing campaign.
    pub fn end_post(content: PostContent, date: DateTime<Utc>) -> Self {
        let (media, kind) = match content.media {
            Some(media) => (Some(media.file_id), Some(media.kind)),
            None => (None, None),
        };
        Self {
            end_post_media: Some(media),
            end_post_content: Some(content.text),
            end_post_content_entities: Some(content.entities),
            end_post_date: Some(date),
            end_post_media_type: Some(kind),
            end_post_status: Some(PostStatus::Awaiting),
            ..Self::default()
        }
    }
}

/// Body of `POST /gift/{id}/claim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimRequest {
    pub post: PostKind,
    pub from: PostStatus,
    pub to: PostStatus,
}

/// What the backend said about a member registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered,
    AlreadyRegistered,
}
