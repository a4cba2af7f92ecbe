//! Ephemeral per-admin draft fields.
//!
//! A drafting flow writes the post it is collecting field by field and reads
//! everything back once the admin finishes. Fields are plain strings keyed by
//! `"{admin}:{side}_post_{field}"`; structured values (formatting spans) are
//! stored as JSON text. A missing key means "no media" or "empty list".

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use teloxide::types::MessageEntity;

use crate::api::models::{Media, MediaKind, PostContent, PostKind};
use crate::error::DraftError;

pub use memory::InMemoryDraftStore;
pub use sqlite::SqliteDraftStore;

/// Narrow key/value capability the conversation needs from its scratch store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), DraftError>;

    async fn get(&self, key: &str) -> Result<Option<String>, DraftError>;

    /// Removes the key whether it holds a value or a list.
    async fn delete(&self, key: &str) -> Result<(), DraftError>;

    async fn append(&self, key: &str, value: &str) -> Result<(), DraftError>;

    async fn read_list(&self, key: &str) -> Result<Vec<String>, DraftError>;
}

/// One field of a drafted post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Content,
    ContentEntities,
    Media,
    MediaType,
    Date,
    Channels,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Content,
        DraftField::ContentEntities,
        DraftField::Media,
        DraftField::MediaType,
        DraftField::Date,
        DraftField::Channels,
    ];

    fn suffix(self) -> &'static str {
        match self {
            DraftField::Content => "content",
            DraftField::ContentEntities => "content_entities",
            DraftField::Media => "media",
            DraftField::MediaType => "media_type",
            DraftField::Date => "date",
            DraftField::Channels => "channels",
        }
    }
}

pub fn draft_key(admin_id: u64, side: PostKind, field: DraftField) -> String {
    format!("{}:{}_post_{}", admin_id, side.as_str(), field.suffix())
}

/// Everything read back from the store for one post side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    pub content: PostContent,
    pub date: Option<DateTime<Utc>>,
    pub channels: Vec<String>,
}

/// Typed access to draft fields on top of any [`DraftStore`].
#[derive(Clone)]
pub struct Drafts {
    store: Arc<dyn DraftStore>,
}

impl Drafts {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self { store }
    }

    /// Wipe every field of one post side. The other side is left alone.
    pub async fn clear_side(&self, admin_id: u64, side: PostKind) -> Result<(), DraftError> {
        for field in DraftField::ALL {
            self.store.delete(&draft_key(admin_id, side, field)).await?;
        }
        Ok(())
    }

    pub async fn store_content(
        &self,
        admin_id: u64,
        side: PostKind,
        content: &PostContent,
    ) -> Result<(), DraftError> {
        let key = |field| draft_key(admin_id, side, field);

        self.store.set(&key(DraftField::Content), &content.text).await?;
        let entities = serde_json::to_string(&content.entities)?;
        self.store.set(&key(DraftField::ContentEntities), &entities).await?;

        match &content.media {
            Some(media) => {
                self.store.set(&key(DraftField::Media), &media.file_id).await?;
                self.store.set(&key(DraftField::MediaType), media.kind.as_str()).await?;
            }
            None => {
                self.store.delete(&key(DraftField::Media)).await?;
                self.store.delete(&key(DraftField::MediaType)).await?;
            }
        }
        Ok(())
    }

    pub async fn store_date(
        &self,
        admin_id: u64,
        side: PostKind,
        date: DateTime<Utc>,
    ) -> Result<(), DraftError> {
        self.store
            .set(&draft_key(admin_id, side, DraftField::Date), &date.to_rfc3339())
            .await
    }

    /// Append one channel to the start-post selection. Duplicates are kept.
    pub async fn push_channel(&self, admin_id: u64, channel_id: &str) -> Result<(), DraftError> {
        self.store
            .append(&draft_key(admin_id, PostKind::Start, DraftField::Channels), channel_id)
            .await
    }

    pub async fn selected_channels(&self, admin_id: u64) -> Result<Vec<String>, DraftError> {
        self.store
            .read_list(&draft_key(admin_id, PostKind::Start, DraftField::Channels))
            .await
    }

    pub async fn load(&self, admin_id: u64, side: PostKind) -> Result<Draft, DraftError> {
        let key = |field| draft_key(admin_id, side, field);

        let text = self.store.get(&key(DraftField::Content)).await?.unwrap_or_default();

        let entities: Vec<MessageEntity> = match self.store.get(&key(DraftField::ContentEntities)).await? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        let media_id = self.store.get(&key(DraftField::Media)).await?;
        let media_kind = match self.store.get(&key(DraftField::MediaType)).await? {
            Some(raw) => Some(raw.parse::<MediaKind>().map_err(|_| DraftError::InvalidValue {
                key: key(DraftField::MediaType),
                value: raw.clone(),
            })?),
            None => None,
        };
        let media = match (media_id, media_kind) {
            (Some(file_id), Some(kind)) => Some(Media { file_id, kind }),
            _ => None,
        };

        let date = match self.store.get(&key(DraftField::Date)).await? {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|_| DraftError::InvalidValue {
                        key: key(DraftField::Date),
                        value: raw.clone(),
                    })?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        let channels = self.store.read_list(&key(DraftField::Channels)).await?;

        Ok(Draft {
            content: PostContent { text, entities, media },
            date,
            channels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_draft_keys_are_namespaced_per_admin_and_side() {
        assert_eq!(draft_key(42, PostKind::Start, DraftField::Content), "42:start_post_content");
        assert_eq!(
            draft_key(42, PostKind::End, DraftField::ContentEntities),
            "42:end_post_content_entities"
        );
        assert_eq!(draft_key(7, PostKind::Start, DraftField::Channels), "7:start_post_channels");
    }

    #[tokio::test]
    async fn test_clear_side_deletes_exactly_that_sides_keys() {
        let mut store = MockDraftStore::new();
        for field in DraftField::ALL {
            store
                .expect_delete()
                .with(eq(draft_key(5, PostKind::End, field)))
                .times(1)
                .returning(|_| Ok(()));
        }
        let drafts = Drafts::new(Arc::new(store));

        drafts.clear_side(5, PostKind::End).await.expect("clear");
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_media_kind() {
        let store = InMemoryDraftStore::new();
        store.set("1:start_post_media", "file").await.expect("set");
        store.set("1:start_post_media_type", "AUDIO").await.expect("set");
        let drafts = Drafts::new(Arc::new(store));

        let err = drafts.load(1, PostKind::Start).await.unwrap_err();
        assert!(matches!(err, DraftError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn test_missing_fields_mean_no_media_and_no_channels() {
        let drafts = Drafts::new(Arc::new(InMemoryDraftStore::new()));

        let draft = drafts.load(1, PostKind::Start).await.expect("load");
        assert_eq!(draft, Draft::default());
    }
}
