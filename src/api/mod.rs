//! Backend REST service that durably stores admins, channels, campaigns and
//! members. Calls that act on behalf of a user carry the caller identity.

pub mod client;
pub mod models;

use async_trait::async_trait;
use crate::error::ApiError;
use models::*;

pub use client::ApiClient;

/// Header carrying the opaque caller identity.
pub const CALLER_HEADER: &str = "X-Telegram-Id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn create_admin(&self, caller: &str, admin: &NewAdmin) -> Result<(), ApiError>;

    async fn list_channels(&self, caller: &str) -> Result<Vec<Channel>, ApiError>;

    async fn add_channel(&self, caller: &str, channel: &Channel) -> Result<(), ApiError>;

    async fn delete_channel(&self, caller: &str, channel_id: &str) -> Result<(), ApiError>;

    async fn list_gifts(&self, caller: &str) -> Result<Vec<Gift>, ApiError>;

    /// Fetch one campaign; not scoped to a caller.
    async fn find_gift(&self, gift_id: &str) -> Result<Gift, ApiError>;

    async fn create_gift(&self, caller: &str, gift: &NewGift) -> Result<(), ApiError>;

    async fn update_gift(&self, gift_id: &str, patch: &GiftPatch) -> Result<(), ApiError>;

    /// Campaigns whose start post is awaiting and whose start time has passed.
    async fn due_for_start(&self) -> Result<Vec<Gift>, ApiError>;

    /// Campaigns whose end post is awaiting and whose end time has passed.
    async fn due_for_end(&self) -> Result<Vec<Gift>, ApiError>;

    /// Atomically move one post of a campaign from `AWAITING` to
    /// `PUBLISHING`. Returns `false` when somebody else already did.
    async fn claim_post(&self, gift_id: &str, post: PostKind) -> Result<bool, ApiError>;

    async fn add_member(&self, caller: &str, member: &NewMember) -> Result<Registration, ApiError>;
}
