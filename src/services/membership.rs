use std::sync::Arc;

use crate::api::models::{NewMember, Registration};
use crate::api::Backend;
use crate::platform::{JoinButton, Messenger};

/// What a user sees after pressing the join button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    AlreadyRegistered,
    /// Not a member of the channel the post lives in
    NotSubscribed,
    /// Membership check or backend call failed
    TransportFailure,
}

/// The message the pressed button belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonOrigin {
    pub chat: String,
    pub message_id: i32,
}

/// A join request decoded from the button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user_id: u64,
    pub username: Option<String>,
    pub channel_handle: String,
    pub gift_id: String,
}

/// Registers participants after checking they follow the channel.
pub struct MembershipGuard {
    backend: Arc<dyn Backend>,
    messenger: Arc<dyn Messenger>,
}

impl MembershipGuard {
    pub fn new(backend: Arc<dyn Backend>, messenger: Arc<dyn Messenger>) -> Self {
        Self { backend, messenger }
    }

    pub async fn join(&self, request: &JoinRequest, origin: Option<&ButtonOrigin>) -> RegistrationOutcome {
        match self
            .messenger
            .member_status(&request.channel_handle, request.user_id)
            .await
        {
            Ok(status) if status.is_subscribed() => {}
            Ok(status) => {
                tracing::info!(
                    "User {} is {:?} in {}, refusing registration for gift {}",
                    request.user_id,
                    status,
                    request.channel_handle,
                    request.gift_id
                );
                return RegistrationOutcome::NotSubscribed;
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot check membership of {} in {}: {}",
                    request.user_id,
                    request.channel_handle,
                    e
                );
                return RegistrationOutcome::TransportFailure;
            }
        }

        let picture = match self.messenger.latest_profile_photo(request.user_id).await {
            Ok(picture) => picture,
            Err(e) => {
                tracing::debug!("No profile photo for {}: {}", request.user_id, e);
                None
            }
        };

        let member = NewMember {
            username: request.username.clone(),
            gift_id: request.gift_id.clone(),
            picture,
        };
        let outcome = match self
            .backend
            .add_member(&request.user_id.to_string(), &member)
            .await
        {
            Ok(Registration::Registered) => RegistrationOutcome::Registered,
            Ok(Registration::AlreadyRegistered) => RegistrationOutcome::AlreadyRegistered,
            Err(e) => {
                tracing::error!(
                    "Failed to register {} for gift {}: {}",
                    request.user_id,
                    request.gift_id,
                    e
                );
                return RegistrationOutcome::TransportFailure;
            }
        };

        if let Some(origin) = origin {
            self.refresh_button(request, origin).await;
        }
        outcome
    }

    /// Update the participant count under the post. Failures only get logged.
    async fn refresh_button(&self, request: &JoinRequest, origin: &ButtonOrigin) {
        let gift = match self.backend.find_gift(&request.gift_id).await {
            Ok(gift) => gift,
            Err(e) => {
                tracing::warn!("Cannot reload gift {} for button refresh: {}", request.gift_id, e);
                return;
            }
        };

        let button = JoinButton::for_gift(&request.channel_handle, &gift);
        if let Err(e) = self
            .messenger
            .set_join_button(&origin.chat, origin.message_id, Some(button))
            .await
        {
            // "message is not modified" lands here when the count is unchanged
            tracing::debug!("Join button of gift {} not refreshed: {}", request.gift_id, e);
        }
    }
}
