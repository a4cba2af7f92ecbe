use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use crate::api::models::{Channel, Gift, PostKind};
use crate::platform::{JoinButton, Messenger, OutgoingPost};

/// One channel that received the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub channel_id: String,
    pub message_id: i32,
}

/// One channel that still failed after all retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelivery {
    pub channel: String,
    pub error: String,
}

/// Outcome of sending one post to every target channel, in channel order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<Delivery>,
    pub failed: Vec<FailedDelivery>,
}

impl DeliveryReport {
    /// Message id of the first channel that got the post.
    pub fn first_message_id(&self) -> Option<i32> {
        self.delivered.first().map(|d| d.message_id)
    }

    pub fn message_map(&self) -> BTreeMap<String, i32> {
        self.delivered
            .iter()
            .map(|d| (d.channel_id.clone(), d.message_id))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends campaign posts to their channels.
pub struct PublicationDispatcher {
    messenger: Arc<dyn Messenger>,
    retries: usize,
    backoff_base_ms: u64,
}

impl PublicationDispatcher {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self {
            messenger,
            retries: 3,
            backoff_base_ms: 250,
        }
    }

    /// Override the retry policy; `retries` counts attempts after the first.
    pub fn with_retry(mut self, retries: usize, backoff_base_ms: u64) -> Self {
        self.retries = retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// The post sent to `channel`: start posts carry the join button with
    /// the current participant count, end posts carry nothing.
    pub fn post_for(gift: &Gift, kind: PostKind, channel: &Channel) -> Option<OutgoingPost> {
        match kind {
            PostKind::Start => Some(OutgoingPost {
                content: gift.start_post(),
                button: Some(JoinButton::for_gift(&channel.channelname, gift)),
            }),
            PostKind::End => gift.end_post().map(|content| OutgoingPost { content, button: None }),
        }
    }

    /// Send one side of `gift` to all of its channels. Each channel is retried
    /// on its own, so a flaky channel never causes a resend elsewhere.
    pub async fn publish(&self, gift: &Gift, kind: PostKind) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for channel in &gift.channels {
            let Some(post) = Self::post_for(gift, kind, channel) else {
                report.failed.push(FailedDelivery {
                    channel: channel.channelname.clone(),
                    error: "no content for this post".to_string(),
                });
                continue;
            };

            match self.send_with_retry(&channel.channelname, &post).await {
                Ok(message_id) => {
                    tracing::debug!(
                        "Sent {} post of gift {} to {} as message {}",
                        kind.as_str(),
                        gift.id,
                        channel.channelname,
                        message_id
                    );
                    report.delivered.push(Delivery {
                        channel_id: channel.id.clone(),
                        message_id,
                    });
                }
                Err(error) => {
                    tracing::error!(
                        "Failed to send {} post of gift {} to {}: {}",
                        kind.as_str(),
                        gift.id,
                        channel.channelname,
                        error
                    );
                    report.failed.push(FailedDelivery {
                        channel: channel.channelname.clone(),
                        error,
                    });
                }
            }
        }

        report
    }

    async fn send_with_retry(&self, chat: &str, post: &OutgoingPost) -> Result<i32, String> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.backoff_base_ms)
            .max_delay(Duration::from_secs(10))
            .take(self.retries);

        Retry::spawn(strategy, || self.messenger.send_post(chat, post))
            .await
            .map_err(|e| e.to_string())
    }
}
