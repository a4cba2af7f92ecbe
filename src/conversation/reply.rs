use crate::api::models::{Channel, Gift, Media};
use teloxide::types::MessageEntity;

/// A message the admin sent while a flow may be waiting for input.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Text {
        text: String,
        entities: Vec<MessageEntity>,
    },
    Media {
        media: Media,
        caption: Option<String>,
        entities: Vec<MessageEntity>,
        /// Set when the item is part of an album
        group_id: Option<String>,
    },
    /// Stickers, documents, voice notes and the like
    Other,
}

impl Incoming {
    pub fn text(text: &str) -> Self {
        Incoming::Text {
            text: text.to_string(),
            entities: Vec::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Incoming::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// What the conversation wants shown to the admin after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to show; the event was not meant for any active flow
    Ignored,
    Welcome,
    ChannelList(Vec<Channel>),
    AskChannelHandle,
    ChannelFormatError,
    /// Admin is not an administrator of the channel
    ChannelRightsError,
    /// The channel could not be resolved or inspected by the bot
    ChannelAccessError,
    GiftList(Vec<Gift>),
    NoChannelsForGift,
    AskStartPost,
    AskEndPost,
    SingleMediaOnly,
    EmptyContent,
    AskPostDate,
    DateFormatError,
    /// Channels still available for the campaign being drafted
    ChannelPicker(Vec<Channel>),
    NoChannelsSelected,
    GiftSaved,
    GiftMenu(Gift),
    EndPostSaved,
    /// The draft was incomplete; the admin has to start over
    DraftExpired,
    Failure,
}
