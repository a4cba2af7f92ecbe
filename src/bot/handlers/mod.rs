pub mod callback;
pub mod message;

use std::sync::Arc;
use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    types::MessageId,
};

use crate::bot::commands::Command;
use crate::bot::messages::render;
use crate::conversation::{Conversation, Reply};
use crate::services::membership::MembershipGuard;
use crate::utils::feedback::CommandFeedback;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub conversation: Arc<Conversation>,
    pub membership: Arc<MembershipGuard>,
}

impl BotHandler {
    pub fn new(conversation: Arc<Conversation>, membership: Arc<MembershipGuard>) -> Self {
        Self { conversation, membership }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let conversation = self.conversation.clone();
        let conversation_input = self.conversation.clone();
        let conversation_callback = self.conversation.clone();
        let membership = self.membership.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let conversation = conversation.clone();
                        async move { message::command_handler(bot, msg, cmd, conversation).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let conversation = conversation_input.clone();
                async move { message::content_handler(bot, msg, conversation).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let conversation = conversation_callback.clone();
                let membership = membership.clone();
                async move { callback::callback_handler(bot, q, conversation, membership).await }
            }))
    }
}

/// Show a conversation reply to the admin, editing `edit` in place when given.
pub async fn show_reply(bot: &Bot, chat_id: ChatId, reply: &Reply, edit: Option<MessageId>) -> HandlerResult {
    let Some(rendered) = render(reply) else {
        return Ok(());
    };
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    if let Some(message_id) = edit {
        match feedback
            .update_message(message_id, rendered.kind, &rendered.text, rendered.keyboard.clone())
            .await
        {
            Ok(_) => return Ok(()),
            // Falls through to a fresh message, e.g. when the menu was a media post
            Err(e) => tracing::debug!("Could not edit message {} in {}: {}", message_id.0, chat_id.0, e),
        }
    }

    match rendered.keyboard {
        Some(keyboard) => feedback.send_with_keyboard(rendered.kind, &rendered.text, keyboard).await?,
        None => feedback.send(rendered.kind, &rendered.text).await?,
    };
    Ok(())
}
