use dashmap::DashMap;
use std::fmt;

/// What the bot currently expects from one admin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    WaitChannel,
    WaitStartPost,
    WaitStartPostDate,
    WaitStartPostChannels,
    WaitEndPost { gift_id: String },
    WaitEndPostDate { gift_id: String },
}

impl ConversationState {
    pub fn label(&self) -> &'static str {
        match self {
            ConversationState::Idle => "IDLE",
            ConversationState::WaitChannel => "WAIT_CHANNEL",
            ConversationState::WaitStartPost => "WAIT_START_POST",
            ConversationState::WaitStartPostDate => "WAIT_START_POST_DATE",
            ConversationState::WaitStartPostChannels => "WAIT_START_POST_CHANNELS",
            ConversationState::WaitEndPost { .. } => "WAIT_END_POST",
            ConversationState::WaitEndPostDate { .. } => "WAIT_END_POST_DATE",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationState::Idle)
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-admin conversation state, kept in memory only.
///
/// An entry is created on an admin's first transition and is only touched by
/// that admin's events. Going back to idle removes it.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<u64, ConversationState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, admin_id: u64) -> ConversationState {
        self.sessions
            .get(&admin_id)
            .map(|s| s.value().clone())
            .unwrap_or_default()
    }

    /// Store the new state and return the previous one.
    pub fn set(&self, admin_id: u64, state: ConversationState) -> ConversationState {
        let previous = if state.is_idle() {
            self.sessions.remove(&admin_id).map(|(_, s)| s)
        } else {
            self.sessions.insert(admin_id, state)
        };
        previous.unwrap_or_default()
    }

    pub fn reset(&self, admin_id: u64) -> ConversationState {
        self.set(admin_id, ConversationState::Idle)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
