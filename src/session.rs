//! State of the conversation the user is currently in.
//!
//! A `SessionContext` is created per server account and passed to whoever
//! needs it. Joining a room fills it, leaving clears it.

use log::{debug, info};

use crate::capabilities::Capabilities;
use crate::conversation::Conversation;
use crate::participant::InCallFlags;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentRoom {
    pub conversation: Conversation,
    pub session_id: String,
    pub call_flags: InCallFlags,
}

impl CurrentRoom {
    pub fn token(&self) -> &str {
        &self.conversation.token
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    capabilities: Capabilities,
    current: Option<CurrentRoom>,
}

impl SessionContext {
    pub fn new(capabilities: Capabilities) -> Self {
        SessionContext {
            capabilities,
            current: None,
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn current(&self) -> Option<&CurrentRoom> {
        self.current.as_ref()
    }

    /// Enters `conversation`. A room that is still joined is dropped first.
    pub fn join(&mut self, conversation: Conversation, session_id: impl Into<String>) -> &CurrentRoom {
        if let Some(previous) = self.current.take() {
            info!(
                "Joining {} replaces still-joined room {}",
                conversation.token,
                previous.token()
            );
        }
        let session_id = session_id.into();
        debug!("Joined {} with session {}", conversation.token, session_id);
        self.current.insert(CurrentRoom {
            conversation,
            session_id,
            call_flags: InCallFlags::DISCONNECTED,
        })
    }

    pub fn leave(&mut self) -> Option<CurrentRoom> {
        let left = self.current.take();
        if let Some(room) = &left {
            debug!("Left {}", room.token());
        }
        left
    }

    pub fn is_in_conversation(&self, token: &str) -> bool {
        self.current.as_ref().is_some_and(|room| room.token() == token)
    }

    /// Returns false when no room is joined.
    pub fn set_call_flags(&mut self, flags: InCallFlags) -> bool {
        match self.current.as_mut() {
            Some(room) => {
                room.call_flags = flags;
                true
            }
            None => false,
        }
    }

    pub fn is_in_call(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|room| room.call_flags.is_in_call())
    }

    pub fn is_moderator(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|room| room.conversation.can_moderate(&self.capabilities))
    }
}
