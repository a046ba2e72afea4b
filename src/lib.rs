//! Client-side core of a Talk chat/VoIP client: server capability flags,
//! conversation permissions and the WebRTC signaling message model.

pub mod capabilities;
pub mod conversation;
pub mod error;
pub mod external_signaling;
pub mod internal_signaling;
pub mod ocs;
pub mod participant;
pub mod session;
pub mod signaling;

pub use capabilities::Capabilities;
pub use conversation::{Conversation, ConversationType, LobbyState};
pub use error::{Error, Result};
pub use participant::{InCallFlags, Participant, ParticipantType};
pub use session::SessionContext;
pub use signaling::{SignalingMessage, SignalingPayload};
