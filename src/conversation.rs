//! Conversation model and the permission predicates derived from it.
//!
//! Newer servers send authoritative `canLeaveConversation` /
//! `canDeleteConversation` flags. Older servers omit them and the client
//! derives the answer from the conversation type and the participant role.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::capabilities::{features, Capabilities};
use crate::error::Result;
use crate::ocs;
use crate::participant::ParticipantType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ConversationType {
    OneToOne,
    #[default]
    Group,
    Public,
    System,
    Unknown(u8),
}

impl From<u8> for ConversationType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::OneToOne,
            2 => Self::Group,
            3 => Self::Public,
            4 => Self::System,
            other => Self::Unknown(other),
        }
    }
}

impl From<ConversationType> for u8 {
    fn from(kind: ConversationType) -> Self {
        match kind {
            ConversationType::OneToOne => 1,
            ConversationType::Group => 2,
            ConversationType::Public => 3,
            ConversationType::System => 4,
            ConversationType::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum LobbyState {
    #[default]
    AllParticipants,
    ModeratorsOnly,
}

impl From<u8> for LobbyState {
    fn from(code: u8) -> Self {
        if code == 1 {
            Self::ModeratorsOnly
        } else {
            Self::AllParticipants
        }
    }
}

impl From<LobbyState> for u8 {
    fn from(state: LobbyState) -> Self {
        match state {
            LobbyState::AllParticipants => 0,
            LobbyState::ModeratorsOnly => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ReadOnlyState {
    #[default]
    ReadWrite,
    ReadOnly,
}

impl From<u8> for ReadOnlyState {
    fn from(code: u8) -> Self {
        if code == 1 {
            Self::ReadOnly
        } else {
            Self::ReadWrite
        }
    }
}

impl From<ReadOnlyState> for u8 {
    fn from(state: ReadOnlyState) -> Self {
        match state {
            ReadOnlyState::ReadWrite => 0,
            ReadOnlyState::ReadOnly => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum NotificationLevel {
    #[default]
    Default,
    Always,
    Mention,
    Never,
}

impl From<u8> for NotificationLevel {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Always,
            2 => Self::Mention,
            3 => Self::Never,
            _ => Self::Default,
        }
    }
}

impl From<NotificationLevel> for u8 {
    fn from(level: NotificationLevel) -> Self {
        match level {
            NotificationLevel::Default => 0,
            NotificationLevel::Always => 1,
            NotificationLevel::Mention => 2,
            NotificationLevel::Never => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
    pub token: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub conversation_type: ConversationType,
    pub participant_type: ParticipantType,
    pub has_password: bool,
    pub session_id: Option<String>,
    pub lobby_state: LobbyState,
    pub lobby_timer: Option<i64>,
    #[serde(rename = "readOnly")]
    pub read_only_state: ReadOnlyState,
    pub notification_level: NotificationLevel,
    pub unread_messages: u32,
    pub unread_mention: bool,
    pub last_activity: i64,
    pub is_favorite: bool,
    /// Only sent by API v1 servers, keyed by participant id.
    #[serde(deserialize_with = "map_or_list")]
    pub participants: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_leave_conversation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_delete_conversation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_start_call: Option<bool>,
}

/// PHP encodes an empty map as `[]`. List entries are keyed by position.
fn map_or_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Value>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        Map(BTreeMap<String, Value>),
        List(Vec<Value>),
    }

    Ok(match Option::<Shape>::deserialize(deserializer)? {
        Some(Shape::Map(map)) => map,
        Some(Shape::List(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        None => BTreeMap::new(),
    })
}

impl Conversation {
    pub fn list_from_ocs(raw: &str) -> Result<Vec<Conversation>> {
        ocs::data(raw)
    }

    pub fn from_ocs(raw: &str) -> Result<Conversation> {
        ocs::data(raw)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_public(&self) -> bool {
        self.conversation_type == ConversationType::Public
    }

    pub fn is_guest(&self) -> bool {
        self.participant_type.is_guest()
    }

    pub fn is_participant_owner_or_moderator(&self) -> bool {
        self.participant_type.is_moderator()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only_state == ReadOnlyState::ReadOnly
    }

    fn is_locked_one_to_one(&self, capabilities: &Capabilities) -> bool {
        self.conversation_type == ConversationType::OneToOne
            && capabilities.has_spreed_feature(features::LOCKED_ONE_TO_ONE_ROOMS)
    }

    pub fn can_moderate(&self, capabilities: &Capabilities) -> bool {
        self.is_participant_owner_or_moderator() && !self.is_locked_one_to_one(capabilities)
    }

    pub fn can_leave(&self, capabilities: &Capabilities) -> bool {
        match self.can_leave_conversation {
            Some(allowed) => allowed,
            None => {
                !self.can_moderate(capabilities)
                    || (self.conversation_type != ConversationType::OneToOne
                        && self.participant_count() > 1)
            }
        }
    }

    pub fn can_delete(&self, capabilities: &Capabilities) -> bool {
        self.can_delete_conversation
            .unwrap_or_else(|| self.can_moderate(capabilities))
    }

    /// Only group and public rooms have a lobby.
    pub fn is_lobby_view_applicable(&self, capabilities: &Capabilities) -> bool {
        matches!(
            self.conversation_type,
            ConversationType::Group | ConversationType::Public
        ) && !self.can_moderate(capabilities)
            && self.lobby_state == LobbyState::ModeratorsOnly
    }

    pub fn should_show_lobby(&self, capabilities: &Capabilities) -> bool {
        capabilities.has_spreed_feature(features::WEBINARY_LOBBY)
            && self.is_lobby_view_applicable(capabilities)
    }

    pub fn is_name_editable(&self, capabilities: &Capabilities) -> bool {
        self.can_moderate(capabilities) && self.conversation_type != ConversationType::OneToOne
    }
}
