use serde::{Deserialize, Serialize};

/// Role of an attendee inside a conversation. Unknown codes from newer
/// servers are kept verbatim instead of failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ParticipantType {
    Owner,
    Moderator,
    #[default]
    User,
    Guest,
    UserFollowingLink,
    GuestModerator,
    Unknown(u8),
}

impl From<u8> for ParticipantType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Owner,
            2 => Self::Moderator,
            3 => Self::User,
            4 => Self::Guest,
            5 => Self::UserFollowingLink,
            6 => Self::GuestModerator,
            other => Self::Unknown(other),
        }
    }
}

impl From<ParticipantType> for u8 {
    fn from(kind: ParticipantType) -> Self {
        match kind {
            ParticipantType::Owner => 1,
            ParticipantType::Moderator => 2,
            ParticipantType::User => 3,
            ParticipantType::Guest => 4,
            ParticipantType::UserFollowingLink => 5,
            ParticipantType::GuestModerator => 6,
            ParticipantType::Unknown(code) => code,
        }
    }
}

impl ParticipantType {
    pub fn is_moderator(self) -> bool {
        matches!(self, Self::Owner | Self::Moderator | Self::GuestModerator)
    }

    pub fn is_guest(self) -> bool {
        matches!(
            self,
            Self::Guest | Self::GuestModerator | Self::UserFollowingLink
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    #[default]
    Users,
    Guests,
    Emails,
    Groups,
    Circles,
    #[serde(other)]
    Other,
}

/// Bit set sent as `inCall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InCallFlags(pub u8);

impl InCallFlags {
    pub const DISCONNECTED: Self = Self(0);
    pub const IN_CALL: Self = Self(1);
    pub const WITH_AUDIO: Self = Self(2);
    pub const WITH_VIDEO: Self = Self(4);
    pub const WITH_PHONE: Self = Self(8);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_in_call(self) -> bool {
        self.contains(Self::IN_CALL)
    }

    pub fn has_audio(self) -> bool {
        self.is_in_call() && self.contains(Self::WITH_AUDIO)
    }

    pub fn has_video(self) -> bool {
        self.is_in_call() && self.contains(Self::WITH_VIDEO)
    }
}

impl std::ops::BitOr for InCallFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    pub attendee_id: u64,
    pub actor_type: ActorType,
    pub actor_id: String,
    pub display_name: String,
    pub participant_type: ParticipantType,
    pub last_ping: i64,
    pub in_call: InCallFlags,
    pub session_ids: Vec<String>,
}

impl Participant {
    pub fn is_guest(&self) -> bool {
        self.actor_type == ActorType::Guests || self.participant_type.is_guest()
    }

    pub fn is_connected(&self) -> bool {
        !self.session_ids.is_empty()
    }
}
