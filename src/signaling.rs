//! Peer-to-peer signaling messages relayed through the server.
//!
//! On the wire a message is `{from, to, type, payload, roomType, sid, prefix}`
//! where `type` decides the shape of `payload`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Video,
    Screen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    pub sdp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    /// WebRTC allows candidates without a media stream id.
    #[serde(rename = "sdpMid", default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: u32,
    pub candidate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePayload {
    pub candidate: IceCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    pub name: MediaKind,
}

/// Older servers relay the nick as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NickPayload {
    Name(String),
    Details {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        userid: Option<String>,
    },
}

impl NickPayload {
    pub fn nick(&self) -> Option<&str> {
        match self {
            NickPayload::Name(name) => Some(name),
            NickPayload::Details { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPayload {
    pub action: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseHandPayload {
    pub state: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPayload {
    pub reaction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SignalingPayload {
    #[serde(rename = "offer")]
    Offer(SessionDescription),
    #[serde(rename = "answer")]
    Answer(SessionDescription),
    #[serde(rename = "candidate")]
    Candidate(CandidatePayload),
    #[serde(rename = "join")]
    Join,
    #[serde(rename = "leave")]
    Leave,
    #[serde(rename = "mute")]
    Mute(MediaPayload),
    #[serde(rename = "unmute")]
    Unmute(MediaPayload),
    #[serde(rename = "nickChanged")]
    NickChanged(NickPayload),
    #[serde(rename = "control")]
    Control(ControlPayload),
    #[serde(rename = "unshareScreen")]
    UnshareScreen,
    #[serde(rename = "raiseHand")]
    RaiseHand(RaiseHandPayload),
    #[serde(rename = "reaction")]
    Reaction(ReactionPayload),
}

impl SignalingPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            SignalingPayload::Offer(_) => "offer",
            SignalingPayload::Answer(_) => "answer",
            SignalingPayload::Candidate(_) => "candidate",
            SignalingPayload::Join => "join",
            SignalingPayload::Leave => "leave",
            SignalingPayload::Mute(_) => "mute",
            SignalingPayload::Unmute(_) => "unmute",
            SignalingPayload::NickChanged(_) => "nickChanged",
            SignalingPayload::Control(_) => "control",
            SignalingPayload::UnshareScreen => "unshareScreen",
            SignalingPayload::RaiseHand(_) => "raiseHand",
            SignalingPayload::Reaction(_) => "reaction",
        }
    }
}

/// `sid` identifies one peer connection negotiation within a session; it is
/// not unique across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalingMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(flatten)]
    pub payload: SignalingPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl SignalingMessage {
    /// Message addressed to the `to` session with a fresh `sid`.
    pub fn to_peer(to: impl Into<String>, room_type: RoomType, payload: SignalingPayload) -> Self {
        SignalingMessage {
            from: None,
            to: Some(to.into()),
            payload,
            room_type: Some(room_type),
            sid: Some(Uuid::new_v4().to_string()),
            prefix: None,
        }
    }

    pub fn offer(to: impl Into<String>, sdp: impl Into<String>, nick: Option<String>) -> Self {
        Self::to_peer(
            to,
            RoomType::Video,
            SignalingPayload::Offer(SessionDescription {
                sdp_type: SdpType::Offer,
                sdp: sdp.into(),
                nick,
            }),
        )
    }

    /// Answers keep the `sid` of the offer they reply to.
    pub fn answer(offer: &SignalingMessage, sdp: impl Into<String>, nick: Option<String>) -> Self {
        SignalingMessage {
            from: None,
            to: offer.from.clone(),
            payload: SignalingPayload::Answer(SessionDescription {
                sdp_type: SdpType::Answer,
                sdp: sdp.into(),
                nick,
            }),
            room_type: offer.room_type,
            sid: offer.sid.clone(),
            prefix: offer.prefix.clone(),
        }
    }

    pub fn candidate(to: impl Into<String>, room_type: RoomType, sid: Option<String>, candidate: IceCandidate) -> Self {
        let mut message = Self::to_peer(
            to,
            room_type,
            SignalingPayload::Candidate(CandidatePayload { candidate }),
        );
        if sid.is_some() {
            message.sid = sid;
        }
        message
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn kind(&self) -> &'static str {
        self.payload.kind()
    }

    /// Messages without `to` are broadcast to every session in the room.
    pub fn is_addressed_to(&self, session_id: &str) -> bool {
        self.to.as_deref().map_or(true, |to| to == session_id)
    }
}
