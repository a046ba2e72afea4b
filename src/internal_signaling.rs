//! Signaling relayed by the groupware server itself (no standalone
//! signaling server). Peers poll for pending items and post outgoing
//! messages as JSON strings.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::ocs;
use crate::participant::InCallFlags;
use crate::signaling::SignalingMessage;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomUser {
    pub session_id: String,
    pub user_id: String,
    pub room_id: u64,
    pub in_call: InCallFlags,
    pub last_ping: i64,
    pub participant_permissions: u32,
}

#[derive(Deserialize)]
struct RawSignal {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalSignal {
    UsersInRoom(Vec<RoomUser>),
    /// The peer message arrives JSON-encoded inside a string.
    Message(String),
    /// Item kinds this client does not act on, such as typing hints.
    Other(String),
}

/// A malformed known item is logged and kept as `Other` so that it cannot
/// fail the rest of the poll.
impl<'de> Deserialize<'de> for InternalSignal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawSignal::deserialize(deserializer)?;
        let decoded = match raw.kind.as_str() {
            "usersInRoom" => serde_json::from_value(raw.data).map(InternalSignal::UsersInRoom),
            "message" => serde_json::from_value(raw.data).map(InternalSignal::Message),
            _ => return Ok(InternalSignal::Other(raw.kind)),
        };
        Ok(decoded.unwrap_or_else(|e| {
            warn!("Skipping malformed {} signaling item: {}", raw.kind, e);
            InternalSignal::Other(raw.kind)
        }))
    }
}

impl InternalSignal {
    pub fn list_from_ocs(raw: &str) -> Result<Vec<InternalSignal>> {
        ocs::data(raw)
    }

    /// `None` for items that carry no peer message.
    pub fn decode_message(&self) -> Option<Result<SignalingMessage>> {
        match self {
            InternalSignal::Message(encoded) => Some(SignalingMessage::from_json(encoded)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingSignal {
    pub ev: String,
    #[serde(rename = "fn")]
    pub encoded: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

impl OutgoingSignal {
    pub fn new(message: &SignalingMessage, session_id: impl Into<String>) -> Result<Self> {
        Ok(OutgoingSignal {
            ev: "message".to_string(),
            encoded: message.to_json()?,
            session_id: session_id.into(),
        })
    }

    /// Form value for the `messages` field of a signaling POST.
    pub fn encode_batch(signals: &[OutgoingSignal]) -> Result<String> {
        Ok(serde_json::to_string(signals)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signaling::{RoomType, SignalingPayload};

    #[test]
    fn decodes_pull_response() {
        let raw = r#"{"ocs":{"meta":{"status":"ok","statuscode":200,"message":"OK"},"data":[
            {"type":"usersInRoom","data":[{"inCall":3,"lastPing":1700000000,"roomId":4,
              "sessionId":"s-1","userId":"alice","participantPermissions":254}]},
            {"type":"message","data":"{\"from\":\"s-1\",\"to\":\"s-2\",\"type\":\"unshareScreen\",\"roomType\":\"screen\"}"},
            {"type":"startedTyping","data":{}}
        ]}}"#;
        let signals = InternalSignal::list_from_ocs(raw).unwrap();
        assert_eq!(signals.len(), 3);
        match &signals[0] {
            InternalSignal::UsersInRoom(users) => {
                assert_eq!(users[0].user_id, "alice");
                assert!(users[0].in_call.has_audio());
            }
            other => panic!("unexpected signal: {other:?}"),
        }
        let message = signals[1].decode_message().unwrap().unwrap();
        assert_eq!(message.payload, SignalingPayload::UnshareScreen);
        assert_eq!(message.room_type, Some(RoomType::Screen));
        assert_eq!(signals[2], InternalSignal::Other("startedTyping".into()));
        assert!(signals[2].decode_message().is_none());
    }

    #[test]
    fn malformed_known_item_does_not_fail_poll() {
        let raw = r#"{"ocs":{"meta":{"status":"ok","statuscode":200,"message":"OK"},"data":[
            {"type":"usersInRoom","data":[{"inCall":true,"sessionId":"s-1","userId":"alice"}]},
            {"type":"message","data":{"not":"a string"}},
            {"type":"message","data":"{\"type\":\"leave\"}"}
        ]}}"#;
        let signals = InternalSignal::list_from_ocs(raw).unwrap();
        assert_eq!(signals[0], InternalSignal::Other("usersInRoom".into()));
        assert_eq!(signals[1], InternalSignal::Other("message".into()));
        let leave = signals[2].decode_message().unwrap().unwrap();
        assert_eq!(leave.payload, SignalingPayload::Leave);
    }

    #[test]
    fn outgoing_batch_embeds_message_as_string() {
        let message = SignalingMessage::to_peer("s-2", RoomType::Video, SignalingPayload::Leave);
        let signal = OutgoingSignal::new(&message, "s-1").unwrap();
        let batch = OutgoingSignal::encode_batch(&[signal]).unwrap();

        let decoded: Vec<serde_json::Value> = serde_json::from_str(&batch).unwrap();
        assert_eq!(decoded[0]["ev"], "message");
        assert_eq!(decoded[0]["sessionId"], "s-1");
        let inner = SignalingMessage::from_json(decoded[0]["fn"].as_str().unwrap()).unwrap();
        assert_eq!(inner, message);
    }
}
