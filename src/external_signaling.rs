//! Frames exchanged with a standalone signaling server.
//!
//! Every frame is `{"type": <kind>, <kind>: {...}}`; the body sits under a key
//! named after the frame type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::signaling::SignalingMessage;

pub const HELLO_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloAuthParams {
    pub userid: Option<String>,
    pub ticket: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloAuth {
    pub url: String,
    pub params: HelloAuthParams,
}

/// Shared by the client request and the server reply; each side fills in
/// its own subset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HelloBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<HelloAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumeid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessionid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomBody {
    pub roomid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessionid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Endpoint {
    Session {
        sessionid: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        userid: Option<String>,
    },
    User {
        userid: String,
    },
    Room,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Endpoint>,
    pub data: Value,
}

impl MessageBody {
    /// Decodes `data` as a peer signaling message. Other payloads (chat
    /// refresh hints and the like) yield an error.
    pub fn signaling(&self) -> Result<SignalingMessage> {
        SignalingMessage::from_value(self.data.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedSession {
    pub sessionid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roomsessionid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBody {
    pub target: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<Vec<JoinedSession>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExternalFrame {
    #[serde(rename = "hello")]
    Hello { hello: HelloBody },
    #[serde(rename = "room")]
    Room { room: RoomBody },
    #[serde(rename = "message")]
    Message { message: MessageBody },
    #[serde(rename = "control")]
    Control { control: MessageBody },
    #[serde(rename = "event")]
    Event { event: EventBody },
    #[serde(rename = "bye")]
    Bye {
        #[serde(default)]
        bye: Value,
    },
    #[serde(rename = "error")]
    Error { error: ErrorBody },
}

impl ExternalFrame {
    pub fn hello_with_ticket(
        backend_url: impl Into<String>,
        userid: Option<String>,
        ticket: impl Into<String>,
    ) -> Self {
        ExternalFrame::Hello {
            hello: HelloBody {
                version: Some(HELLO_VERSION.to_string()),
                auth: Some(HelloAuth {
                    url: backend_url.into(),
                    params: HelloAuthParams {
                        userid,
                        ticket: ticket.into(),
                    },
                }),
                ..HelloBody::default()
            },
        }
    }

    pub fn resume(resumeid: impl Into<String>) -> Self {
        ExternalFrame::Hello {
            hello: HelloBody {
                version: Some(HELLO_VERSION.to_string()),
                resumeid: Some(resumeid.into()),
                ..HelloBody::default()
            },
        }
    }

    /// Joins `roomid`; an empty room id leaves the current room.
    pub fn join_room(roomid: impl Into<String>, sessionid: Option<String>) -> Self {
        ExternalFrame::Room {
            room: RoomBody {
                roomid: roomid.into(),
                sessionid,
            },
        }
    }

    /// Wraps a peer signaling message for the session named in its `to`.
    pub fn relay(message: &SignalingMessage) -> Result<Self> {
        let sessionid = message.to.clone().ok_or(Error::MissingField("to"))?;
        Ok(ExternalFrame::Message {
            message: MessageBody {
                recipient: Some(Endpoint::Session {
                    sessionid,
                    userid: None,
                }),
                sender: None,
                data: serde_json::to_value(message)?,
            },
        })
    }

    pub fn bye() -> Self {
        ExternalFrame::Bye {
            bye: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signaling::RoomType;
    use serde_json::json;

    #[test]
    fn hello_wire_shape() {
        let frame = ExternalFrame::hello_with_ticket(
            "https://cloud.example/ocs/v2.php/apps/spreed/api/v3/signaling/backend",
            Some("alice".into()),
            "ticket-1",
        );
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "hello",
                "hello": {
                    "version": "1.0",
                    "auth": {
                        "url": "https://cloud.example/ocs/v2.php/apps/spreed/api/v3/signaling/backend",
                        "params": {"userid": "alice", "ticket": "ticket-1"}
                    }
                }
            })
        );
    }

    #[test]
    fn server_hello_reply() {
        let raw = r#"{"type":"hello","hello":{"sessionid":"s-1","resumeid":"r-1","userid":"alice",
            "server":{"version":"1.0","features":["mcu"]}}}"#;
        match ExternalFrame::from_json(raw).unwrap() {
            ExternalFrame::Hello { hello } => {
                assert_eq!(hello.sessionid.as_deref(), Some("s-1"));
                assert_eq!(hello.resumeid.as_deref(), Some("r-1"));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn relays_signaling_message() {
        let join = SignalingMessage::to_peer("s-2", RoomType::Video, crate::signaling::SignalingPayload::Join);
        let frame = ExternalFrame::relay(&join).unwrap();
        let decoded = ExternalFrame::from_json(&frame.to_json().unwrap()).unwrap();
        match decoded {
            ExternalFrame::Message { message } => {
                assert_eq!(
                    message.recipient,
                    Some(Endpoint::Session {
                        sessionid: "s-2".into(),
                        userid: None
                    })
                );
                assert_eq!(message.signaling().unwrap(), join);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn relay_needs_recipient() {
        let broadcast = SignalingMessage::from_json(r#"{"type":"join"}"#).unwrap();
        assert!(matches!(
            ExternalFrame::relay(&broadcast),
            Err(Error::MissingField("to"))
        ));
    }

    #[test]
    fn room_join_event() {
        let raw = r#"{"type":"event","event":{"target":"room","type":"join",
            "join":[{"sessionid":"s-3","userid":"bob","roomsessionid":"nc-3"}]}}"#;
        match ExternalFrame::from_json(raw).unwrap() {
            ExternalFrame::Event { event } => {
                assert_eq!(event.event_type, "join");
                assert_eq!(event.join.unwrap()[0].userid.as_deref(), Some("bob"));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn error_and_bye() {
        let raw = r#"{"type":"error","error":{"code":"no_such_session","message":"The session is unknown."}}"#;
        assert!(matches!(
            ExternalFrame::from_json(raw).unwrap(),
            ExternalFrame::Error { error } if error.code == "no_such_session"
        ));
        assert_eq!(ExternalFrame::bye().to_json().unwrap(), r#"{"type":"bye","bye":{}}"#);
    }
}
