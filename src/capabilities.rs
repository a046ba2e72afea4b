//! Server capability document.
//!
//! The groupware server advertises what it supports as a nested object of
//! `namespace -> feature -> value`. Talk features live under the `spreed`
//! namespace. Every accessor here fails open: a missing or malformed entry
//! yields the documented default instead of an error.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ocs;

pub const DEFAULT_MESSAGE_MAX_LENGTH: u32 = 1000;
pub const DEFAULT_DESCRIPTION_LENGTH: u32 = 500;
pub const DEFAULT_ATTACHMENT_FOLDER: &str = "/Talk";

/// Feature names looked up by the predicates in this crate.
pub mod features {
    pub const LOCKED_ONE_TO_ONE_ROOMS: &str = "locked-one-to-one-rooms";
    pub const WEBINARY_LOBBY: &str = "webinary-lobby";
    pub const CHAT_READ_STATUS: &str = "chat-read-status";
    pub const CHAT_REPLIES: &str = "chat-replies";
    pub const NO_PING: &str = "no-ping";
    pub const PHONEBOOK_SEARCH: &str = "phonebook-search";
    pub const TEMP_USER_AVATAR_API: &str = "temp-user-avatar-api";
    pub const UNIFIED_SEARCH: &str = "unified-search";
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities {
    root: Value,
}

impl Capabilities {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a raw capability document. Never fails: anything that is not a
    /// JSON object is logged and treated as an empty document.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                warn!("Ignoring malformed capability document: {}", e);
                Self::empty()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        if value.is_object() {
            Self { root: value }
        } else {
            warn!("Ignoring capability document with non-object root");
            Self::empty()
        }
    }

    /// Parses the full `cloud/capabilities` OCS response and keeps
    /// `ocs.data.capabilities`.
    pub fn from_ocs_response(raw: &str) -> Self {
        match ocs::data::<Value>(raw) {
            Ok(mut data) => match data.get_mut("capabilities") {
                Some(capabilities) => Self::from_value(capabilities.take()),
                None => {
                    warn!("Capability response carries no capabilities object");
                    Self::empty()
                }
            },
            Err(e) => {
                warn!("Ignoring unusable capability response: {}", e);
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.as_object().map_or(true, serde_json::Map::is_empty)
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.root, |node, key| node.get(key))
    }

    pub fn spreed_features(&self) -> impl Iterator<Item = &str> {
        self.lookup(&["spreed", "features"])
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn has_spreed_feature(&self, name: &str) -> bool {
        self.spreed_features().any(|feature| feature == name)
    }

    pub fn message_max_length(&self) -> u32 {
        self.positive_or(
            &["spreed", "config", "chat", "max-length"],
            DEFAULT_MESSAGE_MAX_LENGTH,
        )
    }

    pub fn conversation_description_length(&self) -> u32 {
        self.positive_or(
            &["spreed", "config", "conversations", "description-length"],
            DEFAULT_DESCRIPTION_LENGTH,
        )
    }

    pub fn is_read_status_private(&self) -> bool {
        self.lookup(&["spreed", "config", "chat", "read-privacy"])
            .and_then(as_integer)
            == Some(1)
    }

    pub fn can_edit_scopes(&self) -> bool {
        self.lookup(&["provisioning_api", "AccountPropertyScopesVersion"])
            .and_then(as_integer)
            .is_some_and(|version| version > 1)
    }

    pub fn attachment_folder(&self) -> &str {
        self.lookup(&["spreed", "config", "attachments", "folder"])
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ATTACHMENT_FOLDER)
    }

    pub fn server_name(&self) -> &str {
        self.lookup(&["theming", "name"])
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn is_user_status_available(&self) -> bool {
        self.lookup(&["user_status", "enabled"])
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Servers without the `call.enabled` switch always allow calls.
    pub fn is_able_to_call(&self) -> bool {
        self.lookup(&["spreed", "config", "call", "enabled"])
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn is_avatar_endpoint_available(&self) -> bool {
        self.has_spreed_feature(features::TEMP_USER_AVATAR_API)
    }

    pub fn is_read_status_available(&self) -> bool {
        self.has_spreed_feature(features::CHAT_READ_STATUS)
    }

    pub fn is_phone_book_integration_available(&self) -> bool {
        self.has_spreed_feature(features::PHONEBOOK_SEARCH)
    }

    pub fn is_unified_search_available(&self) -> bool {
        self.has_spreed_feature(features::UNIFIED_SEARCH)
    }

    pub fn is_server_eol(&self) -> bool {
        !self.has_spreed_feature(features::NO_PING)
    }

    pub fn is_server_almost_eol(&self) -> bool {
        !self.has_spreed_feature(features::CHAT_REPLIES)
    }

    fn positive_or(&self, path: &[&str], default: u32) -> u32 {
        let value = self
            .lookup(path)
            .and_then(as_integer)
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok());
        match value {
            Some(n) => n,
            None => {
                debug!("{} missing or invalid, using {}", path.join("."), default);
                default
            }
        }
    }
}

/// Servers send numbers either as JSON numbers or as numeric strings.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Capabilities {
        Capabilities::from_value(json!({
            "spreed": {
                "features": ["audio", "video", "chat-read-status", "no-ping", "webinary-lobby"],
                "config": {
                    "attachments": {"allowed": true, "folder": "/Shared/Talk"},
                    "chat": {"max-length": 32000, "read-privacy": 1},
                    "call": {"enabled": false},
                    "conversations": {"description-length": "2000"}
                }
            },
            "provisioning_api": {"version": "1.22.0", "AccountPropertyScopesVersion": 2},
            "theming": {"name": "Cloud"},
            "user_status": {"enabled": true}
        }))
    }

    #[test]
    fn max_length_from_numeric_string() {
        let caps = Capabilities::parse(r#"{"spreed":{"config":{"chat":{"max-length":"500"}}}}"#);
        assert_eq!(caps.message_max_length(), 500);
    }

    #[test]
    fn max_length_falls_back_for_bad_values() {
        for bad in [json!(0), json!(-3), json!("abc"), json!(null), json!(1.5), json!([])] {
            let caps = Capabilities::from_value(json!({"spreed": {"config": {"chat": {"max-length": bad}}}}));
            assert_eq!(caps.message_max_length(), DEFAULT_MESSAGE_MAX_LENGTH);
        }
    }

    #[test]
    fn reads_advertised_values() {
        let caps = full();
        assert_eq!(caps.message_max_length(), 32000);
        assert_eq!(caps.conversation_description_length(), 2000);
        assert!(caps.is_read_status_private());
        assert!(caps.can_edit_scopes());
        assert_eq!(caps.attachment_folder(), "/Shared/Talk");
        assert_eq!(caps.server_name(), "Cloud");
        assert!(caps.is_user_status_available());
        assert!(!caps.is_able_to_call());
        assert!(caps.is_read_status_available());
        assert!(!caps.is_server_eol());
        assert!(caps.is_server_almost_eol());
        assert!(!caps.is_avatar_endpoint_available());
    }

    #[test]
    fn features_must_be_exact_strings() {
        let caps = Capabilities::from_value(json!({"spreed": {"features": ["audio", 7, {"x": 1}]}}));
        assert!(caps.has_spreed_feature("audio"));
        assert!(!caps.has_spreed_feature("aud"));
        assert_eq!(caps.spreed_features().count(), 1);
    }

    #[test]
    fn features_not_an_array() {
        let caps = Capabilities::from_value(json!({"spreed": {"features": "audio"}}));
        assert!(!caps.has_spreed_feature("audio"));
    }

    #[test]
    fn read_privacy_zero_is_public() {
        let caps = Capabilities::from_value(json!({"spreed": {"config": {"chat": {"read-privacy": 0}}}}));
        assert!(!caps.is_read_status_private());
    }

    #[test]
    fn scopes_version_one_is_not_editable() {
        let caps = Capabilities::from_value(json!({"provisioning_api": {"AccountPropertyScopesVersion": 1}}));
        assert!(!caps.can_edit_scopes());
    }

    #[test]
    fn empty_document_defaults() {
        let caps = Capabilities::parse("{}");
        assert!(caps.is_empty());
        assert_eq!(caps.attachment_folder(), DEFAULT_ATTACHMENT_FOLDER);
        assert_eq!(caps.server_name(), "");
        assert!(caps.is_able_to_call());
        assert!(caps.is_server_eol());
    }

    #[test]
    fn non_object_root_is_empty() {
        assert!(Capabilities::parse("[1,2]").is_empty());
        assert!(Capabilities::parse("\"spreed\"").is_empty());
    }

    #[test]
    fn unwraps_ocs_response() {
        let raw = r#"{"ocs":{"meta":{"status":"ok","statuscode":200,"message":"OK"},
            "data":{"version":{"major":27},"capabilities":{"spreed":{"features":["unified-search"]}}}}}"#;
        let caps = Capabilities::from_ocs_response(raw);
        assert!(caps.is_unified_search_available());
    }

    #[test]
    fn failed_ocs_response_is_empty() {
        let raw = r#"{"ocs":{"meta":{"status":"failure","statuscode":997,"message":"Unauthorised"},"data":[]}}"#;
        assert!(Capabilities::from_ocs_response(raw).is_empty());
    }
}
