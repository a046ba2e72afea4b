use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcsMeta {
    pub status: String,
    #[serde(rename = "statuscode")]
    pub status_code: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl OcsMeta {
    /// OCS v1 answers 100 on success, v2 answers plain HTTP codes.
    pub fn is_ok(&self) -> bool {
        self.status_code == 100 || (200..300).contains(&self.status_code)
    }

    fn check(&self) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        Err(Error::Ocs {
            status_code: self.status_code,
            message: self.message.clone().unwrap_or_else(|| self.status.clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcsBody<T> {
    pub meta: OcsMeta,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcsEnvelope<T> {
    pub ocs: OcsBody<T>,
}

/// Unwraps `ocs.data` and decodes it as `T`.
///
/// Failure envelopes often carry an empty array as `data`, so the meta block
/// is checked before `data` is interpreted.
pub fn data<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let envelope: OcsEnvelope<Value> = serde_json::from_str(raw)?;
    envelope.ocs.meta.check()?;
    Ok(serde_json::from_value(envelope.ocs.data)?)
}
