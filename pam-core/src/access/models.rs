// Access Manager wire records and the normalized grant result

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Auth key → permissions
pub type AuthKeyMap = HashMap<String, KeyData>;

/// Service response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,

    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

/// Permission bits attached to one auth key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    #[serde(rename = "r", default, deserialize_with = "flag")]
    pub read: bool,

    #[serde(rename = "w", default, deserialize_with = "flag")]
    pub write: bool,

    #[serde(rename = "m", default, deserialize_with = "flag")]
    pub manage: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

/// Per-channel or per-group entry of a multi-entity grant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysData {
    #[serde(rename = "authKeys", alias = "auths", default)]
    pub auth_keys: AuthKeyMap,
}

/// `payload` of a grant response.
///
/// `channel_groups` stays untyped: its shape depends on how many groups were
/// requested and is interpreted by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPayload {
    pub subscribe_key: String,

    pub level: String,

    pub ttl: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<HashMap<String, KeysData>>,

    #[serde(alias = "channel-groups", default, skip_serializing_if = "Option::is_none")]
    pub channel_groups: Option<Value>,

    #[serde(alias = "auths", default, skip_serializing_if = "Option::is_none")]
    pub auth_keys: Option<AuthKeyMap>,
}

/// Grant result with one shape for every response variant:
/// entity name → auth key → permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantResult {
    pub subscribe_key: String,
    pub level: String,
    pub ttl: i64,
    pub channels: HashMap<String, AuthKeyMap>,
    pub channel_groups: HashMap<String, AuthKeyMap>,
}

/// The service sends permission bits as `0`/`1`; older deployments use booleans.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}
