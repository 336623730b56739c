//! Grant: signed permission requests and normalization of their responses.
//!
//! The service answers a grant with different JSON shapes depending on how
//! many channels and channel groups were requested. [`normalize_grant_response`]
//! folds all of them into a single [`GrantResult`] layout.

use super::models::{AuthKeyMap, Envelope, GrantPayload, GrantResult, KeysData};
use super::params::QueryParams;
use super::signature::{build_sign_input, sign_sha256};
use crate::error::{PamError, PamResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Operation name signed into every grant request
pub const GRANT_OPERATION: &str = "grant";

/// What to grant, to whom, and for how long
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantRequest {
    pub read: bool,
    pub write: bool,
    pub manage: bool,
    /// Minutes until expiry; `-1` never expires, `None` uses the service default
    pub ttl: Option<i64>,
    pub auth_keys: Vec<String>,
    pub channels: Vec<String>,
    pub channel_groups: Vec<String>,
}

/// Keys involved in signing a request
#[derive(Debug, Clone, Copy)]
pub struct SigningKeys<'a> {
    pub subscribe_key: &'a str,
    pub publish_key: &'a str,
    pub secret_key: Option<&'a str>,
}

impl GrantRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    pub fn manage(mut self, manage: bool) -> Self {
        self.manage = manage;
        self
    }

    pub fn ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn auth_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn channel_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channel_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Signed parameters for this grant, starting from an empty set.
    pub fn build_params(&self, keys: SigningKeys<'_>, timestamp: i64) -> PamResult<QueryParams> {
        self.sign_params(QueryParams::new(), keys, timestamp)
    }

    /// Add the grant parameters to `params` and sign everything in it.
    ///
    /// Parameters already present in `params` are part of the signature;
    /// `signature` itself is appended last.
    pub fn sign_params(
        &self,
        mut params: QueryParams,
        keys: SigningKeys<'_>,
        timestamp: i64,
    ) -> PamResult<QueryParams> {
        let secret_key = keys
            .secret_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| PamError::signing("secret key is required to sign a grant"))?;

        params.insert("timestamp", timestamp.to_string());

        if !self.channels.is_empty() {
            params.insert("channel", self.channels.join(","));
        }
        if !self.channel_groups.is_empty() {
            params.insert("channel-group", self.channel_groups.join(","));
        }
        if !self.auth_keys.is_empty() {
            params.insert("auth", self.auth_keys.join(","));
        }
        if let Some(ttl) = self.ttl.filter(|ttl| *ttl >= -1) {
            params.insert("ttl", ttl.to_string());
        }

        params.insert("r", bit(self.read));
        params.insert("w", bit(self.write));
        params.insert("m", bit(self.manage));

        let sign_input = build_sign_input(
            keys.subscribe_key,
            keys.publish_key,
            GRANT_OPERATION,
            &params.canonical_string(),
        );
        // Auth keys are credentials; only parameter names reach the log.
        let signed_names = params.iter().map(|(name, _)| name).collect::<Vec<_>>().join(",");
        trace!(params = %signed_names, input_len = sign_input.len(), "Computed grant sign input");

        let signature = sign_sha256(secret_key, &sign_input)?;
        params.insert("signature", signature);

        debug!(
            channels = self.channels.len(),
            channel_groups = self.channel_groups.len(),
            auth_keys = self.auth_keys.len(),
            "Grant parameters signed"
        );
        Ok(params)
    }
}

fn bit(flag: bool) -> &'static str {
    if flag {
        "1"
    } else {
        "0"
    }
}

/// The `channelGroups` field of a grant payload, resolved by request cardinality
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelGroupsField {
    /// No groups requested
    None,
    /// One group requested; permissions sit in the payload's top-level `authKeys`
    Single(String),
    /// Several groups requested; each carries its own `authKeys`
    Multiple(HashMap<String, KeysData>),
}

impl ChannelGroupsField {
    /// Interpret `raw` according to how many groups the request named.
    pub fn resolve(raw: Option<&Value>, requested: usize) -> PamResult<Self> {
        match requested {
            0 => Ok(ChannelGroupsField::None),
            1 => match raw {
                Some(Value::String(name)) => Ok(ChannelGroupsField::Single(name.clone())),
                other => Err(PamError::response_parsing(format!(
                    "expected a channel group name, got {}",
                    describe(other)
                ))),
            },
            _ => {
                let value = raw.ok_or_else(|| {
                    PamError::response_parsing("channel group permissions missing from payload")
                })?;
                let groups = HashMap::<String, KeysData>::deserialize(value)
                    .map_err(|e| PamError::from_decode("channel group permissions", e))?;
                Ok(ChannelGroupsField::Multiple(groups))
            }
        }
    }
}

fn describe(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "nothing",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}

/// Fold a decoded grant response into a [`GrantResult`].
///
/// `requested_groups` are the channel groups named in the request; the
/// response shape cannot be told apart without them.
pub fn normalize_grant_response(
    envelope: Option<Envelope<GrantPayload>>,
    requested_groups: &[String],
) -> PamResult<GrantResult> {
    let data = envelope
        .and_then(|envelope| envelope.payload)
        .ok_or_else(|| PamError::response_parsing("grant response carries no payload"))?;

    let shared_keys: AuthKeyMap = data.auth_keys.clone().unwrap_or_default();
    let mut channels: HashMap<String, AuthKeyMap> = HashMap::new();
    let mut channel_groups: HashMap<String, AuthKeyMap> = HashMap::new();

    // single channel
    if let Some(channel) = &data.channel {
        channels.insert(channel.clone(), shared_keys.clone());
    }

    match ChannelGroupsField::resolve(data.channel_groups.as_ref(), requested_groups.len())? {
        ChannelGroupsField::None => {}
        ChannelGroupsField::Single(name) => {
            channel_groups.insert(name, shared_keys);
        }
        ChannelGroupsField::Multiple(groups) => {
            for (name, keys) in groups {
                channel_groups.insert(name, keys.auth_keys);
            }
        }
    }

    // Multi-channel entries overwrite the single-channel one on a name clash.
    if let Some(entries) = data.channels {
        for (name, keys) in entries {
            channels.insert(name, keys.auth_keys);
        }
    }

    debug!(
        level = %data.level,
        channels = channels.len(),
        channel_groups = channel_groups.len(),
        "Grant response normalized"
    );

    Ok(GrantResult {
        subscribe_key: data.subscribe_key,
        level: data.level,
        ttl: data.ttl,
        channels,
        channel_groups,
    })
}

/// Decode a raw response body and normalize it.
pub fn parse_grant_response(body: &[u8], requested_groups: &[String]) -> PamResult<GrantResult> {
    let envelope: Option<Envelope<GrantPayload>> = serde_json::from_slice(body)
        .map_err(|e| PamError::from_decode("malformed grant response", e))?;
    normalize_grant_response(envelope, requested_groups)
}
