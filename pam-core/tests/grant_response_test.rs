// Grant response normalization across the shapes the service returns

mod common;

use common::strings;
use pam_core::access::{parse_grant_response, AuthKeyMap, GrantResult, KeyData};
use pam_core::error::ErrorCategory;
use pam_core::PamError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;

fn parse(body: Value, groups: &[&str]) -> Result<GrantResult, PamError> {
    parse_grant_response(&serde_json::to_vec(&body).unwrap(), &strings(groups))
}

fn keys(entries: &[(&str, KeyData)]) -> AuthKeyMap {
    entries
        .iter()
        .map(|(name, data)| (name.to_string(), data.clone()))
        .collect()
}

fn rwm(read: bool, write: bool, manage: bool) -> KeyData {
    KeyData {
        read,
        write,
        manage,
        ttl: None,
    }
}

#[test]
fn test_zero_groups_leaves_groups_empty() {
    let result = parse(
        json!({
            "status": 200,
            "message": "Success",
            "service": "Access Manager",
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "channel",
                "ttl": 60,
                "channels": {
                    "a": {"authKeys": {"k1": {"r": 1, "w": 0, "m": 0}}},
                    "b": {"authKeys": {"k1": {"r": 1, "w": 0, "m": 0}}}
                },
                "channelGroups": {"ignored": {"authKeys": {}}}
            }
        }),
        &[],
    )
    .unwrap();

    assert!(result.channel_groups.is_empty());
    assert_eq!(result.channels.len(), 2);
    assert_eq!(result.channels["a"], keys(&[("k1", rwm(true, false, false))]));
}

#[test]
fn test_single_group() {
    let result = parse(
        json!({
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "channel-group+auth",
                "ttl": 1440,
                "channelGroups": "g1",
                "authKeys": {"key1": {"r": 1, "w": 1, "m": 0}}
            }
        }),
        &["g1"],
    )
    .unwrap();

    let mut expected = HashMap::new();
    expected.insert("g1".to_string(), keys(&[("key1", rwm(true, true, false))]));
    assert_eq!(result.channel_groups, expected);
    assert_eq!(result.ttl, 1440);
    assert_eq!(result.level, "channel-group+auth");
}

#[test]
fn test_multiple_groups() {
    let result = parse(
        json!({
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "channel-group",
                "ttl": 5,
                "channelGroups": {
                    "g1": {"authKeys": {"k1": {"r": 1, "w": 0, "m": 1}}},
                    "g2": {"authKeys": {"k2": {"r": 0, "w": 1, "m": 0}}}
                }
            }
        }),
        &["g1", "g2"],
    )
    .unwrap();

    let mut expected = HashMap::new();
    expected.insert("g1".to_string(), keys(&[("k1", rwm(true, false, true))]));
    expected.insert("g2".to_string(), keys(&[("k2", rwm(false, true, false))]));
    assert_eq!(result.channel_groups, expected);
    assert!(result.channels.is_empty());
}

#[test]
fn test_single_channel_uses_top_level_keys() {
    let result = parse(
        json!({
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "user",
                "ttl": -1,
                "channel": "lobby",
                "auths": {"guest": {"r": true, "w": false, "m": false, "ttl": 30}}
            }
        }),
        &[],
    )
    .unwrap();

    let guest = &result.channels["lobby"]["guest"];
    assert!(guest.read);
    assert_eq!(guest.ttl, Some(30));
    assert_eq!(result.ttl, -1);
}

#[test]
fn test_mixed_channel_and_group_grant() {
    let result = parse(
        json!({
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "user",
                "ttl": 10,
                "channel": "a",
                "channels": {"b": {"authKeys": {"k": {"w": 1}}}},
                "channelGroups": "g1",
                "authKeys": {"k": {"r": 1}}
            }
        }),
        &["g1"],
    )
    .unwrap();

    assert_eq!(result.channels.len(), 2);
    assert_eq!(result.channels["a"], keys(&[("k", rwm(true, false, false))]));
    assert_eq!(result.channels["b"], keys(&[("k", rwm(false, true, false))]));
    assert_eq!(result.channel_groups["g1"], keys(&[("k", rwm(true, false, false))]));
}

#[test]
fn test_missing_payload_wrapper() {
    let err = parse(json!({"status": 200, "message": "Success"}), &["g1"]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::MalformedResponse);
}

#[test]
fn test_undecodable_body() {
    let err = parse_grant_response(b"<html>502</html>", &[]).unwrap_err();
    assert!(matches!(err, PamError::ResponseParsing { .. }));
}

#[test]
fn test_multiple_groups_with_wrong_shape_reports_decode_error() {
    let err = parse(
        json!({
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "channel-group",
                "ttl": 5,
                "channelGroups": ["g1", "g2"]
            }
        }),
        &["g1", "g2"],
    )
    .unwrap_err();

    assert!(matches!(err, PamError::ResponseParsing { .. }));
    assert!(err.context().contains("invalid type"));
}

#[test]
fn test_single_group_missing_name() {
    let err = parse(
        json!({
            "payload": {
                "subscribeKey": "sub-c-demo",
                "level": "channel-group",
                "ttl": 5
            }
        }),
        &["g1"],
    )
    .unwrap_err();

    assert!(matches!(err, PamError::ResponseParsing { .. }));
}
