//! Access Manager: request signing and grant response handling.

pub mod grant;
pub mod models;
pub mod params;
pub mod signature;

pub use grant::{
    normalize_grant_response, parse_grant_response, ChannelGroupsField, GrantRequest, SigningKeys,
};
pub use models::{AuthKeyMap, Envelope, GrantPayload, GrantResult, KeyData, KeysData};
pub use params::QueryParams;
pub use signature::{build_sign_input, sign_sha256};
