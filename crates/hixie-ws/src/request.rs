//! Upgrade request model: the raw header map collected while parsing and the
//! validated, immutable [`Request`] it is finalized into.
//!
//! - [`RawRequest`]: Ordered header map seeded with `Path`, plus the raw token
//! - [`Request`]: The six fields the handshake needs, built only by [`validate`]
//! - [`validate`]: Required-key and security-key checks (Key1 before Key2)

use std::collections::BTreeMap;
use std::fmt;

use crate::error::HandshakeError;
use crate::token::{challenge_digest, key_number};

/// Pseudo-header holding the request-line path.
pub const PATH_KEY: &str = "Path";
/// Pseudo-header satisfied by the 8 raw bytes following the blank line.
pub const TOKEN_KEY: &str = "Token";
pub const HOST_KEY: &str = "Host";
pub const ORIGIN_KEY: &str = "Origin";
pub const KEY1_KEY: &str = "Sec-WebSocket-Key1";
pub const KEY2_KEY: &str = "Sec-WebSocket-Key2";

/// Keys that must all be present for an upgrade to be accepted.
pub const REQUIRED_KEYS: [&str; 6] = [HOST_KEY, PATH_KEY, ORIGIN_KEY, TOKEN_KEY, KEY1_KEY, KEY2_KEY];

/// Header map accumulated while reading the opening handshake.
///
/// Keys are matched exactly. A repeated header overwrites the earlier value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    fields: BTreeMap<String, String>,
    token: Option<[u8; 8]>,
}

impl RawRequest {
    /// Start a header map for the request-line `path`.
    pub fn new(path: impl Into<String>) -> RawRequest {
        let mut fields = BTreeMap::new();
        fields.insert(PATH_KEY.to_string(), path.into());
        RawRequest { fields, token: None }
    }

    /// Insert or overwrite a header.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The `Path` entry (the request-line path unless a header replaced it).
    pub fn path(&self) -> &str {
        self.get(PATH_KEY).unwrap_or_default()
    }

    pub fn set_token(&mut self, token: [u8; 8]) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&[u8; 8]> {
        self.token.as_ref()
    }

    /// Whether `key` is present. `Token` is present once the raw bytes were read.
    pub fn contains_key(&self, key: &str) -> bool {
        if key == TOKEN_KEY {
            self.token.is_some()
        } else {
            self.fields.contains_key(key)
        }
    }

    /// Headers in key order, excluding the token.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the client asked for `Upgrade: WebSocket` over `Connection: Upgrade`.
    pub fn is_upgrade(&self) -> bool {
        let upgrade = self
            .get("Upgrade")
            .is_some_and(|v| v.eq_ignore_ascii_case("WebSocket"));
        let connection = self
            .get("Connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("Upgrade"));
        upgrade && connection
    }

    /// Diagnostic dump of every entry, token bytes escaped.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RawRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        map.entries(self.fields.iter());
        if let Some(token) = &self.token {
            map.entry(&TOKEN_KEY, &token.escape_ascii().to_string());
        }
        map.finish()
    }
}

/// A validated draft-76 upgrade request.
///
/// Only [`validate`] constructs one, so both security keys are known to
/// divide cleanly and the challenge digest can always be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    host: String,
    path: String,
    origin: String,
    key1: String,
    key2: String,
    token: [u8; 8],
    key_numbers: (u32, u32),
}

impl Request {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn key1(&self) -> &str {
        &self.key1
    }

    pub fn key2(&self) -> &str {
        &self.key2
    }

    /// The 8 raw token bytes, exactly as received.
    pub fn token(&self) -> &[u8; 8] {
        &self.token
    }

    /// The 16-byte challenge response for this request.
    pub fn digest(&self) -> [u8; 16] {
        let (n1, n2) = self.key_numbers;
        challenge_digest(n1, n2, &self.token)
    }
}

/// Check a raw header map and finalize it into a [`Request`].
///
/// Missing keys are reported before malformed keys, and `Sec-WebSocket-Key1`
/// is checked before `Sec-WebSocket-Key2`.
pub fn validate(mut raw: RawRequest) -> Result<Request, HandshakeError> {
    if !REQUIRED_KEYS.iter().all(|k| raw.contains_key(k)) {
        return Err(HandshakeError::MissingHeaderKeys(raw.dump()));
    }

    let Some(n1) = raw.get(KEY1_KEY).and_then(key_number) else {
        return Err(HandshakeError::BadFirstSecurityKey(raw.dump()));
    };
    let Some(n2) = raw.get(KEY2_KEY).and_then(key_number) else {
        return Err(HandshakeError::BadSecondSecurityKey(raw.dump()));
    };

    let Some(token) = raw.token else {
        return Err(HandshakeError::MissingHeaderKeys(raw.dump()));
    };
    let mut take = |key: &str| raw.fields.remove(key).unwrap_or_default();

    Ok(Request {
        host: take(HOST_KEY),
        path: take(PATH_KEY),
        origin: take(ORIGIN_KEY),
        key1: take(KEY1_KEY),
        key2: take(KEY2_KEY),
        token,
        key_numbers: (n1, n2),
    })
}
