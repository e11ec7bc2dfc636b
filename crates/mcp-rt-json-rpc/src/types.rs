//! Wire-level primitives shared by every other module in this crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON-RPC request id: either a signed integer or a string.
///
/// Per the JSON-RPC 2.0 spec, `null` ids are discouraged and are not modeled
/// as a distinct variant here; callers that need to track "no id" track it
/// as the absence of a `RequestId`, not a value of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl RequestId {
    pub fn number(n: i64) -> Self {
        Self::Number(n)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// The `jsonrpc` version field. This crate speaks JSON-RPC 2.0 only, so the
/// only variant is `V2_0`; it exists as a type (rather than a raw `String`)
/// so the literal `"2.0"` is produced and validated in one place instead of
/// being duplicated across every message struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonRpcVersion {
    #[default]
    V2_0,
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(JsonRpcVersion::V2_0)
        } else {
            Err(serde::de::Error::custom(format!(
                "unsupported jsonrpc version: {s}"
            )))
        }
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_display() {
        assert_eq!(RequestId::number(1).to_string(), "1");
        assert_eq!(RequestId::string("abc").to_string(), "abc");
    }

    #[test]
    fn request_id_roundtrips_through_json() {
        let id = RequestId::number(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let id = RequestId::string("req-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"req-1\"");
    }

    #[test]
    fn version_serializes_to_literal() {
        let v = JsonRpcVersion::V2_0;
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"2.0\"");
    }

    #[test]
    fn version_rejects_unknown_strings() {
        let result: Result<JsonRpcVersion, _> = serde_json::from_str("\"1.0\"");
        assert!(result.is_err());
    }
}
