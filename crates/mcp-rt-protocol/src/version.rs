//! The single protocol version this core speaks.
//!
//! There is no negotiation path and no multi-version capability matrix:
//! exactly `"2025-06-18"` is accepted everywhere a protocol version
//! appears — the `initialize` params, the `MCP-Protocol-Version` HTTP
//! header, and the `initialize` result. Anything else is rejected with a
//! structured error (§6.1).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::McpError;

pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct McpVersion;

impl McpVersion {
    pub const CURRENT: McpVersion = McpVersion;
    pub const LATEST: McpVersion = McpVersion;

    pub fn as_str(&self) -> &'static str {
        MCP_PROTOCOL_VERSION
    }
}

impl fmt::Display for McpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for McpVersion {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == MCP_PROTOCOL_VERSION {
            Ok(McpVersion)
        } else {
            Err(McpError::VersionMismatch {
                expected: MCP_PROTOCOL_VERSION.to_string(),
                actual: s.to_string(),
            })
        }
    }
}

impl Serialize for McpVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(MCP_PROTOCOL_VERSION)
    }
}

impl<'de> Deserialize<'de> for McpVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_version_string() {
        assert!("2025-06-18".parse::<McpVersion>().is_ok());
    }

    #[test]
    fn rejects_any_other_version_string() {
        assert!("2025-03-26".parse::<McpVersion>().is_err());
        assert!("2024-11-05".parse::<McpVersion>().is_err());
        assert!("garbage".parse::<McpVersion>().is_err());
    }

    #[test]
    fn serializes_to_the_literal_version_string() {
        assert_eq!(serde_json::to_string(&McpVersion).unwrap(), "\"2025-06-18\"");
    }
}
