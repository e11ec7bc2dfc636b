//! The `ping` method (§4.5) — no parameters, no result fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PingParams {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyResult {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_params_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(PingParams {}).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn empty_result_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(EmptyResult {}).unwrap(), serde_json::json!({}));
    }
}
