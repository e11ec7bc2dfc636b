//! HTTP header extraction for the Streamable-HTTP transport (§4.4, §6.1).
//!
//! There is no version negotiation in this core: exactly one protocol
//! version is accepted, so the header helpers here return raw values for
//! the handler to validate against [`mcp_rt_protocol::MCP_PROTOCOL_VERSION`]
//! rather than a multi-variant enum.

use hyper::HeaderMap;

/// `MCP-Protocol-Version` header value, unparsed (§6.1). The handler
/// compares this directly against the configured version string.
pub fn extract_protocol_version(headers: &HeaderMap) -> Option<String> {
    headers
        .get("MCP-Protocol-Version")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// `Mcp-Session-Id` header value (§4.4 step 5).
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Mcp-Session-Id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// `Last-Event-ID` header, logged on SSE reconnect but not acted upon —
/// stream resumption is out of scope (§4.4 step 6).
pub fn extract_last_event_id(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("Last-Event-ID")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

/// `Origin` header value, used against the configured allow-list (§4.4 step 3).
pub fn extract_origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Origin")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// True if the `Accept` header lists both media types a POST response may
/// need (§4.4 step 1, §6.5).
pub fn accept_allows_json_and_event_stream(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get("Accept").and_then(|h| h.to_str().ok()) else {
        return false;
    };
    accept.contains("application/json") && accept.contains("text/event-stream")
}

/// True if the `Accept` header lists `text/event-stream` (§4.4 GET step 1).
pub fn accept_allows_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get("Accept")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"))
}

/// True if `Content-Type` is exactly (ignoring parameters) `application/json`.
pub fn content_type_is_json(headers: &HeaderMap) -> bool {
    headers
        .get("Content-Type")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.split(';').next().unwrap_or("").trim() == "application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn extracts_protocol_version_and_session_id() {
        let headers = headers(&[
            ("MCP-Protocol-Version", "2025-06-18"),
            ("Mcp-Session-Id", "test-session-123"),
        ]);
        assert_eq!(extract_protocol_version(&headers), Some("2025-06-18".to_string()));
        assert_eq!(extract_session_id(&headers), Some("test-session-123".to_string()));
    }

    #[test]
    fn accept_check_requires_both_media_types() {
        let headers = headers(&[("Accept", "application/json, text/event-stream")]);
        assert!(accept_allows_json_and_event_stream(&headers));

        let headers = headers(&[("Accept", "application/json")]);
        assert!(!accept_allows_json_and_event_stream(&headers));
    }

    #[test]
    fn content_type_check_ignores_parameters() {
        let headers = headers(&[("Content-Type", "application/json; charset=utf-8")]);
        assert!(content_type_is_json(&headers));

        let headers = headers(&[("Content-Type", "text/plain")]);
        assert!(!content_type_is_json(&headers));
    }
}
