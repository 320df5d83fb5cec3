//! Shared HTTP plumbing for the ureq clients

use ureq::Agent;
use ureq::http::Response;

use crate::errors::{Result, TrafficError};

/// 构建 HTTP Agent
///
/// Non-2xx statuses come back as ordinary responses so callers decide
/// whether a status is a soft miss or a fatal error. No timeout is set:
/// a hung request is left to the external scheduler.
pub fn build_agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}

/// Reads a non-success body for error messages, truncated to keep logs readable
pub fn error_body(resp: &mut Response<ureq::Body>) -> String {
    const MAX_LEN: usize = 512;
    let body = resp.body_mut().read_to_string().unwrap_or_default();
    if body.len() > MAX_LEN {
        let mut end = MAX_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body
    }
}

/// Reads a JSON body into `T`
///
/// Transport failures while reading surface as `Transport`, a body that is
/// not the expected JSON as `Serialization`.
pub fn read_json<T: serde::de::DeserializeOwned>(resp: &mut Response<ureq::Body>) -> Result<T> {
    resp.body_mut().read_json::<T>().map_err(|e| match e {
        ureq::Error::Json(e) => TrafficError::serialization(e.to_string()),
        other => TrafficError::transport(other.to_string()),
    })
}
