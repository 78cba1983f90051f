//! Logging for outgoing requests and their responses.

use reqwest::{Method, StatusCode, Url};

/// Request and response bodies longer than this many bytes are truncated at
/// the `debug` level and logged in full at the `trace` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

/// The path segment followed by the secret token of a password reset link.
pub(crate) const RESET_PASSWORD_SEGMENT: &str = "reset-password";

const REDACTED: &str = "********";

/// Log a request before it is sent, with secrets redacted.
pub fn log_request(method: &Method, url: &Url, body: &str) {
    let body = redact_secrets(body);
    let url = redact_url(url);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!(
            "Sending request: {method} {url}\nbody: {}...",
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::trace!("Full request body: {body:?}");
    } else {
        tracing::debug!("Sending request: {method} {url}\nbody: {body:?}");
    }
}

/// Log a response once its body has been read, with secrets redacted.
pub fn log_response(status: StatusCode, url: &Url, body: &str) {
    let body = redact_secrets(body);
    let url = redact_url(url);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!(
            "Received response: {status} from {url}\nbody: {}...",
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::trace!("Full response body: {body:?}");
    } else {
        tracing::debug!("Received response: {status} from {url}\nbody: {body:?}");
    }
}

/// Replace the values of password and token fields in a JSON body.
///
/// Bodies that are not JSON objects are returned as-is.
fn redact_secrets(body: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_owned();
    };

    let Some(object) = value.as_object_mut() else {
        return body.to_owned();
    };

    let mut redacted = false;
    for field in REDACTED_FIELDS {
        if let Some(secret) = object.get_mut(field) {
            *secret = serde_json::Value::String(REDACTED.to_owned());
            redacted = true;
        }
    }

    if redacted {
        value.to_string()
    } else {
        body.to_owned()
    }
}

/// Replace the token of a password reset URL.
fn redact_url(url: &Url) -> String {
    let Some(segments) = url.path_segments() else {
        return url.to_string();
    };
    let segments: Vec<&str> = segments.collect();

    let Some(token_index) = segments
        .iter()
        .position(|segment| *segment == RESET_PASSWORD_SEGMENT)
        .map(|index| index + 1)
        .filter(|index| *index < segments.len())
    else {
        return url.to_string();
    };

    let path: Vec<&str> = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| if index == token_index { REDACTED } else { *segment })
        .collect();

    let mut redacted = url.clone();
    redacted.set_path(&format!("/{}", path.join("/")));
    redacted.to_string()
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
