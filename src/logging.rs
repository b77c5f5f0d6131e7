//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and logged in full at the `debug` level. The `pin` field of JSON request
/// bodies is redacted so raw PINs never reach the logs.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_header_and_body_text_from_request(request).await;

    let is_json_post = parts.method == axum::http::Method::POST
        && parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json_post {
        log_request(&parts, &redact_pin(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Replace the value of a JSON `"pin"` field with asterisks.
///
/// Works on the raw body text rather than a parsed document so that even
/// malformed payloads are redacted before logging.
fn redact_pin(body_text: &str) -> String {
    let key_start = match body_text.find("\"pin\"") {
        Some(start) => start,
        None => return body_text.to_string(),
    };

    let colon = match body_text[key_start..].find(':') {
        Some(offset) => key_start + offset,
        None => return body_text.to_string(),
    };

    let after_colon = colon + 1;
    let value = body_text[after_colon..].trim_start();
    let value_start = after_colon + (body_text[after_colon..].len() - value.len());

    let value_end = if value.starts_with('"') {
        match find_closing_quote(body_text, value_start + 1) {
            Some(end) => end + 1,
            None => body_text.len(),
        }
    } else {
        match body_text[value_start..].find([',', '}']) {
            Some(offset) => value_start + offset,
            None => body_text.len(),
        }
    };

    format!(
        "{}\"********\"{}",
        &body_text[..value_start],
        &body_text[value_end..]
    )
}

fn find_closing_quote(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut index = from;

    while index < bytes.len() {
        if bytes[index] == b'"' && bytes[index - 1] != b'\\' {
            return Some(index);
        }
        index += 1;
    }

    None
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

/// The longest body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {:}...",
            parts.method,
            parts.uri,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {:}...",
            parts.status,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use super::redact_pin;

    #[test]
    fn redacts_string_pin_values() {
        let got = redact_pin(r#"{"pin":"1234"}"#);

        assert_eq!(got, r#"{"pin":"********"}"#);
    }

    #[test]
    fn redacts_pin_values_with_surrounding_whitespace() {
        let got = redact_pin(r#"{ "pin" : "12 34" , "other": 1 }"#);

        assert_eq!(got, r#"{ "pin" : "********" , "other": 1 }"#);
    }

    #[test]
    fn redacts_numeric_pin_values() {
        let got = redact_pin(r#"{"pin":1234,"other":true}"#);

        assert_eq!(got, r#"{"pin":"********","other":true}"#);
    }

    #[test]
    fn leaves_bodies_without_a_pin_unchanged() {
        let body = r#"{"type":"income","amount":10}"#;

        assert_eq!(redact_pin(body), body);
    }

    #[test]
    fn redacts_pins_containing_escaped_quotes() {
        let got = redact_pin(r#"{"pin":"12\"34","other":1}"#);

        assert_eq!(got, r#"{"pin":"********","other":1}"#);
    }
}
