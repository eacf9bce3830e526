//! Relaying the backend's answer to the caller.

use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::GatewayResult;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// The backend's response, normalized for the caller.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl RelayResponse {
    /// Build the relayed response from the upstream's parts.
    ///
    /// JSON bodies are parsed and re-serialized; anything else is passed
    /// through untouched. The content type is the upstream's, or
    /// `application/json` when it sent none.
    pub fn from_parts(
        status: StatusCode,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> GatewayResult<Self> {
        let declared_json = content_type
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        let body = if declared_json && !body.is_empty() {
            let value: Value = serde_json::from_slice(&body)?;
            Bytes::from(serde_json::to_vec(&value)?)
        } else {
            body
        };

        Ok(Self {
            status,
            content_type: content_type
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
            body,
        })
    }

    /// Read a live upstream response to completion.
    pub async fn from_upstream(response: reqwest::Response) -> GatewayResult<Self> {
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Self::from_parts(status, content_type.as_ref(), body)
    }
}

fn is_json_content_type(value: &str) -> bool {
    value.to_ascii_lowercase().contains("application/json")
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    #[test]
    fn test_json_body_is_reserialized() {
        let content_type = HeaderValue::from_static("application/json; charset=utf-8");
        let relayed = RelayResponse::from_parts(
            StatusCode::CREATED,
            Some(&content_type),
            Bytes::from_static(b"{ \"id\" : 1 }"),
        )
        .unwrap();

        assert_eq!(relayed.status, StatusCode::CREATED);
        assert_eq!(relayed.content_type, content_type);
        assert_eq!(&relayed.body[..], br#"{"id":1}"#);
    }

    #[test]
    fn test_text_body_passes_through() {
        let content_type = HeaderValue::from_static("text/plain");
        let relayed = RelayResponse::from_parts(
            StatusCode::BAD_GATEWAY,
            Some(&content_type),
            Bytes::from_static(b"upstream exploded { not json"),
        )
        .unwrap();

        assert_eq!(relayed.status, StatusCode::BAD_GATEWAY);
        assert_eq!(relayed.content_type, "text/plain");
        assert_eq!(&relayed.body[..], b"upstream exploded { not json");
    }

    #[test]
    fn test_missing_content_type_defaults_to_json() {
        let relayed =
            RelayResponse::from_parts(StatusCode::OK, None, Bytes::from_static(b"plain words"))
                .unwrap();

        assert_eq!(relayed.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(&relayed.body[..], b"plain words");
    }

    #[test]
    fn test_empty_json_body_is_allowed() {
        let content_type = HeaderValue::from_static("application/json");
        let relayed =
            RelayResponse::from_parts(StatusCode::NO_CONTENT, Some(&content_type), Bytes::new())
                .unwrap();

        assert_eq!(relayed.status, StatusCode::NO_CONTENT);
        assert!(relayed.body.is_empty());
    }

    #[test]
    fn test_declared_json_that_does_not_parse_fails() {
        let content_type = HeaderValue::from_static("application/json");
        let result = RelayResponse::from_parts(
            StatusCode::OK,
            Some(&content_type),
            Bytes::from_static(b"<html>oops</html>"),
        );

        assert!(matches!(result, Err(GatewayError::InvalidUpstreamBody(_))));
    }
}
