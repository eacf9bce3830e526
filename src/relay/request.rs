//! Outbound request description.

use axum::http::{HeaderValue, Method};
use serde_json::Value;

use crate::config::MalformedBodyPolicy;
use crate::error::{GatewayError, GatewayResult};

/// Whether `method` carries a JSON body to the backend.
pub fn is_write_method(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// A request to replay against the backend.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    /// Backend path, already stripped of the local mount.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<HeaderValue>,
    pub body: Option<Value>,
}

impl RelayRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            authorization: None,
            body: None,
        }
    }

    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.map(str::to_string);
        self
    }

    pub fn with_authorization(mut self, authorization: Option<HeaderValue>) -> Self {
        self.authorization = authorization;
        self
    }

    /// Attach the inbound body for write methods.
    ///
    /// An empty body becomes `{}`. A body that fails to parse is handled
    /// according to `policy`. Read and delete methods never carry a body.
    pub fn with_json_body(mut self, raw: &[u8], policy: MalformedBodyPolicy) -> GatewayResult<Self> {
        if !is_write_method(&self.method) {
            return Ok(self);
        }

        if raw.iter().all(u8::is_ascii_whitespace) {
            self.body = Some(Value::Object(Default::default()));
            return Ok(self);
        }

        let body = match serde_json::from_slice::<Value>(raw) {
            Ok(value) => value,
            Err(e) => match policy {
                MalformedBodyPolicy::Reject => return Err(GatewayError::MalformedBody(e)),
                MalformedBodyPolicy::EmptyObject => {
                    tracing::warn!(
                        path = %self.path,
                        error = %e,
                        "Malformed JSON body replaced with empty object"
                    );
                    Value::Object(Default::default())
                }
            },
        };

        self.body = Some(body);
        Ok(self)
    }
}
