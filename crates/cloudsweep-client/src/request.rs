//! Admin API request specification.

use serde_json::{Map, Value};
use strum::{AsRefStr, Display};

/// HTTP verb of an Admin API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// Used by resource search.
    Post,
    /// Used by batch deletion.
    Delete,
}

/// A fully described Admin API call.
///
/// The request is built up front and then handed to a single
/// [`Transport::execute`](crate::Transport::execute), which adds the
/// account-scoped URL and authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Action path below `/v1_1/{cloud_name}/`, e.g. `resources/search`.
    pub action: String,
    /// JSON object sent as the request body.
    pub body: Map<String, Value>,
}

impl ApiRequest {
    /// Creates a request with an empty body.
    pub fn new(method: Method, action: impl Into<String>) -> Self {
        Self {
            method,
            action: action.into(),
            body: Map::new(),
        }
    }

    /// Creates a `POST` request.
    pub fn post(action: impl Into<String>) -> Self {
        Self::new(Method::Post, action)
    }

    /// Creates a `DELETE` request.
    pub fn delete(action: impl Into<String>) -> Self {
        Self::new(Method::Delete, action)
    }

    /// Sets a field of the JSON body.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Returns the body serialized as compact JSON.
    pub fn body_json(&self) -> String {
        Value::Object(self.body.clone()).to_string()
    }
}
