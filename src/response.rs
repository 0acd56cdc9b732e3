//! Standard response envelope: `{data, error, meta}`.

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Request metadata echoed in every envelope. Extra keys (e.g. `count`) are flattened in.
#[derive(Clone, Debug, Serialize)]
pub struct Meta {
    pub method: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Meta {
            method: method.into(),
            url: url.into(),
            timestamp: Utc::now(),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub meta: Meta,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T, meta: Meta) -> Self {
        Envelope {
            data: Some(data),
            error: None,
            meta,
        }
    }

    pub fn error(message: impl Into<String>, meta: Meta) -> Self {
        Envelope {
            data: None,
            error: Some(message.into()),
            meta,
        }
    }
}

pub fn success_created<T: Serialize>(data: T, meta: Meta) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::success(data, meta)))
}

pub fn success_ok<T: Serialize>(data: T, meta: Meta) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::success(data, meta)))
}

pub fn success_many<T: Serialize>(data: Vec<T>, meta: Meta) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(Envelope::success(data, meta.with("count", count))),
    )
}
