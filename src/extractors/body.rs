//! Submitted record: JSON object or HTML form, flattened to a JSON map.

use crate::error::{ApiError, AppError};
use crate::extractors::RequestMeta;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::{Map, Value};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request body as field map. Form values arrive as strings; the validator coerces them.
#[derive(Clone, Debug, Default)]
pub struct RecordBody(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let meta = RequestMeta::from_parts(req.method(), req.uri());
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| meta.reject(AppError::BadRequest(e.body_text())))?;
            let map = pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
            return Ok(RecordBody(map));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| meta.reject(AppError::BadRequest(e.body_text())))?;
        parse_json_object(&bytes)
            .map(RecordBody)
            .map_err(|e| meta.reject(e))
    }
}

/// An empty body reads as an empty record so that validation reports every missing field.
fn parse_json_object(bytes: &[u8]) -> Result<Map<String, Value>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}
