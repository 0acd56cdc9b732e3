//! Capture method and URL of the current request for the response envelope.

use crate::error::{ApiError, AppError};
use crate::response::Meta;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Method, Uri},
};

/// Request metadata, taken before the handler runs so every outcome can echo it.
#[derive(Clone, Debug)]
pub struct RequestMeta(pub Meta);

impl RequestMeta {
    pub fn from_parts(method: &Method, uri: &Uri) -> Self {
        let url = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        RequestMeta(Meta::new(method.as_str(), url))
    }

    pub fn meta(&self) -> Meta {
        self.0.clone()
    }

    pub fn reject(&self, error: AppError) -> ApiError {
        error.with_meta(self.meta())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestMeta::from_parts(&parts.method, &parts.uri))
    }
}
