//! JSON body extractor whose rejections use the API error format

use axum::{
    body::Bytes,
    extract::{FromRequest, OptionalFromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::error::ApiError;

/// JSON wrapper used for request bodies and responses.
///
/// As a request extractor it is optional: `Option<Json<T>>` yields `None`
/// for an empty body, so handlers decide how a missing body is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JSON rejection error that returns API error format
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        ApiError::new(self.status, self.message).into_response()
    }
}

impl<S, T> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let bytes = <Bytes as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(|rejection| JsonRejection {
                status: rejection.status(),
                message: format!("Failed to read request body: {}", rejection.body_text()),
            })?;

        parse_body(&bytes)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<Json<T>>, JsonRejection> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(bytes)
        .map(|value| Some(Json(value)))
        .map_err(|err| JsonRejection {
            status: StatusCode::BAD_REQUEST,
            message: format_parse_error(&err),
        })
}

fn format_parse_error(err: &serde_json::Error) -> String {
    match err.classify() {
        Category::Data => format!("Invalid JSON data: {}", err),
        Category::Syntax | Category::Eof => format!("Invalid JSON syntax: {}", err),
        Category::Io => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}
