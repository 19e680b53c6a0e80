//! Request body extraction for news writes
//!
//! Write endpoints accept `application/json` and
//! `application/x-www-form-urlencoded` bodies. An empty body is an empty
//! payload, so a partial update without fields is a no-op rather than an error.

use crate::error::{body_rejection, AppError};
use crate::news::NewsPayload;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};

const MISSING_JSON_CONTENT_TYPE: &str = "Expected request with `Content-Type: application/json`";

/// Body of a create, update or partial update request
#[derive(Debug)]
pub struct NewsBody(pub NewsPayload);

/// A write body that could not be read
#[derive(Debug)]
pub struct BodyRejection(String);

impl BodyRejection {
    /// Turn the rejection into a 400 carrying the endpoint's message
    pub fn into_error(self, message: &str) -> AppError {
        body_rejection(message, self.0)
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        self.into_error("Invalid or incomplete data").into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let Some(content_type) = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else {
        BodyKind::Other
    }
}

#[async_trait]
impl<S> FromRequest<S> for NewsBody
where
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(&request);

        if kind == BodyKind::Form {
            let Form(payload) = Form::<NewsPayload>::from_request(request, state)
                .await
                .map_err(|r| BodyRejection(r.body_text()))?;
            return Ok(NewsBody(payload));
        }

        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|r| BodyRejection(r.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(NewsBody(NewsPayload::default()));
        }
        if kind != BodyKind::Json {
            return Err(BodyRejection(MISSING_JSON_CONTENT_TYPE.to_string()));
        }

        let Json(payload) =
            Json::<NewsPayload>::from_bytes(&bytes).map_err(|r| BodyRejection(r.body_text()))?;
        Ok(NewsBody(payload))
    }
}
