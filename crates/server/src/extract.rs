use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    Form,
};
use serde_json::Value;
use service::assets::Fields;

use crate::errors::ApiError;

/// Request body that must be a JSON object.
///
/// JSON is parsed regardless of the declared content type so that clients
/// omitting the header still work. URL-encoded forms are accepted as flat
/// string fields, and an empty body counts as `{}`.
#[derive(Debug)]
pub struct JsonObject(pub Fields);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            return Ok(Self(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect()));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Fields::new()));
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(ApiError::bad_request("Request body must be a JSON object")),
            Err(e) => Err(ApiError::bad_request(format!("Invalid JSON body: {e}"))),
        }
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}
