use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use callgate_core::error::CallGateError;

use crate::app_state::AppState;
use crate::inference::Upload;

/// `POST /v1/files`: multipart field `file` -> `{"result": <upstream json>}`.
pub async fn upload(State(app): State<AppState>, multipart: Multipart) -> Response {
    let res = match read_file(multipart).await {
        Ok(upload) => {
            tracing::info!(
                bytes = upload.bytes.len(),
                file_name = upload.file_name.as_deref().unwrap_or("-"),
                "forwarding upload to inference"
            );
            app.inference().predict(upload).await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(result) => {
            app.metrics().inference_requests.inc(&[("outcome", "ok")]);
            (StatusCode::OK, Json(json!({ "result": result }))).into_response()
        }
        Err(e) => {
            let code = e.client_code().as_str();
            app.metrics().inference_requests.inc(&[("outcome", code)]);
            tracing::warn!(error = %e, "inference request failed");
            ApiError(e).into_response()
        }
    }
}

async fn read_file(mut multipart: Multipart) -> Result<Upload, CallGateError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        return Ok(Upload {
            bytes,
            file_name,
            content_type,
        });
    }
    Err(CallGateError::BadRequest("multipart field 'file' is required".into()))
}

fn multipart_error(e: MultipartError) -> CallGateError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CallGateError::PayloadTooLarge
    } else {
        CallGateError::BadRequest(format!("invalid multipart body: {e}"))
    }
}

struct ApiError(CallGateError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code().as_str();
        match self.0 {
            CallGateError::Upstream { status, body } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "code": code, "status": status, "body": body })),
            )
                .into_response(),
            other => {
                let status = match &other {
                    CallGateError::BadRequest(_) => StatusCode::BAD_REQUEST,
                    CallGateError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                    CallGateError::NotAllowed(_) => StatusCode::FORBIDDEN,
                    CallGateError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(json!({ "code": code, "msg": other.to_string() }))).into_response()
            }
        }
    }
}
