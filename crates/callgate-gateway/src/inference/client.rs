use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use callgate_core::error::{CallGateError, Result};

use crate::config::InferenceSection;

const DEFAULT_FILE_NAME: &str = "upload.bin";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One uploaded file, held in memory only.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

pub struct InferenceClient {
    http: reqwest::Client,
    predict_url: String,
}

impl InferenceClient {
    pub fn new(cfg: &InferenceSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .no_proxy()
            .build()
            .map_err(|e| CallGateError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            predict_url: cfg.predict_url(),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Forward `upload` as multipart field `file`.
    ///
    /// Non-2xx answers become `Upstream { status, body }`; transport failures
    /// (timeout, refused, reset) become `UpstreamUnavailable`. A 2xx body that
    /// is not JSON is returned as a JSON string.
    pub async fn predict(&self, upload: Upload) -> Result<Value> {
        let file_name = upload
            .file_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let content_type = upload
            .content_type
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(|e| CallGateError::BadRequest(format!("invalid content type: {e}")))?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CallGateError::UpstreamUnavailable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CallGateError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(CallGateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
