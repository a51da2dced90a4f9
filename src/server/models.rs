use serde::{Deserialize, Serialize};

/// JSON upload body, the alternative to the multipart form.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct UploadRequest {
    pub(crate) zip_base64: Option<String>,
    pub(crate) lang: Option<String>,
    pub(crate) mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}
