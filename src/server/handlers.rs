use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;
use tracing::info;

use super::ServerState;
use super::models::{ErrorResponse, UploadRequest};
use crate::ocr::{RegionMode, TesseractDetector};
use crate::providers::GoogleWeb;
use crate::settings::Settings;
use crate::{RequestError, translate_archive};

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

pub async fn run_server(settings: Settings, addr: String) -> Result<()> {
    let backend = GoogleWeb::new()?;
    let state = Arc::new(ServerState { settings, backend });
    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/translate", post(translate_json))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    info!("server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address: {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<h1>Manga Translator</h1>
<form method="POST" action="/upload" enctype="multipart/form-data">
    <input type="file" name="zip_file" accept=".zip" />
    <select name="lang">
        <option value="ja" selected>Japanese</option>
        <option value="zh">Chinese</option>
        <option value="ko">Korean</option>
        <option value="en">English</option>
    </select>
    <input type="submit" value="Upload &amp; Translate" />
</form>"#,
    )
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn upload(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> Result<Response, ErrorReply> {
    let mut zip_bytes: Option<Vec<u8>> = None;
    let mut lang: Option<String> = None;
    let mut mode: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| bad_request(format!("invalid multipart body: {}", err)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("zip_file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| bad_request(format!("failed to read upload: {}", err)))?;
                zip_bytes = Some(bytes.to_vec());
            }
            Some("lang") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| bad_request(format!("failed to read lang field: {}", err)))?;
                lang = Some(value);
            }
            Some("mode") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| bad_request(format!("failed to read mode field: {}", err)))?;
                mode = Some(value);
            }
            _ => {}
        }
    }

    let bytes = zip_bytes.ok_or_else(|| bad_request("missing zip_file field".to_string()))?;
    run_translation(state, bytes, lang, mode).await
}

async fn translate_json(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<UploadRequest>,
) -> Result<Response, ErrorReply> {
    let encoded = payload
        .zip_base64
        .ok_or_else(|| bad_request("zip_base64 is required".to_string()))?;
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|err| bad_request(format!("invalid base64 payload: {}", err)))?;
    run_translation(state, bytes, payload.lang, payload.mode).await
}

async fn run_translation(
    state: Arc<ServerState>,
    zip_bytes: Vec<u8>,
    lang: Option<String>,
    mode: Option<String>,
) -> Result<Response, ErrorReply> {
    let mode = match mode {
        Some(value) => Some(
            value
                .parse::<RegionMode>()
                .map_err(bad_request)?,
        ),
        None => None,
    };
    let lang_code = lang.unwrap_or_else(|| state.settings.default_lang_code.clone());

    // OCR is a blocking subprocess round-trip; keep it off the async workers.
    let handle = tokio::runtime::Handle::current();
    let outcome = tokio::task::spawn_blocking(move || {
        handle.block_on(async {
            let detector = TesseractDetector::new(state.settings.confidence_threshold);
            translate_archive(
                &state.settings,
                &detector,
                state.backend.clone(),
                &zip_bytes,
                &lang_code,
                mode,
            )
            .await
        })
    })
    .await
    .map_err(|err| internal(format!("server task failed: {}", err)))?;

    match outcome {
        Ok((packaged, result)) => {
            info!(
                processed = result.processed.len(),
                skipped = result.skipped.len(),
                "upload translated"
            );
            let headers = [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"translated.zip\"",
                ),
            ];
            Ok((headers, packaged).into_response())
        }
        Err(err) => Err(error_reply(err)),
    }
}

fn error_reply(err: RequestError) -> ErrorReply {
    let status = match &err {
        RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
        RequestError::NoPagesTranslated => StatusCode::UNPROCESSABLE_ENTITY,
        RequestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: String) -> ErrorReply {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message }),
    )
}

fn internal(message: String) -> ErrorReply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}
