use std::path::{Path, PathBuf};

pub mod archive;
pub mod languages;
pub mod logging;
pub mod ocr;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod server;
pub mod settings;
pub mod translator;

#[cfg(test)]
mod test_util;

use ocr::{RegionDetect, RegionMode};
use pipeline::{BatchResult, BatchRunner, PageProcessor};
use providers::TranslateBackend;
use settings::Settings;
use tracing::info;
use translator::Translator;

/// Failure of a whole upload, reported to the caller before or instead of an
/// output archive. Per-page and per-region failures never surface here; they
/// live inside `BatchResult`.
#[derive(Debug)]
pub enum RequestError {
    /// The upload itself is unusable: missing, not a zip, corrupt, empty, or
    /// an unknown language was requested.
    BadRequest(String),
    /// Every page failed; there is nothing to archive.
    NoPagesTranslated,
    Internal(anyhow::Error),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::BadRequest(message) => f.write_str(message),
            RequestError::NoPagesTranslated => {
                f.write_str("no images could be translated")
            }
            RequestError::Internal(err) => write!(f, "internal error: {err:#}"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Translate a zip of manga pages into a zip of redrawn pages.
///
/// This is the shared path behind the HTTP upload endpoint and the one-shot
/// CLI: validate the archive, extract it flat into the upload area, run the
/// batch, and package every successfully translated page by basename.
pub async fn translate_archive<D: RegionDetect, B: TranslateBackend>(
    settings: &Settings,
    detector: &D,
    backend: B,
    zip_bytes: &[u8],
    lang_code: &str,
    mode_override: Option<RegionMode>,
) -> Result<(Vec<u8>, BatchResult), RequestError> {
    if zip_bytes.is_empty() {
        return Err(RequestError::BadRequest("a zip file is required".to_string()));
    }
    let looks_like_zip = infer::get(zip_bytes)
        .map(|kind| kind.mime_type() == "application/zip")
        .unwrap_or(false);
    if !looks_like_zip {
        return Err(RequestError::BadRequest(
            "only zip archives are accepted".to_string(),
        ));
    }

    let language = languages::profile(lang_code).ok_or_else(|| {
        RequestError::BadRequest(format!(
            "unknown language '{}' (supported: {})",
            lang_code,
            languages::supported_codes().join(", ")
        ))
    })?;
    let mode = mode_override.unwrap_or(settings.mode);

    let extract_dir = Path::new(&settings.upload_dir).join("extracted");
    let translated_dir = Path::new(&settings.output_dir).join("translated");
    let extracted = archive::extract_zip(zip_bytes, &extract_dir)
        .map_err(|err| RequestError::BadRequest(format!("{err:#}")))?;
    archive::clean_dir(&translated_dir).map_err(RequestError::Internal)?;
    info!(
        pages = extracted,
        lang = language.code,
        mode = mode.as_str(),
        "archive extracted"
    );

    let style = settings.overlay_style();
    let font = settings.overlay_font();
    let translator = Translator::new(backend, settings.target_lang.clone());
    let processor = PageProcessor::new(
        detector,
        &translator,
        language,
        mode,
        &style,
        &font,
        &translated_dir,
    );
    let result = BatchRunner::new(processor)
        .run(&extract_dir)
        .await
        .map_err(RequestError::Internal)?;

    if result.is_empty() {
        return Err(RequestError::NoPagesTranslated);
    }

    let outputs: Vec<PathBuf> = result
        .processed
        .iter()
        .map(|name| translated_dir.join(name))
        .collect();
    let packaged = archive::pack_zip(&outputs).map_err(RequestError::Internal)?;
    Ok((packaged, result))
}
