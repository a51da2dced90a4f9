use tracing::warn;

use crate::providers::TranslateBackend;

/// Drawn in place of the translation when the backend call failed.
pub const TRANSLATION_ERROR_SENTINEL: &str = "[Translation Error]";
/// Drawn when the backend answered but produced no text.
pub const TRANSLATION_FAILED_SENTINEL: &str = "[Translation Failed]";

/// Wraps a backend with the pipeline's failure policy: a backend problem
/// never propagates as an error, it becomes a sentinel string the redrawer
/// paints in-band. Callers detect failure by sentinel, not by exception.
#[derive(Clone)]
pub struct Translator<B: TranslateBackend> {
    backend: B,
    target_lang: String,
}

impl<B: TranslateBackend> Translator<B> {
    pub fn new(backend: B, target_lang: impl Into<String>) -> Self {
        Self {
            backend,
            target_lang: target_lang.into(),
        }
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    pub async fn translate(&self, text: &str, source_lang: &str) -> String {
        match self
            .backend
            .translate(text, source_lang, &self.target_lang)
            .await
        {
            Ok(translated) if translated.trim().is_empty() => {
                warn!("translation backend returned empty output");
                TRANSLATION_FAILED_SENTINEL.to_string()
            }
            Ok(translated) => translated,
            Err(err) => {
                warn!("translation backend failed: {err:#}");
                TRANSLATION_ERROR_SENTINEL.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::StubBackend;

    #[tokio::test]
    async fn successful_translation_passes_through() {
        let translator = Translator::new(StubBackend::fixed("Hello"), "en");
        assert_eq!(translator.translate("こんにちは", "auto").await, "Hello");
    }

    #[tokio::test]
    async fn backend_error_becomes_error_sentinel() {
        let translator = Translator::new(StubBackend::Fail, "en");
        assert_eq!(
            translator.translate("text", "auto").await,
            TRANSLATION_ERROR_SENTINEL
        );
    }

    #[tokio::test]
    async fn empty_output_becomes_failed_sentinel() {
        let translator = Translator::new(StubBackend::fixed("   "), "en");
        assert_eq!(
            translator.translate("text", "ja").await,
            TRANSLATION_FAILED_SENTINEL
        );
    }
}
