use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::AbortReason;
use crate::languages::LanguageProfile;
use crate::ocr::{RegionDetect, RegionMode, TranslatedRegion};
use crate::providers::TranslateBackend;
use crate::render::{self, OverlayFont, RedrawStyle};
use crate::translator::Translator;

/// Terminal state of one page: either an output file was produced, or the
/// page was excluded for a reportable reason. Aborts never propagate to the
/// batch as errors.
#[derive(Debug)]
pub enum PageOutcome {
    Done { output: PathBuf },
    Aborted { reason: AbortReason },
}

/// Runs one page through decode -> detect -> translate -> redraw -> save.
///
/// Each stage either advances the page or converts its failure into an
/// `Aborted` outcome; translation is the exception, where a backend failure
/// is drawn in-band as sentinel text and the page still completes.
pub struct PageProcessor<'a, D, B: TranslateBackend> {
    detector: &'a D,
    translator: &'a Translator<B>,
    language: &'a LanguageProfile,
    mode: RegionMode,
    style: &'a RedrawStyle,
    font: &'a OverlayFont,
    output_dir: &'a Path,
}

impl<'a, D: RegionDetect, B: TranslateBackend> PageProcessor<'a, D, B> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        detector: &'a D,
        translator: &'a Translator<B>,
        language: &'a LanguageProfile,
        mode: RegionMode,
        style: &'a RedrawStyle,
        font: &'a OverlayFont,
        output_dir: &'a Path,
    ) -> Self {
        Self {
            detector,
            translator,
            language,
            mode,
            style,
            font,
            output_dir,
        }
    }

    pub async fn process(&self, input: &Path) -> PageOutcome {
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());

        // Decoding
        let mut page = match image::open(input) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(err) => {
                warn!(%filename, stage = "decoding", "failed to decode page: {err}");
                return PageOutcome::Aborted {
                    reason: AbortReason::DecodeError,
                };
            }
        };

        // Detecting
        let regions = match self
            .detector
            .detect(&page, self.language.ocr_languages, self.mode)
        {
            Ok(regions) => regions,
            Err(err) => {
                warn!(%filename, stage = "detecting", "detection failed: {err:#}");
                return PageOutcome::Aborted {
                    reason: AbortReason::DetectionError,
                };
            }
        };
        if regions.is_empty() {
            info!(%filename, "no text found");
            return PageOutcome::Aborted {
                reason: AbortReason::NoTextFound,
            };
        }

        // Translating. Whole-page text goes to the backend with source
        // auto-detection; per-region text uses the fixed source that matches
        // the OCR hint.
        let source_lang = match self.mode {
            RegionMode::WholePage => "auto",
            RegionMode::PerRegion => self.language.translation_source,
        };
        let mut translated = Vec::with_capacity(regions.len());
        for region in regions {
            let translated_text = self.translator.translate(&region.text, source_lang).await;
            translated.push(TranslatedRegion {
                region,
                translated_text,
            });
        }

        // Redrawing
        if let Err(err) = render::redraw(&mut page, &translated, self.mode, self.style, self.font) {
            warn!(%filename, stage = "redrawing", "redraw failed: {err:#}");
            return PageOutcome::Aborted {
                reason: AbortReason::DrawError,
            };
        }

        // Saving. JPEG has no alpha channel, so pages are written as RGB.
        let output = self.output_dir.join(&filename);
        let rgb = DynamicImage::ImageRgba8(page).into_rgb8();
        if let Err(err) = rgb.save(&output) {
            warn!(%filename, stage = "saving", "failed to save page: {err}");
            return PageOutcome::Aborted {
                reason: AbortReason::SaveError,
            };
        }

        debug!(%filename, regions = translated.len(), "page translated");
        PageOutcome::Done { output }
    }
}
