use anyhow::{Context, Result};
use image::RgbaImage;
use std::io::Write;
use tracing::debug;

use super::parse::parse_tsv_regions;
use super::tesseract::{normalize_ocr_languages, run_tesseract_text, run_tesseract_tsv};
use super::{DEFAULT_CONFIDENCE_THRESHOLD, RegionDetect, RegionMode, TextRegion, WHOLE_PAGE_BAND_HEIGHT};

/// Region detection backed by the `tesseract` CLI.
///
/// The decoded page is handed to tesseract through a temporary PNG; TSV
/// output is parsed into typed regions in per-region mode, plain text output
/// becomes a single top-band region in whole-page mode.
pub struct TesseractDetector {
    confidence_threshold: i32,
}

impl TesseractDetector {
    pub fn new(confidence_threshold: i32) -> Self {
        Self {
            confidence_threshold,
        }
    }
}

impl Default for TesseractDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl RegionDetect for TesseractDetector {
    fn detect(
        &self,
        page: &RgbaImage,
        language_hint: &str,
        mode: RegionMode,
    ) -> Result<Vec<TextRegion>> {
        let languages = normalize_ocr_languages(language_hint)?;

        let mut tmp = tempfile::Builder::new()
            .prefix("manga-translator-")
            .suffix(".png")
            .tempfile()
            .with_context(|| "failed to create temp file for OCR")?;
        page.write_to(&mut tmp, image::ImageFormat::Png)
            .with_context(|| "failed to write temp image for OCR")?;
        tmp.flush().ok();

        match mode {
            RegionMode::WholePage => {
                let text = run_tesseract_text(tmp.path(), &languages)?;
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![TextRegion {
                    x: 0,
                    y: 0,
                    width: page.width(),
                    height: WHOLE_PAGE_BAND_HEIGHT,
                    text: text.to_string(),
                    confidence: 100,
                }])
            }
            RegionMode::PerRegion => {
                let tsv = run_tesseract_tsv(tmp.path(), &languages)?;
                let regions = parse_tsv_regions(&tsv);
                let before = regions.len();
                let regions = apply_confidence_filter(regions, self.confidence_threshold);
                debug!(
                    kept = regions.len(),
                    dropped = before - regions.len(),
                    "confidence filter applied"
                );
                Ok(regions)
            }
        }
    }
}

/// Keep only regions worth translating: confidence strictly above the
/// threshold, non-blank text, non-degenerate box.
fn apply_confidence_filter(mut regions: Vec<TextRegion>, threshold: i32) -> Vec<TextRegion> {
    regions.retain(|region| {
        region.confidence > threshold
            && !region.text.trim().is_empty()
            && region.width > 0
            && region.height > 0
    });
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(text: &str, confidence: i32, width: u32, height: u32) -> TextRegion {
        TextRegion {
            x: 0,
            y: 0,
            width,
            height,
            text: text.to_string(),
            confidence,
        }
    }

    #[test]
    fn filter_drops_at_or_below_threshold() {
        let regions = vec![
            region("keep", 51, 10, 10),
            region("at threshold", 50, 10, 10),
            region("below", 12, 10, 10),
        ];
        let kept = apply_confidence_filter(regions, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "keep");
    }

    #[test]
    fn filter_drops_blank_text_and_degenerate_boxes() {
        let regions = vec![
            region("   ", 99, 10, 10),
            region("flat", 99, 10, 0),
            region("thin", 99, 0, 10),
            region("ok", 99, 10, 10),
        ];
        let kept = apply_confidence_filter(regions, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "ok");
    }
}
