mod detector;
mod parse;
mod tesseract;

use serde::{Deserialize, Serialize};

pub use detector::TesseractDetector;

/// Height in pixels of the fixed band redrawn at the top of a page in
/// whole-page mode. The band position is deliberate: it does not track where
/// the recognized text actually was.
pub const WHOLE_PAGE_BAND_HEIGHT: u32 = 100;

/// Regions at or below this confidence are dropped in per-region mode.
pub const DEFAULT_CONFIDENCE_THRESHOLD: i32 = 50;

/// Granularity of detection and redraw.
///
/// `WholePage` treats the page's entire recognized text as a single region
/// covering the fixed top band. `PerRegion` keeps one region per recognized
/// line, redrawn over its exact bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionMode {
    WholePage,
    PerRegion,
}

impl RegionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionMode::WholePage => "whole_page",
            RegionMode::PerRegion => "per_region",
        }
    }
}

impl std::str::FromStr for RegionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "whole_page" => Ok(RegionMode::WholePage),
            "per_region" => Ok(RegionMode::PerRegion),
            other => Err(format!(
                "unknown region mode '{}' (expected whole_page or per_region)",
                other
            )),
        }
    }
}

/// One recognized text region on a page.
#[derive(Debug, Clone, Serialize)]
pub struct TextRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub text: String,
    /// Engine-reported certainty, 0-100.
    pub confidence: i32,
}

/// A region paired with the text that replaces it. The translated text may be
/// a sentinel marker; it is never absent.
#[derive(Debug, Clone, Serialize)]
pub struct TranslatedRegion {
    pub region: TextRegion,
    pub translated_text: String,
}

/// Seam between the pipeline and the OCR engine.
///
/// Implementations must not fail for a normally-decodable page; an engine
/// error is a recoverable per-page condition for the caller. An empty result
/// means "no usable text", not an error.
pub trait RegionDetect {
    fn detect(
        &self,
        page: &image::RgbaImage,
        language_hint: &str,
        mode: RegionMode,
    ) -> anyhow::Result<Vec<TextRegion>>;
}
