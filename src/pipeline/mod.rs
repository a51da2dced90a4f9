mod batch;
mod page;

pub use batch::BatchRunner;
pub use page::{PageOutcome, PageProcessor};

use serde::Serialize;
use std::fmt;

/// Why a page was excluded from the output archive. The snake_case string
/// forms are part of the reporting contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    DecodeError,
    DetectionError,
    NoTextFound,
    DrawError,
    SaveError,
}

impl AbortReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbortReason::DecodeError => "decode_error",
            AbortReason::DetectionError => "detection_error",
            AbortReason::NoTextFound => "no_text_found",
            AbortReason::DrawError => "draw_error",
            AbortReason::SaveError => "save_error",
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedPage {
    pub filename: String,
    pub reason: AbortReason,
}

/// Aggregate outcome of one batch. `processed` holds the basenames of the
/// pages that made it into the output directory, in processing order;
/// `skipped` records every page that was excluded and why.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub processed: Vec<String>,
    pub skipped: Vec<SkippedPage>,
}

impl BatchResult {
    /// True when not a single page was translated. Callers surface this as a
    /// user-visible condition instead of producing an empty archive.
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}
