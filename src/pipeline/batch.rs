use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use super::{BatchResult, PageOutcome, PageProcessor, SkippedPage};
use crate::ocr::RegionDetect;
use crate::providers::TranslateBackend;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Walks an input directory and runs every candidate image through the page
/// processor, one page at a time. A failed page never stops the batch.
pub struct BatchRunner<'a, D, B: TranslateBackend> {
    processor: PageProcessor<'a, D, B>,
}

impl<'a, D: RegionDetect, B: TranslateBackend> BatchRunner<'a, D, B> {
    pub fn new(processor: PageProcessor<'a, D, B>) -> Self {
        Self { processor }
    }

    pub async fn run(&self, input_dir: &Path) -> Result<BatchResult> {
        let mut entries = Vec::new();
        let dir = std::fs::read_dir(input_dir)
            .with_context(|| format!("failed to read input directory: {}", input_dir.display()))?;
        for entry in dir {
            let entry = entry.with_context(|| "failed to read directory entry")?;
            if entry
                .file_type()
                .with_context(|| "failed to read file type")?
                .is_file()
            {
                entries.push(entry.path());
            }
        }
        // Filename order keeps page ordering deterministic across platforms.
        entries.sort();

        let mut result = BatchResult::default();
        for path in entries {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            if !is_image_file(&path) {
                debug!(%filename, "skipping non-image entry");
                continue;
            }
            match self.processor.process(&path).await {
                PageOutcome::Done { output } => {
                    let name = output
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or(filename);
                    result.processed.push(name);
                }
                PageOutcome::Aborted { reason } => {
                    result.skipped.push(SkippedPage { filename, reason });
                }
            }
        }

        info!(
            processed = result.processed.len(),
            skipped = result.skipped.len(),
            "batch finished"
        );
        Ok(result)
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
