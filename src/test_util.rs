use anyhow::anyhow;
use image::RgbaImage;
use std::path::{Path, PathBuf};

use crate::ocr::{RegionDetect, RegionMode, TextRegion};
use crate::providers::{BackendFuture, TranslateBackend};

pub(crate) fn solid_page(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba(rgba))
}

pub(crate) fn write_page(dir: &Path, name: &str, page: RgbaImage) -> PathBuf {
    let path = dir.join(name);
    page.save(&path).expect("write test page");
    path
}

/// Detector returning a canned region list for every page.
pub(crate) struct StaticDetector {
    regions: Vec<TextRegion>,
    fail: bool,
}

impl StaticDetector {
    pub(crate) fn new(regions: Vec<TextRegion>) -> Self {
        Self {
            regions,
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            regions: Vec::new(),
            fail: true,
        }
    }
}

impl RegionDetect for StaticDetector {
    fn detect(
        &self,
        _page: &RgbaImage,
        _language_hint: &str,
        _mode: RegionMode,
    ) -> anyhow::Result<Vec<TextRegion>> {
        if self.fail {
            return Err(anyhow!("ocr engine unavailable"));
        }
        Ok(self.regions.clone())
    }
}

#[derive(Clone)]
pub(crate) enum StubBackend {
    Fixed(String),
    Fail,
}

impl StubBackend {
    pub(crate) fn fixed(text: &str) -> Self {
        StubBackend::Fixed(text.to_string())
    }
}

impl TranslateBackend for StubBackend {
    fn translate(&self, _text: &str, _source_lang: &str, _target_lang: &str) -> BackendFuture {
        let stub = self.clone();
        Box::pin(async move {
            match stub {
                StubBackend::Fixed(text) => Ok(text),
                StubBackend::Fail => Err(anyhow!("backend unavailable")),
            }
        })
    }
}
