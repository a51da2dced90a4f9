use anyhow::anyhow;
use image::RgbaImage;
use std::io::{Cursor, Write};
use std::path::Path;

use manga_translator_rust::languages;
use manga_translator_rust::ocr::{RegionDetect, RegionMode, TextRegion};
use manga_translator_rust::pipeline::{BatchRunner, PageProcessor};
use manga_translator_rust::providers::{BackendFuture, TranslateBackend};
use manga_translator_rust::render::{OverlayFont, RedrawStyle};
use manga_translator_rust::settings::Settings;
use manga_translator_rust::translator::Translator;
use manga_translator_rust::{RequestError, translate_archive};

/// Reports one region for pages at least 64 px wide, nothing for smaller
/// pages. Lets one batch exercise both the translated and the
/// no-text-found paths.
struct SizeGatedDetector;

impl RegionDetect for SizeGatedDetector {
    fn detect(
        &self,
        page: &RgbaImage,
        _language_hint: &str,
        _mode: RegionMode,
    ) -> anyhow::Result<Vec<TextRegion>> {
        if page.width() < 64 {
            return Ok(Vec::new());
        }
        Ok(vec![TextRegion {
            x: 8,
            y: 8,
            width: 40,
            height: 16,
            text: "こんにちは".to_string(),
            confidence: 92,
        }])
    }
}

#[derive(Clone)]
struct EchoBackend;

impl TranslateBackend for EchoBackend {
    fn translate(&self, text: &str, _source_lang: &str, target_lang: &str) -> BackendFuture {
        let translated = format!("{} [{}]", text, target_lang);
        Box::pin(async move { Ok(translated) })
    }
}

fn solid_page(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]))
}

fn png_bytes(page: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    page.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(name.to_string(), zip::write::FileOptions::default())
            .expect("zip entry");
        writer.write_all(data).expect("zip content");
    }
    writer.finish().expect("zip finish").into_inner()
}

fn test_settings(root: &Path) -> Settings {
    Settings {
        upload_dir: root.join("uploads").to_string_lossy().to_string(),
        output_dir: root.join("output").to_string_lossy().to_string(),
        ..Settings::default()
    }
}

#[tokio::test]
async fn batch_isolates_failures_and_reports_outcomes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::create_dir_all(&output).unwrap();

    solid_page(64, 64).save(input.join("page1.png")).unwrap();
    solid_page(32, 32).save(input.join("blank.png")).unwrap();
    std::fs::write(input.join("corrupt.jpg"), b"not an image").unwrap();
    std::fs::write(input.join("notes.txt"), "ignore me").unwrap();

    let detector = SizeGatedDetector;
    let translator = Translator::new(EchoBackend, "en");
    let style = RedrawStyle::default();
    let font = OverlayFont::default();
    let processor = PageProcessor::new(
        &detector,
        &translator,
        languages::default_profile(),
        RegionMode::PerRegion,
        &style,
        &font,
        &output,
    );

    let result = BatchRunner::new(processor).run(&input).await.expect("run");
    let json = serde_json::to_string(&result).expect("serialize");
    insta::assert_snapshot!(
        json,
        @r#"{"processed":["page1.png"],"skipped":[{"filename":"blank.png","reason":"no_text_found"},{"filename":"corrupt.jpg","reason":"decode_error"}]}"#
    );
}

#[tokio::test]
async fn archive_round_trip_produces_flat_zip_of_translated_pages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = test_settings(dir.path());

    let zip_bytes = zip_with(&[
        ("chapter/page1.png", png_bytes(&solid_page(96, 64)).as_slice()),
        ("notes.txt", b"not an image"),
    ]);

    let detector = SizeGatedDetector;
    let (packaged, result) = translate_archive(
        &settings,
        &detector,
        EchoBackend,
        &zip_bytes,
        "ja",
        Some(RegionMode::PerRegion),
    )
    .await
    .expect("translate archive");

    assert_eq!(result.processed, vec!["page1.png"]);
    assert!(result.skipped.is_empty());

    let mut archive = zip::ZipArchive::new(Cursor::new(packaged)).expect("reopen output zip");
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.by_index(0).unwrap().name(), "page1.png");
}

#[tokio::test]
async fn archive_requests_are_validated_before_any_page_work() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = test_settings(dir.path());
    let detector = SizeGatedDetector;

    let err = translate_archive(&settings, &detector, EchoBackend, b"", "ja", None)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::BadRequest(_)));

    let err = translate_archive(
        &settings,
        &detector,
        EchoBackend,
        b"plain text, not a zip",
        "ja",
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RequestError::BadRequest(_)));

    let zip_bytes = zip_with(&[("page1.png", png_bytes(&solid_page(96, 64)).as_slice())]);
    let err = translate_archive(&settings, &detector, EchoBackend, &zip_bytes, "xx", None)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::BadRequest(_)));
}

#[tokio::test]
async fn batch_where_every_page_fails_is_an_empty_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = test_settings(dir.path());
    let detector = SizeGatedDetector;

    // Both pages are below the detector's size gate: no text anywhere.
    let zip_bytes = zip_with(&[
        ("a.png", png_bytes(&solid_page(32, 32)).as_slice()),
        ("b.png", png_bytes(&solid_page(16, 16)).as_slice()),
    ]);

    let err = translate_archive(&settings, &detector, EchoBackend, &zip_bytes, "ja", None)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::NoPagesTranslated));
}

#[derive(Clone)]
struct FailingBackend;

impl TranslateBackend for FailingBackend {
    fn translate(&self, _text: &str, _source_lang: &str, _target_lang: &str) -> BackendFuture {
        Box::pin(async move { Err(anyhow!("backend down")) })
    }
}

#[tokio::test]
async fn backend_failure_still_yields_a_complete_archive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = test_settings(dir.path());
    let detector = SizeGatedDetector;

    let zip_bytes = zip_with(&[("page1.png", png_bytes(&solid_page(96, 64)).as_slice())]);
    let (packaged, result) = translate_archive(
        &settings,
        &detector,
        FailingBackend,
        &zip_bytes,
        "ja",
        Some(RegionMode::PerRegion),
    )
    .await
    .expect("sentinel text must not fail the request");

    assert_eq!(result.processed, vec!["page1.png"]);
    assert!(!packaged.is_empty());
}
