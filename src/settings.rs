use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ocr::{DEFAULT_CONFIDENCE_THRESHOLD, RegionMode};
use crate::render::{OverlayFont, RedrawStyle, resolve_overlay_font};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone)]
pub struct Settings {
    pub default_lang_code: String,
    pub target_lang: String,
    pub mode: RegionMode,
    pub confidence_threshold: i32,
    pub overlay_text_color: String,
    pub overlay_fill_color: String,
    pub overlay_stroke_color: String,
    pub overlay_font_size: Option<f32>,
    pub overlay_font_family: Option<String>,
    pub overlay_font_path: Option<String>,
    pub server_addr: String,
    pub upload_dir: String,
    pub output_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_lang_code: "ja".to_string(),
            target_lang: "en".to_string(),
            mode: RegionMode::WholePage,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            overlay_text_color: "#000000".to_string(),
            overlay_fill_color: "#ffffff".to_string(),
            overlay_stroke_color: "#000000".to_string(),
            overlay_font_size: None,
            overlay_font_family: None,
            overlay_font_path: None,
            server_addr: "0.0.0.0:5000".to_string(),
            upload_dir: "uploads".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

impl Settings {
    pub fn overlay_style(&self) -> RedrawStyle {
        RedrawStyle {
            text_color: self.overlay_text_color.clone(),
            fill_color: self.overlay_fill_color.clone(),
            stroke_color: self.overlay_stroke_color.clone(),
            font_size: self
                .overlay_font_size
                .unwrap_or(crate::render::DEFAULT_FONT_SIZE),
        }
    }

    pub fn overlay_font(&self) -> OverlayFont {
        resolve_overlay_font(
            self.overlay_font_path.as_deref().map(Path::new),
            self.overlay_font_family.as_deref(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    pipeline: Option<PipelineSettings>,
    overlay: Option<OverlaySettings>,
    server: Option<ServerSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineSettings {
    lang_code: Option<String>,
    target_lang: Option<String>,
    mode: Option<String>,
    confidence_threshold: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct OverlaySettings {
    text_color: Option<String>,
    fill_color: Option<String>,
    stroke_color: Option<String>,
    font_size: Option<f32>,
    font_family: Option<String>,
    font_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    addr: Option<String>,
    upload_dir: Option<String>,
    output_dir: Option<String>,
}

/// Load settings in layers: embedded defaults, then `settings.toml` and
/// `settings.local.toml` from the working directory, then an explicit extra
/// file. Later layers win per key.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let embedded = parse_settings(DEFAULT_SETTINGS_TOML)
        .with_context(|| "failed to parse embedded default settings")?;
    apply(&mut settings, embedded)?;

    for name in ["settings.toml", "settings.local.toml"] {
        let path = PathBuf::from(name);
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        let parsed = parse_settings(&content)
            .with_context(|| format!("failed to parse settings: {}", path.display()))?;
        apply(&mut settings, parsed)?;
    }

    if let Some(path) = extra_path {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        let parsed = parse_settings(&content)
            .with_context(|| format!("failed to parse settings: {}", path.display()))?;
        apply(&mut settings, parsed)?;
    }

    Ok(settings)
}

fn parse_settings(content: &str) -> Result<SettingsFile> {
    toml::from_str(content).map_err(|err| anyhow!(err))
}

fn apply(settings: &mut Settings, file: SettingsFile) -> Result<()> {
    if let Some(pipeline) = file.pipeline {
        if let Some(lang_code) = pipeline.lang_code {
            settings.default_lang_code = lang_code;
        }
        if let Some(target_lang) = pipeline.target_lang {
            settings.target_lang = target_lang;
        }
        if let Some(mode) = pipeline.mode {
            settings.mode = mode.parse().map_err(|err: String| anyhow!(err))?;
        }
        if let Some(threshold) = pipeline.confidence_threshold {
            settings.confidence_threshold = threshold;
        }
    }
    if let Some(overlay) = file.overlay {
        if let Some(color) = overlay.text_color {
            settings.overlay_text_color = color;
        }
        if let Some(color) = overlay.fill_color {
            settings.overlay_fill_color = color;
        }
        if let Some(color) = overlay.stroke_color {
            settings.overlay_stroke_color = color;
        }
        if overlay.font_size.is_some() {
            settings.overlay_font_size = overlay.font_size;
        }
        if overlay.font_family.is_some() {
            settings.overlay_font_family = overlay.font_family;
        }
        if overlay.font_path.is_some() {
            settings.overlay_font_path = overlay.font_path;
        }
    }
    if let Some(server) = file.server {
        if let Some(addr) = server.addr {
            settings.server_addr = addr;
        }
        if let Some(dir) = server.upload_dir {
            settings.upload_dir = dir;
        }
        if let Some(dir) = server.output_dir {
            settings.output_dir = dir;
        }
    }
    Ok(())
}
