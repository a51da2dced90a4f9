use std::path::Path;
use tracing::warn;
use ttf_parser::{Face, name_id};

/// Font used for overlay text. Resolution never fails: when the preferred
/// font file is missing or unreadable the rasterizer falls back to whatever
/// the system font database offers.
#[derive(Debug, Clone, Default)]
pub struct OverlayFont {
    data: Option<Vec<u8>>,
    family: Option<String>,
}

impl OverlayFont {
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }
}

pub fn resolve_overlay_font(font_path: Option<&Path>, font_family: Option<&str>) -> OverlayFont {
    let mut font = OverlayFont {
        data: None,
        family: font_family.map(str::to_string),
    };

    let Some(path) = font_path else {
        return font;
    };
    match std::fs::read(path) {
        Ok(data) => {
            if let Some(family) = extract_family_name(&data) {
                font.family = Some(family);
            }
            font.data = Some(data);
        }
        Err(err) => {
            warn!(
                "failed to read font {} ({}); falling back to system fonts",
                path.display(),
                err
            );
        }
    }
    font
}

fn extract_family_name(data: &[u8]) -> Option<String> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    for index in 0..count {
        let Ok(face) = Face::parse(data, index) else {
            continue;
        };
        let mut fallback = None;
        for name in face.names() {
            if name.name_id == name_id::TYPOGRAPHIC_FAMILY {
                if let Some(value) = name.to_string() {
                    return Some(value);
                }
            } else if name.name_id == name_id::FAMILY && fallback.is_none() {
                fallback = name.to_string();
            }
        }
        if fallback.is_some() {
            return fallback;
        }
    }
    None
}
