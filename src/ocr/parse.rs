use std::collections::HashMap;

use super::TextRegion;

#[derive(Clone)]
struct WordToken {
    text: String,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    conf: f32,
    len: usize,
}

/// Turn tesseract TSV output into line-level regions.
///
/// Word rows (level 5) carrying the same (page, block, paragraph, line) key
/// are joined into one region with a union bounding box and a length-weighted
/// average confidence. Rows with negative confidence are layout artifacts and
/// are dropped. Regions come back in reading order (top-to-bottom, then
/// left-to-right) so downstream output is deterministic.
pub(super) fn parse_tsv_regions(tsv: &str) -> Vec<TextRegion> {
    let mut word_map: HashMap<(i32, i32, i32, i32), Vec<WordToken>> = HashMap::new();

    for (idx, row) in tsv.lines().enumerate() {
        if idx == 0 {
            // Header row.
            continue;
        }
        let cols = row.split('\t').collect::<Vec<_>>();
        if cols.len() < 12 {
            continue;
        }
        let level: i32 = cols[0].parse().unwrap_or(0);
        if level != 5 {
            continue;
        }
        let page_num: i32 = cols[1].parse().unwrap_or(0);
        let block_num: i32 = cols[2].parse().unwrap_or(0);
        let par_num: i32 = cols[3].parse().unwrap_or(0);
        let line_num: i32 = cols[4].parse().unwrap_or(0);
        let left: u32 = cols[6].parse().unwrap_or(0);
        let top: u32 = cols[7].parse().unwrap_or(0);
        let width: u32 = cols[8].parse().unwrap_or(0);
        let height: u32 = cols[9].parse().unwrap_or(0);
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();
        if text.is_empty() || conf < 0.0 || width == 0 || height == 0 {
            continue;
        }

        let key = (page_num, block_num, par_num, line_num);
        word_map.entry(key).or_default().push(WordToken {
            text: text.to_string(),
            x: left,
            y: top,
            width,
            height,
            conf,
            len: text.chars().count().max(1),
        });
    }

    let mut regions = Vec::new();
    for (_, mut words) in word_map {
        words.sort_by_key(|word| word.x);
        if let Some(region) = build_region(&words) {
            regions.push(region);
        }
    }
    regions.sort_by_key(|region| (region.y, region.x));
    regions
}

fn build_region(words: &[WordToken]) -> Option<TextRegion> {
    if words.is_empty() {
        return None;
    }

    let mut text = String::new();
    let mut last_token = "";
    for word in words {
        if !text.is_empty() && needs_space(last_token, &word.text) {
            text.push(' ');
        }
        text.push_str(&word.text);
        last_token = &word.text;
    }
    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let x = words.iter().map(|w| w.x).min()?;
    let y = words.iter().map(|w| w.y).min()?;
    let right = words.iter().map(|w| w.x + w.width).max()?;
    let bottom = words.iter().map(|w| w.y + w.height).max()?;

    let mut conf_sum = 0.0;
    let mut len_sum = 0.0;
    for word in words {
        let weight = word.len as f32;
        conf_sum += word.conf * weight;
        len_sum += weight;
    }
    let confidence = if len_sum > 0.0 {
        (conf_sum / len_sum).round() as i32
    } else {
        0
    };

    Some(TextRegion {
        x,
        y,
        width: right - x,
        height: bottom - y,
        text,
        confidence,
    })
}

/// CJK scripts are written without inter-word spaces; only insert one when
/// neither side of the join is CJK.
fn needs_space(prev: &str, next: &str) -> bool {
    let prev_cjk = prev.chars().last().is_some_and(is_cjk_or_kana);
    let next_cjk = next.chars().next().is_some_and(is_cjk_or_kana);
    !prev_cjk && !next_cjk
}

fn is_cjk_or_kana(ch: char) -> bool {
    matches!(
        ch as u32,
        0x4E00..=0x9FFF | 0x3040..=0x30FF | 0x31F0..=0x31FF | 0x3400..=0x4DBF | 0xAC00..=0xD7AF
    )
}
