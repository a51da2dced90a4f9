use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::Command;

pub(super) fn list_tesseract_languages() -> Result<Vec<String>> {
    let output = Command::new("tesseract")
        .arg("--list-langs")
        .output()
        .with_context(|| "failed to run tesseract --list-langs")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("tesseract --list-langs failed: {}", stderr.trim()));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    // First line is the "List of available languages" banner.
    let langs = stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    Ok(langs)
}

/// Reduce a `+`-joined language hint to the models this tesseract install
/// actually has. When the install cannot be queried the hint is passed
/// through unchanged and tesseract itself reports any problem.
pub(super) fn normalize_ocr_languages(requested: &str) -> Result<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("ocr language hint is empty"));
    }

    let available = match list_tesseract_languages() {
        Ok(list) => list,
        Err(_) => return Ok(trimmed.to_string()),
    };

    let mut chosen = Vec::new();
    let mut missing = Vec::new();
    for raw in trimmed.split(['+', ',', ' ']) {
        let lang = raw.trim();
        if lang.is_empty() {
            continue;
        }
        if available.iter().any(|value| value == lang) {
            chosen.push(lang.to_string());
        } else {
            missing.push(lang.to_string());
        }
    }

    if chosen.is_empty() {
        return Err(anyhow!(
            "ocr language(s) not available: {} (available: {})",
            missing.join(", "),
            available.join(", ")
        ));
    }
    if !missing.is_empty() {
        tracing::warn!(
            "ocr language(s) not available: {} (continuing with: {})",
            missing.join(", "),
            chosen.join("+")
        );
    }

    Ok(chosen.join("+"))
}

/// Word-level recognition: one TSV row per token with bbox and confidence.
pub(super) fn run_tesseract_tsv(path: &Path, languages: &str) -> Result<String> {
    run_tesseract(path, languages, "tsv")
}

/// Plain recognition: the page's full text as one string.
pub(super) fn run_tesseract_text(path: &Path, languages: &str) -> Result<String> {
    run_tesseract(path, languages, "txt")
}

fn run_tesseract(path: &Path, languages: &str, config: &str) -> Result<String> {
    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(languages)
        .arg("--oem")
        .arg("1")
        .arg(config)
        .output()
        .with_context(|| "failed to run tesseract (is it installed?)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("tesseract failed: {}", stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
