use anyhow::{Context, Result, anyhow};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Extract every file entry of a zip into `dest`, flattened to basenames.
/// `dest` is created and cleared first so nothing from a previous run leaks
/// into this one. Returns the number of files written.
pub fn extract_zip(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).with_context(|| "failed to read zip archive")?;
    if archive.is_empty() {
        return Err(anyhow!("zip archive is empty"));
    }

    clean_dir(dest)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .with_context(|| "failed to read zip entry")?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let Some(basename) = Path::new(&name).file_name() else {
            continue;
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .with_context(|| format!("failed to read zip entry: {}", name))?;
        std::fs::write(dest.join(basename), data)
            .with_context(|| format!("failed to extract zip entry: {}", name))?;
        count += 1;
    }
    Ok(count)
}

/// Build a zip holding each file by basename only; no directory structure is
/// preserved.
pub fn pack_zip(paths: &[PathBuf]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    for path in paths {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("output path has no filename: {}", path.display()))?;
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read output file: {}", path.display()))?;
        writer
            .start_file(name, options)
            .with_context(|| "failed to write zip entry")?;
        writer
            .write_all(&data)
            .with_context(|| "failed to write zip content")?;
    }
    let bytes = writer
        .finish()
        .with_context(|| "failed to finalize zip output")?
        .into_inner();
    Ok(bytes)
}

/// Ensure `path` exists and holds no regular files. Stale extracted or
/// translated files from an earlier request must not survive into the next.
pub fn clean_dir(path: &Path) -> Result<()> {
    if path.exists() {
        let entries = std::fs::read_dir(path)
            .with_context(|| format!("failed to read directory: {}", path.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| "failed to read directory entry")?;
            if entry.path().is_file() {
                std::fs::remove_file(entry.path()).with_context(|| {
                    format!("failed to remove stale file: {}", entry.path().display())
                })?;
            }
        }
    } else {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}
