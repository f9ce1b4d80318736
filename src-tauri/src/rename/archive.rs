//! Zip packaging of renamed files.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::RenamedEntry;
use crate::error::{AppError, Result};

/// Name of the downloaded archive
pub const ARCHIVE_FILE_NAME: &str = "captioned-images.zip";

const ARCHIVE_STEM: &str = "captioned-images";
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Write every entry's original bytes under its new name into a flat zip
pub fn build_archive(entries: &[RenamedEntry]) -> Result<Vec<u8>> {
    if entries.is_empty() {
        return Err(AppError::EmptyBatch);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        // Flat archive: a caption can never introduce a directory
        let name = entry.new_name.replace(['/', '\\'], "-");
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&entry.bytes)
            .map_err(|e| AppError::ArchiveBuild(format!("write {} failed: {}", name, e)))?;
    }

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    tracing::info!(files = entries.len(), bytes = bytes.len(), "Built archive");
    Ok(bytes)
}

/// First archive path in `dir` that does not exist yet:
/// `captioned-images.zip`, then `captioned-images (1).zip`, ...
async fn available_archive_path(dir: &Path) -> Result<PathBuf> {
    for n in 0..MAX_NAME_ATTEMPTS {
        let name = if n == 0 {
            ARCHIVE_FILE_NAME.to_string()
        } else {
            format!("{} ({}).zip", ARCHIVE_STEM, n)
        };
        let path = dir.join(name);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }
    }
    Err(AppError::ArchiveBuild(format!(
        "no free archive name in {}",
        dir.display()
    )))
}

/// Save archive bytes into `dir` without replacing an earlier download.
///
/// Written to a temporary sibling first and renamed into place, so a failed
/// write never leaves a partial archive behind.
pub async fn save_archive(bytes: &[u8], dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let tmp_path = dir.join(format!("{}.{}.tmp", ARCHIVE_FILE_NAME, std::process::id()));

    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(AppError::ArchiveBuild(format!(
            "failed to write {}: {}",
            tmp_path.display(),
            e
        )));
    }

    let out_path = match available_archive_path(dir).await {
        Ok(path) => path,
        Err(e) => {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&tmp_path, &out_path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(AppError::ArchiveBuild(format!(
            "failed to move archive into place: {}",
            e
        )));
    }

    tracing::info!(path = %out_path.display(), "Archive saved");
    Ok(out_path)
}
