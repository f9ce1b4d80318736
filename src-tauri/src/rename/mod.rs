//! Caption sanitization and batch renaming
//!
//! Turns model output into filename-safe tokens and computes the final
//! `<caption>-<sequence><extension>` names for captioned items.

pub mod archive;
mod settings;

pub use archive::{build_archive, save_archive, ARCHIVE_FILE_NAME};
pub use settings::{RenameSettings, ZERO_PAD_RANGE};

use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::queue::{ItemId, ItemStatus, QueueItem};

/// Maximum caption length kept in a filename
pub const MAX_CAPTION_LEN: usize = 190;

/// Used when the model answers without any usable text
pub const PLACEHOLDER_CAPTION: &str = "untitled-image";

/// Sanitize raw model text into a filename token.
///
/// - Lower-cases the text
/// - Replaces each whitespace run with a single hyphen
/// - Drops every character outside `[a-z0-9-]`
/// - Truncates to `MAX_CAPTION_LEN`
///
/// Returns an empty string when nothing survives.
pub fn sanitize_caption(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    let mut result = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                result.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            result.push(c);
        }
    }

    // Only ASCII remains, byte truncation is safe
    result.truncate(MAX_CAPTION_LEN);
    result
}

/// Sanitize model text, substituting the placeholder when nothing is left
pub fn caption_or_placeholder(raw: &str) -> String {
    let caption = sanitize_caption(raw);
    if caption.is_empty() {
        PLACEHOLDER_CAPTION.to_string()
    } else {
        caption
    }
}

/// Extension of the original filename, from the last `.` inclusive.
/// Names without a dot have an empty extension.
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[pos..],
        None => "",
    }
}

/// Decimal sequence number left-padded with zeros to `width` digits.
/// Wider numbers are never truncated.
pub fn sequence_label(number: u64, width: usize) -> String {
    format!("{:0width$}", number, width = width)
}

/// A captioned file under its final archive name
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamedEntry {
    pub id: ItemId,
    pub original_name: String,
    pub new_name: String,
    #[serde(skip)]
    pub bytes: Arc<[u8]>,
}

/// Compute final names for every `done` item in queue order.
///
/// Numbering counts only the captioned items and starts at
/// `settings.start_number`.
pub fn plan_renames(items: &[QueueItem], settings: &RenameSettings) -> Result<Vec<RenamedEntry>> {
    settings.validate()?;

    let entries: Vec<RenamedEntry> = items
        .iter()
        .filter(|item| item.status() == ItemStatus::Done)
        .filter_map(|item| item.caption().map(|caption| (item, caption)))
        .enumerate()
        .map(|(index, (item, caption))| {
            let number = u64::from(settings.start_number) + index as u64;
            let original_name = item.file().name();
            let new_name = format!(
                "{}-{}{}",
                caption,
                sequence_label(number, settings.zero_pad),
                file_extension(original_name)
            );
            RenamedEntry {
                id: item.id(),
                original_name: original_name.to_string(),
                new_name,
                bytes: Arc::clone(item.file().bytes()),
            }
        })
        .collect();

    if entries.is_empty() {
        return Err(AppError::EmptyBatch);
    }
    Ok(entries)
}
