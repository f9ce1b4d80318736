//! Queue commands
//!
//! File picker and drag-drop both hand paths to `enqueue_files`; the worker
//! picks new images up on its own.

use std::path::PathBuf;
use tauri::State;

use crate::app::AppController;
use crate::queue::{EnqueueOutcome, PreviewHandle, QueueItemView, ACCEPTED_EXTENSIONS};

/// Add dropped or picked files to the queue
#[tauri::command]
pub async fn enqueue_files(
    paths: Vec<String>,
    state: State<'_, AppController>,
) -> Result<EnqueueOutcome, String> {
    let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
    Ok(state.enqueue_paths(&paths).await)
}

/// Remove every item and release its preview
#[tauri::command]
pub async fn clear_queue(state: State<'_, AppController>) -> Result<usize, String> {
    Ok(state.clear().await)
}

/// Current queue snapshot
#[tauri::command]
pub async fn get_queue(state: State<'_, AppController>) -> Result<Vec<QueueItemView>, String> {
    Ok(state.snapshot().await)
}

/// Preview image for an item as a data URL
#[tauri::command]
pub async fn get_preview(
    handle: PreviewHandle,
    size: Option<u32>,
    state: State<'_, AppController>,
) -> Result<String, String> {
    state
        .preview(handle, size)
        .await
        .ok_or_else(|| "Preview has been released".to_string())
}

/// Extensions for the file picker filter
#[tauri::command]
pub fn get_accepted_extensions() -> Vec<&'static str> {
    ACCEPTED_EXTENSIONS.to_vec()
}
