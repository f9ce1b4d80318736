//! Rename and archive commands

use tauri::State;

use crate::app::{default_download_dir, AppController};
use crate::rename::{RenameSettings, RenamedEntry};

#[tauri::command]
pub async fn get_rename_settings(state: State<'_, AppController>) -> Result<RenameSettings, String> {
    Ok(state.settings().await)
}

#[tauri::command]
pub async fn set_rename_settings(
    settings: RenameSettings,
    state: State<'_, AppController>,
) -> Result<RenameSettings, String> {
    state.update_settings(settings).await.map_err(|e| e.to_string())
}

/// Names the archive would contain with the current settings
#[tauri::command]
pub async fn preview_renames(state: State<'_, AppController>) -> Result<Vec<RenamedEntry>, String> {
    let settings = state.settings().await;
    state.plan_renames(&settings).await.map_err(|e| e.to_string())
}

/// Build the archive and save it to the download folder. Returns its path.
#[tauri::command]
pub async fn download_archive(state: State<'_, AppController>) -> Result<String, String> {
    let dir = default_download_dir();
    let path = state.download_archive(&dir).await.map_err(|e| {
        tracing::error!("Archive download failed: {}", e);
        e.to_string()
    })?;
    Ok(path.to_string_lossy().to_string())
}
