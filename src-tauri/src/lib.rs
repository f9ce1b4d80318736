pub mod ai;
pub mod app;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod error;
pub mod queue;
pub mod rename;
pub mod services;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with RUST_LOG env filter
///
/// Default: warn for most crates, info for this app (queue and archive
/// summaries visible). Use RUST_LOG=debug for per-request logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,caption_pack_lib=info")),
        )
        .try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use tauri::{Emitter, Manager};

    use crate::ai::{Captioner, VisionClient};
    use crate::app::AppController;
    use crate::config::CaptionConfig;
    use crate::queue::QueueItemView;
    use crate::services::QueueListener;

    config::load_dotenv();
    init_tracing();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = CaptionConfig::from_env();
            if let Err(e) = config.validate() {
                tracing::warn!("{}; images will fail to caption", e);
            }
            let captioner: Arc<dyn Captioner> = Arc::new(VisionClient::new(config));

            let handle = app.handle().clone();
            let listener: QueueListener = Arc::new(move |snapshot: Vec<QueueItemView>| {
                if let Err(e) = handle.emit("queue-changed", snapshot) {
                    tracing::warn!("Failed to emit queue update: {}", e);
                }
            });

            let (controller, worker) = AppController::new(captioner, Some(listener));
            tauri::async_runtime::spawn(worker.run());
            app.manage(controller);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Queue commands
            commands::enqueue_files,
            commands::clear_queue,
            commands::get_queue,
            commands::get_preview,
            commands::get_accepted_extensions,
            // Rename and archive commands
            commands::get_rename_settings,
            commands::set_rename_settings,
            commands::preview_renames,
            commands::download_archive,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
