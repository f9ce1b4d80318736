//! Application controller
//!
//! Owns the queue, the rename settings and the worker wake-up signal. Every
//! queue mutation goes through here so the worker and the frontend listener
//! are always told about it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, RwLock};

use crate::ai::Captioner;
use crate::error::{AppError, Result};
use crate::queue::{is_accepted_extension, EnqueueOutcome, IncomingFile, PreviewHandle, QueueItemView, QueueStore};
use crate::rename::{self, RenameSettings, RenamedEntry};
use crate::services::thumbnails::render_preview;
use crate::services::{CaptionWorker, QueueListener, SharedQueue};

pub struct AppController {
    queue: SharedQueue,
    settings: RwLock<RenameSettings>,
    wake: Arc<Notify>,
    listener: Option<QueueListener>,
    packing: AtomicBool,
}

impl AppController {
    /// Create the controller and the worker that serves it.
    /// The caller spawns `CaptionWorker::run` on its runtime.
    pub fn new(captioner: Arc<dyn Captioner>, listener: Option<QueueListener>) -> (Self, CaptionWorker) {
        let queue: SharedQueue = Arc::new(Mutex::new(QueueStore::new()));
        let wake = Arc::new(Notify::new());

        let worker = CaptionWorker::new(
            Arc::clone(&queue),
            captioner,
            Arc::clone(&wake),
            listener.clone(),
        );

        let controller = Self {
            queue,
            settings: RwLock::new(RenameSettings::default()),
            wake,
            listener,
            packing: AtomicBool::new(false),
        };

        (controller, worker)
    }

    /// Add files to the queue and wake the worker
    pub async fn enqueue(&self, files: Vec<IncomingFile>) -> EnqueueOutcome {
        let (outcome, snapshot) = {
            let mut queue = self.queue.lock().await;
            let outcome = queue.enqueue(files);
            (outcome, queue.snapshot())
        };
        self.publish(snapshot);
        self.wake.notify_one();
        outcome
    }

    /// Read files from disk and enqueue them. Unreadable paths are skipped.
    pub async fn enqueue_paths(&self, paths: &[PathBuf]) -> EnqueueOutcome {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            if !is_accepted_extension(path.extension().and_then(|e| e.to_str())) {
                tracing::info!(path = %path.display(), "Not a supported image type, it will stay uncaptioned");
            }
            match IncomingFile::from_path(path).await {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable file"),
            }
        }
        self.enqueue(files).await
    }

    /// Release all previews and empty the queue
    pub async fn clear(&self) -> usize {
        let (removed, snapshot) = {
            let mut queue = self.queue.lock().await;
            let removed = queue.clear();
            (removed, queue.snapshot())
        };
        self.publish(snapshot);
        removed
    }

    pub async fn snapshot(&self) -> Vec<QueueItemView> {
        self.queue.lock().await.snapshot()
    }

    /// Preview for a live handle as a `data:` URL
    pub async fn preview(&self, handle: PreviewHandle, size: Option<u32>) -> Option<String> {
        let source = self.queue.lock().await.preview(handle).cloned()?;
        tokio::task::spawn_blocking(move || render_preview(&source, size))
            .await
            .ok()
    }

    pub async fn settings(&self) -> RenameSettings {
        *self.settings.read().await
    }

    pub async fn update_settings(&self, settings: RenameSettings) -> Result<RenameSettings> {
        settings.validate()?;
        *self.settings.write().await = settings;
        tracing::debug!(?settings, "Rename settings updated");
        Ok(settings)
    }

    /// Final names of the captioned items under `settings`
    pub async fn plan_renames(&self, settings: &RenameSettings) -> Result<Vec<RenamedEntry>> {
        let queue = self.queue.lock().await;
        rename::plan_renames(queue.items(), settings)
    }

    /// Zip every captioned item under its new name
    pub async fn build_archive(&self, settings: &RenameSettings) -> Result<Vec<u8>> {
        let entries = self.plan_renames(settings).await?;
        tokio::task::spawn_blocking(move || rename::build_archive(&entries))
            .await
            .map_err(|e| AppError::ArchiveBuild(e.to_string()))?
    }

    /// Build the archive with the current settings and save it into `dir`
    pub async fn download_archive(&self, dir: &Path) -> Result<PathBuf> {
        if self.packing.swap(true, Ordering::SeqCst) {
            return Err(AppError::ArchiveBuild(
                "an archive is already being built".to_string(),
            ));
        }
        let _guard = PackingGuard(&self.packing);

        let settings = self.settings().await;
        let bytes = self.build_archive(&settings).await?;
        rename::save_archive(&bytes, dir).await
    }

    pub fn is_packing(&self) -> bool {
        self.packing.load(Ordering::SeqCst)
    }

    fn publish(&self, snapshot: Vec<QueueItemView>) {
        if let Some(listener) = &self.listener {
            listener(snapshot);
        }
    }
}

/// Clears the packing flag however the download ends
struct PackingGuard<'a>(&'a AtomicBool);

impl Drop for PackingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Where downloads are saved: the user's download folder, else home
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::VisionClient;
    use crate::config::CaptionConfig;
    use crate::error::CaptionError;
    use crate::queue::{ItemStatus, MAX_QUEUE_SIZE};
    use crate::rename::ARCHIVE_FILE_NAME;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::{Cursor, Read};
    use std::time::Duration;

    /// Captions by file content lookup, unknown content fails
    struct TableCaptioner(HashMap<Vec<u8>, String>);

    #[async_trait]
    impl Captioner for TableCaptioner {
        async fn caption(&self, image: &[u8], _media_type: &str) -> std::result::Result<String, CaptionError> {
            self.0
                .get(image)
                .cloned()
                .ok_or_else(|| CaptionError::MalformedResponse("unknown image".to_string()))
        }
    }

    fn controller(table: &[(&str, &str)]) -> (AppController, CaptionWorker) {
        let table = table
            .iter()
            .map(|(content, text)| (content.as_bytes().to_vec(), text.to_string()))
            .collect();
        AppController::new(Arc::new(TableCaptioner(table)), None)
    }

    async fn drain(worker: &CaptionWorker) {
        while worker.process_next().await {}
    }

    fn archive_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_caption_and_download_scenario() {
        let (app, worker) = controller(&[("jpeg-bytes", "Blue sky over mountains")]);
        app.enqueue(vec![IncomingFile::new("IMG_0042.jpg", "image/jpeg", b"jpeg-bytes".to_vec())])
            .await;
        drain(&worker).await;

        let snapshot = app.snapshot().await;
        assert_eq!(snapshot[0].status, ItemStatus::Done);
        assert_eq!(snapshot[0].caption.as_deref(), Some("blue-sky-over-mountains"));

        app.update_settings(RenameSettings::new(5, 3).unwrap()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = app.download_archive(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join(ARCHIVE_FILE_NAME));
        assert!(!app.is_packing());

        let mut archive = zip::ZipArchive::new(Cursor::new(std::fs::read(path).unwrap())).unwrap();
        assert_eq!(archive.len(), 1);
        let mut file = archive.by_index(0).unwrap();
        assert_eq!(file.name(), "blue-sky-over-mountains-005.jpg");
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_download_with_nothing_done_is_empty_batch() {
        let (app, _worker) = controller(&[]);
        app.enqueue(vec![IncomingFile::new("a.jpg", "image/jpeg", b"x".to_vec())])
            .await;

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            app.download_archive(dir.path()).await,
            Err(AppError::EmptyBatch)
        ));
        assert!(!app.is_packing());
        assert!(!dir.path().join(ARCHIVE_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_non_image_stays_idle_and_is_excluded() {
        let (app, worker) = controller(&[("png", "cat")]);
        app.enqueue(vec![
            IncomingFile::new("readme.txt", "text/plain", b"text".to_vec()),
            IncomingFile::new("cat.png", "image/png", b"png".to_vec()),
        ])
        .await;
        drain(&worker).await;

        let snapshot = app.snapshot().await;
        assert_eq!(snapshot[0].status, ItemStatus::Idle);
        assert_eq!(snapshot[1].status, ItemStatus::Done);

        let bytes = app.build_archive(&RenameSettings::default()).await.unwrap();
        assert_eq!(archive_names(bytes), vec!["cat-01.png"]);
    }

    #[tokio::test]
    async fn test_failed_caption_excluded_from_archive() {
        let (app, worker) = controller(&[("one", "first shot"), ("three", "third shot")]);
        app.enqueue(vec![
            IncomingFile::new("1.jpg", "image/jpeg", b"one".to_vec()),
            IncomingFile::new("2.jpg", "image/jpeg", b"two".to_vec()),
            IncomingFile::new("3.JPG", "image/jpeg", b"three".to_vec()),
        ])
        .await;
        drain(&worker).await;

        let snapshot = app.snapshot().await;
        assert_eq!(snapshot[1].status, ItemStatus::Error);
        assert!(snapshot[1].caption.is_none());

        let bytes = app.build_archive(&RenameSettings::new(1, 1).unwrap()).await.unwrap();
        assert_eq!(archive_names(bytes), vec!["first-shot-1.jpg", "third-shot-2.JPG"]);
    }

    #[tokio::test]
    async fn test_enqueue_overflow_is_silent() {
        let (app, _worker) = controller(&[]);
        let files: Vec<_> = (0..MAX_QUEUE_SIZE + 5)
            .map(|i| IncomingFile::new(format!("{i}.jpg"), "image/jpeg", vec![0u8]))
            .collect();

        let outcome = app.enqueue(files).await;
        assert_eq!(outcome.dropped, 5);
        assert_eq!(app.snapshot().await.len(), MAX_QUEUE_SIZE);
    }

    #[tokio::test]
    async fn test_clear_releases_previews() {
        let (app, _worker) = controller(&[]);
        app.enqueue(vec![IncomingFile::new("a.heic", "image/heic", b"raw".to_vec())])
            .await;
        let handle = app.snapshot().await[0].preview;
        assert!(app.preview(handle, None).await.is_some());

        assert_eq!(app.clear().await, 1);
        assert!(app.snapshot().await.is_empty());
        assert!(app.preview(handle, None).await.is_none());
    }

    #[tokio::test]
    async fn test_enqueue_paths_skips_unreadable() {
        let (app, worker) = controller(&[("png-bytes", "Green Field")]);
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("field.png");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&photo, b"png-bytes").unwrap();
        std::fs::write(&notes, b"hello").unwrap();

        let outcome = app
            .enqueue_paths(&[photo, dir.path().join("missing.jpg"), notes])
            .await;
        assert_eq!(outcome.accepted.len(), 2);
        drain(&worker).await;

        let snapshot = app.snapshot().await;
        assert_eq!(snapshot[0].name, "field.png");
        assert_eq!(snapshot[0].media_type, "image/png");
        assert_eq!(snapshot[0].caption.as_deref(), Some("green-field"));
        assert_eq!(snapshot[1].name, "notes.txt");
        assert_eq!(snapshot[1].status, ItemStatus::Idle);
    }

    #[tokio::test]
    async fn test_missing_api_key_marks_item_error() {
        let client = VisionClient::new(CaptionConfig::new(""));
        let (app, worker) = AppController::new(Arc::new(client), None);
        app.enqueue(vec![IncomingFile::new("a.jpg", "image/jpeg", b"jpeg".to_vec())])
            .await;
        drain(&worker).await;

        let snapshot = app.snapshot().await;
        assert_eq!(snapshot[0].status, ItemStatus::Error);
        assert!(snapshot[0].error.as_deref().unwrap().contains("CAPTION_API_KEY"));
        assert!(matches!(
            app.build_archive(&RenameSettings::default()).await,
            Err(AppError::EmptyBatch)
        ));
    }

    #[tokio::test]
    async fn test_invalid_settings_rejected() {
        let (app, _worker) = controller(&[]);
        let bad = RenameSettings {
            start_number: 1,
            zero_pad: 5,
        };
        assert!(app.update_settings(bad).await.is_err());
        assert_eq!(app.settings().await, RenameSettings::default());
    }

    #[tokio::test]
    async fn test_spawned_worker_wakes_on_enqueue() {
        let (app, worker) = controller(&[("late", "Late Arrival")]);
        let handle = tokio::spawn(worker.run());

        // Let the worker park on the empty queue first
        tokio::time::sleep(Duration::from_millis(20)).await;
        app.enqueue(vec![IncomingFile::new("late.png", "image/png", b"late".to_vec())])
            .await;

        let mut caption = None;
        for _ in 0..100 {
            caption = app.snapshot().await[0].caption.clone();
            if caption.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert_eq!(caption.as_deref(), Some("late-arrival"));
    }
}
