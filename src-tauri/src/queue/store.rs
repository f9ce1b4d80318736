use serde::Serialize;
use tracing::{debug, info};

use super::file::IncomingFile;
use super::item::{ItemId, ItemStatus, QueueItem, QueueItemView};
use super::preview::{PreviewHandle, PreviewRegistry, PreviewSource};
use crate::error::CaptionError;

/// Maximum number of items the queue holds
pub const MAX_QUEUE_SIZE: usize = 200;

/// Result of an enqueue call. Overflow is reported, never raised.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueOutcome {
    pub accepted: Vec<ItemId>,
    pub dropped: usize,
}

/// Work handed to the caption worker
#[derive(Debug, Clone)]
pub struct CaptionJob {
    pub id: ItemId,
    pub file: IncomingFile,
}

/// In-memory queue of ingested files.
///
/// At most one item is in flight: `begin_caption` refuses while another
/// caption request is outstanding.
#[derive(Debug, Default)]
pub struct QueueStore {
    items: Vec<QueueItem>,
    previews: PreviewRegistry,
    in_flight: Option<ItemId>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append files as idle items, keeping existing items and the first
    /// new files that fit under `MAX_QUEUE_SIZE`.
    pub fn enqueue(&mut self, files: impl IntoIterator<Item = IncomingFile>) -> EnqueueOutcome {
        let room = MAX_QUEUE_SIZE.saturating_sub(self.items.len());
        let mut outcome = EnqueueOutcome::default();

        for file in files {
            if outcome.accepted.len() >= room {
                outcome.dropped += 1;
                continue;
            }
            let preview = self.previews.register(&file);
            let item = QueueItem::new(file, preview);
            debug!(id = %item.id(), name = item.file().name(), "Enqueued file");
            outcome.accepted.push(item.id());
            self.items.push(item);
        }

        info!(
            accepted = outcome.accepted.len(),
            dropped = outcome.dropped,
            total = self.items.len(),
            "Files added to queue"
        );
        outcome
    }

    /// Release every preview and empty the queue
    pub fn clear(&mut self) -> usize {
        let released = self.previews.release_all();
        let removed = self.items.len();
        self.items.clear();
        info!(removed, released, "Queue cleared");
        removed
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn preview(&self, handle: PreviewHandle) -> Option<&PreviewSource> {
        self.previews.get(handle)
    }

    pub fn in_flight(&self) -> Option<ItemId> {
        self.in_flight
    }

    /// First idle image in insertion order. Non-image items are never
    /// captioned and are skipped so they cannot stall the queue.
    pub fn next_captionable(&self) -> Option<ItemId> {
        self.items
            .iter()
            .find(|item| item.status() == ItemStatus::Idle && item.file().is_image())
            .map(QueueItem::id)
    }

    /// Flip an idle image to processing and hand out its bytes.
    ///
    /// No-op for unknown ids, non-images, non-idle items, or while another
    /// request is in flight.
    pub fn begin_caption(&mut self, id: ItemId) -> Option<CaptionJob> {
        if self.in_flight.is_some() {
            return None;
        }
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        if !item.file().is_image() || !item.mark_processing() {
            return None;
        }
        self.in_flight = Some(id);
        Some(CaptionJob {
            id,
            file: item.file().clone(),
        })
    }

    /// Record the outcome of a caption request. Returns false when the item
    /// was cleared while its request was in flight.
    pub fn complete_caption(&mut self, id: ItemId, result: Result<String, CaptionError>) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
        }
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            debug!(%id, "Caption result for cleared item discarded");
            return false;
        };
        match result {
            Ok(caption) => item.mark_done(caption),
            Err(e) => item.mark_error(e.to_string()),
        }
    }

    pub fn snapshot(&self) -> Vec<QueueItemView> {
        self.items.iter().map(QueueItem::view).collect()
    }
}
