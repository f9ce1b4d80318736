use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::file::IncomingFile;
use super::preview::PreviewHandle;

/// Opaque identifier of a queue item, unique for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a queue item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Waiting for the caption worker
    Idle,
    /// Caption request in flight
    Processing,
    /// Caption stored
    Done,
    /// Caption request failed
    Error,
}

impl ItemStatus {
    /// Transitions only move forward: idle -> processing -> done | error
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Processing)
                | (Self::Processing, Self::Done)
                | (Self::Processing, Self::Error)
        )
    }
}

/// One ingested file plus its derived caption and status.
///
/// Fields are private so the caption/status pairing can only change
/// through the transition methods.
#[derive(Debug, Clone)]
pub struct QueueItem {
    id: ItemId,
    file: IncomingFile,
    preview: PreviewHandle,
    caption: Option<String>,
    status: ItemStatus,
    error: Option<String>,
    added_at: DateTime<Utc>,
}

impl QueueItem {
    pub(crate) fn new(file: IncomingFile, preview: PreviewHandle) -> Self {
        Self {
            id: ItemId::new(),
            file,
            preview,
            caption: None,
            status: ItemStatus::Idle,
            error: None,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn file(&self) -> &IncomingFile {
        &self.file
    }

    pub fn preview(&self) -> PreviewHandle {
        self.preview
    }

    /// Present iff the status is `Done`
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub(crate) fn mark_processing(&mut self) -> bool {
        self.transition(ItemStatus::Processing)
    }

    pub(crate) fn mark_done(&mut self, caption: String) -> bool {
        if !self.transition(ItemStatus::Done) {
            return false;
        }
        self.caption = Some(caption);
        true
    }

    pub(crate) fn mark_error(&mut self, message: String) -> bool {
        if !self.transition(ItemStatus::Error) {
            return false;
        }
        self.error = Some(message);
        true
    }

    fn transition(&mut self, next: ItemStatus) -> bool {
        if !self.status.can_transition_to(next) {
            tracing::warn!(
                id = %self.id,
                from = ?self.status,
                to = ?next,
                "Rejected queue item status transition"
            );
            return false;
        }
        self.status = next;
        true
    }

    pub fn view(&self) -> QueueItemView {
        QueueItemView {
            id: self.id,
            name: self.file.name().to_string(),
            media_type: self.file.media_type().to_string(),
            size: self.file.size(),
            preview: self.preview,
            status: self.status,
            caption: self.caption.clone(),
            error: self.error.clone(),
            added_at: self.added_at,
        }
    }
}

/// Serializable item snapshot sent to the frontend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItemView {
    pub id: ItemId,
    pub name: String,
    pub media_type: String,
    pub size: usize,
    pub preview: PreviewHandle,
    pub status: ItemStatus,
    pub caption: Option<String>,
    pub error: Option<String>,
    pub added_at: DateTime<Utc>,
}
