use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::file::IncomingFile;

/// Display-only reference to an item's bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PreviewHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes a preview is rendered from
#[derive(Debug, Clone)]
pub struct PreviewSource {
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// Live preview handles. A released handle no longer resolves.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: HashMap<PreviewHandle, PreviewSource>,
}

impl PreviewRegistry {
    pub fn register(&mut self, file: &IncomingFile) -> PreviewHandle {
        let handle = PreviewHandle::new();
        self.entries.insert(
            handle,
            PreviewSource {
                media_type: file.media_type().to_string(),
                bytes: Arc::clone(file.bytes()),
            },
        );
        handle
    }

    pub fn get(&self, handle: PreviewHandle) -> Option<&PreviewSource> {
        self.entries.get(&handle)
    }

    pub fn release_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}
