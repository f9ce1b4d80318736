//! Ingestion queue
//!
//! Holds every file the user dropped or picked, its lifecycle status and its
//! caption. `QueueStore` is the only mutation surface.

mod file;
mod item;
mod preview;
mod store;

pub use file::{is_accepted_extension, IncomingFile, ACCEPTED_EXTENSIONS};
pub use item::{ItemId, ItemStatus, QueueItem, QueueItemView};
pub use preview::{PreviewHandle, PreviewRegistry, PreviewSource};
pub use store::{CaptionJob, EnqueueOutcome, QueueStore, MAX_QUEUE_SIZE};
