pub mod caption_worker;
pub mod thumbnails;

pub use caption_worker::{CaptionWorker, QueueListener, SharedQueue};
