//! Caption worker
//!
//! A single task that pulls the next idle image from the queue, marks it
//! in flight, awaits the vision API and writes the result back. It sleeps
//! on a `Notify` whenever there is nothing to do; every queue mutation
//! wakes it.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Notify};

use crate::ai::Captioner;
use crate::queue::{QueueItemView, QueueStore};
use crate::rename::caption_or_placeholder;

/// Queue shared between the controller and the worker
pub type SharedQueue = Arc<Mutex<QueueStore>>;

/// Receives a full queue snapshot after every mutation
pub type QueueListener = Arc<dyn Fn(Vec<QueueItemView>) + Send + Sync>;

pub struct CaptionWorker {
    queue: SharedQueue,
    captioner: Arc<dyn Captioner>,
    wake: Arc<Notify>,
    listener: Option<QueueListener>,
}

impl CaptionWorker {
    pub fn new(
        queue: SharedQueue,
        captioner: Arc<dyn Captioner>,
        wake: Arc<Notify>,
        listener: Option<QueueListener>,
    ) -> Self {
        Self {
            queue,
            captioner,
            wake,
            listener,
        }
    }

    /// Run until the task is dropped
    pub async fn run(self) {
        tracing::info!("Caption worker started");
        loop {
            if !self.process_next().await {
                self.wake.notified().await;
            }
        }
    }

    /// Caption the next eligible item. Returns false when nothing is ready.
    pub async fn process_next(&self) -> bool {
        let (job, snapshot) = {
            let mut queue = self.queue.lock().await;
            let Some(id) = queue.next_captionable() else {
                return false;
            };
            let Some(job) = queue.begin_caption(id) else {
                return false;
            };
            (job, queue.snapshot())
        };
        self.publish(snapshot);

        let started = Instant::now();
        let result = self
            .captioner
            .caption(job.file.bytes(), job.file.media_type())
            .await
            .map(|text| caption_or_placeholder(&text));

        match &result {
            Ok(caption) => tracing::info!(
                id = %job.id,
                name = job.file.name(),
                caption = caption.as_str(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Image captioned"
            ),
            Err(e) => tracing::warn!(
                id = %job.id,
                name = job.file.name(),
                error = %e,
                "Caption failed"
            ),
        }

        let snapshot = {
            let mut queue = self.queue.lock().await;
            queue.complete_caption(job.id, result);
            queue.snapshot()
        };
        self.publish(snapshot);
        true
    }

    fn publish(&self, snapshot: Vec<QueueItemView>) {
        if let Some(listener) = &self.listener {
            listener(snapshot);
        }
    }
}
