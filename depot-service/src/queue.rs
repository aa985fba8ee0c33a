//! Job queue carrying document ids from the upload path to the processing
//! worker.
//!
//! The queue is an explicit enqueue/consume pair over an in-process channel.
//! Delivery is at-least-once within the process and per-document ordering is
//! not guaranteed; a network broker can replace this behind the same two
//! types. Once enqueued a job cannot be cancelled.

use tokio::sync::mpsc;

use crate::error::{ServiceError, ServiceResult};

/// Producer half, held by the upload path
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<i64>,
}

/// Consumer half, owned by the processing worker
pub struct JobConsumer {
    rx: mpsc::UnboundedReceiver<i64>,
}

/// Create a connected queue/consumer pair
pub fn job_queue() -> (JobQueue, JobConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (JobQueue { tx }, JobConsumer { rx })
}

impl JobQueue {
    /// Enqueue a document id for processing
    pub fn enqueue(&self, document_id: i64) -> ServiceResult<()> {
        self.tx
            .send(document_id)
            .map_err(|_| ServiceError::Queue {
                message: "processing worker is not running".to_string(),
            })
    }
}

impl JobConsumer {
    /// Receive the next document id, or `None` once all producers are gone
    pub async fn recv(&mut self) -> Option<i64> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_then_consume() {
        let (queue, mut consumer) = job_queue();

        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();

        assert_eq!(consumer.recv().await, Some(1));
        assert_eq!(consumer.recv().await, Some(2));
    }

    #[tokio::test]
    async fn test_enqueue_without_consumer_fails() {
        let (queue, consumer) = job_queue();
        drop(consumer);

        assert!(queue.enqueue(1).is_err());
    }

    #[tokio::test]
    async fn test_consumer_ends_when_producers_dropped() {
        let (queue, mut consumer) = job_queue();

        queue.enqueue(7).unwrap();
        drop(queue);

        assert_eq!(consumer.recv().await, Some(7));
        assert_eq!(consumer.recv().await, None);
    }

    #[tokio::test]
    async fn test_cloned_producers_share_the_channel() {
        let (queue, mut consumer) = job_queue();
        let other = queue.clone();

        queue.enqueue(1).unwrap();
        other.enqueue(2).unwrap();

        assert_eq!(consumer.recv().await, Some(1));
        assert_eq!(consumer.recv().await, Some(2));
    }
}
