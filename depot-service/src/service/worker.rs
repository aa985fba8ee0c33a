//! Background worker consuming the job queue.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::db::{Document, DocumentStatus};
use crate::error::ServiceResult;
use crate::queue::JobConsumer;
use crate::service::DepotService;
use crate::store::ObjectStorage;

impl DepotService {
    /// Start the document processing worker.
    /// This should be called once on server startup.
    pub fn start_processing_worker(service: Arc<DepotService>, mut consumer: JobConsumer) {
        tokio::spawn(async move {
            info!("Document processing worker started");
            while let Some(document_id) = consumer.recv().await {
                service.process_document(document_id).await;
            }
            info!("Job queue closed, document processing worker stopping");
        });
    }

    /// Process a single queued document (called by the worker).
    ///
    /// Every invocation leaves the row at Processed or Failed, with one
    /// exception: when the row no longer exists the job is dropped and no
    /// status is written. Failures never propagate to the uploader; they are
    /// only visible through the status endpoint.
    pub(crate) async fn process_document(&self, document_id: i64) {
        let document = match self.db.get_document(document_id) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                warn!(doc_id = document_id, "Document not found, dropping job");
                return;
            }
            Err(e) => {
                error!(doc_id = document_id, error = %e, "Failed to load document for processing");
                return;
            }
        };

        // A terminal status never changes again; a redelivered job for an
        // already-finished document is dropped
        if document.status.is_terminal() {
            warn!(
                doc_id = document_id,
                status = document.status.as_str(),
                "Document already in a terminal state, dropping job"
            );
            return;
        }

        // Persist the Processing status before touching the object store so
        // status polls see it immediately
        if let Err(e) = self
            .db
            .update_document_status(document_id, DocumentStatus::Processing)
        {
            error!(doc_id = document_id, error = %e, "Failed to mark document as processing");
            self.mark_failed(document_id);
            return;
        }
        info!(doc_id = document_id, filename = %document.filename, "Processing document");

        match self.run_extraction(&document).await {
            Ok(bytes_read) => {
                info!(
                    doc_id = document_id,
                    filename = %document.filename,
                    bytes = bytes_read,
                    "Extracted content"
                );
                if let Err(e) = self
                    .db
                    .update_document_status(document_id, DocumentStatus::Processed)
                {
                    warn!(doc_id = document_id, error = %e, "Failed to mark document as processed");
                }
                info!(doc_id = document_id, "Finished processing document");
            }
            Err(e) => {
                error!(doc_id = document_id, error = %e, "Document processing failed");
                self.mark_failed(document_id);
            }
        }
    }

    async fn run_extraction(&self, document: &Document) -> ServiceResult<usize> {
        let content = self.store.get_object(&document.s3_path).await?;
        Ok(extract_content(&document.filename, &content))
    }

    fn mark_failed(&self, document_id: i64) {
        if let Err(e) = self
            .db
            .update_document_status(document_id, DocumentStatus::Failed)
        {
            warn!(doc_id = document_id, error = %e, "Failed to mark document as failed");
        }
    }
}

/// Extension point for real document processing (text extraction, indexing,
/// and so on). Currently only measures the fetched content.
fn extract_content(_filename: &str, content: &[u8]) -> usize {
    content.len()
}
