//! Document upload path.

use tracing::info;

use crate::db::Document;
use crate::error::ServiceResult;
use crate::service::DepotService;
use crate::store::ObjectStorage;

impl DepotService {
    /// Upload a document: write the bytes to the object store, insert the
    /// metadata row, then enqueue a processing job.
    ///
    /// The ordering is significant. The store write must fully succeed
    /// before the insert, so a row exists only when its bytes do; the insert
    /// must succeed before the enqueue, so the worker never receives an id
    /// it cannot resolve. A store failure therefore leaves no partial state
    /// and the caller must retry the whole upload.
    pub async fn upload_document(&self, content: Vec<u8>, filename: &str) -> ServiceResult<Document> {
        // The object key is the submitted filename, unsanitized. Name
        // collisions silently overwrite the previous object.
        let size = content.len();
        self.store.put_object(filename, content).await?;
        info!(filename = %filename, size, "Uploaded file to object store");

        let document = self.db.insert_document(filename, filename)?;

        self.queue.enqueue(document.id)?;
        info!(
            doc_id = document.id,
            filename = %filename,
            "Document queued for processing"
        );

        Ok(document)
    }
}
