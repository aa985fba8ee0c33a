//! Service coordinator wiring the metadata store, object store, and job
//! queue together.

mod upload;
mod worker;

use std::sync::Arc;

use crate::config::StaticConfig;
use crate::db::Database;
use crate::queue::JobQueue;
use crate::store::ObjectStorage;

/// Main service coordinator, constructed once at startup and shared by the
/// HTTP handlers and the processing worker
pub struct DepotService {
    pub config: Arc<StaticConfig>,
    pub db: Arc<Database>,
    pub store: Arc<dyn ObjectStorage>,
    pub queue: JobQueue,
}

impl DepotService {
    pub fn new(
        config: Arc<StaticConfig>,
        db: Arc<Database>,
        store: Arc<dyn ObjectStorage>,
        queue: JobQueue,
    ) -> Self {
        Self {
            config,
            db,
            store,
            queue,
        }
    }
}
