//! Document metadata operations.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};

use super::Database;
use super::models::{Document, DocumentStatus};
use crate::error::{DatabaseError, ServiceResult};

impl Database {
    /// Insert a new document row with status `Queued`.
    ///
    /// The id is assigned by SQLite and the upload time is set here, so the
    /// returned record is exactly what a subsequent lookup would produce.
    pub fn insert_document(&self, filename: &str, s3_path: &str) -> ServiceResult<Document> {
        let conn = self.conn.lock().unwrap();

        let upload_time = Utc::now();
        let status = DocumentStatus::Queued;

        conn.execute(
            "INSERT INTO documents (filename, s3_path, upload_time, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                filename,
                s3_path,
                upload_time.to_rfc3339(),
                status.as_str()
            ],
        )
        .map_err(DatabaseError::Query)?;

        Ok(Document {
            id: conn.last_insert_rowid(),
            filename: filename.to_string(),
            s3_path: s3_path.to_string(),
            upload_time,
            status,
        })
    }

    /// Get a document by id
    pub fn get_document(&self, id: i64) -> ServiceResult<Option<Document>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, filename, s3_path, upload_time, status FROM documents WHERE id = ?1",
            params![id],
            |row| Document::from_row(row),
        )
        .optional()
        .map_err(DatabaseError::Query)
        .map_err(Into::into)
    }

    /// Update a document's status. Returns false if no row matched.
    pub fn update_document_status(&self, id: i64, status: DocumentStatus) -> ServiceResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows = conn
            .execute(
                "UPDATE documents SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )
            .map_err(DatabaseError::Query)?;

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("depot.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let (_dir, db) = open_test_db();

        let first = db.insert_document("a.txt", "a.txt").unwrap();
        let second = db.insert_document("b.txt", "b.txt").unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert_eq!(first.status, DocumentStatus::Queued);
    }

    #[test]
    fn test_insert_then_get_roundtrip() {
        let (_dir, db) = open_test_db();

        let inserted = db.insert_document("report.pdf", "report.pdf").unwrap();
        let fetched = db.get_document(inserted.id).unwrap().unwrap();

        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.filename, "report.pdf");
        assert_eq!(fetched.s3_path, "report.pdf");
        assert_eq!(fetched.status, DocumentStatus::Queued);
        assert_eq!(
            fetched.upload_time.timestamp(),
            inserted.upload_time.timestamp()
        );
    }

    #[test]
    fn test_get_missing_document_is_none() {
        let (_dir, db) = open_test_db();
        assert!(db.get_document(99999).unwrap().is_none());
    }

    #[test]
    fn test_status_update_persists() {
        let (_dir, db) = open_test_db();

        let doc = db.insert_document("a.txt", "a.txt").unwrap();

        assert!(
            db.update_document_status(doc.id, DocumentStatus::Processing)
                .unwrap()
        );
        let fetched = db.get_document(doc.id).unwrap().unwrap();
        assert_eq!(fetched.status, DocumentStatus::Processing);

        assert!(
            db.update_document_status(doc.id, DocumentStatus::Processed)
                .unwrap()
        );
        let fetched = db.get_document(doc.id).unwrap().unwrap();
        assert_eq!(fetched.status, DocumentStatus::Processed);
    }

    #[test]
    fn test_status_update_for_missing_row_returns_false() {
        let (_dir, db) = open_test_db();
        assert!(
            !db.update_document_status(42, DocumentStatus::Failed)
                .unwrap()
        );
    }

    #[test]
    fn test_unparseable_upload_time_still_loads() {
        let (_dir, db) = open_test_db();

        db.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO documents (filename, s3_path, upload_time, status) VALUES ('a.txt', 'a.txt', 'not-a-timestamp', 'queued')",
                [],
            )
            .unwrap();

        let doc = db.get_document(1).unwrap().unwrap();
        assert_eq!(doc.filename, "a.txt");
        assert_eq!(doc.status, DocumentStatus::Queued);
    }

    #[test]
    fn test_duplicate_filenames_get_distinct_rows() {
        // No deduplication: uploading the same name twice creates two rows
        let (_dir, db) = open_test_db();

        let first = db.insert_document("a.txt", "a.txt").unwrap();
        let second = db.insert_document("a.txt", "a.txt").unwrap();

        assert_ne!(first.id, second.id);
        assert!(db.get_document(first.id).unwrap().is_some());
        assert!(db.get_document(second.id).unwrap().is_some());
    }
}
