//! Document API endpoints: upload and status lookup.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use axum_extra::TypedHeader;
use axum_extra::headers::ContentLength;
use std::sync::Arc;

use crate::db::Document;
use crate::error::ServiceError;
use crate::service::DepotService;

/// Upload a new document.
///
/// Requires a `Content-Length` header; the declared size is checked against
/// the upload limit before any body bytes are read.
pub async fn upload_document_handler(
    State(service): State<Arc<DepotService>>,
    content_length: Option<TypedHeader<ContentLength>>,
    mut multipart: Multipart,
) -> Result<Json<Document>, ServiceError> {
    let TypedHeader(ContentLength(declared)) =
        content_length.ok_or(ServiceError::LengthRequired)?;

    let limit = service.config.limits.max_upload_bytes;
    if declared > limit {
        return Err(ServiceError::FileTooLarge {
            limit_mib: service.config.limits.max_upload_mib(),
        });
    }

    let mut file_data: Option<(Vec<u8>, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ServiceError::InvalidRequest {
                    message: e.to_string(),
                });
            }
        };

        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("document").to_string();
            let data = field.bytes().await.map_err(|e| ServiceError::InvalidRequest {
                message: e.to_string(),
            })?;
            file_data = Some((data.to_vec(), filename));
        }
    }

    let (data, filename) = file_data.ok_or_else(|| ServiceError::InvalidRequest {
        message: "No file provided".to_string(),
    })?;

    let document = service.upload_document(data, &filename).await?;

    Ok(Json(document))
}

/// Get the status and details of a specific document
pub async fn document_status_handler(
    State(service): State<Arc<DepotService>>,
    Path(document_id): Path<i64>,
) -> Result<Json<Document>, ServiceError> {
    let document = service
        .db
        .get_document(document_id)?
        .ok_or(ServiceError::DocumentNotFound { document_id })?;

    Ok(Json(document))
}
