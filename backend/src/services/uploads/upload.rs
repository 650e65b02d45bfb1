//! `POST /api/admin/uploads/{kind}`
//!
//! Only the multipart field named `file` is read; any other field is drained
//! and ignored. The file is buffered in memory up to the configured size
//! limit, then validated, stored and reconciled in one blocking call.

use super::parse_kind;
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Guarded};
use crate::ingest;
use crate::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    kind: web::Path<String>,
    caller: Guarded<AdminOnly>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let kind = parse_kind(&kind)?;
    let (file_name, bytes) = read_file_field(payload, state.config.max_upload_bytes).await?;
    info!(
        "'{}' uploading {} file '{}' ({} bytes)",
        caller.session.username,
        kind.as_str(),
        file_name,
        bytes.len()
    );

    let report = state
        .db
        .run(move |conn| ingest::ingest_upload(conn, kind, &file_name, &bytes))
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Returns the file name and bytes of the first `file` field.
async fn read_file_field(mut payload: Multipart, limit: usize) -> AppResult<(String, Vec<u8>)> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(multipart_error)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() == Some("file") && file.is_none() {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                .unwrap_or_default();
            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(multipart_error)?;
                if bytes.len() + chunk.len() > limit {
                    return Err(AppError::BadRequest(format!(
                        "The uploaded file is larger than {} bytes.",
                        limit
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            file = Some((file_name, bytes));
        } else {
            while let Some(chunk) = field.next().await {
                chunk.map_err(multipart_error)?;
            }
        }
    }

    file.ok_or_else(|| AppError::BadRequest("Please select a CSV file to upload.".to_string()))
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart payload: {}", e))
}
