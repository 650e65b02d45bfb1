use super::parse_kind;
use crate::db::batches;
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let (kind, batch_id) = path.into_inner();
    let kind = parse_kind(&kind)?;
    let detail = state
        .db
        .run(move |conn| {
            batches::detail(conn, kind, batch_id)?
                .ok_or_else(|| AppError::NotFound("File not found.".to_string()))
        })
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}
