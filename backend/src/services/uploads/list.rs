use super::parse_kind;
use crate::db::batches;
use crate::error::AppResult;
use crate::guard::{AdminOnly, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    state: web::Data<AppState>,
    kind: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let kind = parse_kind(&kind)?;
    let listed = state
        .db
        .run(move |conn| Ok(batches::list(conn, kind)?))
        .await?;
    Ok(HttpResponse::Ok().json(listed))
}
