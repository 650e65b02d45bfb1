//! `DELETE /api/admin/uploads/{kind}/{batch_id}`
//!
//! Reverses the batch, then drops any live session of the accounts it
//! removed so their tokens stop working immediately.

use super::parse_kind;
use crate::error::AppResult;
use crate::guard::{AdminOnly, Guarded};
use crate::ingest::reversal;
use crate::AppState;
use actix_web::{web, HttpResponse};
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
    caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let (kind, batch_id) = path.into_inner();
    let kind = parse_kind(&kind)?;
    let reversal = state
        .db
        .run(move |conn| reversal::delete_batch(conn, kind, batch_id))
        .await?;

    let revoked = state
        .sessions
        .revoke_identities(&reversal.deleted_identities)
        .await;
    info!(
        "'{}' deleted {} batch {} ({} sessions revoked)",
        caller.session.username,
        kind.as_str(),
        batch_id,
        revoked
    );
    Ok(HttpResponse::Ok().json(reversal.report))
}
