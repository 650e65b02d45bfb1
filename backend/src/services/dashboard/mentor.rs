use crate::db::students;
use crate::error::AppResult;
use crate::guard::{Guarded, MentorOnly};
use crate::services::access;
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::reports::MentorDashboard;

pub(crate) async fn dashboard(state: web::Data<AppState>, caller: Guarded<MentorOnly>) -> AppResult<HttpResponse> {
    let session = caller.session;
    let view = state
        .db
        .run(move |conn| {
            let mentor = access::own_mentor(conn, &session)?;
            let assigned = students::list_by_mentor(conn, &mentor.mentor_id)?;
            Ok(MentorDashboard {
                mentor,
                students: assigned,
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(view))
}
