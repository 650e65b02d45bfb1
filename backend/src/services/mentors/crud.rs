use crate::db::mentors;
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::mentor::Mentor;
use common::requests::{MentorUpdate, NewMentor};
use log::info;
use rusqlite::Connection;

pub(crate) async fn list(state: web::Data<AppState>, _caller: Guarded<AdminOnly>) -> AppResult<HttpResponse> {
    let all = state.db.run(|conn| Ok(mentors::list(conn)?)).await?;
    Ok(HttpResponse::Ok().json(all))
}

pub(crate) async fn get(
    state: web::Data<AppState>,
    mentor_id: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let mentor_id = mentor_id.into_inner();
    let mentor = state.db.run(move |conn| find_mentor(conn, &mentor_id)).await?;
    Ok(HttpResponse::Ok().json(mentor))
}

pub(crate) async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewMentor>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    let mentor = state.db.run(move |conn| create_mentor(conn, &request)).await?;
    info!("created mentor record {}", mentor.mentor_id);
    Ok(HttpResponse::Created().json(mentor))
}

pub(crate) async fn update(
    state: web::Data<AppState>,
    mentor_id: web::Path<String>,
    body: web::Json<MentorUpdate>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let mentor_id = mentor_id.into_inner();
    let request = body.into_inner();
    let mentor = state
        .db
        .run(move |conn| update_mentor(conn, &mentor_id, &request))
        .await?;
    Ok(HttpResponse::Ok().json(mentor))
}

pub(crate) async fn delete(
    state: web::Data<AppState>,
    mentor_id: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let mentor_id = mentor_id.into_inner();
    state
        .db
        .run(move |conn| {
            if mentors::delete(conn, &mentor_id)? == 0 {
                return Err(not_found());
            }
            info!("deleted mentor record {}", mentor_id);
            Ok(())
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

fn not_found() -> AppError {
    AppError::NotFound("Mentor not found.".to_string())
}

pub(crate) fn find_mentor(conn: &Connection, mentor_id: &str) -> AppResult<Mentor> {
    mentors::find(conn, mentor_id)?.ok_or_else(not_found)
}

fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::BadRequest(format!("{} is required.", field)))
    } else {
        Ok(value)
    }
}

pub(crate) fn create_mentor(conn: &Connection, request: &NewMentor) -> AppResult<Mentor> {
    let mentor_id = required("Mentor ID", &request.mentor_id)?;
    let name = required("Name", &request.name)?;
    let email = required("Email", &request.email)?;
    if mentors::exists(conn, mentor_id)? {
        return Err(AppError::Conflict(format!(
            "A mentor with ID '{}' already exists.",
            mentor_id
        )));
    }
    mentors::insert(conn, mentor_id, name, email, None)?;
    find_mentor(conn, mentor_id)
}

pub(crate) fn update_mentor(conn: &Connection, mentor_id: &str, request: &MentorUpdate) -> AppResult<Mentor> {
    let current = find_mentor(conn, mentor_id)?;
    let name = match request.name.as_deref() {
        Some(name) => required("Name", name)?,
        None => current.name.as_str(),
    };
    let email = match request.email.as_deref() {
        Some(email) => required("Email", email)?,
        None => current.email.as_str(),
    };
    mentors::set_name_and_email(conn, mentor_id, name, email)?;
    find_mentor(conn, mentor_id)
}
