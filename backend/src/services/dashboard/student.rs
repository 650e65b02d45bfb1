//! The profile update is validated as a whole: every problem is returned in
//! one 400 so the form can show them together. Roll number, email and mentor
//! stay under admin control and cannot be changed here.

use crate::db::{mentors, students};
use crate::error::{AppError, AppResult};
use crate::guard::{Guarded, StudentOnly};
use crate::services::access;
use crate::session::Session;
use crate::validators;
use crate::AppState;
use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use common::model::mentor::MentorInfo;
use common::model::student::Student;
use common::reports::StudentDashboard;
use common::requests::ProfileUpdate;
use log::info;
use rusqlite::Connection;

pub(crate) async fn dashboard(state: web::Data<AppState>, caller: Guarded<StudentOnly>) -> AppResult<HttpResponse> {
    let session = caller.session;
    let view = state
        .db
        .run(move |conn| student_dashboard(conn, &session))
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub(crate) async fn update_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileUpdate>,
    caller: Guarded<StudentOnly>,
) -> AppResult<HttpResponse> {
    let session = caller.session;
    let update = body.into_inner();
    let today = Local::now().date_naive();
    let student = state
        .db
        .run(move |conn| save_profile(conn, &session, &update, today))
        .await?;
    Ok(HttpResponse::Ok().json(student))
}

fn student_dashboard(conn: &Connection, session: &Session) -> AppResult<StudentDashboard> {
    let student = access::own_student(conn, session)?;
    let mentor = match student.mentor_id.as_deref() {
        Some(mentor_id) => mentors::find(conn, mentor_id)?.as_ref().map(MentorInfo::from),
        None => None,
    };
    Ok(StudentDashboard { student, mentor })
}

fn save_profile(
    conn: &Connection,
    session: &Session,
    update: &ProfileUpdate,
    today: NaiveDate,
) -> AppResult<Student> {
    let student = access::own_student(conn, session)?;
    let name = update.name.trim();
    let mut problems = Vec::new();
    if name.is_empty() {
        problems.push("Name is required.".to_string());
    }
    if let Err(mut found) = validators::validate_profile(&update.profile, today) {
        problems.append(&mut found);
    }
    if !problems.is_empty() {
        return Err(AppError::BadRequest(problems.join(" ")));
    }

    students::update_profile(conn, &student.roll_number, name, &update.profile)?;
    info!("{} updated their profile", student.roll_number);
    students::find(conn, &student.roll_number)?
        .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))
}
