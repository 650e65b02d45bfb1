use crate::db::academics;
use crate::error::{AppError, AppResult};
use crate::guard::{Guarded, MentorOnly, StudentOnly};
use crate::services::access;
use crate::session::Session;
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::academics::Project;
use common::requests::{GradeRequest, NewProject};
use log::info;
use rusqlite::Connection;

pub(crate) async fn own(state: web::Data<AppState>, caller: Guarded<StudentOnly>) -> AppResult<HttpResponse> {
    let session = caller.session;
    let projects = state
        .db
        .run(move |conn| {
            let student = access::own_student(conn, &session)?;
            Ok(academics::projects_for_student(conn, &student.roll_number)?)
        })
        .await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub(crate) async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewProject>,
    caller: Guarded<StudentOnly>,
) -> AppResult<HttpResponse> {
    let session = caller.session;
    let project = body.into_inner();
    let created = state
        .db
        .run(move |conn| add_project(conn, &session, &project))
        .await?;
    Ok(HttpResponse::Created().json(created))
}

pub(crate) async fn delete(
    state: web::Data<AppState>,
    project_id: web::Path<i64>,
    caller: Guarded<StudentOnly>,
) -> AppResult<HttpResponse> {
    let project_id = project_id.into_inner();
    let session = caller.session;
    state
        .db
        .run(move |conn| remove_project(conn, &session, project_id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub(crate) async fn for_student(
    state: web::Data<AppState>,
    roll_number: web::Path<String>,
    caller: Guarded<MentorOnly>,
) -> AppResult<HttpResponse> {
    let roll_number = roll_number.into_inner();
    let session = caller.session;
    let projects = state
        .db
        .run(move |conn| {
            let mentor = access::own_mentor(conn, &session)?;
            let student = access::assigned_student(conn, &mentor, &roll_number)?;
            Ok(academics::projects_for_student(conn, &student.roll_number)?)
        })
        .await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub(crate) async fn grade(
    state: web::Data<AppState>,
    project_id: web::Path<i64>,
    body: web::Json<GradeRequest>,
    caller: Guarded<MentorOnly>,
) -> AppResult<HttpResponse> {
    let project_id = project_id.into_inner();
    let grade = body.into_inner().grade;
    let session = caller.session;
    let project = state
        .db
        .run(move |conn| grade_project(conn, &session, project_id, &grade))
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found.".to_string())
}

fn add_project(conn: &Connection, session: &Session, project: &NewProject) -> AppResult<Project> {
    if project.title.trim().is_empty() {
        return Err(AppError::BadRequest("Project title is required.".to_string()));
    }
    let student = access::own_student(conn, session)?;
    let created = academics::insert_project(conn, &student.roll_number, project)?;
    info!("{} added project {}", student.roll_number, created.id);
    Ok(created)
}

/// Students can only delete their own projects; anyone else's looks absent.
fn remove_project(conn: &Connection, session: &Session, project_id: i64) -> AppResult<()> {
    let student = access::own_student(conn, session)?;
    let project = academics::find_project(conn, project_id)?
        .filter(|p| p.roll_number == student.roll_number)
        .ok_or_else(not_found)?;
    academics::delete_project(conn, project.id)?;
    Ok(())
}

fn grade_project(conn: &Connection, session: &Session, project_id: i64, grade: &str) -> AppResult<Project> {
    let grade = grade.trim();
    if grade.is_empty() {
        return Err(AppError::BadRequest("Grade is required.".to_string()));
    }
    let mentor = access::own_mentor(conn, session)?;
    let project = academics::find_project(conn, project_id)?.ok_or_else(not_found)?;
    access::assigned_student(conn, &mentor, &project.roll_number)?;

    academics::set_project_grade(conn, project.id, grade)?;
    info!("{} graded project {} as {}", mentor.mentor_id, project.id, grade);
    academics::find_project(conn, project.id)?.ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{identities, mentors, students, test_connection};
    use common::model::identity::Role;

    struct Fixture {
        conn: Connection,
        student: Session,
        other_student: Session,
        mentor: Session,
    }

    fn session(identity_id: i64, role: Role) -> Session {
        Session {
            identity_id,
            username: String::new(),
            role,
        }
    }

    fn setup() -> Fixture {
        let conn = test_connection();
        let m = identities::create(&conn, "M001", "a@x.in", "pw").unwrap();
        mentors::insert(&conn, "M001", "Asha Rao", "a@x.in", Some(m.id)).unwrap();
        let s1 = identities::create(&conn, "123A1234", "p@x.in", "pw").unwrap();
        let s2 = identities::create(&conn, "123A1235", "q@x.in", "pw").unwrap();
        students::insert(&conn, "123A1234", "Priya Nair", "p@x.in", Some(s1.id), Some("M001")).unwrap();
        students::insert(&conn, "123A1235", "Ravi Kumar", "q@x.in", Some(s2.id), None).unwrap();
        Fixture {
            conn,
            student: session(s1.id, Role::Student),
            other_student: session(s2.id, Role::Student),
            mentor: session(m.id, Role::Mentor),
        }
    }

    fn project(title: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: "Attendance tracker".to_string(),
            semester: 4,
            technologies: "Rust, SQLite".to_string(),
            repository_link: None,
        }
    }

    #[test]
    fn students_manage_only_their_projects() {
        let f = setup();
        let created = add_project(&f.conn, &f.student, &project("Tracker")).unwrap();
        assert_eq!(created.roll_number, "123A1234");

        assert!(matches!(
            remove_project(&f.conn, &f.other_student, created.id),
            Err(AppError::NotFound(_))
        ));
        remove_project(&f.conn, &f.student, created.id).unwrap();
        assert!(academics::find_project(&f.conn, created.id).unwrap().is_none());
    }

    #[test]
    fn mentor_grades_assigned_students_only() {
        let f = setup();
        let mine = add_project(&f.conn, &f.student, &project("Tracker")).unwrap();
        let theirs = add_project(&f.conn, &f.other_student, &project("Chat")).unwrap();

        let graded = grade_project(&f.conn, &f.mentor, mine.id, "A").unwrap();
        assert_eq!(graded.grade.as_deref(), Some("A"));
        assert!(matches!(
            grade_project(&f.conn, &f.mentor, theirs.id, "B"),
            Err(AppError::Forbidden(_))
        ));
    }
}
