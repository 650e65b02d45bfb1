use academia::config::Config;
use academia::db::{identities, students, Db};
use academia::AppState;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use common::model::batch::BatchSummary;
use common::reports::{DeletionReport, LoginResponse, StudentDashboard, UploadReport};
use serde_json::{json, Value};

const BOUNDARY: &str = "academia-test-boundary";

const STUDENTS_CSV: &str = "// spring intake\n\
roll_no,email_id,password,mentor_id\n\
123A1234,priya@gst.sies.edu.in,pw-priya,M001\n\
123A1235,ravi@gst.sies.edu.in,pw-ravi,M001\n\
12AA1234,bad@gst.sies.edu.in,pw-bad,M001\n";

fn state() -> AppState {
    let db = Db::open_in_memory().unwrap();
    db.with_conn(|conn| Ok(identities::ensure_staff(conn, "root", "secret")?))
        .unwrap();
    AppState::new(db, Config::default())
}

fn multipart(file_name: &str, content: &str) -> (String, Vec<u8>) {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nignored\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = content
    );
    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body.into_bytes(),
    )
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

macro_rules! login {
    ($app:expr, $role:expr, $user:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/api/auth/login/{}", $role))
            .set_json(json!({ "username": $user, "password": $password }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: LoginResponse = test::read_body_json(resp).await;
        body.token
    }};
}

macro_rules! upload {
    ($app:expr, $token:expr, $kind:expr, $file_name:expr, $content:expr) => {{
        let (content_type, body) = multipart($file_name, $content);
        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/uploads/{}", $kind))
            .insert_header((header::CONTENT_TYPE, content_type))
            .insert_header(bearer(&$token))
            .set_payload(body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn admin_routes_need_a_staff_session() {
    let state = state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(academia::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/admin/uploads/students").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login/admin")
        .set_json(json!({ "username": "root", "password": "wrong" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let token = login!(app, "admin", "root", "secret");
    let req = test::TestRequest::get()
        .uri("/api/admin/uploads/students")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<BatchSummary> = test::read_body_json(resp).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/admin/uploads/students")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn upload_login_and_reversal() {
    let state = state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(academia::configure),
    )
    .await;
    let admin = login!(app, "admin", "root", "secret");

    let req = test::TestRequest::post()
        .uri("/api/admin/mentors")
        .insert_header(bearer(&admin))
        .set_json(json!({ "mentor_id": "M001", "name": "Asha Rao", "email": "asha@gst.sies.edu.in" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let resp = upload!(app, admin, "students", "intake.csv", STUDENTS_CSV);
    assert_eq!(resp.status(), StatusCode::OK);
    let report: UploadReport = test::read_body_json(resp).await;
    assert_eq!(report.counts.identities_created, 2);
    assert_eq!(report.counts.records_created, 2);
    assert_eq!(report.counts.errors, 1);
    assert_eq!(report.errors[0].row, 3);
    assert_eq!(report.messages[0].text, "File 'intake.csv' uploaded successfully!");

    let resp = upload!(app, admin, "students", "again.csv", STUDENTS_CSV);
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // A student from the batch can log in and see their mentor.
    let student = login!(app, "student", "123A1234", "pw-priya");
    let req = test::TestRequest::get()
        .uri("/api/dashboard/student")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let dashboard: StudentDashboard = test::read_body_json(resp).await;
    assert_eq!(dashboard.student.name, "Unregistered Student");
    assert_eq!(dashboard.mentor.unwrap().id, "M001");

    // Students cannot reach admin routes.
    let req = test::TestRequest::get()
        .uri("/api/admin/uploads/students")
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/uploads/students/{}", report.batch_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let detail: Value = test::read_body_json(resp).await;
    assert_eq!(detail["associated_usernames"], json!(["123A1234", "123A1235"]));
    assert!(detail["content"].as_str().unwrap().starts_with("// spring intake"));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/uploads/students/{}", report.batch_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deletion: DeletionReport = test::read_body_json(resp).await;
    assert_eq!(deletion.identities_deleted, 2);
    assert_eq!(deletion.records_unlinked, 2);

    // The student's session died with their account; the record survives.
    let req = test::TestRequest::get()
        .uri("/api/dashboard/student")
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    let record = state
        .db
        .with_conn(|conn| Ok(students::find(conn, "123A1234")?))
        .unwrap()
        .unwrap();
    assert_eq!(record.identity_id, None);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/uploads/students/{}", report.batch_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "File not found.");
}

#[actix_web::test]
async fn rejected_upload_reports_the_reason() {
    let state = state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(academia::configure),
    )
    .await;
    let admin = login!(app, "admin", "root", "secret");

    let resp = upload!(app, admin, "mentors", "mentors.csv", "// nothing yet\n");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "The CSV file is empty or has an invalid format.");

    let resp = upload!(app, admin, "mentors", "mentors.txt", "mentor_id,name,email_id,password\n");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/admin/uploads/mentors")
        .insert_header(bearer(&admin))
        .to_request();
    let listed: Vec<BatchSummary> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());
}

#[actix_web::test]
async fn mentor_upload_then_mentor_dashboard() {
    let state = state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(academia::configure),
    )
    .await;
    let admin = login!(app, "admin", "root", "secret");

    let resp = upload!(
        app,
        admin,
        "mentors",
        "mentors.csv",
        "mentor_id,name,email_id,password\nM001,Asha Rao,asha@gst.sies.edu.in,pw-asha\n"
    );
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/admin/students")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "roll_number": "123A1234",
            "name": "Priya Nair",
            "email_id": "priya@gst.sies.edu.in",
            "mentor_id": "M001"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mentor = login!(app, "mentor", "M001", "pw-asha");
    let req = test::TestRequest::get()
        .uri("/api/dashboard/mentor")
        .insert_header(bearer(&mentor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["students"][0]["roll_number"], "123A1234");

    // The record has no account yet, so student login is refused.
    let req = test::TestRequest::post()
        .uri("/api/auth/login/student")
        .set_json(json!({ "username": "123A1234", "password": "default_123A1234" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/admin/students/123A1234/account")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    let _student = login!(app, "student", "123A1234", "default_123A1234");
}
