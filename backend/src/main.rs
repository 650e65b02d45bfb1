use academia::config::Config;
use academia::db::{identities, Db};
use academia::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::io;

fn startup_error(message: String) -> io::Error {
    error!("{}", message);
    io::Error::new(io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let db = Db::open(&config.db_path).map_err(|e| {
        startup_error(format!(
            "cannot open database {}: {}",
            config.db_path.display(),
            e
        ))
    })?;

    if let Some(admin) = config.admin.clone() {
        db.with_conn(move |conn| Ok(identities::ensure_staff(conn, &admin.username, &admin.password)?))
            .map_err(|e| startup_error(format!("cannot create the admin account: {}", e)))?;
        info!("staff account ready");
    }

    let host = config.host.clone();
    let port = config.port;
    let json_limit = config.max_upload_bytes;
    let state = AppState::new(db, config);

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(academia::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
