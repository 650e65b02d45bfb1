use crate::guard::{Authenticated, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};
use log::info;

pub(crate) async fn process(state: web::Data<AppState>, caller: Guarded<Authenticated>) -> HttpResponse {
    state.sessions.close(&caller.token).await;
    info!("'{}' logged out", caller.session.username);
    HttpResponse::NoContent().finish()
}
