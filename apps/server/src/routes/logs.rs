use actix_web::{HttpResponse, Responder, get, web};
use sitepulse::Monitor;
use sitepulse::events::READ_LIMIT;

/// Most recent status-transition events, newest first
#[get("/api/logs")]
pub async fn logs_route(monitor: web::Data<Monitor>) -> impl Responder {
    HttpResponse::Ok().json(monitor.events().recent(READ_LIMIT).await)
}
