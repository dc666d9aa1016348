use actix_web::{HttpResponse, Responder, get, web};
use sitepulse::Monitor;

/// Snapshot of every monitored site and its live status
#[get("/api/status")]
pub async fn status_route(monitor: web::Data<Monitor>) -> impl Responder {
    HttpResponse::Ok().json(monitor.registry().list().await)
}
