use actix_web::web::ServiceConfig;

mod health;
mod logs;
mod sites;
mod status;

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_route)
        .service(status::status_route)
        .service(logs::logs_route)
        .service(sites::create_site)
        .service(sites::delete_site);
}
