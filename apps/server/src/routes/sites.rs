use actix_web::{HttpResponse, Responder, delete, post, web};
use serde::Deserialize;
use sitepulse::Monitor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSite {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub recovery_plans: Vec<String>,
}

/// Register a site. Responds immediately with the PENDING site; the
/// first check runs asynchronously rather than on the next tick.
#[post("/api/sites")]
pub async fn create_site(
    monitor: web::Data<Monitor>,
    body: web::Json<CreateSite>,
) -> impl Responder {
    let body = body.into_inner();

    match monitor.registry().add(&body.name, &body.url, body.recovery_plans).await {
        Ok(site) => {
            let monitor = monitor.into_inner();
            let id = site.id.clone();
            tokio::spawn(async move {
                monitor.check_site(&id).await;
            });

            HttpResponse::Created().json(site)
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Remove a site. Deleting an unknown id is still confirmed.
#[delete("/api/sites/{id}")]
pub async fn delete_site(monitor: web::Data<Monitor>, path: web::Path<String>) -> impl Responder {
    monitor.registry().remove(&path.into_inner()).await;
    HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" }))
}
