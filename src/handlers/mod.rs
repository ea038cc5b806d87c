pub mod auth;
pub mod event;

use actix_web::{web, HttpResponse, Responder};

async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Welcome to College Events API" }))
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Route not found" }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .service(web::scope("/users").configure(auth::init_routes))
        .service(web::scope("/events").configure(event::init_routes));
}
