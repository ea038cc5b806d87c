use actix_web::error::ResponseError;
use actix_web::{get, post, web, HttpResponse, Responder};
use log::{error, info};

use crate::dto::{LoginRequest, RegisterRequest};
use crate::models::Session;
use crate::service;
use crate::AppState;

#[post("/register")]
pub async fn register(dto: web::Json<RegisterRequest>, state: web::Data<AppState>) -> impl Responder {
    match service::user::register(state.users.as_ref(), &state.jwt_secret, dto.into_inner()).await {
        Ok(response) => {
            info!("registered user {} ({})", response.id, response.email);
            HttpResponse::Created().json(response)
        }
        Err(err) => {
            error!("POST /users/register: {err}");
            err.error_response()
        }
    }
}

#[post("/login")]
pub async fn login(dto: web::Json<LoginRequest>, state: web::Data<AppState>) -> impl Responder {
    match service::user::login(state.users.as_ref(), &state.jwt_secret, dto.into_inner()).await {
        Ok(response) => {
            info!("user {} logged in", response.id);
            HttpResponse::Ok().json(response)
        }
        Err(err) => {
            error!("POST /users/login: {err}");
            err.error_response()
        }
    }
}

#[get("/me")]
pub async fn me(session: Session, state: web::Data<AppState>) -> impl Responder {
    match service::user::me(state.users.as_ref(), &session).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => {
            error!("GET /users/me: {err}");
            err.error_response()
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}
