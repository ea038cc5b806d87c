use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::error::ResponseError;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::error;
use uuid::Uuid;

use crate::dto::{EventInput, UploadedImage};
use crate::models::Session;
use crate::service;
use crate::AppState;

/// Event fields as a multipart form, with an optional `image` file part.
/// Field names match the browser form the API was built for.
#[derive(MultipartForm)]
pub struct EventForm {
    pub title: Option<Text<String>>,
    pub date: Option<Text<String>>,
    #[multipart(rename = "type")]
    pub event_type: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub location: Option<Text<String>>,
    #[multipart(rename = "imageUrl")]
    pub image_url: Option<Text<String>>,
    pub image: Option<Bytes>,
}

impl EventForm {
    fn into_parts(self) -> (EventInput, Option<UploadedImage>) {
        let input = EventInput {
            title: self.title.map(Text::into_inner),
            date: self.date.map(Text::into_inner),
            event_type: self.event_type.map(Text::into_inner),
            description: self.description.map(Text::into_inner),
            location: self.location.map(Text::into_inner),
            image_url: self.image_url.map(Text::into_inner),
        };
        let upload = self.image.map(|bytes| UploadedImage {
            file_name: bytes.file_name,
            content_type: bytes.content_type.map(|mime| mime.to_string()),
            data: bytes.data.to_vec(),
        });
        (input, upload)
    }
}

#[get("")]
pub async fn list(state: web::Data<AppState>) -> impl Responder {
    match service::event::list(state.events.as_ref()).await {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(err) => {
            error!("GET /events: {err}");
            err.error_response()
        }
    }
}

#[get("/{id}")]
pub async fn get_by_id(id: web::Path<Uuid>, state: web::Data<AppState>) -> impl Responder {
    match service::event::get(id.into_inner(), state.events.as_ref()).await {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(err) => err.error_response(),
    }
}

#[post("")]
pub async fn create(
    session: Session,
    form: MultipartForm<EventForm>,
    state: web::Data<AppState>,
) -> impl Responder {
    let (input, upload) = form.into_inner().into_parts();
    match service::event::create(
        &session,
        input,
        upload,
        state.users.as_ref(),
        state.events.as_ref(),
        &state.resolver,
    )
    .await
    {
        Ok(event) => HttpResponse::Created().json(event),
        Err(err) => {
            error!("POST /events: {err}");
            err.error_response()
        }
    }
}

#[put("/{id}")]
pub async fn update(
    session: Session,
    id: web::Path<Uuid>,
    form: MultipartForm<EventForm>,
    state: web::Data<AppState>,
) -> impl Responder {
    let (input, upload) = form.into_inner().into_parts();
    match service::event::update(
        &session,
        id.into_inner(),
        input,
        upload,
        state.events.as_ref(),
        &state.resolver,
    )
    .await
    {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(err) => {
            error!("PUT /events: {err}");
            err.error_response()
        }
    }
}

#[delete("/{id}")]
pub async fn remove(
    session: Session,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    match service::event::delete(&session, id.into_inner(), state.events.as_ref(), &state.resolver)
        .await
    {
        Ok(()) => HttpResponse::Ok()
            .json(serde_json::json!({ "message": "Event deleted successfully" })),
        Err(err) => {
            error!("DELETE /events: {err}");
            err.error_response()
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(get_by_id)
        .service(update)
        .service(remove);
}
