pub mod config;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;

use std::sync::Arc;

use service::image::ImageResolver;
use store::{EventStore, UserStore};

/// Shared application state. Services speak only to the store traits, so
/// the persistent and the in-memory backings are interchangeable here.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub events: Arc<dyn EventStore>,
    pub resolver: ImageResolver,
    pub jwt_secret: String,
}
