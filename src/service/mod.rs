pub mod auth;
pub mod crypto;
pub mod event;
pub mod image;
pub mod log;
pub mod user;
