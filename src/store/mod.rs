pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;
use uuid::Uuid;

use crate::dto::EventPatch;
use crate::models::{Event, EventType, User};

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StoreError {
    #[display(fmt = "record not found")]
    NotFound,
    #[display(fmt = "{}", _0)]
    Conflict(String),
    #[display(fmt = "{}", _0)]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Already normalized (trimmed, lowercased) by the identity service.
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub date: NaiveDate,
    pub event_type: EventType,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub owner_id: Uuid,
}

/// User half of the record store. `create` assigns the id and creation
/// timestamp and signals `Conflict` when the email is already taken.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> StoreResult<User>;
    async fn get(&self, id: Uuid) -> StoreResult<User>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Event half of the record store. `list` returns most-recent-created
/// first; `update` merges only the fields present in the patch and must
/// apply as a single atomic write.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, event: NewEvent) -> StoreResult<Event>;
    async fn get(&self, id: Uuid) -> StoreResult<Event>;
    async fn list(&self) -> StoreResult<Vec<Event>>;
    async fn update(&self, id: Uuid, patch: EventPatch) -> StoreResult<Event>;
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

pub(crate) const DUPLICATE_EMAIL: &str = "User with this email already exists";
