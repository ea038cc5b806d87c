//! Ephemeral record store. Mirrors the persistent backing behind the same
//! traits so identity and event services run unchanged against it; used by
//! tests and storage-less deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::EventPatch;
use crate::models::{Event, User};

use super::{NewEvent, NewUser, StoreError, StoreResult, UserStore, EventStore, DUPLICATE_EMAIL};

struct Row<T> {
    seq: u64,
    value: T,
}

/// Rows keyed by id plus a monotonic insertion sequence, so that
/// newest-first listing stays deterministic even when two records are
/// created within the same timestamp tick.
struct Table<T> {
    next_seq: u64,
    rows: HashMap<Uuid, Row<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            rows: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, id: Uuid, value: T) {
        self.next_seq += 1;
        let row = Row {
            seq: self.next_seq,
            value,
        };
        self.rows.insert(id, row);
    }

    fn newest_first(&self) -> Vec<T> {
        let mut rows: Vec<&Row<T>> = self.rows.values().collect();
        rows.sort_by(|a, b| b.seq.cmp(&a.seq));
        rows.into_iter().map(|row| row.value.clone()).collect()
    }
}

pub struct MemoryStore {
    users: RwLock<Table<User>>,
    events: RwLock<Table<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Table::default()),
            events: RwLock::new(Table::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        // Uniqueness check and insert happen under one write lock.
        let mut users = self.users.write().await;
        if users.rows.values().any(|row| row.value.email == user.email) {
            return Err(StoreError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<User> {
        let users = self.users.read().await;
        users
            .rows
            .get(&id)
            .map(|row| row.value.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .rows
            .values()
            .find(|row| row.value.email == email)
            .map(|row| row.value.clone()))
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create(&self, event: NewEvent) -> StoreResult<Event> {
        let mut events = self.events.write().await;
        let record = Event {
            id: Uuid::new_v4(),
            title: event.title,
            date: event.date,
            event_type: event.event_type,
            description: event.description,
            location: event.location,
            image_url: event.image_url,
            owner_id: event.owner_id,
            created_at: Utc::now(),
        };
        events.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Event> {
        let events = self.events.read().await;
        events
            .rows
            .get(&id)
            .map(|row| row.value.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events.newest_first())
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> StoreResult<Event> {
        // Read-modify-write under the write lock; no torn updates.
        let mut events = self.events.write().await;
        let row = events.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        let event = &mut row.value;
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(image_url) = patch.image_url {
            event.image_url = image_url;
        }
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut events = self.events.write().await;
        events
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn new_event(title: &str, owner_id: Uuid) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            date: "2024-05-01".parse().unwrap(),
            event_type: EventType::Technical,
            description: "d".to_string(),
            location: "Hall".to_string(),
            image_url: "https://example.com/img.png".to_string(),
            owner_id,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[actix_rt::test]
    async fn create_assigns_id_and_created_at() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@x.com")).await.unwrap();
        let fetched = UserStore::get(&store, user.id).await.unwrap();
        assert_eq!(fetched.email, "a@x.com");
        assert_eq!(fetched.id, user.id);
    }

    #[actix_rt::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@x.com")).await.unwrap();
        let err = UserStore::create(&store, new_user("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn list_is_most_recent_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            EventStore::create(&store, new_event(title, owner))
                .await
                .unwrap();
        }
        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }

    #[actix_rt::test]
    async fn update_merges_only_patch_fields() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let event = EventStore::create(&store, new_event("Fest", owner))
            .await
            .unwrap();
        let patch = EventPatch {
            location: Some("Auditorium".to_string()),
            ..EventPatch::default()
        };
        let updated = store.update(event.id, patch).await.unwrap();
        assert_eq!(updated.location, "Auditorium");
        assert_eq!(updated.title, "Fest");
        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.created_at, event.created_at);
    }

    #[actix_rt::test]
    async fn delete_of_missing_id_is_not_found() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let event = EventStore::create(&store, new_event("Fest", owner))
            .await
            .unwrap();
        store.delete(event.id).await.unwrap();
        assert_eq!(store.delete(event.id).await.unwrap_err(), StoreError::NotFound);
        assert_eq!(
            EventStore::get(&store, event.id).await.unwrap_err(),
            StoreError::NotFound
        );
    }
}
