//! Persistent record store backed by Postgres. Every operation is a single
//! statement, so concurrent writers cannot observe a half-applied mutation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::EventPatch;
use crate::models::{Event, EventType, User};

use super::{NewEvent, NewUser, StoreError, StoreResult, UserStore, EventStore, DUPLICATE_EMAIL};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(db_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|err| sqlx::Error::Migrate(Box::new(err)))?;
        info!("connected to postgresql");
        Ok(Self { pool })
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    date: NaiveDate,
    event_type: String,
    description: String,
    location: String,
    image_url: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type = EventType::parse(&row.event_type).ok_or_else(|| {
            StoreError::Backend(format!("unknown event type in storage: {}", row.event_type))
        })?;
        Ok(Event {
            id: row.id,
            title: row.title,
            date: row.date,
            event_type,
            description: row.description,
            location: row.location,
            image_url: row.image_url,
            owner_id: row.owner_id,
            created_at: row.created_at,
        })
    }
}

fn map_db_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StoreError::Conflict(DUPLICATE_EMAIL.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        row.map(User::from).ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn create(&self, event: NewEvent) -> StoreResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            "INSERT INTO events
               (id, title, date, event_type, description, location, image_url, owner_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, title, date, event_type, description, location, image_url, owner_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&event.title)
        .bind(event.date)
        .bind(event.event_type.as_str())
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.image_url)
        .bind(event.owner_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        row.try_into()
    }

    async fn get(&self, id: Uuid) -> StoreResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, title, date, event_type, description, location, image_url, owner_id, created_at
             FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, title, date, event_type, description, location, image_url, owner_id, created_at
             FROM events ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;
        rows.into_iter().map(Event::try_from).collect()
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> StoreResult<Event> {
        // Patch merge happens inside the database; identity columns are not
        // in the statement at all.
        let row = sqlx::query_as::<_, EventRow>(
            "UPDATE events SET
               title       = COALESCE($2, title),
               date        = COALESCE($3, date),
               event_type  = COALESCE($4, event_type),
               description = COALESCE($5, description),
               location    = COALESCE($6, location),
               image_url   = COALESCE($7, image_url)
             WHERE id = $1
             RETURNING id, title, date, event_type, description, location, image_url, owner_id, created_at",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.date)
        .bind(patch.event_type.map(EventType::as_str))
        .bind(patch.description)
        .bind(patch.location)
        .bind(patch.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
