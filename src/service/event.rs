//! Event lifecycle: validation, ownership and image resolution around the
//! event half of the record store.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::dto::{EventInput, EventPatch, UploadedImage};
use crate::errors::ApiError;
use crate::models::{Event, EventType, Session};
use crate::store::{EventStore, NewEvent, StoreError, UserStore};

use super::image::ImageResolver;

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("Please provide event {field}")));
    }
    Ok(value)
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Invalid event date, expected YYYY-MM-DD".to_string()))
}

fn parse_type(value: &str) -> Result<EventType, ApiError> {
    EventType::parse(value.trim())
        .ok_or_else(|| ApiError::Validation("Invalid event type".to_string()))
}

fn event_not_found(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::NotFound("Event not found".to_string()),
        other => other.into(),
    }
}

pub async fn create(
    session: &Session,
    input: EventInput,
    upload: Option<UploadedImage>,
    users: &dyn UserStore,
    events: &dyn EventStore,
    resolver: &ImageResolver,
) -> Result<Event, ApiError> {
    let title = required(input.title, "title")?;
    let date = parse_date(&required(input.date, "date")?)?;
    let event_type = parse_type(&required(input.event_type, "type")?)?;
    let description = required(input.description, "description")?;
    let location = required(input.location, "location")?;

    // Owner must be a live user record, not just a decodable token.
    users.get(session.id).await.map_err(|err| match err {
        StoreError::NotFound => ApiError::Unauthorized,
        other => other.into(),
    })?;

    let image_url = resolver
        .resolve(input.image_url.as_deref(), upload, event_type)
        .await?;

    let event = events
        .create(NewEvent {
            title,
            date,
            event_type,
            description,
            location,
            image_url,
            owner_id: session.id,
        })
        .await?;
    Ok(event)
}

pub async fn update(
    session: &Session,
    id: Uuid,
    input: EventInput,
    upload: Option<UploadedImage>,
    events: &dyn EventStore,
    resolver: &ImageResolver,
) -> Result<Event, ApiError> {
    let existing = events.get(id).await.map_err(event_not_found)?;
    if existing.owner_id != session.id {
        return Err(ApiError::Forbidden);
    }

    let event_type = match input.event_type {
        Some(value) => Some(parse_type(&value)?),
        None => None,
    };
    let date = match input.date {
        Some(value) => Some(parse_date(&value)?),
        None => None,
    };
    let title = match input.title {
        Some(value) => Some(required(Some(value), "title")?),
        None => None,
    };
    let description = match input.description {
        Some(value) => Some(required(Some(value), "description")?),
        None => None,
    };
    let location = match input.location {
        Some(value) => Some(required(Some(value), "location")?),
        None => None,
    };

    // A new upload replaces the stored asset; otherwise an explicit URL
    // wins, and with neither the existing reference stays untouched.
    let image_url = match upload {
        Some(file) => {
            let resolved = resolver
                .resolve(
                    input.image_url.as_deref(),
                    Some(file),
                    event_type.unwrap_or(existing.event_type),
                )
                .await?;
            resolver.release(&existing.image_url).await;
            Some(resolved)
        }
        None => input.image_url.filter(|url| !url.trim().is_empty()),
    };

    let patch = EventPatch {
        title,
        date,
        event_type,
        description,
        location,
        image_url,
    };
    events.update(id, patch).await.map_err(event_not_found)
}

pub async fn delete(
    session: &Session,
    id: Uuid,
    events: &dyn EventStore,
    resolver: &ImageResolver,
) -> Result<(), ApiError> {
    let existing = events.get(id).await.map_err(event_not_found)?;
    if existing.owner_id != session.id {
        return Err(ApiError::Forbidden);
    }
    resolver.release(&existing.image_url).await;
    events.delete(id).await.map_err(event_not_found)
}

pub async fn list(events: &dyn EventStore) -> Result<Vec<Event>, ApiError> {
    Ok(events.list().await?)
}

pub async fn get(id: Uuid, events: &dyn EventStore) -> Result<Event, ApiError> {
    events.get(id).await.map_err(event_not_found)
}
