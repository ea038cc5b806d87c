use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Closed set of event categories. Anything else is rejected at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Cultural,
    Technical,
    Sports,
    Academic,
    Other,
}

impl EventType {
    pub const VALUES: [EventType; 5] = [
        EventType::Cultural,
        EventType::Technical,
        EventType::Sports,
        EventType::Academic,
        EventType::Other,
    ];

    pub fn parse(value: &str) -> Option<EventType> {
        match value {
            "Cultural" => Some(EventType::Cultural),
            "Technical" => Some(EventType::Technical),
            "Sports" => Some(EventType::Sports),
            "Academic" => Some(EventType::Academic),
            "Other" => Some(EventType::Other),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EventType::Cultural => "Cultural",
            EventType::Technical => "Technical",
            EventType::Sports => "Sports",
            EventType::Academic => "Academic",
            EventType::Other => "Other",
        }
    }

    /// Keyword used to synthesize a placeholder image reference when an
    /// event is created without one. `Other` keeps the historical generic
    /// keyword rather than its own name.
    pub const fn placeholder_keyword(self) -> &'static str {
        match self {
            EventType::Cultural => "cultural",
            EventType::Technical => "technical",
            EventType::Sports => "sports",
            EventType::Academic => "academic",
            EventType::Other => "event",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Authenticated identity a caller presents to scoped operations. Carries
/// only public user fields, never the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_parses_only_enumerated_values() {
        assert_eq!(EventType::parse("Sports"), Some(EventType::Sports));
        assert_eq!(EventType::parse("sports"), None);
        assert_eq!(EventType::parse("Concert"), None);
        for value in EventType::VALUES {
            assert_eq!(EventType::parse(value.as_str()), Some(value));
        }
    }

    #[test]
    fn placeholder_keywords_are_lowercased_type_names() {
        assert_eq!(EventType::Sports.placeholder_keyword(), "sports");
        assert_eq!(EventType::Cultural.placeholder_keyword(), "cultural");
        assert_eq!(EventType::Other.placeholder_keyword(), "event");
    }

    #[test]
    fn event_serializes_with_wire_field_names() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Fest".into(),
            date: "2024-05-01".parse().unwrap(),
            event_type: EventType::Cultural,
            description: "d".into(),
            location: "Hall".into(),
            image_url: "https://example.com/a.png".into(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Cultural");
        assert_eq!(json["date"], "2024-05-01");
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn user_never_serializes_credential() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
