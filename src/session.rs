//! Session types as served by the tracking backend.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A finished (or in-progress) work session.
///
/// Field names follow the backend's JSON: `UUID`, `Start`, `End`.
/// Older backends omit `UUID` entirely, and some send the nil UUID for
/// sessions created before identifiers existed; both decode to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(
        rename = "UUID",
        alias = "uuid",
        alias = "id",
        default,
        deserialize_with = "deserialize_session_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Uuid>,

    #[serde(rename = "Start", alias = "start")]
    pub start: DateTime<Utc>,

    #[serde(rename = "End", alias = "end")]
    pub end: DateTime<Utc>,
}

fn deserialize_session_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<Uuid>::deserialize(deserializer)?;
    Ok(id.filter(|id| !id.is_nil()))
}

impl Session {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: None,
            start,
            end,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// The stable identifier used to match displayed rows, if the backend sent one.
    pub fn key(&self) -> Option<Uuid> {
        self.id
    }

    /// Length of the session. Sessions whose end precedes their start count as zero.
    pub fn duration(&self) -> Duration {
        let d = self.end.signed_duration_since(self.start);
        if d < Duration::zero() {
            Duration::zero()
        } else {
            d
        }
    }
}

/// Decode the `/active-interval` body: a timestamp, or `null` when nothing is running.
pub fn parse_active_interval(body: &str) -> serde_json::Result<Option<DateTime<Utc>>> {
    serde_json::from_str(body)
}

/// Decode the `/intervals` body. A `null` body is treated as an empty history.
pub fn parse_sessions(body: &str) -> serde_json::Result<Vec<Session>> {
    let sessions: Option<Vec<Session>> = serde_json::from_str(body)?;
    Ok(sessions.unwrap_or_default())
}
