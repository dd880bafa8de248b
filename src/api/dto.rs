//! Wire formats of the two sync API endpoints.
//!
//! These mirror the JSON exactly and are converted into the types in
//! `crate::models` before anything else sees them.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{ActivityEvent, ActivityPage, ExtraData, Project};

/// Body of the full-sync projects request
#[derive(Debug, Clone, Serialize)]
pub struct SyncRequest<'a> {
    pub sync_token: &'a str,
    pub resource_types: &'a [&'a str],
}

impl SyncRequest<'static> {
    pub fn all_projects() -> Self {
        Self {
            sync_token: "*",
            resource_types: &["projects"],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub projects: Vec<ProjectDto>,
    #[serde(default)]
    pub full_sync: bool,
    #[serde(default)]
    pub sync_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub inbox_project: bool,
}

impl From<ProjectDto> for Project {
    fn from(dto: ProjectDto) -> Self {
        Project {
            id: dto.id,
            name: dto.name,
            is_archived: dto.is_archived,
            is_deleted: dto.is_deleted,
            parent_id: dto.parent_id,
            color: dto.color,
            inbox_project: dto.inbox_project,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityLogResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<ActivityEventDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

impl From<ActivityLogResponse> for ActivityPage {
    fn from(response: ActivityLogResponse) -> Self {
        ActivityPage {
            events: response.events.into_iter().map(ActivityEvent::from).collect(),
            count: response.count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityEventDto {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: String,
    pub event_date: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_project_id: String,
    #[serde(default)]
    pub parent_item_id: Option<String>,
    #[serde(default)]
    pub initiator_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_data: ExtraDataDto,
}

impl From<ActivityEventDto> for ActivityEvent {
    fn from(dto: ActivityEventDto) -> Self {
        ActivityEvent {
            id: dto.id,
            object_type: dto.object_type,
            object_id: dto.object_id,
            event_type: dto.event_type,
            event_date: dto.event_date,
            parent_project_id: dto.parent_project_id,
            parent_item_id: dto.parent_item_id,
            initiator_id: dto.initiator_id,
            extra_data: dto.extra_data.into(),
        }
    }
}

/// Due dates come back either as full timestamps or as bare dates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtraDataDto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub last_due_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client: String,
}

impl From<ExtraDataDto> for ExtraData {
    fn from(dto: ExtraDataDto) -> Self {
        ExtraData {
            content: dto.content,
            due_date: dto.due_date.as_deref().and_then(parse_due_date),
            last_due_date: dto.last_due_date.as_deref().and_then(parse_due_date),
            client: dto.client,
        }
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_due_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}
