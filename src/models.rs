use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ReportError;

/// Project as returned by the sync API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub parent_id: Option<String>,
    pub color: Option<String>,
    pub inbox_project: bool,
}

/// A single activity log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: u64,
    pub object_type: String,
    pub object_id: String,
    pub event_type: String,
    pub event_date: DateTime<FixedOffset>,
    pub parent_project_id: String,
    pub parent_item_id: Option<String>,
    pub initiator_id: Option<String>,
    pub extra_data: ExtraData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraData {
    pub content: String,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub last_due_date: Option<DateTime<FixedOffset>>,
    pub client: String,
}

/// One response of the activity log endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPage {
    pub events: Vec<ActivityEvent>,
    /// Total number of events matching the query on the server side
    pub count: u64,
}

/// Inclusive range of activity log page indices to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start_page: u32,
    pub end_page: u32,
}

impl PageWindow {
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start_page..=self.end_page
    }
}

/// Calendar month without a day component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ReportError> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::Config(format!("Invalid month: {}", month)));
        }
        Ok(Self { year, month })
    }

    /// Current month in UTC
    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn containing<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    /// Midnight UTC on the first day of the month
    pub fn first_instant(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }
}

impl FromStr for YearMonth {
    type Err = ReportError;

    /// Parse `YYYY/MM` (or `YYYY-MM`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "/");
        let date = NaiveDate::parse_from_str(&format!("{}/01", normalized), "%Y/%m/%d")
            .map_err(|_| {
                ReportError::Config(format!("Invalid target month: {}. Expected YYYY/MM", s))
            })?;

        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.month)
    }
}

/// One completed task in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub timestamp: DateTime<FixedOffset>,
    pub content: String,
}

/// Report data handed to the renderers
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub period: String,
    pub project: String,
    pub lines: Vec<ReportLine>,
}
