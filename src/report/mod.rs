pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;
pub mod tsv;

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::ActivitySource;
use crate::error::Result;
use crate::models::{PageWindow, ReportLine, YearMonth};

/// Event type requested from the activity log
pub const COMPLETED_EVENT: &str = "completed";

/// Default number of events requested per call
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// How an event date is compared against the target month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthFilter {
    /// Year and month must both match
    #[default]
    YearMonth,
    /// Only the month number is compared, any year matches
    MonthOnly,
}

impl MonthFilter {
    pub fn matches(&self, target: YearMonth, date: &DateTime<FixedOffset>) -> bool {
        match self {
            MonthFilter::YearMonth => date.year() == target.year && date.month() == target.month,
            MonthFilter::MonthOnly => date.month() == target.month,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub filter: MonthFilter,
    pub page_limit: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            filter: MonthFilter::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Collect the completed tasks of `target` from every page of `window`.
///
/// Pages are fetched in ascending index order. When a page reports more
/// events than one call returned, it is read again at increasing offsets
/// until the reported count is reached. The first failed fetch aborts the
/// whole report.
pub fn build_report<S: ActivitySource>(
    source: &S,
    project_id: &str,
    target: YearMonth,
    window: PageWindow,
    options: &ReportOptions,
) -> Result<Vec<ReportLine>> {
    let mut lines = Vec::new();

    for page in window.pages() {
        let mut offset: u64 = 0;

        loop {
            let batch =
                source.fetch_activity_page(project_id, COMPLETED_EVENT, page, offset, options.page_limit)?;
            let received = batch.events.len() as u64;

            lines.extend(
                batch
                    .events
                    .into_iter()
                    .filter(|event| options.filter.matches(target, &event.event_date))
                    .map(|event| ReportLine {
                        timestamp: event.event_date,
                        content: event.extra_data.content,
                    }),
            );

            offset += received;
            if received == 0 || offset >= batch.count {
                break;
            }
            debug!(page, offset, count = batch.count, "page has more events, continuing");
        }
    }

    info!(
        target_month = %target,
        start_page = window.start_page,
        end_page = window.end_page,
        matched = lines.len(),
        "report built"
    );

    Ok(lines)
}

/// Sort lines oldest first, keeping fetch order for equal timestamps
pub fn sort_chronologically(lines: &mut [ReportLine]) {
    lines.sort_by_key(|line| line.timestamp);
}
