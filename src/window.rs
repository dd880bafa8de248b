use chrono::{DateTime, Utc};

use crate::models::{PageWindow, YearMonth};

/// Each activity log page spans one week, page 0 being the week ending now
const SECONDS_PER_PAGE: i64 = 7 * 24 * 3600;

/// A calendar month touches at most 5 weekly pages
const LOOKBACK_PAGES: i64 = 5;

/// Compute which activity log pages cover the target month.
///
/// `end_page` is the page containing the first day of the month; the window
/// then reaches `LOOKBACK_PAGES` towards the present. A month in the future
/// yields the single page 0, which the month filter will leave empty.
pub fn compute_window(target: YearMonth, now: DateTime<Utc>) -> PageWindow {
    let elapsed = (now - target.first_instant()).num_seconds();
    let end = elapsed.div_euclid(SECONDS_PER_PAGE).max(0);
    let start = (end - LOOKBACK_PAGES).max(0);

    PageWindow {
        start_page: to_page(start),
        end_page: to_page(end),
    }
}

fn to_page(index: i64) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
