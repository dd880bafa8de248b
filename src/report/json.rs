use anyhow::Result;

use crate::models::MonthlyReport;

/// Generate JSON report
pub fn generate(report: &MonthlyReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
