use crate::models::{MonthlyReport, ReportLine};

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Plain text report, one `YYYY/MM/DD HH:MM:SS <content>` line per task
pub fn generate(report: &MonthlyReport) -> String {
    report.lines.iter().map(|line| format_line(line) + "\n").collect()
}

pub fn format_line(line: &ReportLine) -> String {
    format!("{} {}", line.timestamp.format(TIMESTAMP_FORMAT), line.content)
}
