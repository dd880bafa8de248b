use crate::models::MonthlyReport;

/// Generate TSV report (Tab-Separated Values for easy paste into Google Sheets)
pub fn generate_string(report: &MonthlyReport) -> String {
    let mut output = String::from("date\ttime\tcontent\n");

    for line in &report.lines {
        output.push_str(&format!(
            "{}\t{}\t{}\n",
            line.timestamp.format("%Y/%m/%d"),
            line.timestamp.format("%H:%M:%S"),
            escape_tsv(&line.content)
        ));
    }

    output
}

/// Escape special characters for TSV format
fn escape_tsv(s: &str) -> String {
    s.replace('\t', " ").replace('\n', " ").replace('\r', "")
}
