use crate::models::MonthlyReport;

/// Generate markdown report
pub fn generate(report: &MonthlyReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {} ({})\n\n", report.project, report.period));
    output.push_str(&format!("**Completed tasks:** {}\n\n", report.lines.len()));

    if report.lines.is_empty() {
        output.push_str("_No tasks completed this month._\n");
        return output;
    }

    output.push_str("| Completed at | Task |\n");
    output.push_str("|--------------|------|\n");

    for line in &report.lines {
        output.push_str(&format!(
            "| {} | {} |\n",
            line.timestamp.format("%Y/%m/%d %H:%M"),
            escape_cell(&line.content)
        ));
    }

    output
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
