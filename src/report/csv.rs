use anyhow::Result;
use std::io::Write;

use crate::models::MonthlyReport;

const DATE_FORMAT: &str = "%Y/%m/%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Generate CSV report
pub fn generate<W: Write>(report: &MonthlyReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["project", "date", "time", "content"])?;

    for line in &report.lines {
        let date = line.timestamp.format(DATE_FORMAT).to_string();
        let time = line.timestamp.format(TIME_FORMAT).to_string();

        wtr.write_record([&report.project, &date, &time, &line.content])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Generate CSV report as string
pub fn generate_string(report: &MonthlyReport) -> Result<String> {
    let mut buffer = Vec::new();
    generate(report, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
