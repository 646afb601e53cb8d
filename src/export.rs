use itertools::Itertools;
use std::path::Path;

use crate::error::Result;
use crate::holiday::HolidayRecord;

const CSV_HEADER: [&str; 4] = ["date", "localName", "name", "countryCode"];

pub fn csv_cell(value: &str) -> String {
    if value.contains(|c: char| c == ',' || c == '"' || c == '\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

pub fn to_csv(records: &[HolidayRecord]) -> String {
    let header = CSV_HEADER.iter().map(|h| csv_cell(h)).join(",");
    let rows = records.iter().map(|record| {
        [
            &record.date,
            &record.local_name,
            &record.name,
            &record.country_code,
        ]
        .iter()
        .map(|field| csv_cell(field.as_deref().unwrap_or("")))
        .join(",")
    });

    std::iter::once(header).chain(rows).join("\n")
}

pub fn to_json(records: &[HolidayRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// The `{date, localName, name}` payload the calendar generator consumes.
pub fn minimal_payload(records: &[HolidayRecord]) -> Result<String> {
    let minimal: Vec<HolidayRecord> = records.iter().map(HolidayRecord::minimal).collect();
    Ok(serde_json::to_string(&minimal)?)
}

pub fn write_csv(path: &Path, records: &[HolidayRecord]) -> Result<()> {
    std::fs::write(path, to_csv(records))?;
    log::info!("Exported {} holidays to {}", records.len(), path.display());
    Ok(())
}

pub fn write_json(path: &Path, records: &[HolidayRecord]) -> Result<()> {
    std::fs::write(path, to_json(records)?)?;
    log::info!("Exported {} holidays to {}", records.len(), path.display());
    Ok(())
}
