use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::date;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HolidayRecord {
    pub date: Option<String>,
    pub local_name: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counties: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_year: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl HolidayRecord {
    pub fn new(date: &str, local_name: &str, name: &str) -> Self {
        HolidayRecord {
            date: Some(date.to_owned()),
            local_name: Some(local_name.to_owned()),
            name: Some(name.to_owned()),
            ..HolidayRecord::default()
        }
    }

    /// `localName`, followed by ` (name)` when an English name is present.
    pub fn label(&self) -> String {
        let mut label = self.local_name.clone().unwrap_or_default();

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            label.push_str(" (");
            label.push_str(name);
            label.push(')');
        }

        label
    }

    /// The subset handed to the renderer.
    pub fn minimal(&self) -> Self {
        HolidayRecord {
            date: self.date.clone(),
            local_name: self.local_name.clone(),
            name: self.name.clone(),
            ..HolidayRecord::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub country_code: String,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct HolidayIndex {
    labels: BTreeMap<String, Vec<String>>,
}

impl HolidayIndex {
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a HolidayRecord>,
    {
        let mut labels: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for record in records {
            let raw_date = match record.date.as_deref() {
                Some(d) if !d.is_empty() => d,
                _ => continue,
            };

            match date::parse_date(raw_date) {
                Ok(parsed) => labels
                    .entry(date::iso_date(&parsed))
                    .or_default()
                    .push(record.label()),
                Err(e) => log::warn!("Skipping holiday '{}': {}", record.label(), e),
            }
        }

        HolidayIndex { labels }
    }

    pub fn get(&self, iso_date: &str) -> Option<&[String]> {
        self.labels.get(iso_date).map(Vec::as_slice)
    }

    pub fn on_day(&self, year: i32, month0: u32, day: u32) -> Option<&[String]> {
        self.get(&date::format_date(year, month0 + 1, day))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_with_and_without_english_name() {
        let both = HolidayRecord::new("2024-08-17", "Hari Proklamasi", "Independence Day");
        assert_eq!(both.label(), "Hari Proklamasi (Independence Day)");

        let mut local_only = both.clone();
        local_only.name = Some(String::new());
        assert_eq!(local_only.label(), "Hari Proklamasi");

        local_only.name = None;
        assert_eq!(local_only.label(), "Hari Proklamasi");
    }

    #[test]
    fn same_date_keeps_input_order() {
        let records = vec![
            HolidayRecord::new("2024-12-25", "Weihnachten", "Christmas Day"),
            HolidayRecord::new("2024-01-01", "Neujahr", "New Year's Day"),
            HolidayRecord::new("2024-12-25", "Weihnachten", "Christmas Day"),
            HolidayRecord::new("2024-12-25", "Christtag", ""),
        ];
        let index = HolidayIndex::build(&records);

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("2024-12-25").unwrap(),
            &[
                "Weihnachten (Christmas Day)".to_owned(),
                "Weihnachten (Christmas Day)".to_owned(),
                "Christtag".to_owned(),
            ]
        );
        assert!(index.on_day(2024, 0, 1).is_some());
        assert!(index.on_day(2024, 0, 2).is_none());
    }

    #[test]
    fn records_without_valid_date_are_skipped() {
        let mut missing = HolidayRecord::new("", "Nowhere", "");
        missing.date = None;
        let records = vec![
            missing,
            HolidayRecord::new("", "Empty", ""),
            HolidayRecord::new("2024-02-30", "Impossible", ""),
            HolidayRecord::new("yesterday", "Garbage", ""),
            HolidayRecord::new("2024-05-01", "Labour Day", ""),
        ];
        let index = HolidayIndex::build(&records);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("2024-05-01").unwrap(), &["Labour Day".to_owned()]);
    }

    #[test]
    fn deserializes_api_and_minimal_records() {
        let api = r#"{"date":"2024-01-01","localName":"Tahun Baru Masehi","name":"New Year's Day",
            "countryCode":"ID","fixed":false,"global":true,"counties":null,"launchYear":null,
            "types":["Public"]}"#;
        let record: HolidayRecord = serde_json::from_str(api).unwrap();
        assert_eq!(record.country_code.as_deref(), Some("ID"));
        assert_eq!(record.global, Some(true));
        assert_eq!(record.types, vec!["Public".to_owned()]);

        let minimal: Vec<Option<HolidayRecord>> =
            serde_json::from_str(r#"[null, {"localName":"No date"}]"#).unwrap();
        assert!(minimal[0].is_none());
        assert_eq!(minimal[1].as_ref().unwrap().date, None);
    }
}
