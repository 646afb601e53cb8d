use chrono::{Datelike, Month, NaiveDate, Weekday};
use num_traits::FromPrimitive;

pub const WEEKDAYS_FROM_SUNDAY: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const WEEKDAYS_FROM_MONDAY: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn first_of_month(year: i32, month0: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// Weekday of the given date, 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(year: i32, month0: u32, day: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
        .map_or(0, |date| date.weekday().num_days_from_sunday())
}

/// Day count of a month, i.e. the day before the first of the following month.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month0) = if month0 >= 11 {
        (year + 1, 0)
    } else {
        (year, month0 + 1)
    };

    first_of_month(next_year, next_month0)
        .and_then(|first| first.pred_opt())
        .map_or(0, |last| last.day())
}

/// "YYYY-MM-DD", formatted the same way as [`iso_date`] for valid dates.
pub fn format_date(year: i32, month1: u32, day: u32) -> String {
    NaiveDate::from_ymd_opt(year, month1, day).map_or_else(
        || format!("{:04}-{:02}-{:02}", year, month1, day),
        |date| iso_date(&date),
    )
}

pub fn parse_date(iso: &str) -> crate::error::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(iso, ISO_DATE_FORMAT)?)
}

pub fn iso_date(date: &NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn month_name(month0: u32) -> &'static str {
    Month::from_u32(month0 + 1).map_or("", |month| month.name())
}

pub fn month_abbrev(month0: u32) -> &'static str {
    let name = month_name(month0);
    name.get(..3).unwrap_or(name)
}

pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    WEEKDAYS_FROM_MONDAY[weekday.num_days_from_monday() as usize]
}

/// "2024-04-03" + "Good Friday" -> "Apr 3 - Good Friday"
pub fn format_legend_short(iso: &str, labels: &str) -> String {
    match parse_date(iso) {
        Ok(date) => format!(
            "{} {} - {}",
            month_abbrev(date.month0()),
            date.day(),
            labels
        ),
        Err(e) => {
            log::debug!("Legend date '{}' not parseable: {}", iso, e);
            format!("{} - {}", iso, labels)
        }
    }
}
