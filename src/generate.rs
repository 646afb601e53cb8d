use derive_more::Display;

use crate::date;
use crate::error::{Error, ErrorKind, Result};
use crate::holiday::{HolidayIndex, HolidayRecord};
use crate::render;
use crate::settings::{RawSettings, RenderStyle};
use crate::surface::{replay, Surface};

#[derive(Clone, Debug, PartialEq, Display)]
pub enum GenerateStatus {
    #[display(fmt = "Generated {} ({}, holidays={}).", year, style, holidays)]
    Generated {
        year: i32,
        style: RenderStyle,
        holidays: usize,
    },
    #[display(fmt = "No document open.")]
    NoDocument,
    #[display(fmt = "Generate failed: {}", _0)]
    Failed(String),
}

impl GenerateStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerateStatus::Generated { .. })
    }
}

/// Parses a holiday payload. `null` entries are kept so the count matches
/// what the caller sent.
pub fn parse_holidays(payload: &str) -> Result<Vec<Option<HolidayRecord>>> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(payload)?)
}

fn check_year(year: i32) -> Result<()> {
    let supported = date::first_of_month(year, 0).is_some()
        && date::first_of_month(year.saturating_add(1), 0).is_some();

    if supported {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::InvalidInput,
            &format!("year {} is out of range", year),
        ))
    }
}

fn run<S: Surface>(
    year: i32,
    holidays_payload: &str,
    settings_payload: &str,
    surface: Option<&mut S>,
) -> Result<GenerateStatus> {
    let holidays = parse_holidays(holidays_payload)?;
    let settings = RawSettings::from_json(settings_payload)?.normalize();

    let surface = match surface {
        Some(surface) => surface,
        None => return Ok(GenerateStatus::NoDocument),
    };

    check_year(year)?;

    let index = HolidayIndex::build(holidays.iter().flatten());
    let cmds = render::render_year(year, &index, &settings);

    log::info!(
        "Generating {} ({}, {} holiday dates, {} commands)",
        year,
        settings.render_style,
        index.len(),
        cmds.len()
    );

    replay(&cmds, surface)?;

    Ok(GenerateStatus::Generated {
        year,
        style: settings.render_style,
        holidays: holidays.len(),
    })
}

/// Draws the twelve months of `year` onto `surface`. Never fails: every
/// problem is reported through the returned status. Output drawn before a
/// failure is left in place, and calling this twice draws everything twice.
pub fn generate<S: Surface>(
    year: i32,
    holidays_payload: &str,
    settings_payload: &str,
    surface: Option<&mut S>,
) -> GenerateStatus {
    run(year, holidays_payload, settings_payload, surface).unwrap_or_else(|err| {
        log::error!("Generating {} failed: {}", year, err);
        GenerateStatus::Failed(err.to_string())
    })
}

/// String flavour of [`generate`].
pub fn generate_year<S: Surface>(
    year: i32,
    holidays_payload: &str,
    settings_payload: &str,
    surface: Option<&mut S>,
) -> String {
    generate(year, holidays_payload, settings_payload, surface).to_string()
}
