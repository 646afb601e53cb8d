use chrono::Datelike;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::date;
use crate::error::Result;
use crate::export;
use crate::generate::{self, parse_holidays};
use crate::holiday::{HolidayIndex, HolidayRecord};
use crate::provider::{HolidayProvider, NagerClient};
use crate::render;
use crate::settings::{RawSettings, RenderStyle};
use crate::svg::SvgDocument;

pub const INVALID_YEAR: &str = "Invalid year.";
pub const PICK_COUNTRY: &str = "Pick a country (or just generate without holidays).";

/// A year as typed by the user: any non-zero integer.
pub fn parse_year(input: &str) -> Option<i32> {
    input.trim().parse::<i32>().ok().filter(|year| *year != 0)
}

pub struct GenerateRequest<'a> {
    pub year: &'a str,
    pub country: Option<&'a str>,
    pub holidays: Option<&'a Path>,
    pub style: Option<RenderStyle>,
    pub monday: bool,
    pub output: Option<&'a Path>,
    pub commands: Option<&'a Path>,
}

pub struct App<P: HolidayProvider> {
    config: Config,
    provider: P,
}

impl App<NagerClient> {
    pub fn from_config(config: Config) -> Self {
        let provider = NagerClient::new(&config.api_url, config.timeout());
        App::new(config, provider)
    }
}

impl<P: HolidayProvider> App<P> {
    pub fn new(config: Config, provider: P) -> Self {
        App { config, provider }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured render settings with command line overrides on top.
    pub fn raw_settings(&self, style: Option<RenderStyle>, monday: bool) -> RawSettings {
        let overrides = RawSettings {
            render_style: style.map(|s| Value::String(s.to_string())),
            week_starts_on: if monday { Some(Value::from(1)) } else { None },
            ..RawSettings::default()
        };

        self.config.render.clone().merge(overrides)
    }

    pub fn countries<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.provider.available_countries() {
            Ok(countries) => {
                for country in &countries {
                    writeln!(out, "{} ({})", country.name, country.country_code)?;
                }
            }
            Err(e) => {
                log::error!("{}", e);
                writeln!(out, "Countries failed to load: {}", e)?;
            }
        }
        Ok(())
    }

    pub fn fetch<W: Write>(
        &self,
        out: &mut W,
        year: &str,
        country: Option<&str>,
        csv: Option<&Path>,
        json: Option<&Path>,
    ) -> Result<()> {
        let year = match parse_year(year) {
            Some(year) => year,
            None => return Ok(writeln!(out, "{}", INVALID_YEAR)?),
        };

        let country = country.unwrap_or(self.config.country.as_str()).trim();
        if country.is_empty() {
            return Ok(writeln!(out, "{}", PICK_COUNTRY)?);
        }

        let holidays = match self.provider.public_holidays(year, country) {
            Ok(holidays) => holidays,
            Err(e) => {
                log::error!("{}", e);
                return Ok(writeln!(
                    out,
                    "Holiday fetch failed ({}). You can still generate without holidays.",
                    e
                )?);
            }
        };

        for holiday in &holidays {
            writeln!(out, "{}", list_line(holiday))?;
        }
        writeln!(out, "Found {} holidays.", holidays.len())?;

        if let Some(path) = csv {
            export::write_csv(path, &holidays)?;
            writeln!(out, "CSV exported to {}.", path.display())?;
        }
        if let Some(path) = json {
            export::write_json(path, &holidays)?;
            writeln!(out, "JSON exported to {}.", path.display())?;
        }

        Ok(())
    }

    /// Holidays from `--holidays`, else fetched for an explicit country.
    /// The configured country is not used here.
    fn holidays_for(&self, out: &mut dyn Write, year: i32, req: &GenerateRequest) -> Result<Vec<HolidayRecord>> {
        if let Some(path) = req.holidays {
            let content = std::fs::read_to_string(path)?;
            return Ok(parse_holidays(&content)?.into_iter().flatten().collect());
        }

        match req.country {
            Some(country) => match self.provider.public_holidays(year, country) {
                Ok(holidays) => Ok(holidays),
                Err(e) => {
                    log::warn!("{}", e);
                    writeln!(out, "Holiday fetch failed ({}). Generating without holidays.", e)?;
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    pub fn generate<W: Write>(&self, out: &mut W, req: &GenerateRequest) -> Result<()> {
        let year = match parse_year(req.year) {
            Some(year) => year,
            None => return Ok(writeln!(out, "{}", INVALID_YEAR)?),
        };

        let holidays = self.holidays_for(out, year, req)?;
        let raw = self.raw_settings(req.style, req.monday);

        let holidays_payload = export::minimal_payload(&holidays)?;
        let settings_payload = serde_json::to_string(&raw)?;

        let mut doc = SvgDocument::new();
        let status = generate::generate(year, &holidays_payload, &settings_payload, Some(&mut doc));

        if status.is_success() {
            let output = req
                .output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(format!("calendar-{}.svg", year)));
            doc.save(&output)?;

            if let Some(path) = req.commands {
                let cmds =
                    render::render_year(year, &HolidayIndex::build(&holidays), &raw.normalize());
                std::fs::write(path, serde_json::to_string_pretty(&cmds)?)?;
                log::info!("Wrote {} draw commands to {}", cmds.len(), path.display());
            }
        }

        writeln!(out, "{}", status)?;
        Ok(())
    }
}

fn list_line(holiday: &HolidayRecord) -> String {
    let raw_date = holiday.date.as_deref().unwrap_or("");
    let weekday = date::parse_date(raw_date)
        .map(|d| date::weekday_abbrev(d.weekday()))
        .unwrap_or("   ");

    format!("{}  {}  {}", raw_date, weekday, holiday.label())
}
