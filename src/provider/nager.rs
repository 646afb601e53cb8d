use serde::de::DeserializeOwned;
use std::time::Duration;

use super::HolidayProvider;
use crate::error::{Error, ErrorKind, Result};
use crate::holiday::{Country, HolidayRecord};

/// Blocking client for the Nager.Date public holiday API.
pub struct NagerClient {
    base_url: String,
    agent: ureq::Agent,
}

fn check_country_code(country_code: &str) -> Result<&str> {
    let code = country_code.trim();
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(code)
    } else {
        Err(Error::new(
            ErrorKind::InvalidInput,
            &format!("'{}' is not a country code", country_code),
        ))
    }
}

impl NagerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        NagerClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn countries_url(&self) -> String {
        format!("{}/AvailableCountries", self.base_url)
    }

    pub fn holidays_url(&self, year: i32, country_code: &str) -> Result<String> {
        let code = check_country_code(country_code)?;
        Ok(format!(
            "{}/PublicHolidays/{}/{}",
            self.base_url,
            year,
            code.to_ascii_uppercase()
        ))
    }

    /// `None` when the API answers "204 No Content", which it does for years
    /// without data.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        log::debug!("GET {}", url);
        let response = self.agent.get(url).call()?;

        if response.status() == 204 {
            return Ok(None);
        }

        response.into_json::<T>().map(Some).map_err(|e| {
            Error::new(
                ErrorKind::Json,
                &format!("unexpected response from {}: {}", url, e),
            )
        })
    }
}

impl HolidayProvider for NagerClient {
    fn available_countries(&self) -> Result<Vec<Country>> {
        let mut countries: Vec<Country> = self
            .get_json(&self.countries_url())?
            .unwrap_or_default();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!("Loaded {} countries", countries.len());
        Ok(countries)
    }

    fn public_holidays(&self, year: i32, country_code: &str) -> Result<Vec<HolidayRecord>> {
        let url = self.holidays_url(year, country_code)?;
        let holidays: Vec<HolidayRecord> = self.get_json(&url)?.unwrap_or_default();

        log::info!(
            "Fetched {} holidays for {} {}",
            holidays.len(),
            country_code,
            year
        );
        Ok(holidays)
    }
}
