pub mod nager;

pub use nager::NagerClient;

use crate::error::Result;
use crate::holiday::{Country, HolidayRecord};

pub const DEFAULT_API_URL: &str = "https://date.nager.at/api/v3";

/// A source of public holiday data.
pub trait HolidayProvider {
    fn available_countries(&self) -> Result<Vec<Country>>;
    fn public_holidays(&self, year: i32, country_code: &str) -> Result<Vec<HolidayRecord>>;
}
