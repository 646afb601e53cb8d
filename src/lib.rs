pub mod app;
pub mod args;
pub mod config;
pub mod date;
pub mod error;
pub mod export;
pub mod generate;
pub mod holiday;
pub mod layout;
pub mod provider;
pub mod render;
pub mod settings;
pub mod surface;
pub mod svg;

pub use error::{Error, ErrorKind, Result};
pub use generate::{generate, generate_year, GenerateStatus};
