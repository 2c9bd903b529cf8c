//! wbi_tables
//!
//! A small Rust library for reshaping, summarizing, and charting World Bank indicator
//! exports (the `API_<code>_DS2_en_csv_v2_*.csv` files). Pairs with the `wbi-tables` CLI.
//!
//! ### Features
//! - Load World Bank CSV exports (preamble and trailing empty column are handled)
//! - Reshape into a country-indexed and a year-indexed view with no missing values
//! - Describe statistics (count, mean, std, min, quartiles, max) and correlations
//! - Grouped bar, line series, correlation heatmap, and box plot charts (SVG/PNG)
//!
//! ### Example
//! ```no_run
//! use wbi_tables::{loader, report, ReshapeOptions};
//!
//! let co2 = loader::load_indicator("API_EN.ATM.CO2E.KT.csv", &ReshapeOptions::default())?;
//! let spec = report::SeriesSpec {
//!     title: "CO2 production in different countries".into(),
//!     y_label: "CO2 Emission".into(),
//!     countries: vec!["China".into(), "Japan".into()],
//!     tick_every: 4,
//! };
//! report::series_report(&co2.by_year, &spec, &report::ChartOptions::default(), "co2.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod reshape;
pub mod stats;
pub mod storage;
pub mod viz;

pub use config::{Config, Indicator};
pub use error::{Error, Result};
pub use models::{CountryRow, CountryTable, RawRow, RawTable, YearTable};
pub use reshape::{Completeness, ReshapeOptions, Reshaped};
