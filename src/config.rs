//! Report configuration: which export holds which indicator, and what each report shows.
//!
//! Loaded from JSON; every field except `datasets` falls back to a default.

use crate::error::{Error, Result};
use crate::reshape::{Completeness, ReshapeOptions};
use crate::viz::LegendMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Indicators the full report knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    AgriculturalLand,
    ElectricityAccess,
    Co2Emissions,
    ForestArea,
    Gdp,
    LifeExpectancy,
    PopulationGrowth,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::AgriculturalLand,
        Indicator::ElectricityAccess,
        Indicator::Co2Emissions,
        Indicator::ForestArea,
        Indicator::Gdp,
        Indicator::LifeExpectancy,
        Indicator::PopulationGrowth,
    ];

    /// Config key, e.g. `co2_emissions`.
    pub fn key(self) -> &'static str {
        match self {
            Indicator::AgriculturalLand => "agricultural_land",
            Indicator::ElectricityAccess => "electricity_access",
            Indicator::Co2Emissions => "co2_emissions",
            Indicator::ForestArea => "forest_area",
            Indicator::Gdp => "gdp",
            Indicator::LifeExpectancy => "life_expectancy",
            Indicator::PopulationGrowth => "population_growth",
        }
    }

    /// Display label used in heatmaps.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::AgriculturalLand => "Agricultural land (% of land area)",
            Indicator::ElectricityAccess => "Access to electricity (% of population)",
            Indicator::Co2Emissions => "CO2 emissions (kt)",
            Indicator::ForestArea => "Forest area (sq. km)",
            Indicator::Gdp => "GDP (current US$)",
            Indicator::LifeExpectancy => "Life expectancy at birth, total (years)",
            Indicator::PopulationGrowth => "Population growth (annual %)",
        }
    }

    /// World Bank indicator code.
    pub fn code(self) -> &'static str {
        match self {
            Indicator::AgriculturalLand => "AG.LND.AGRI.ZS",
            Indicator::ElectricityAccess => "EG.ELC.ACCS.ZS",
            Indicator::Co2Emissions => "EN.ATM.CO2E.KT",
            Indicator::ForestArea => "AG.LND.FRST.K2",
            Indicator::Gdp => "NY.GDP.MKTP.CD",
            Indicator::LifeExpectancy => "SP.DYN.LE00.IN",
            Indicator::PopulationGrowth => "SP.POP.GROW",
        }
    }
}

/// Chart file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Svg,
    Png,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPlacement {
    Inside,
    #[default]
    Right,
    Top,
    Bottom,
}

impl From<LegendPlacement> for LegendMode {
    fn from(p: LegendPlacement) -> Self {
        match p {
            LegendPlacement::Inside => LegendMode::Inside,
            LegendPlacement::Right => LegendMode::Right,
            LegendPlacement::Top => LegendMode::Top,
            LegendPlacement::Bottom => LegendMode::Bottom,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_bar_countries() -> Vec<String> {
    ["Zambia", "Japan", "Argentina", "Bulgaria", "Panama"]
        .map(String::from)
        .to_vec()
}
fn default_bar_years() -> usize {
    10
}
fn default_series_countries() -> Vec<String> {
    [
        "Zambia",
        "Japan",
        "Argentina",
        "Bulgaria",
        "Panama",
        "Venezuela, RB",
        "Samoa",
        "China",
        "Pakistan",
        "United States",
        "Canada",
        "Ireland",
        "Spain",
        "Tunisia",
    ]
    .map(String::from)
    .to_vec()
}
fn default_heatmap_year() -> String {
    "2010".to_string()
}
fn default_heatmap_indicators() -> Vec<Indicator> {
    vec![
        Indicator::AgriculturalLand,
        Indicator::ElectricityAccess,
        Indicator::Gdp,
        Indicator::LifeExpectancy,
        Indicator::PopulationGrowth,
        Indicator::Co2Emissions,
    ]
}
fn default_box_plot_country() -> String {
    "Pakistan".to_string()
}
fn default_describe() -> Indicator {
    Indicator::ElectricityAccess
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Indicator to export file.
    #[serde(default)]
    pub datasets: BTreeMap<Indicator, PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub format: ChartFormat,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Number formatting locale tag (`en`, `de`, ...).
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub legend: LegendPlacement,
    #[serde(default)]
    pub completeness: Completeness,
    #[serde(default = "default_bar_countries")]
    pub bar_countries: Vec<String>,
    /// Leading periods shown in the bar charts.
    #[serde(default = "default_bar_years")]
    pub bar_years: usize,
    #[serde(default = "default_series_countries")]
    pub series_countries: Vec<String>,
    #[serde(default = "default_heatmap_year")]
    pub heatmap_year: String,
    #[serde(default = "default_heatmap_indicators")]
    pub heatmap_indicators: Vec<Indicator>,
    #[serde(default = "default_box_plot_country")]
    pub box_plot_country: String,
    /// Indicator whose country table is printed by `describe`.
    #[serde(default = "default_describe")]
    pub describe: Indicator,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: BTreeMap::new(),
            output_dir: default_output_dir(),
            format: ChartFormat::default(),
            width: default_width(),
            height: default_height(),
            locale: default_locale(),
            legend: LegendPlacement::default(),
            completeness: Completeness::default(),
            bar_countries: default_bar_countries(),
            bar_years: default_bar_years(),
            series_countries: default_series_countries(),
            heatmap_year: default_heatmap_year(),
            heatmap_indicators: default_heatmap_indicators(),
            box_plot_country: default_box_plot_country(),
            describe: default_describe(),
        }
    }
}

impl Config {
    pub fn from_json(s: &str, origin: &Path) -> Result<Self> {
        let mut cfg: Config = serde_json::from_str(s).map_err(|source| Error::Config {
            path: origin.to_path_buf(),
            source,
        })?;
        // Relative dataset and output paths are relative to the config file.
        if let Some(base) = origin.parent() {
            for path in cfg
                .datasets
                .values_mut()
                .chain(std::iter::once(&mut cfg.output_dir))
            {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    pub fn dataset(&self, indicator: Indicator) -> Result<&Path> {
        self.datasets
            .get(&indicator)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::MissingDataset(indicator.key().to_string()))
    }

    pub fn reshape_options(&self) -> ReshapeOptions {
        ReshapeOptions {
            completeness: self.completeness,
        }
    }

    /// `<output_dir>/<name>.<ext>`
    pub fn chart_path(&self, name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", name, self.format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = Config::from_json(
            r#"{"datasets": {"co2_emissions": "co2.csv"}}"#,
            Path::new("/etc/wbi/report.json"),
        )
        .unwrap();
        assert_eq!(
            cfg.dataset(Indicator::Co2Emissions).unwrap(),
            Path::new("/etc/wbi/co2.csv")
        );
        assert_eq!(cfg.bar_years, 10);
        assert_eq!(cfg.box_plot_country, "Pakistan");
        assert_eq!(cfg.chart_path("co2"), PathBuf::from("/etc/wbi/charts/co2.svg"));
    }

    #[test]
    fn absolute_output_dir_is_kept() {
        let cfg = Config::from_json(
            r#"{"output_dir": "/tmp/wbi-out", "format": "png"}"#,
            Path::new("/etc/wbi/report.json"),
        )
        .unwrap();
        assert_eq!(cfg.chart_path("gdp"), PathBuf::from("/tmp/wbi-out/gdp.png"));
        assert_eq!(Config::default().chart_path("gdp"), PathBuf::from("charts/gdp.svg"));
    }

    #[test]
    fn unknown_indicator_key_is_rejected() {
        let err = Config::from_json(r#"{"datasets": {"rainfall": "r.csv"}}"#, Path::new("c.json"))
            .unwrap_err();
        assert!(err.to_string().contains("c.json"));
    }

    #[test]
    fn missing_dataset_names_indicator() {
        let err = Config::default().dataset(Indicator::Gdp).unwrap_err();
        assert_eq!(err.to_string(), "no dataset configured for `gdp`");
    }
}
