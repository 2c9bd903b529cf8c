//! Reports over reshaped indicator tables.
//!
//! Every function takes its country selection as an argument; [`run`] drives the full
//! report from a [`Config`].

use crate::compare::{self, IndicatorFrame};
use crate::config::{Config, Indicator};
use crate::loader;
use crate::models::{CountryTable, YearTable};
use crate::reshape::Reshaped;
use crate::stats::{self, BoxStats, CorrelationMatrix, Summary};
use crate::viz::util::format_number;
use crate::viz::{self, boxplot, heatmap};
use anyhow::{Context, Result, anyhow};
use log::info;
use plotters::style::RGBColor;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

pub use crate::viz::ChartOptions;

/// Grouped bars for the first `years` periods of the selected countries.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub title: String,
    pub y_label: String,
    pub countries: Vec<String>,
    pub years: usize,
    pub y_range: Option<(f64, f64)>,
}

/// Line series of the selected countries over every period.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub title: String,
    pub y_label: String,
    pub countries: Vec<String>,
    /// Label the first period and every `tick_every`-th one after it (`0` lets the chart
    /// pick round years).
    pub tick_every: usize,
}

pub fn bar_report<P: AsRef<Path>>(
    table: &YearTable,
    spec: &BarSpec,
    chart: &ChartOptions,
    out: P,
) -> Result<()> {
    let data = table.head(spec.years).select(&spec.countries)?;
    let opts = ChartOptions {
        title: spec.title.clone(),
        y_label: spec.y_label.clone(),
        y_range: spec.y_range,
        ..chart.clone()
    };
    viz::plot_grouped_bars(&data, out.as_ref(), &opts)
        .with_context(|| format!("bar chart {}", out.as_ref().display()))
}

pub fn series_report<P: AsRef<Path>>(
    table: &YearTable,
    spec: &SeriesSpec,
    chart: &ChartOptions,
    out: P,
) -> Result<()> {
    let data = table.select(&spec.countries)?;
    let opts = ChartOptions {
        title: spec.title.clone(),
        y_label: spec.y_label.clone(),
        x_tick_every: spec.tick_every,
        ..chart.clone()
    };
    viz::plot_lines(&data, out.as_ref(), &opts)
        .with_context(|| format!("series chart {}", out.as_ref().display()))
}

/// Correlate the indicator columns of `frame` and draw the heatmap.
pub fn heatmap_report<P: AsRef<Path>>(
    frame: &IndicatorFrame,
    chart: &ChartOptions,
    out: P,
) -> Result<CorrelationMatrix> {
    let matrix = stats::correlation_matrix(frame);
    let title = if chart.title.trim().is_empty() {
        format!("Correlation between indicators ({})", frame.period)
    } else {
        chart.title.clone()
    };
    heatmap::plot_correlation_heatmap(&matrix, out.as_ref(), chart.width, chart.height, &title)
        .with_context(|| format!("heatmap {}", out.as_ref().display()))?;
    Ok(matrix)
}

/// Box plot of one country's values across all periods.
pub fn box_plot_report<P: AsRef<Path>>(
    table: &YearTable,
    country: &str,
    chart: &ChartOptions,
    out: P,
) -> Result<BoxStats> {
    let values = table.column(country)?;
    let b = stats::box_stats(country, &values)
        .ok_or_else(|| anyhow!("no values for {country}"))?;
    let title = if chart.title.trim().is_empty() {
        match &table.indicator_name {
            Some(name) => format!("{name} in {country}"),
            None => country.to_string(),
        }
    } else {
        chart.title.clone()
    };
    boxplot::plot_boxes(
        std::slice::from_ref(&b),
        out.as_ref(),
        chart.width,
        chart.height,
        &title,
        &chart.y_label,
        Some(RGBColor(214, 39, 40)),
    )
    .with_context(|| format!("box plot {}", out.as_ref().display()))?;
    Ok(b)
}

fn write_column<W: Write>(
    w: &mut W,
    heading: &str,
    rows: &[Summary],
    locale: &str,
    pick: impl Fn(&Summary) -> Option<f64>,
) -> Result<()> {
    writeln!(w, "{heading}")?;
    for s in rows {
        let v = pick(s).map(|v| format_number(v, 4, locale));
        writeln!(w, "  {:<12} {}", s.label, v.as_deref().unwrap_or("NA"))?;
    }
    Ok(())
}

/// Print min, max, describe, and median of every period column.
pub fn describe_report<W: Write>(table: &CountryTable, locale: &str, w: &mut W) -> Result<()> {
    let rows = stats::describe_country_table(table);
    let name = table.indicator_name().unwrap_or(&table.source);
    writeln!(w, "{name} ({} countries)", table.len())?;

    write_column(w, "min", &rows, locale, |s| s.min)?;
    write_column(w, "max", &rows, locale, |s| s.max)?;

    writeln!(w, "describe")?;
    writeln!(
        w,
        "  {:<12} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )?;
    let cell = |v: Option<f64>| v.map(|x| format_number(x, 4, locale)).unwrap_or_else(|| "NA".into());
    for s in &rows {
        writeln!(
            w,
            "  {:<12} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
            s.label,
            s.count,
            cell(s.mean),
            cell(s.std),
            cell(s.min),
            cell(s.q25),
            cell(s.median),
            cell(s.q75),
            cell(s.max)
        )?;
    }

    write_column(w, "median", &rows, locale, |s| s.median)?;
    Ok(())
}

impl From<&Config> for ChartOptions {
    fn from(cfg: &Config) -> Self {
        ChartOptions {
            width: cfg.width,
            height: cfg.height,
            locale: cfg.locale.clone(),
            legend: cfg.legend.into(),
            ..ChartOptions::default()
        }
    }
}

/// Loads each configured export at most once.
pub struct Datasets<'a> {
    cfg: &'a Config,
    loaded: BTreeMap<Indicator, Reshaped>,
}

impl<'a> Datasets<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self {
            cfg,
            loaded: BTreeMap::new(),
        }
    }

    pub fn get(&mut self, indicator: Indicator) -> Result<&Reshaped> {
        if !self.loaded.contains_key(&indicator) {
            let path = self.cfg.dataset(indicator)?;
            let data = loader::load_indicator(path, &self.cfg.reshape_options())
                .with_context(|| format!("loading {}", indicator.key()))?;
            self.loaded.insert(indicator, data);
        }
        self.loaded
            .get(&indicator)
            .ok_or_else(|| anyhow!("{} not loaded", indicator.key()))
    }
}

/// One column per `cfg.heatmap_indicators` entry, each read from that indicator's own
/// dataset, labelled with [`Indicator::label`], for `cfg.heatmap_year`.
pub fn heatmap_frame(cfg: &Config, data: &mut Datasets<'_>) -> Result<IndicatorFrame> {
    for indicator in &cfg.heatmap_indicators {
        data.get(*indicator)?;
    }
    let columns = cfg
        .heatmap_indicators
        .iter()
        .map(|i| {
            data.loaded
                .get(i)
                .map(|d| (i.label(), &d.by_country))
                .ok_or_else(|| anyhow!("{} not loaded", i.key()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(compare::assemble(&columns, &cfg.heatmap_year)?)
}

/// Run the complete report: bar charts, series charts, heatmap, box plot, describe.
///
/// Charts go to `cfg.output_dir`; the describe output goes to `out`.
pub fn run<W: Write>(cfg: &Config, out: &mut W) -> Result<()> {
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create {}", cfg.output_dir.display()))?;
    let chart = ChartOptions::from(cfg);
    let mut data = Datasets::new(cfg);

    let bars = [
        (
            Indicator::AgriculturalLand,
            "agricultural_land",
            "Agricultural land by %age",
            Some((0.0, 100.0)),
        ),
        (
            Indicator::ElectricityAccess,
            "electricity_access",
            "Access to electricity (% of users)",
            None,
        ),
    ];
    for (indicator, name, title, y_range) in bars {
        let spec = BarSpec {
            title: title.to_string(),
            y_label: "Percentage".to_string(),
            countries: cfg.bar_countries.clone(),
            years: cfg.bar_years,
            y_range,
        };
        let path = cfg.chart_path(name);
        bar_report(&data.get(indicator)?.by_year, &spec, &chart, &path)?;
        info!("wrote {}", path.display());
    }

    let series = [
        (
            Indicator::Co2Emissions,
            "co2_emissions",
            "CO2 production in different countries",
            "CO2 Emission",
            4,
        ),
        (
            Indicator::ForestArea,
            "forest_area",
            "Forest area in different countries",
            "Forest Area (Sq. Km)",
            5,
        ),
    ];
    for (indicator, name, title, y_label, tick_every) in series {
        let spec = SeriesSpec {
            title: title.to_string(),
            y_label: y_label.to_string(),
            countries: cfg.series_countries.clone(),
            tick_every,
        };
        let path = cfg.chart_path(name);
        series_report(&data.get(indicator)?.by_year, &spec, &chart, &path)?;
        info!("wrote {}", path.display());
    }

    let frame = heatmap_frame(cfg, &mut data)?;
    let path = cfg.chart_path("indicator_heatmap");
    let heat_opts = ChartOptions {
        width: cfg.width.max(1000),
        height: cfg.height.max(700),
        ..chart.clone()
    };
    heatmap_report(&frame, &heat_opts, &path)?;
    info!("wrote {}", path.display());

    let country = cfg.box_plot_country.as_str();
    let path = cfg.chart_path("life_expectancy_box");
    let box_opts = ChartOptions {
        title: format!("Life Expectancy at birth in {country}"),
        y_label: "Years".to_string(),
        ..chart.clone()
    };
    box_plot_report(&data.get(Indicator::LifeExpectancy)?.by_year, country, &box_opts, &path)?;
    info!("wrote {}", path.display());

    describe_report(&data.get(cfg.describe)?.by_country, &cfg.locale, out)?;
    Ok(())
}
