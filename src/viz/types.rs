//! Public types and constants for the visualization module.

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (may overlap data).
    Inside,
    /// Separate legend panel on the right side.
    Right,
    /// Separate legend band at the top.
    Top,
    /// Separate legend band at the bottom.
    Bottom,
}

/// How country columns of a year table are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// One line per country.
    Line,
    /// Markers only.
    Scatter,
    /// Line + markers overlay.
    LinePoints,
    /// One group of bars per period, one bar per country.
    GroupedBar,
}

/// Series charts in the reports carry many countries, so the legend goes beside the plot.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Right;

/// Size, labels, and axis options shared by the table charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Number formatting locale tag, see [`super::util::map_locale`].
    pub locale: String,
    pub legend: LegendMode,
    /// Chart caption; empty derives one from the indicator name.
    pub title: String,
    /// Y axis description; empty derives one from the indicator unit.
    pub y_label: String,
    /// Fixed Y range instead of fitting the data.
    pub y_range: Option<(f64, f64)>,
    /// Label exactly every `n`-th period from the first (`0` lets the chart decide).
    pub x_tick_every: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            locale: "en".to_string(),
            legend: DEFAULT_LEGEND_MODE,
            title: String::new(),
            y_label: String::new(),
            y_range: None,
            x_tick_every: 0,
        }
    }
}
