//! Visualization utilities: render year tables and statistics to **SVG** or **PNG**.
//!
//! - Line / scatter / line+points series and grouped bars from a [`YearTable`]
//! - Correlation heatmap ([`heatmap`]) and box plot ([`boxplot`])
//! - Distinct series colors (Microsoft Office palette)
//! - Y axis unit from the indicator name, scaled to thousands/millions/… unless it is a percentage
//! - Legend placement: `Inside`, `Right`, `Top`, `Bottom`
//!
//! The output format follows the file extension: `.svg` is SVG, anything else is PNG.

pub mod boxplot;
pub mod heatmap;
pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{ChartOptions, DEFAULT_LEGEND_MODE, LegendMode, PlotKind};

use crate::models::YearTable;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use legend::{band_height_px, draw_legend_panel};
use util::{axis_title_and_scale, compute_left_label_area_px, office_color, tick_label_locale};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Something that can paint itself onto any Plotters backend.
pub(crate) trait Render {
    fn render<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()>;
}

/// Render to `out_path`: SVG when the extension is `.svg`, PNG otherwise.
pub(crate) fn render_to_file<R: Render>(
    chart: &R,
    out_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let path_string = out_path.to_string_lossy().into_owned();
    let svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if svg {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        chart.render(root)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        chart.render(root)
    }
}

/// Plot every country column of `table` as a series.
pub fn plot_table<P: AsRef<Path>>(
    table: &YearTable,
    out_path: P,
    kind: PlotKind,
    opts: &ChartOptions,
) -> Result<()> {
    if table.is_empty() || table.countries.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let chart = TableChart { table, kind, opts };
    render_to_file(&chart, out_path.as_ref(), opts.width, opts.height)
}

/// Line chart: one line per country.
pub fn plot_lines<P: AsRef<Path>>(table: &YearTable, out_path: P, opts: &ChartOptions) -> Result<()> {
    plot_table(table, out_path, PlotKind::Line, opts)
}

/// Grouped bar chart: one group per period, one bar per country.
pub fn plot_grouped_bars<P: AsRef<Path>>(
    table: &YearTable,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    plot_table(table, out_path, PlotKind::GroupedBar, opts)
}

/// Label for index position `x`: the period there, blank between periods and, with
/// `every > 0`, on every period not a multiple of `every` from the first.
fn period_label(periods: &[String], x: f64, every: usize) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    let i = i as usize;
    if every > 0 && i % every != 0 {
        return String::new();
    }
    periods.get(i).cloned().unwrap_or_default()
}

struct TableChart<'a> {
    table: &'a YearTable,
    kind: PlotKind,
    opts: &'a ChartOptions,
}

impl TableChart<'_> {
    /// X position of each period: the year itself when every label is a year, else its index.
    /// Bars and fixed tick spacing always use the index so every label sits on a period.
    fn x_positions(&self) -> (Vec<f64>, bool) {
        if self.kind != PlotKind::GroupedBar
            && self.opts.x_tick_every == 0
            && let Some(years) = self.table.year_numbers()
        {
            return (years.into_iter().map(f64::from).collect(), true);
        }
        ((0..self.table.len()).map(|i| i as f64).collect(), false)
    }

    fn caption(&self) -> String {
        let t = self.opts.title.trim();
        if !t.is_empty() {
            return t.to_string();
        }
        self.table
            .indicator_name
            .clone()
            .unwrap_or_else(|| "World Bank Indicator".to_string())
    }

    fn y_bounds(&self) -> (f64, f64) {
        if let Some((lo, hi)) = self.opts.y_range {
            return (lo, hi);
        }
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for row in &self.table.values {
            for v in row {
                lo = lo.min(*v);
                hi = hi.max(*v);
            }
        }
        if self.kind == PlotKind::GroupedBar {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }
        (lo, hi)
    }
}

impl Render for TableChart<'_> {
    fn render<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        const MARGIN: i32 = 16;
        let table = self.table;
        let opts = self.opts;

        let (xs, year_axis) = self.x_positions();
        let (x_min, x_max) = if self.kind == PlotKind::GroupedBar {
            (-0.5, xs.len() as f64 - 0.5)
        } else {
            let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if (hi - lo).abs() < f64::EPSILON {
                (lo - 1.0, hi + 1.0)
            } else {
                (lo, hi)
            }
        };

        let (min_val, max_val) = self.y_bounds();
        let max_abs = min_val.abs().max(max_val.abs());
        let (yscale, y_title) = if opts.y_range.is_some() {
            (1.0, axis_title_and_scale(table.indicator_name.as_deref(), &opts.y_label, 0.0).1)
        } else {
            axis_title_and_scale(table.indicator_name.as_deref(), &opts.y_label, max_abs)
        };

        let y_label_count = 10usize;
        // With a fixed spacing every period gets a tick; the formatter blanks the others.
        let x_label_count = match opts.x_tick_every {
            0 => table.len().min(12),
            _ => table.len(),
        }
        .max(1);

        let left_label_px =
            compute_left_label_area_px(min_val / yscale, max_val / yscale, y_label_count, 12);
        let axis_x_start_px = MARGIN + left_label_px as i32;

        let legend_items: Vec<(String, RGBAColor)> = table
            .countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), office_color(i)))
            .collect();
        let labels: Vec<String> = legend_items.iter().map(|(l, _)| l.clone()).collect();

        let (root_w, root_h) = root.dim_in_pixel();
        let (plot_area, legend_area) = match opts.legend {
            LegendMode::Right => {
                let (plot, legend) = root.split_horizontally((80).percent_width());
                (plot, Some(legend))
            }
            LegendMode::Top => {
                let h = band_height_px(&labels, axis_x_start_px, root_w as i32).max(40);
                let (legend, plot) = root.split_vertically(h);
                (plot, Some(legend))
            }
            LegendMode::Bottom => {
                let h = band_height_px(&labels, axis_x_start_px, root_w as i32).max(40);
                let (plot, legend) = root.split_vertically((root_h as i32 - h).max(40));
                (plot, Some(legend))
            }
            LegendMode::Inside => (root, None),
        };
        plot_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(MARGIN as u32)
            .caption(self.caption(), (FontFamily::SansSerif, 20))
            .set_label_area_size(LabelAreaPosition::Left, left_label_px)
            .set_label_area_size(LabelAreaPosition::Bottom, 48)
            .build_cartesian_2d(x_min..x_max, (min_val / yscale)..(max_val / yscale))
            .map_err(|e| anyhow!("{:?}", e))?;

        let periods = &table.periods;
        let x_label_fmt = |x: &f64| {
            if year_axis {
                (x.round() as i32).to_string()
            } else {
                period_label(periods, *x, opts.x_tick_every)
            }
        };
        let y_label_fmt = |v: &f64| tick_label_locale(*v, &opts.locale);

        {
            let mut mesh = chart.configure_mesh();
            mesh.x_desc("Year")
                .y_desc(y_title)
                .x_labels(x_label_count)
                .y_labels(y_label_count)
                .x_label_formatter(&x_label_fmt)
                .y_label_formatter(&y_label_fmt)
                .label_style((FontFamily::SansSerif, 12))
                .axis_desc_style((FontFamily::SansSerif, 14));
            if self.kind == PlotKind::GroupedBar {
                mesh.disable_x_mesh();
            }
            mesh.draw().map_err(|e| anyhow!("{:?}", e))?;
        }

        let inside = opts.legend == LegendMode::Inside;
        let n_series = table.countries.len();
        for (c, (label, color)) in legend_items.iter().enumerate() {
            let color = *color;
            let series: Vec<(f64, f64)> = xs
                .iter()
                .zip(&table.values)
                .map(|(x, row)| (*x, row[c] / yscale))
                .collect();

            let anno = match self.kind {
                PlotKind::Line => chart
                    .draw_series(LineSeries::new(series, color.stroke_width(2)))
                    .map_err(|e| anyhow!("{:?}", e))?,
                PlotKind::Scatter => chart
                    .draw_series(
                        series
                            .iter()
                            .map(|(x, y)| Circle::new((*x, *y), 3, color.filled())),
                    )
                    .map_err(|e| anyhow!("{:?}", e))?,
                PlotKind::LinePoints => {
                    chart
                        .draw_series(LineSeries::new(series.clone(), color.stroke_width(2)))
                        .map_err(|e| anyhow!("{:?}", e))?;
                    chart
                        .draw_series(
                            series
                                .iter()
                                .map(|(x, y)| Circle::new((*x, *y), 3, color.filled())),
                        )
                        .map_err(|e| anyhow!("{:?}", e))?
                }
                PlotKind::GroupedBar => {
                    let group_width = 0.8f64;
                    let bar_w = group_width / n_series as f64;
                    let base = 0.0f64.max(min_val / yscale);
                    chart
                        .draw_series(series.iter().map(|(x, y)| {
                            let x0 = x - group_width / 2.0 + c as f64 * bar_w;
                            Rectangle::new([(x0, base.min(*y)), (x0 + bar_w, base.max(*y))], color.filled())
                        }))
                        .map_err(|e| anyhow!("{:?}", e))?
                }
            };
            if inside {
                anno.label(label.clone()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
            }
        }

        if inside {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.85))
                .label_font((FontFamily::SansSerif, 12))
                .draw()
                .map_err(|e| anyhow!("{:?}", e))?;
        } else if let Some(ref area) = legend_area {
            draw_legend_panel(area, &legend_items, opts.legend, axis_x_start_px)?;
        }

        plot_area.present().map_err(|e| anyhow!("{:?}", e))?;
        if let Some(ref area) = legend_area {
            area.present().map_err(|e| anyhow!("{:?}", e))?;
        }
        Ok(())
    }
}
