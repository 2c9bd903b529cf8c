//! Annotated correlation heatmap.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

use super::text::{estimate_text_width_px, truncate_to_width};
use super::util::coolwarm;
use super::{Render, render_to_file};
use crate::stats::CorrelationMatrix;

const MISSING: RGBColor = RGBColor(245, 245, 245);
const LABEL_PX: u32 = 11;

struct Heatmap<'a> {
    matrix: &'a CorrelationMatrix,
    title: &'a str,
}

/// Render `matrix` as a grid of cells colored from -1 (blue) to +1 (red), each annotated
/// with its coefficient. Undefined coefficients are left blank.
pub fn plot_correlation_heatmap<P: AsRef<Path>>(
    matrix: &CorrelationMatrix,
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
) -> Result<()> {
    if matrix.labels.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    render_to_file(&Heatmap { matrix, title }, out_path.as_ref(), width, height)
}

impl Render for Heatmap<'_> {
    fn render<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        let n = self.matrix.labels.len();
        let (w, _) = root.dim_in_pixel();
        let (grid_area, bar_area) = root.split_horizontally(w.saturating_sub(90));

        // Row labels get at most a third of the width; column labels the width of a cell.
        let left_px = self
            .matrix
            .labels
            .iter()
            .map(|l| estimate_text_width_px(l, LABEL_PX))
            .max()
            .unwrap_or(0)
            .saturating_add(12)
            .min(w / 3);
        let cell_px = (w.saturating_sub(90 + left_px + 40) / n as u32).max(20);
        let row_labels: Vec<String> = self
            .matrix
            .labels
            .iter()
            .map(|l| truncate_to_width(l, LABEL_PX, left_px.saturating_sub(12)))
            .collect();
        let col_labels: Vec<String> = self
            .matrix
            .labels
            .iter()
            .map(|l| truncate_to_width(l, LABEL_PX, cell_px.saturating_sub(4)))
            .collect();

        let span = n as f64 - 0.5;
        let mut chart = ChartBuilder::on(&grid_area)
            .margin(20)
            .caption(self.title, (FontFamily::SansSerif, 20))
            .set_label_area_size(LabelAreaPosition::Left, left_px)
            .set_label_area_size(LabelAreaPosition::Bottom, 30)
            .build_cartesian_2d(-0.5..span, -0.5..span)
            .map_err(|e| anyhow!("{:?}", e))?;

        // Row 0 is drawn at the top.
        let label_at = |labels: &[String], v: f64, flip: bool| {
            let i = v.round();
            if (v - i).abs() > 1e-6 || i < 0.0 || i as usize >= n {
                return String::new();
            }
            let idx = if flip { n - 1 - i as usize } else { i as usize };
            labels[idx].clone()
        };
        let x_fmt = |v: &f64| label_at(&col_labels, *v, false);
        let y_fmt = |v: &f64| label_at(&row_labels, *v, true);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style((FontFamily::SansSerif, LABEL_PX))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        let mut cells = Vec::with_capacity(n * n);
        let mut notes = Vec::with_capacity(n * n);
        for (i, row) in self.matrix.values.iter().enumerate() {
            let y = (n - 1 - i) as f64;
            for (j, v) in row.iter().enumerate() {
                let x = j as f64;
                let fill = v.map(coolwarm).unwrap_or(MISSING);
                cells.push(Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill.filled()));
                if let Some(v) = v {
                    let ink: &'static RGBColor = if v.abs() > 0.6 { &WHITE } else { &BLACK };
                    let style = TextStyle::from((FontFamily::SansSerif, 12))
                        .pos(Pos::new(HPos::Center, VPos::Center))
                        .color(ink);
                    notes.push(Text::new(format!("{v:.2}"), (x, y), style));
                }
            }
        }
        chart.draw_series(cells).map_err(|e| anyhow!("{:?}", e))?;
        chart.draw_series(notes).map_err(|e| anyhow!("{:?}", e))?;

        draw_color_bar(&bar_area)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}

/// Vertical -1..1 scale next to the grid.
fn draw_color_bar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(50)
        .margin_right(10)
        .set_label_area_size(LabelAreaPosition::Right, 40)
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)
        .map_err(|e| anyhow!("{:?}", e))?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|v: &f64| format!("{v:.1}"))
        .label_style((FontFamily::SansSerif, LABEL_PX))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    const STEPS: usize = 64;
    let h = 2.0 / STEPS as f64;
    bar.draw_series((0..STEPS).map(|k| {
        let lo = -1.0 + k as f64 * h;
        Rectangle::new([(0.0, lo), (1.0, lo + h)], coolwarm(lo + h / 2.0).filled())
    }))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
