//! Box-and-whisker chart, one box per [`BoxStats`].

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use std::path::Path;

use super::util::{compute_left_label_area_px, office_color, tick_label};
use super::{Render, render_to_file};
use crate::stats::BoxStats;

struct BoxChart<'a> {
    boxes: &'a [BoxStats],
    title: &'a str,
    y_label: &'a str,
    color: Option<RGBColor>,
}

/// Draw each box with its whiskers, median line, and outliers as hollow circles.
///
/// `color` overrides the palette for every box (the life-expectancy report uses red).
pub fn plot_boxes<P: AsRef<Path>>(
    boxes: &[BoxStats],
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
    y_label: &str,
    color: Option<RGBColor>,
) -> Result<()> {
    if boxes.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let chart = BoxChart {
        boxes,
        title,
        y_label,
        color,
    };
    render_to_file(&chart, out_path.as_ref(), width, height)
}

impl Render for BoxChart<'_> {
    fn render<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for b in self.boxes {
            lo = lo.min(b.lower_whisker);
            hi = hi.max(b.upper_whisker);
            for o in &b.outliers {
                lo = lo.min(*o);
                hi = hi.max(*o);
            }
        }
        let pad = ((hi - lo) * 0.05).max(0.5);
        let (lo, hi) = (lo - pad, hi + pad);

        let n = self.boxes.len();
        let labels: Vec<&str> = self.boxes.iter().map(|b| b.label.as_str()).collect();
        let x_fmt = |v: &f64| {
            let i = v.round();
            if (v - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
        };
        let y_fmt = |v: &f64| tick_label(*v);

        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .caption(self.title, (FontFamily::SansSerif, 20))
            .set_label_area_size(LabelAreaPosition::Left, compute_left_label_area_px(lo, hi, 10, 12))
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), lo..hi)
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .y_labels(10)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .y_desc(self.y_label)
            .label_style((FontFamily::SansSerif, 12))
            .axis_desc_style((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        const HALF: f64 = 0.25;
        for (i, b) in self.boxes.iter().enumerate() {
            let x = i as f64;
            let color = self
                .color
                .map(|c| c.to_rgba())
                .unwrap_or_else(|| office_color(i));
            let stroke = color.stroke_width(2);

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - HALF, b.q1), (x + HALF, b.q3)],
                    stroke,
                )))
                .map_err(|e| anyhow!("{:?}", e))?;

            let segments = [
                // median
                vec![(x - HALF, b.median), (x + HALF, b.median)],
                // whiskers and caps
                vec![(x, b.q3), (x, b.upper_whisker)],
                vec![(x, b.q1), (x, b.lower_whisker)],
                vec![(x - HALF / 2.0, b.upper_whisker), (x + HALF / 2.0, b.upper_whisker)],
                vec![(x - HALF / 2.0, b.lower_whisker), (x + HALF / 2.0, b.lower_whisker)],
            ];
            chart
                .draw_series(segments.into_iter().map(|pts| PathElement::new(pts, stroke)))
                .map_err(|e| anyhow!("{:?}", e))?;

            chart
                .draw_series(
                    b.outliers
                        .iter()
                        .map(|o| Circle::new((x, *o), 3, color.stroke_width(1))),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        root.present().map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}
