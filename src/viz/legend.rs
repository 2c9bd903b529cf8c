//! External legend panels (right column, or top/bottom bands of wrapped rows).

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, wrap_text_to_width};
use super::types::LegendMode;

// Layout constants shared by the estimator and the painter.
const FONT_PX: u32 = 14;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD: i32 = 8;
const MARKER_R: i32 = 4;
const MARKER_GAP: i32 = 12;
const TRAILING_GAP: i32 = 12;

fn item_width(label: &str) -> i32 {
    MARKER_GAP + MARKER_R + estimate_text_width_px(label, FONT_PX) as i32 + TRAILING_GAP
}

/// Pack labels into rows for a band `band_w` wide whose first column starts at `start_x`.
/// Returns indexes into `labels`, one vector per row.
fn pack_rows(labels: &[String], start_x: i32, band_w: i32) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut cur: Vec<usize> = Vec::new();
    let mut x = start_x;
    for (i, label) in labels.iter().enumerate() {
        let w = item_width(label).min(band_w - start_x);
        if x + w > band_w && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = start_x;
        }
        x += w;
        cur.push(i);
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows
}

/// Height in pixels a top/bottom band needs for `labels`.
pub fn band_height_px(labels: &[String], start_x: i32, band_w: i32) -> i32 {
    let rows = pack_rows(labels, start_x, band_w).len() as i32;
    if rows == 0 {
        return 0;
    }
    2 * PAD + rows * LINE_H + (rows - 1) * ROW_GAP
}

fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    x: i32,
    y: i32,
    color: RGBAColor,
) -> Result<()> {
    area.draw(&Circle::new((x, y), MARKER_R, color.filled()))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Draw the legend into `legend_area`.
///
/// `Right` stacks items in one column, wrapping long labels; `Top`/`Bottom` flow items in
/// rows starting at `axis_x_start_px` so the band lines up with the plot's X axis.
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    placement: LegendMode,
    axis_x_start_px: i32,
) -> Result<()> {
    legend_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (w, _) = legend_area.dim_in_pixel();
    let w = w as i32;
    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Center));

    match placement {
        LegendMode::Right => {
            let text_x = PAD + MARKER_R + MARKER_GAP;
            let max_text_w = (w - text_x - PAD).max(40) as u32;
            let mut y = PAD + 6;
            for (label, color) in items {
                let lines = wrap_text_to_width(label, FONT_PX, max_text_w);
                let block_h = lines.len().max(1) as i32 * LINE_H;
                draw_marker(legend_area, PAD + MARKER_R, y + LINE_H / 2, *color)?;
                for (i, line) in lines.iter().enumerate() {
                    legend_area
                        .draw(&Text::new(
                            line.as_str(),
                            (text_x, y + i as i32 * LINE_H + LINE_H / 2),
                            style.clone(),
                        ))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
                y += block_h + ROW_GAP;
            }
        }
        LegendMode::Top | LegendMode::Bottom => {
            let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
            let mut y = PAD + LINE_H / 2;
            for row in pack_rows(&labels, axis_x_start_px, w) {
                let mut x = axis_x_start_px;
                for i in row {
                    let (label, color) = &items[i];
                    let slot = item_width(label).min(w - axis_x_start_px);
                    let text_cap = (slot - MARKER_GAP - MARKER_R - TRAILING_GAP).max(20) as u32;
                    let text = super::text::truncate_to_width(label, FONT_PX, text_cap);
                    draw_marker(legend_area, x + MARKER_R, y, *color)?;
                    legend_area
                        .draw(&Text::new(text, (x + MARKER_R + MARKER_GAP, y), style.clone()))
                        .map_err(|e| anyhow!("{:?}", e))?;
                    x += slot;
                }
                y += LINE_H + ROW_GAP;
            }
        }
        LegendMode::Inside => {}
    }
    Ok(())
}
