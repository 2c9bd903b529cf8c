//! Utility functions for visualization: colors, scaling, locale mapping, unit detection.

use num_format::Locale;
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Diverging blue-white-red scale for `t` in [-1, 1] (matplotlib's "coolwarm" endpoints).
pub fn coolwarm(t: f64) -> RGBColor {
    const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);
    let t = if t.is_finite() { t.clamp(-1.0, 1.0) } else { 0.0 };
    let (from, to, f) = if t < 0.0 { (MID, COOL, -t) } else { (MID, WARM, t) };
    let mix = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Pick a single Y-axis scale and its human label based on the overall magnitude.
/// Returns (scale, label), e.g. (1e6, "millions").
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Try to extract a unit from the indicator name, e.g. "GDP (current US$)" -> "current US$".
pub fn extract_unit_from_indicator_name(name: &str) -> Option<String> {
    let open = name.rfind('(')?;
    let close = name.rfind(')')?;
    if close <= open {
        return None;
    }
    let inner = name[open + 1..close].trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Heuristic: treat percent-like units as non-scalable (no thousands/millions/billions).
pub fn is_percentage_like(unit: &str) -> bool {
    let u = unit.to_ascii_lowercase();
    u.contains('%') || u.contains("percent") || u.contains("per cent")
}

/// Y scale and axis title for data with `max_abs` magnitude.
///
/// `y_label` wins when non-empty; otherwise the unit comes from the indicator name.
pub fn axis_title_and_scale(
    indicator_name: Option<&str>,
    y_label: &str,
    max_abs: f64,
) -> (f64, String) {
    let unit = indicator_name.and_then(extract_unit_from_indicator_name);
    let (scale, word) = match unit.as_deref() {
        Some(u) if is_percentage_like(u) => (1.0, ""),
        _ => choose_axis_scale(max_abs),
    };
    let base = if !y_label.trim().is_empty() {
        y_label.trim().to_string()
    } else {
        unit.unwrap_or_else(|| "Value".to_string())
    };
    let title = if word.is_empty() {
        base
    } else {
        format!("{base} ({word})")
    };
    (scale, title)
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Format with locale digit grouping and up to `decimals` fraction digits
/// (trailing zeros trimmed), e.g. `1234567.5` -> `1,234,567.5` / `1.234.567,5`.
pub fn format_number(v: f64, decimals: usize, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let s = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let mut out = String::new();
    if v < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    // Group the digit string itself; no integer type holds every finite f64.
    let n = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push_str(locale.separator());
        }
        out.push(ch);
    }
    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        out.push(dec_sep);
        out.push_str(frac);
    }
    out
}

fn tick_precision(v: f64) -> usize {
    let a = v.abs();
    if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    }
}

/// Tick label formatter shared by the Y axes: fewer decimals for larger magnitudes.
pub fn tick_label(v: f64) -> String {
    format!("{:.*}", tick_precision(v), v)
}

/// [`tick_label`] with locale digit grouping and decimal separator.
pub fn tick_label_locale(v: f64, locale_tag: &str) -> String {
    format_number(v, tick_precision(v), locale_tag)
}

/// Compute a tight left label area width for the Y axis (in pixels),
/// based on the formatted tick labels that will appear.
pub fn compute_left_label_area_px(
    ymin_scaled: f64,
    ymax_scaled: f64,
    ticks: usize,
    font_px: u32,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin_scaled + (ymax_scaled - ymin_scaled) * t;
        max_px = max_px.max(estimate_text_width_px(&tick_label(v), font_px));
    }
    // Room for tick marks and the rotated axis description.
    max_px.saturating_add(34).clamp(56, 150)
}
