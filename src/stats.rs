use crate::compare::IndicatorFrame;
use crate::models::{CountryTable, YearTable};
use serde::{Deserialize, Serialize};

/// Summary statistics for one column: count, mean, spread, quartiles, extremes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub label: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Quantile of sorted values, interpolating linearly between the closest ranks.
fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile of unsorted values. Non-finite values are ignored.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    vals.sort_by(f64::total_cmp);
    quantile_sorted(&vals, q)
}

pub fn summarize(label: &str, values: &[f64]) -> Summary {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let mean = if count > 0 {
        Some(vals.iter().sum::<f64>() / count as f64)
    } else {
        None
    };
    let std = match mean {
        Some(m) if count > 1 => {
            let ss: f64 = vals.iter().map(|v| (v - m).powi(2)).sum();
            Some((ss / (count - 1) as f64).sqrt())
        }
        _ => None,
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        label: label.to_string(),
        count,
        mean,
        std,
        min: vals.first().copied(),
        q25: quantile_sorted(&vals, 0.25),
        median,
        q75: quantile_sorted(&vals, 0.75),
        max: vals.last().copied(),
    }
}

/// One summary per country column.
pub fn describe_year_table(table: &YearTable) -> Vec<Summary> {
    table
        .countries
        .iter()
        .enumerate()
        .map(|(c, name)| {
            let col: Vec<f64> = table.values.iter().map(|row| row[c]).collect();
            summarize(name, &col)
        })
        .collect()
}

/// One summary per period column.
pub fn describe_country_table(table: &CountryTable) -> Vec<Summary> {
    table
        .periods
        .iter()
        .enumerate()
        .map(|(p, label)| {
            let col: Vec<f64> = table.rows.iter().map(|r| r.values[p]).collect();
            summarize(label, &col)
        })
        .collect()
}

/// Pearson correlation over the pairs where both sides are present.
///
/// `None` with fewer than two pairs or when either side is constant.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Symmetric matrix of pairwise correlations between indicator columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.values[i][j]
    }
}

pub fn correlation_matrix(frame: &IndicatorFrame) -> CorrelationMatrix {
    let columns: Vec<Vec<Option<f64>>> = (0..frame.labels.len())
        .map(|i| frame.values.iter().map(|row| row[i]).collect())
        .collect();
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        labels: frame.labels.clone(),
        values,
    }
}

/// Five-number summary with Tukey whiskers, as drawn by a box plot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value at or above `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value at or below `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

/// `None` when there are no finite values.
pub fn box_stats(label: &str, values: &[f64]) -> Option<BoxStats> {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    vals.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&vals, 0.25)?;
    let median = quantile_sorted(&vals, 0.5)?;
    let q3 = quantile_sorted(&vals, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    let inside: Vec<f64> = vals
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence)
        .collect();
    Some(BoxStats {
        label: label.to_string(),
        count: vals.len(),
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers: vals
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect(),
    })
}
