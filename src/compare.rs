//! Line several indicators up side by side for a single period.

use crate::error::{Error, Result};
use crate::models::CountryTable;
use serde::Serialize;

/// Countries as rows, indicators as columns, one period.
///
/// Cells are `None` where a country is absent from that indicator's table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorFrame {
    pub period: String,
    pub labels: Vec<String>,
    pub countries: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl IndicatorFrame {
    pub fn column(&self, label: &str) -> Option<Vec<Option<f64>>> {
        let i = self.labels.iter().position(|l| l == label)?;
        Some(self.values.iter().map(|row| row[i]).collect())
    }
}

/// Build a frame from `(label, table)` pairs using each table's `period` column.
///
/// Rows are the union of countries in first-appearance order.
pub fn assemble<S: AsRef<str>>(
    columns: &[(S, &CountryTable)],
    period: &str,
) -> Result<IndicatorFrame> {
    if columns.is_empty() {
        return Err(Error::EmptySelection("no indicators to compare"));
    }

    let mut countries: Vec<String> = Vec::new();
    let mut per_indicator = Vec::with_capacity(columns.len());
    for (_, table) in columns {
        let col = table.column(period)?;
        for (name, _) in &col {
            if !countries.iter().any(|c| c == name) {
                countries.push(name.to_string());
            }
        }
        per_indicator.push(col);
    }

    let values = countries
        .iter()
        .map(|country| {
            per_indicator
                .iter()
                .map(|col| {
                    col.iter()
                        .rev()
                        .find(|(name, _)| name == country)
                        .map(|(_, v)| *v)
                })
                .collect()
        })
        .collect();

    Ok(IndicatorFrame {
        period: period.to_string(),
        labels: columns.iter().map(|(l, _)| l.as_ref().to_string()).collect(),
        countries,
        values,
    })
}
