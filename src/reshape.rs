//! Turn a [`RawTable`] into the country-indexed and year-indexed views.
//!
//! Missing values are never imputed: incomplete rows are dropped, and the year view only
//! keeps periods for which every retained country has a value.

use crate::models::{CountryRow, CountryTable, RawRow, RawTable, YearTable};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Which rows the year-indexed view is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// Transpose the country view: countries with any gap are gone, every period survives.
    #[default]
    DropCountries,
    /// Transpose every named country and drop the periods where any of them has a gap.
    DropPeriods,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReshapeOptions {
    #[serde(default)]
    pub completeness: Completeness,
}

/// Both views of one indicator export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reshaped {
    pub by_country: CountryTable,
    pub by_year: YearTable,
}

fn complete_row(row: &RawRow, raw: &RawTable) -> Option<CountryRow> {
    if !row.is_complete(raw.metadata) {
        return None;
    }
    Some(CountryRow {
        country_name: row.country_name.clone()?,
        country_code: row.country_code.clone(),
        indicator_name: row.indicator_name.clone(),
        indicator_code: row.indicator_code.clone(),
        values: row.values.iter().copied().collect::<Option<Vec<f64>>>()?,
    })
}

/// Drop every raw row with a missing field and index the rest by country name.
pub fn country_view(raw: &RawTable) -> CountryTable {
    let rows: Vec<CountryRow> = raw.rows.iter().filter_map(|r| complete_row(r, raw)).collect();
    CountryTable {
        source: raw.source.clone(),
        metadata: raw.metadata,
        periods: raw.periods.clone(),
        rows,
    }
}

/// Transpose `(country, values)` columns into period rows, dropping every period where
/// any column is missing. A repeated country name replaces the earlier column.
fn transpose_columns<'a, I>(indicator_name: Option<String>, periods: &[String], columns: I) -> YearTable
where
    I: IntoIterator<Item = (&'a str, Vec<Option<f64>>)>,
{
    let mut countries: Vec<String> = Vec::new();
    let mut data: Vec<Vec<Option<f64>>> = Vec::new();
    for (name, values) in columns {
        match countries.iter().position(|c| c == name) {
            Some(i) => {
                warn!("duplicate country `{}`; keeping the later row", name);
                data[i] = values;
            }
            None => {
                countries.push(name.to_string());
                data.push(values);
            }
        }
    }

    let mut kept_periods = Vec::new();
    let mut values = Vec::new();
    for (p, label) in periods.iter().enumerate() {
        let row: Option<Vec<f64>> = data.iter().map(|col| col[p]).collect();
        if let Some(row) = row {
            kept_periods.push(label.clone());
            values.push(row);
        }
    }
    // With no country columns there is nothing to index by year.
    if countries.is_empty() {
        kept_periods.clear();
        values.clear();
    }

    YearTable {
        indicator_name,
        periods: kept_periods,
        countries,
        values,
    }
}

/// Drop the metadata columns of a country view and transpose it to the year view.
pub fn transpose(table: &CountryTable) -> YearTable {
    transpose_columns(
        table.indicator_name().map(str::to_string),
        &table.periods,
        table.rows.iter().map(|r| {
            (
                r.country_name.as_str(),
                r.values.iter().copied().map(Some).collect(),
            )
        }),
    )
}

/// Apply the completeness policy and build both views.
pub fn reshape(raw: RawTable, opts: &ReshapeOptions) -> Reshaped {
    let by_country = country_view(&raw);
    let by_year = match opts.completeness {
        Completeness::DropCountries => transpose(&by_country),
        Completeness::DropPeriods => transpose_columns(
            raw.rows.iter().find_map(|r| r.indicator_name.clone()),
            &raw.periods,
            raw.rows.iter().filter_map(|r| {
                r.country_name
                    .as_deref()
                    .map(|name| (name, r.values.clone()))
            }),
        ),
    };

    info!(
        "{}: kept {} of {} countries; year view {} periods x {} countries",
        raw.source,
        by_country.len(),
        raw.len(),
        by_year.len(),
        by_year.countries.len()
    );
    if !raw.is_empty() && by_year.is_empty() {
        warn!("{}: no period is complete for the retained countries", raw.source);
    }

    Reshaped { by_country, by_year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetadataColumns;

    fn row(name: &str, values: &[Option<f64>]) -> RawRow {
        RawRow {
            country_name: Some(name.into()),
            country_code: Some(name.to_uppercase()),
            indicator_name: Some("Demo (%)".into()),
            indicator_code: Some("D.1".into()),
            values: values.to_vec(),
        }
    }

    fn raw(rows: Vec<RawRow>) -> RawTable {
        RawTable {
            source: "test".into(),
            metadata: MetadataColumns::ALL,
            periods: vec!["2010".into(), "2011".into()],
            rows,
        }
    }

    #[test]
    fn missing_metadata_drops_row() {
        let mut r = row("a", &[Some(1.0), Some(2.0)]);
        r.indicator_code = None;
        let out = reshape(raw(vec![r, row("b", &[Some(3.0), Some(4.0)])]), &ReshapeOptions::default());
        assert_eq!(out.by_country.countries().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(out.by_year.countries, vec!["b"]);
    }

    #[test]
    fn duplicate_countries_last_wins_in_year_view() {
        let out = reshape(
            raw(vec![row("a", &[Some(1.0), Some(2.0)]), row("a", &[Some(5.0), Some(6.0)])]),
            &ReshapeOptions::default(),
        );
        assert_eq!(out.by_country.len(), 2);
        assert_eq!(out.by_country.value("a", "2011"), Some(6.0));
        assert_eq!(out.by_year.countries, vec!["a"]);
        assert_eq!(out.by_year.column("a").unwrap(), vec![5.0, 6.0]);
    }

    #[test]
    fn indicator_name_carries_to_year_view() {
        let out = reshape(raw(vec![row("a", &[Some(1.0), Some(2.0)])]), &ReshapeOptions::default());
        assert_eq!(out.by_year.indicator_name.as_deref(), Some("Demo (%)"));
    }
}
