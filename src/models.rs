use crate::error::{Error, Result};
use serde::Serialize;

/// Header names used by World Bank indicator exports.
pub const COUNTRY_NAME: &str = "Country Name";
pub const COUNTRY_CODE: &str = "Country Code";
pub const INDICATOR_NAME: &str = "Indicator Name";
pub const INDICATOR_CODE: &str = "Indicator Code";

/// One parsed export row. Any field may be missing (`None`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub indicator_name: Option<String>,
    pub indicator_code: Option<String>,
    /// One entry per period column of the owning [`RawTable`].
    pub values: Vec<Option<f64>>,
}

impl RawRow {
    /// `true` when every field present in the table is populated.
    pub fn is_complete(&self, metadata: MetadataColumns) -> bool {
        self.country_name.is_some()
            && (!metadata.country_code || self.country_code.is_some())
            && (!metadata.indicator_name || self.indicator_name.is_some())
            && (!metadata.indicator_code || self.indicator_code.is_some())
            && self.values.iter().all(Option::is_some)
    }
}

/// Which optional metadata columns the source actually had.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetadataColumns {
    pub country_code: bool,
    pub indicator_name: bool,
    pub indicator_code: bool,
}

impl MetadataColumns {
    pub const ALL: Self = Self {
        country_code: true,
        indicator_name: true,
        indicator_code: true,
    };
}

/// Export as parsed, before the completeness policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Where the table came from (file path or a caller-chosen name).
    pub source: String,
    pub metadata: MetadataColumns,
    /// Period column labels in header order (normally years).
    pub periods: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<&CountryTable> for RawTable {
    fn from(t: &CountryTable) -> Self {
        let rows = t
            .rows
            .iter()
            .map(|r| RawRow {
                country_name: Some(r.country_name.clone()),
                country_code: r.country_code.clone(),
                indicator_name: r.indicator_name.clone(),
                indicator_code: r.indicator_code.clone(),
                values: r.values.iter().copied().map(Some).collect(),
            })
            .collect();
        Self {
            source: t.source.clone(),
            metadata: t.metadata,
            periods: t.periods.clone(),
            rows,
        }
    }
}

/// A fully populated row of a [`CountryTable`].
///
/// Metadata fields are `None` only when the source had no such column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    pub country_name: String,
    pub country_code: Option<String>,
    pub indicator_name: Option<String>,
    pub indicator_code: Option<String>,
    pub values: Vec<f64>,
}

/// Country-indexed view: one row per country, one value per period, nothing missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTable {
    pub source: String,
    #[serde(skip)]
    pub metadata: MetadataColumns,
    pub periods: Vec<String>,
    pub rows: Vec<CountryRow>,
}

impl CountryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.country_name.as_str())
    }

    /// Row for `country`. Duplicate names resolve to the last row.
    pub fn row(&self, country: &str) -> Option<&CountryRow> {
        self.rows.iter().rev().find(|r| r.country_name == country)
    }

    pub fn period_index(&self, period: &str) -> Option<usize> {
        self.periods.iter().position(|p| p == period)
    }

    pub fn value(&self, country: &str, period: &str) -> Option<f64> {
        let idx = self.period_index(period)?;
        self.row(country).map(|r| r.values[idx])
    }

    /// All `(country, value)` pairs of one period column, in row order.
    pub fn column(&self, period: &str) -> Result<Vec<(&str, f64)>> {
        let idx = self.period_index(period).ok_or_else(|| Error::UnknownPeriod {
            source_name: self.source.clone(),
            period: period.to_string(),
        })?;
        Ok(self
            .rows
            .iter()
            .map(|r| (r.country_name.as_str(), r.values[idx]))
            .collect())
    }

    /// Indicator name of the first row, used for chart titles and axis units.
    pub fn indicator_name(&self) -> Option<&str> {
        self.rows.iter().find_map(|r| r.indicator_name.as_deref())
    }
}

/// Year-indexed view: rows are periods, columns are countries, nothing missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTable {
    pub indicator_name: Option<String>,
    pub periods: Vec<String>,
    pub countries: Vec<String>,
    /// `values[p][c]` is the value of `countries[c]` in `periods[p]`.
    pub values: Vec<Vec<f64>>,
}

impl YearTable {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    fn country_index(&self, country: &str) -> Result<usize> {
        self.countries
            .iter()
            .position(|c| c == country)
            .ok_or_else(|| Error::UnknownCountry(country.to_string()))
    }

    pub fn value(&self, period: &str, country: &str) -> Option<f64> {
        let p = self.periods.iter().position(|x| x == period)?;
        let c = self.countries.iter().position(|x| x == country)?;
        Some(self.values[p][c])
    }

    /// Iterate `(period, values)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.periods
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// One country's values across all periods.
    pub fn column(&self, country: &str) -> Result<Vec<f64>> {
        let c = self.country_index(country)?;
        Ok(self.values.iter().map(|row| row[c]).collect())
    }

    /// Keep exactly `countries`, in the given order.
    pub fn select<S: AsRef<str>>(&self, countries: &[S]) -> Result<YearTable> {
        if countries.is_empty() {
            return Err(Error::EmptySelection("no countries requested"));
        }
        let idx = countries
            .iter()
            .map(|c| self.country_index(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(YearTable {
            indicator_name: self.indicator_name.clone(),
            periods: self.periods.clone(),
            countries: countries.iter().map(|c| c.as_ref().to_string()).collect(),
            values: self
                .values
                .iter()
                .map(|row| idx.iter().map(|&i| row[i]).collect())
                .collect(),
        })
    }

    /// First `n` periods.
    pub fn head(&self, n: usize) -> YearTable {
        let n = n.min(self.len());
        YearTable {
            indicator_name: self.indicator_name.clone(),
            periods: self.periods[..n].to_vec(),
            countries: self.countries.clone(),
            values: self.values[..n].to_vec(),
        }
    }

    /// Period labels as years, if every label is an integer.
    pub fn year_numbers(&self) -> Option<Vec<i32>> {
        self.periods
            .iter()
            .map(|p| p.trim().parse::<i32>().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> YearTable {
        YearTable {
            indicator_name: None,
            periods: vec!["2000".into(), "2001".into(), "2002".into()],
            countries: vec!["A".into(), "B".into(), "C".into()],
            values: vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 9.0],
            ],
        }
    }

    #[test]
    fn select_reorders_columns() {
        let t = table().select(&["C", "A"]).unwrap();
        assert_eq!(t.countries, vec!["C", "A"]);
        assert_eq!(t.values[1], vec![6.0, 4.0]);
    }

    #[test]
    fn select_unknown_country_names_it() {
        let err = table().select(&["A", "Atlantis"]).unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn head_clamps_to_length() {
        assert_eq!(table().head(2).periods, vec!["2000", "2001"]);
        assert_eq!(table().head(10).len(), 3);
    }

    #[test]
    fn year_numbers_need_all_numeric() {
        assert_eq!(table().year_numbers(), Some(vec![2000, 2001, 2002]));
        let mut t = table();
        t.periods[1] = "2001Q1".into();
        assert_eq!(t.year_numbers(), None);
    }
}
