//! Parse World Bank indicator exports into [`RawTable`]s.
//!
//! Exports downloaded from data.worldbank.org look like:
//!
//! ```text
//! "Data Source","World Development Indicators",
//!
//! "Last Updated Date","2023-05-10",
//!
//! "Country Name","Country Code","Indicator Name","Indicator Code","1960",...,"2022",
//! "Aruba","ABW","CO2 emissions (kt)","EN.ATM.CO2E.KT","","",...,
//! ```
//!
//! Everything above the `Country Name` header is skipped and the empty trailing column is
//! ignored. Already-cleaned files (header on the first line) load the same way.

use crate::error::{Error, Result};
use crate::models::{
    COUNTRY_CODE, COUNTRY_NAME, INDICATOR_CODE, INDICATOR_NAME, MetadataColumns, RawRow, RawTable,
};
use crate::reshape::{self, ReshapeOptions, Reshaped};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column positions resolved from the header record.
struct Layout {
    country_name: usize,
    country_code: Option<usize>,
    indicator_name: Option<usize>,
    indicator_code: Option<usize>,
    /// (position, label) of every period column.
    periods: Vec<(usize, String)>,
}

impl Layout {
    fn from_header(header: &StringRecord) -> Option<Self> {
        let names: Vec<&str> = header
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |name: &str| names.iter().position(|h| *h == name);

        let country_name = find(COUNTRY_NAME)?;
        let country_code = find(COUNTRY_CODE);
        let indicator_name = find(INDICATOR_NAME);
        let indicator_code = find(INDICATOR_CODE);

        let metadata = [Some(country_name), country_code, indicator_name, indicator_code];
        let mut periods = Vec::new();
        for (i, name) in names.iter().enumerate() {
            if metadata.contains(&Some(i)) {
                continue;
            }
            if name.is_empty() {
                debug!("ignoring unnamed column {}", i);
                continue;
            }
            periods.push((i, name.to_string()));
        }

        Some(Self {
            country_name,
            country_code,
            indicator_name,
            indicator_code,
            periods,
        })
    }

    fn metadata(&self) -> MetadataColumns {
        MetadataColumns {
            country_code: self.country_code.is_some(),
            indicator_name: self.indicator_name.is_some(),
            indicator_code: self.indicator_code.is_some(),
        }
    }
}

fn text_field(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    let s = record.get(idx?)?.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Read an export from any reader. `source_name` is used in error messages.
pub fn read_table<R: Read>(reader: R, source_name: &str) -> Result<RawTable> {
    let csv_err = |source| Error::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    let mut skipped = 0usize;
    let layout = loop {
        let record = match records.next() {
            Some(r) => r.map_err(csv_err)?,
            None => {
                return Err(Error::MissingColumn {
                    source_name: source_name.to_string(),
                    column: COUNTRY_NAME,
                });
            }
        };
        match Layout::from_header(&record) {
            Some(layout) => break layout,
            None => skipped += 1,
        }
    };
    if skipped > 0 {
        debug!("{}: skipped {} preamble line(s)", source_name, skipped);
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_err)?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let mut values = Vec::with_capacity(layout.periods.len());
        for (idx, label) in &layout.periods {
            let cell = record.get(*idx).map(str::trim).unwrap_or("");
            if cell.is_empty() {
                values.push(None);
                continue;
            }
            let invalid = || Error::InvalidNumber {
                source_name: source_name.to_string(),
                line,
                column: label.clone(),
                value: cell.to_string(),
            };
            let v = cell.parse::<f64>().map_err(|_| invalid())?;
            // "NaN" parses; treat it like an empty cell. Infinities are not data.
            if v.is_nan() {
                values.push(None);
            } else if v.is_infinite() {
                return Err(invalid());
            } else {
                values.push(Some(v));
            }
        }

        rows.push(RawRow {
            country_name: text_field(&record, Some(layout.country_name)),
            country_code: text_field(&record, layout.country_code),
            indicator_name: text_field(&record, layout.indicator_name),
            indicator_code: text_field(&record, layout.indicator_code),
            values,
        });
    }

    Ok(RawTable {
        source: source_name.to_string(),
        metadata: layout.metadata(),
        periods: layout.periods.into_iter().map(|(_, l)| l).collect(),
        rows,
    })
}

/// Read an export from disk.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file, &path.display().to_string())?;
    info!(
        "loaded {}: {} rows, {} periods",
        path.display(),
        table.len(),
        table.periods.len()
    );
    Ok(table)
}

/// Load an export and reshape it into both views.
pub fn load_indicator<P: AsRef<Path>>(path: P, opts: &ReshapeOptions) -> Result<Reshaped> {
    let raw = load_table(path)?;
    Ok(reshape::reshape(raw, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WB: &str = "\u{feff}\"Data Source\",\"World Development Indicators\",\n\
\n\
\"Last Updated Date\",\"2023-05-10\",\n\
\n\
\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"2010\",\"2011\",\n\
\"Aruba\",\"ABW\",\"Forest area (sq. km)\",\"AG.LND.FRST.K2\",\"4.2\",\"4.2\",\n\
\"Japan\",\"JPN\",\"Forest area (sq. km)\",\"AG.LND.FRST.K2\",\"249350\",\"\",\n";

    #[test]
    fn skips_preamble_and_trailing_column() {
        let t = read_table(WB.as_bytes(), "forest.csv").unwrap();
        assert_eq!(t.periods, vec!["2010", "2011"]);
        assert_eq!(t.metadata, MetadataColumns::ALL);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].country_code.as_deref(), Some("ABW"));
        assert_eq!(t.rows[1].values, vec![Some(249350.0), None]);
    }

    #[test]
    fn missing_country_name_column() {
        let err = read_table("a,b\n1,2\n".as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: COUNTRY_NAME, .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn infinite_cells_are_invalid() {
        for cell in ["inf", "-inf", "Infinity"] {
            let csv = format!("Country Name,2000,2001\nA,1,{cell}\nB,2,3\n");
            let err = read_table(csv.as_bytes(), "inf.csv").unwrap_err();
            match err {
                Error::InvalidNumber { line, column, value, .. } => {
                    assert_eq!(line, 2);
                    assert_eq!(column, "2001");
                    assert_eq!(value, cell);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        let t = read_table("Country Name,2000\nA,NaN\n".as_bytes(), "nan.csv").unwrap();
        assert_eq!(t.rows[0].values, vec![None]);
    }

    #[test]
    fn short_records_are_missing_values() {
        let t = read_table("Country Name,2000,2001\nA,1\n".as_bytes(), "x").unwrap();
        assert_eq!(t.rows[0].values, vec![Some(1.0), None]);
        assert_eq!(t.metadata, MetadataColumns::default());
    }
}
