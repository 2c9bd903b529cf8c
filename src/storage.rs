use crate::models::{COUNTRY_CODE, COUNTRY_NAME, CountryTable, INDICATOR_CODE, INDICATOR_NAME, YearTable};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save the year view: `Year,<country>...` header, one line per period.
pub fn save_year_csv<P: AsRef<Path>>(table: &YearTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    let mut header = vec!["Year".to_string()];
    header.extend(table.countries.iter().map(|c| sanitize_cell(c)));
    wtr.write_record(&header)?;
    for (period, values) in table.rows() {
        let mut rec = vec![sanitize_cell(period)];
        rec.extend(values.iter().map(|v| v.to_string()));
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the country view in the export layout it was read from.
pub fn save_country_csv<P: AsRef<Path>>(table: &CountryTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    let meta = table.metadata;
    let mut header = vec![COUNTRY_NAME.to_string()];
    if meta.country_code {
        header.push(COUNTRY_CODE.to_string());
    }
    if meta.indicator_name {
        header.push(INDICATOR_NAME.to_string());
    }
    if meta.indicator_code {
        header.push(INDICATOR_CODE.to_string());
    }
    header.extend(table.periods.iter().map(|p| sanitize_cell(p)));
    wtr.write_record(&header)?;

    let text = |s: &Option<String>| sanitize_cell(s.as_deref().unwrap_or(""));
    for r in &table.rows {
        let mut rec = vec![sanitize_cell(&r.country_name)];
        if meta.country_code {
            rec.push(text(&r.country_code));
        }
        if meta.indicator_name {
            rec.push(text(&r.indicator_name));
        }
        if meta.indicator_code {
            rec.push(text(&r.indicator_code));
        }
        rec.extend(r.values.iter().map(|v| v.to_string()));
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any view as pretty JSON.
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
