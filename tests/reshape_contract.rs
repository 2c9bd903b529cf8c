use wbi_tables::loader::read_table;
use wbi_tables::models::RawTable;
use wbi_tables::reshape::{self, Completeness, ReshapeOptions};

const EXPORT: &str = "\
Country Name,Country Code,Indicator Name,Indicator Code,2000,2001
A,AAA,Demo (%),D.1,1,2
B,BBB,Demo (%),D.1,,4
C,CCC,Demo (%),D.1,5,6
";

fn opts(completeness: Completeness) -> ReshapeOptions {
    ReshapeOptions { completeness }
}

#[test]
fn drop_countries_keeps_every_period() {
    let raw = read_table(EXPORT.as_bytes(), "demo.csv").unwrap();
    let out = reshape::reshape(raw, &opts(Completeness::DropCountries));

    let names: Vec<&str> = out.by_country.countries().collect();
    assert_eq!(names, vec!["A", "C"]);
    assert_eq!(out.by_year.periods, vec!["2000", "2001"]);
    assert_eq!(out.by_year.countries, vec!["A", "C"]);
    assert_eq!(out.by_year.value("2000", "C"), Some(5.0));
    assert_eq!(out.by_year.value("2001", "A"), Some(2.0));
}

#[test]
fn drop_periods_keeps_every_country() {
    let raw = read_table(EXPORT.as_bytes(), "demo.csv").unwrap();
    let out = reshape::reshape(raw, &opts(Completeness::DropPeriods));

    // The country view is the same under both policies.
    assert_eq!(out.by_country.len(), 2);
    assert_eq!(out.by_year.countries, vec!["A", "B", "C"]);
    assert_eq!(out.by_year.periods, vec!["2001"]);
    assert_eq!(out.by_year.values, vec![vec![2.0, 4.0, 6.0]]);
}

#[test]
fn views_never_contain_missing_values() {
    let export = "\
Country Name,2000,2001,2002
A,1,,3
B,4,5,6
C,,8,9
D,10,11,NaN
";
    for policy in [Completeness::DropCountries, Completeness::DropPeriods] {
        let raw = read_table(export.as_bytes(), "gaps.csv").unwrap();
        let out = reshape::reshape(raw, &opts(policy));
        for row in &out.by_country.rows {
            assert_eq!(row.values.len(), out.by_country.periods.len());
            assert!(row.values.iter().all(|v| v.is_finite()));
        }
        for (_, values) in out.by_year.rows() {
            assert_eq!(values.len(), out.by_year.countries.len());
            assert!(values.iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn header_only_export_gives_empty_views() {
    let raw = read_table(
        "Country Name,Country Code,Indicator Name,Indicator Code,2000\n".as_bytes(),
        "empty.csv",
    )
    .unwrap();
    let out = reshape::reshape(raw, &ReshapeOptions::default());
    assert!(out.by_country.is_empty());
    assert!(out.by_year.is_empty());
    assert!(out.by_year.countries.is_empty());
}

#[test]
fn reshaping_a_complete_view_is_idempotent() {
    let raw = read_table(EXPORT.as_bytes(), "demo.csv").unwrap();
    let first = reshape::reshape(raw, &ReshapeOptions::default());
    let again = reshape::reshape(RawTable::from(&first.by_country), &ReshapeOptions::default());
    assert_eq!(first, again);
}

#[test]
fn transpose_swaps_axes() {
    let raw = read_table(EXPORT.as_bytes(), "demo.csv").unwrap();
    let by_country = reshape::country_view(&raw);
    let by_year = reshape::transpose(&by_country);
    for row in &by_country.rows {
        for (p, period) in by_country.periods.iter().enumerate() {
            assert_eq!(by_year.value(period, &row.country_name), Some(row.values[p]));
        }
    }
}

#[test]
fn selection_keeps_requested_order() {
    let raw = read_table(EXPORT.as_bytes(), "demo.csv").unwrap();
    let out = reshape::reshape(raw, &opts(Completeness::DropPeriods));
    let picked = out.by_year.select(&["C", "A"]).unwrap();
    assert_eq!(picked.countries, vec!["C", "A"]);
    assert_eq!(picked.values, vec![vec![6.0, 2.0]]);

    let err = out.by_year.select(&["Z"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown country `Z`");
    let none: [&str; 0] = [];
    assert!(out.by_year.select(&none).is_err());
}
