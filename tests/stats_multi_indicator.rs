use wbi_tables::compare::assemble;
use wbi_tables::error::Error;
use wbi_tables::loader::read_table;
use wbi_tables::models::CountryTable;
use wbi_tables::reshape::{self, ReshapeOptions};
use wbi_tables::stats::correlation_matrix;

fn table(csv: &str) -> CountryTable {
    let raw = read_table(csv.as_bytes(), "inline.csv").unwrap();
    reshape::reshape(raw, &ReshapeOptions::default()).by_country
}

fn gdp() -> CountryTable {
    table(
        "Country Name,2009,2010\n\
         A,1,10\n\
         B,1,20\n\
         C,1,30\n\
         D,1,40\n",
    )
}

fn life() -> CountryTable {
    table(
        "Country Name,2009,2010\n\
         A,1,60\n\
         B,1,65\n\
         C,1,70\n\
         D,1,75\n",
    )
}

fn co2() -> CountryTable {
    // E only exists here; D is missing entirely.
    table(
        "Country Name,2009,2010\n\
         A,1,8\n\
         B,1,6\n\
         C,1,4\n\
         E,1,99\n",
    )
}

#[test]
fn frame_is_union_of_countries() {
    let (g, l, c) = (gdp(), life(), co2());
    let frame = assemble(&[("GDP", &g), ("Life", &l), ("CO2", &c)], "2010").unwrap();
    assert_eq!(frame.period, "2010");
    assert_eq!(frame.labels, vec!["GDP", "Life", "CO2"]);
    assert_eq!(frame.countries, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(frame.values[3], vec![Some(40.0), Some(75.0), None]);
    assert_eq!(frame.values[4], vec![None, None, Some(99.0)]);
    assert_eq!(frame.column("CO2").unwrap()[0], Some(8.0));
}

#[test]
fn correlation_uses_pairwise_complete_rows() {
    let (g, l, c) = (gdp(), life(), co2());
    let frame = assemble(&[("GDP", &g), ("Life", &l), ("CO2", &c)], "2010").unwrap();
    let m = correlation_matrix(&frame);

    assert_eq!(m.labels.len(), 3);
    for i in 0..3 {
        assert!((m.values[i][i].unwrap() - 1.0).abs() < 1e-12);
        for j in 0..3 {
            assert_eq!(m.values[i][j], m.values[j][i]);
        }
    }
    assert!((m.get("GDP", "Life").unwrap() - 1.0).abs() < 1e-12);
    // Only A, B, C pair up; E's outlier never enters.
    assert!((m.get("GDP", "CO2").unwrap() + 1.0).abs() < 1e-12);
}

#[test]
fn constant_column_has_undefined_correlation() {
    let (g, l) = (gdp(), life());
    let frame = assemble(&[("GDP", &g), ("Life", &l)], "2009").unwrap();
    let m = correlation_matrix(&frame);
    assert_eq!(m.get("GDP", "Life"), None);
}

#[test]
fn unknown_period_names_the_source() {
    let g = gdp();
    let err = assemble(&[("GDP", &g)], "1990").unwrap_err();
    assert!(matches!(err, Error::UnknownPeriod { ref period, .. } if period == "1990"));
    assert!(err.to_string().contains("inline.csv"));
}
