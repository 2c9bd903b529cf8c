use wbi_tables::loader::read_table;
use wbi_tables::reshape::{self, ReshapeOptions};
use wbi_tables::stats::{self, describe_country_table, describe_year_table};

const EXPORT: &str = "\
Country Name,Country Code,Indicator Name,Indicator Code,2000,2001
A,AAA,Access to electricity (% of population),EG.ELC.ACCS.ZS,10,20
B,BBB,Access to electricity (% of population),EG.ELC.ACCS.ZS,30,40
C,CCC,Access to electricity (% of population),EG.ELC.ACCS.ZS,50,
D,DDD,Access to electricity (% of population),EG.ELC.ACCS.ZS,70,80
";

#[test]
fn describe_summarizes_each_period_of_complete_rows() {
    let raw = read_table(EXPORT.as_bytes(), "elec.csv").unwrap();
    let out = reshape::reshape(raw, &ReshapeOptions::default());
    let rows = describe_country_table(&out.by_country);

    assert_eq!(rows.len(), 2);
    let y2000 = &rows[0];
    assert_eq!(y2000.label, "2000");
    // C is incomplete and does not count toward any period.
    assert_eq!(y2000.count, 3);
    assert_eq!(y2000.min, Some(10.0));
    assert_eq!(y2000.max, Some(70.0));
    assert_eq!(y2000.median, Some(30.0));
    assert!((y2000.mean.unwrap() - 36.666666666666664).abs() < 1e-9);
    assert_eq!(y2000.q25, Some(20.0));
    assert_eq!(y2000.q75, Some(50.0));
    assert!((y2000.std.unwrap() - 30.550504633038933).abs() < 1e-9);

    let y2001 = &rows[1];
    assert_eq!(y2001.median, Some(40.0));
}

#[test]
fn describe_year_table_is_per_country() {
    let raw = read_table(EXPORT.as_bytes(), "elec.csv").unwrap();
    let out = reshape::reshape(raw, &ReshapeOptions::default());
    let rows = describe_year_table(&out.by_year);
    let labels: Vec<&str> = rows.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "D"]);
    assert_eq!(rows[2].median, Some(75.0));
    assert_eq!(rows[0].count, 2);
}

#[test]
fn single_value_has_no_spread() {
    let s = stats::summarize("x", &[42.0]);
    assert_eq!(s.count, 1);
    assert_eq!(s.median, Some(42.0));
    assert_eq!(s.q25, Some(42.0));
    assert_eq!(s.std, None);
}

#[test]
fn quantile_ignores_non_finite() {
    let q = stats::quantile(&[f64::NAN, 3.0, 1.0, 2.0], 0.5);
    assert_eq!(q, Some(2.0));
    assert_eq!(stats::quantile(&[], 0.5), None);
}
