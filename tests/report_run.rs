use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wbi_tables::config::{Config, Indicator};
use wbi_tables::report;

const COUNTRIES: [&str; 4] = ["Zambia", "Japan", "Pakistan", "Panama"];

/// Write a small export for `indicator` with values derived from `base`.
fn write_export(dir: &Path, indicator: Indicator, base: f64) -> String {
    let file = format!("{}.csv", indicator.key());
    let mut csv = String::from("Country Name,Country Code,Indicator Name,Indicator Code");
    for year in 2000..=2012 {
        csv.push_str(&format!(",{year}"));
    }
    csv.push('\n');
    for (c, country) in COUNTRIES.iter().enumerate() {
        csv.push_str(&format!(
            "{country},C{c},\"{}\",{}",
            indicator.label(),
            indicator.code()
        ));
        for (y, _) in (2000..=2012).enumerate() {
            let v = base + (c * 7 + y) as f64 * (1.0 + c as f64 / 3.0);
            csv.push_str(&format!(",{v}"));
        }
        csv.push('\n');
    }
    // Incomplete row; never shows up in any chart.
    csv.push_str(&format!("Nowhere,NWH,\"{}\",{},,\n", indicator.label(), indicator.code()));
    fs::write(dir.join(&file), csv).unwrap();
    file
}

fn config_in(dir: &Path) -> Config {
    let mut datasets = serde_json::Map::new();
    for (i, indicator) in Indicator::ALL.iter().enumerate() {
        let file = write_export(dir, *indicator, 10.0 * (i + 1) as f64);
        datasets.insert(indicator.key().to_string(), file.into());
    }
    let json = serde_json::json!({
        "datasets": datasets,
        "output_dir": dir.join("charts"),
        "bar_countries": ["Zambia", "Japan"],
        "series_countries": COUNTRIES,
        "heatmap_year": "2010",
    });
    let path = dir.join("report.json");
    fs::write(&path, json.to_string()).unwrap();
    Config::load(&path).unwrap()
}

#[test]
fn full_report_writes_every_chart() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());

    let mut out = Vec::new();
    report::run(&cfg, &mut out).unwrap();

    for name in [
        "agricultural_land",
        "electricity_access",
        "co2_emissions",
        "forest_area",
        "indicator_heatmap",
        "life_expectancy_box",
    ] {
        let path = cfg.chart_path(name);
        let meta = fs::metadata(&path).unwrap_or_else(|_| panic!("{} missing", path.display()));
        assert!(meta.len() > 0);
    }

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(Indicator::ElectricityAccess.label()));
    assert!(text.contains("(4 countries)"));
    assert!(text.contains("describe"));
    assert!(text.contains("median"));
    assert!(!text.contains("Nowhere"));
}

#[test]
fn box_plot_uses_life_expectancy_data() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());
    let data = wbi_tables::loader::load_indicator(
        cfg.dataset(Indicator::LifeExpectancy).unwrap(),
        &cfg.reshape_options(),
    )
    .unwrap();
    let out = dir.path().join("box.svg");
    let b = report::box_plot_report(&data.by_year, "Pakistan", &Default::default(), &out).unwrap();
    let expected = data.by_year.column("Pakistan").unwrap();
    assert_eq!(b.count, expected.len());
    assert_eq!(b.lower_whisker, expected[0]);
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains(Indicator::LifeExpectancy.label()));
}

#[test]
fn missing_dataset_is_reported() {
    let dir = tempdir().unwrap();
    let mut cfg = config_in(dir.path());
    cfg.datasets.remove(&Indicator::ForestArea);
    let err = report::run(&cfg, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("forest_area"));
}

#[test]
fn unknown_bar_country_fails_with_its_name() {
    let dir = tempdir().unwrap();
    let mut cfg = config_in(dir.path());
    cfg.bar_countries = vec!["Atlantis".into()];
    let err = report::run(&cfg, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("Atlantis"));
}

#[test]
fn heatmap_life_expectancy_column_comes_from_its_own_dataset() {
    let dir = tempdir().unwrap();
    let cfg = config_in(dir.path());

    // Give life expectancy a shape no other indicator has.
    let life = [71.5, 48.0, 66.2, 77.9];
    let mut csv = String::from("Country Name,Indicator Name,2009,2010,2011\n");
    for (country, v) in COUNTRIES.iter().zip(life) {
        csv.push_str(&format!(
            "{country},\"{}\",{v},{v},{v}\n",
            Indicator::LifeExpectancy.label()
        ));
    }
    fs::write(cfg.dataset(Indicator::LifeExpectancy).unwrap(), csv).unwrap();

    let mut data = report::Datasets::new(&cfg);
    let frame = report::heatmap_frame(&cfg, &mut data).unwrap();

    assert_eq!(frame.countries, COUNTRIES);
    let got = frame.column(Indicator::LifeExpectancy.label()).unwrap();
    assert_eq!(got, life.map(Some).to_vec());
    let agri = frame.column(Indicator::AgriculturalLand.label()).unwrap();
    assert_ne!(got, agri);

    let m = wbi_tables::stats::correlation_matrix(&frame);
    let r = m
        .get(
            Indicator::LifeExpectancy.label(),
            Indicator::AgriculturalLand.label(),
        )
        .unwrap();
    assert!(r.abs() < 0.99, "life expectancy tracks agricultural land: {r}");
}
