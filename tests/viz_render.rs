use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use wbi_tables::models::YearTable;
use wbi_tables::viz::{self, ChartOptions, LegendMode, PlotKind};

fn sample_table() -> YearTable {
    YearTable {
        indicator_name: Some("Forest area (sq. km)".into()),
        periods: vec!["2019".into(), "2020".into(), "2021".into()],
        countries: vec!["Germany".into(), "United States".into()],
        values: vec![
            vec![114_190.0, 3_097_950.0],
            vec![114_190.0, 3_097_950.0],
            vec![114_190.0, 3_097_950.0],
        ],
    }
}

fn write_and_check<F: Fn(&Path)>(maker: F, name: &str) {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join(format!("{name}.svg"));
    maker(&path);
    let svg = fs::read_to_string(&path).expect("file created");
    assert!(svg.contains("<svg"), "{name}: not an svg");
}

#[test]
fn plot_kinds_produce_files() {
    let table = sample_table();
    let opts = ChartOptions::default();
    for kind in [
        PlotKind::Line,
        PlotKind::Scatter,
        PlotKind::LinePoints,
        PlotKind::GroupedBar,
    ] {
        write_and_check(
            |p| viz::plot_table(&table, p, kind, &opts).unwrap(),
            &format!("{kind:?}"),
        );
    }
}

#[test]
fn legend_modes_render() {
    let table = sample_table();
    for mode in [
        LegendMode::Inside,
        LegendMode::Right,
        LegendMode::Top,
        LegendMode::Bottom,
    ] {
        let opts = ChartOptions {
            legend: mode,
            title: "Legend test".into(),
            ..ChartOptions::default()
        };
        write_and_check(|p| viz::plot_lines(&table, p, &opts).unwrap(), &format!("{mode:?}"));
    }
}

#[test]
fn title_and_unit_show_up_in_svg() {
    let table = sample_table();
    let dir = tempdir().unwrap();
    let path = dir.path().join("title.svg");
    viz::plot_lines(&table, &path, &ChartOptions::default()).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    // Title falls back to the indicator name; values in the millions scale the axis.
    assert!(svg.contains("Forest area (sq. km)"));
    assert!(svg.contains("Germany"));
}

#[test]
fn grouped_bars_with_fixed_range() {
    let table = YearTable {
        indicator_name: Some("Agricultural land (% of land area)".into()),
        periods: (2000..2010).map(|y| y.to_string()).collect(),
        countries: vec!["Zambia".into(), "Japan".into()],
        values: (0..10).map(|i| vec![30.0 + i as f64, 12.0]).collect(),
    };
    let opts = ChartOptions {
        title: "Agricultural land by %age".into(),
        y_label: "Percentage".into(),
        y_range: Some((0.0, 100.0)),
        ..ChartOptions::default()
    };
    write_and_check(|p| viz::plot_grouped_bars(&table, p, &opts).unwrap(), "bars");
}

#[test]
fn png_output_is_chosen_by_extension() {
    let table = sample_table();
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.png");
    viz::plot_lines(&table, &path, &ChartOptions::default()).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn empty_table_is_an_error() {
    let table = YearTable {
        indicator_name: None,
        periods: vec![],
        countries: vec!["A".into()],
        values: vec![],
    };
    let dir = tempdir().unwrap();
    let err = viz::plot_lines(&table, dir.path().join("x.svg"), &ChartOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("no data"));
}

#[test]
fn series_labels_every_nth_year() {
    let table = YearTable {
        indicator_name: Some("CO2 emissions (kt)".into()),
        periods: (2000..2010).map(|y| y.to_string()).collect(),
        countries: vec!["China".into(), "Japan".into()],
        values: (0..10).map(|i| vec![1.0 + i as f64 / 10.0, 2.0]).collect(),
    };
    let opts = ChartOptions {
        title: "CO2".into(),
        y_label: "kt".into(),
        x_tick_every: 4,
        ..ChartOptions::default()
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("series.svg");
    viz::plot_lines(&table, &path, &opts).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    for shown in ["2000", "2004", "2008"] {
        assert!(svg.contains(&format!(">\n{shown}\n<")), "{shown} missing");
    }
    for hidden in ["2001", "2005", "2009"] {
        assert!(!svg.contains(&format!(">\n{hidden}\n<")), "{hidden} labelled");
    }
}
