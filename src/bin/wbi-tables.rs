use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use wbi_tables::report::{self, BarSpec, ChartOptions, SeriesSpec};
use wbi_tables::viz::{LegendMode, util::format_number};
use wbi_tables::{Completeness, Config, ReshapeOptions, Reshaped, compare, loader, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "wbi-tables",
    version,
    about = "Reshape, summarize & chart World Bank indicator CSV exports"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the country- or year-indexed view of an export as CSV or JSON.
    Reshape(ReshapeArgs),
    /// Print summary statistics of an export.
    Describe(DescribeArgs),
    /// Grouped bar chart of the first periods for selected countries.
    Bar(BarArgs),
    /// Line chart of selected countries over all periods.
    Series(SeriesArgs),
    /// Correlation heatmap of several indicators for one year.
    Heatmap(HeatmapArgs),
    /// Box plot of one country's values.
    Boxplot(BoxplotArgs),
    /// Run the full report described by a JSON config file.
    Report(ReportArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum View {
    Year,
    Country,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Legend {
    Inside,
    Right,
    Top,
    Bottom,
}

impl From<Legend> for LegendMode {
    fn from(l: Legend) -> Self {
        match l {
            Legend::Inside => LegendMode::Inside,
            Legend::Right => LegendMode::Right,
            Legend::Top => LegendMode::Top,
            Legend::Bottom => LegendMode::Bottom,
        }
    }
}

#[derive(Args, Debug)]
struct InputArgs {
    /// World Bank indicator export (CSV).
    #[arg(short, long)]
    file: PathBuf,
    /// Drop incomplete periods instead of incomplete countries when building the year view.
    #[arg(long, default_value_t = false)]
    drop_periods: bool,
}

impl InputArgs {
    fn load(&self) -> Result<Reshaped> {
        let opts = ReshapeOptions {
            completeness: if self.drop_periods {
                Completeness::DropPeriods
            } else {
                Completeness::DropCountries
            },
        };
        Ok(loader::load_indicator(&self.file, &opts)?)
    }
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Chart output path (.svg or .png).
    #[arg(long)]
    plot: PathBuf,
    /// Chart title (derived from the indicator name when omitted).
    #[arg(long)]
    title: Option<String>,
    /// Y axis label (derived from the indicator unit when omitted).
    #[arg(long)]
    y_label: Option<String>,
    /// Width of the plot (default 800).
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Legend placement.
    #[arg(long, value_enum, default_value_t = Legend::Right)]
    legend: Legend,
    /// Locale for number formatting (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
}

impl ChartArgs {
    fn options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            locale: self.locale.clone(),
            legend: self.legend.into(),
            title: self.title.clone().unwrap_or_default(),
            y_label: self.y_label.clone().unwrap_or_default(),
            ..ChartOptions::default()
        }
    }
}

#[derive(Args, Debug)]
struct ReshapeArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Which view to write.
    #[arg(long, value_enum, default_value_t = View::Year)]
    view: View,
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// Output format. If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct DescribeArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Summarize country columns of the year view instead of period columns.
    #[arg(long, default_value_t = false)]
    by_country: bool,
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct BarArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    chart: ChartArgs,
    /// Countries separated by comma or semicolon.
    #[arg(short, long)]
    countries: String,
    /// Number of leading periods to show.
    #[arg(long, default_value_t = 10)]
    years: usize,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    chart: ChartArgs,
    /// Countries separated by comma or semicolon.
    #[arg(short, long)]
    countries: String,
    /// Label every n-th period on the X axis.
    #[arg(long, default_value_t = 4)]
    tick_every: usize,
}

#[derive(Args, Debug)]
struct HeatmapArgs {
    /// LABEL=PATH pairs, one per indicator (repeatable).
    #[arg(short, long = "data", required = true)]
    data: Vec<String>,
    /// Period column to correlate.
    #[arg(long, default_value = "2010")]
    year: String,
    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Args, Debug)]
struct BoxplotArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    chart: ChartArgs,
    #[arg(long)]
    country: String,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// JSON config mapping indicators to export files.
    #[arg(long)]
    config: PathBuf,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn fmt_opt(v: Option<f64>, locale: &str) -> String {
    v.map(|x| format_number(x, 4, locale))
        .unwrap_or_else(|| "NA".to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Reshape(args) => cmd_reshape(args),
        Command::Describe(args) => cmd_describe(args),
        Command::Bar(args) => cmd_bar(args),
        Command::Series(args) => cmd_series(args),
        Command::Heatmap(args) => cmd_heatmap(args),
        Command::Boxplot(args) => cmd_boxplot(args),
        Command::Report(args) => {
            let cfg = Config::load(&args.config)?;
            report::run(&cfg, &mut io::stdout().lock())?;
            eprintln!("Wrote charts to {}", cfg.output_dir.display());
            Ok(())
        }
    }
}

fn cmd_reshape(args: ReshapeArgs) -> Result<()> {
    let data = args.input.load()?;
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv".to_string(),
        Some(OutFormat::Json) => "json".to_string(),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase(),
    };
    let rows = match (fmt.as_str(), args.view) {
        ("csv", View::Year) => storage::save_year_csv(&data.by_year, path).map(|_| data.by_year.len()),
        ("csv", View::Country) => {
            storage::save_country_csv(&data.by_country, path).map(|_| data.by_country.len())
        }
        ("json", View::Year) => storage::save_json(&data.by_year, path).map(|_| data.by_year.len()),
        ("json", View::Country) => {
            storage::save_json(&data.by_country, path).map(|_| data.by_country.len())
        }
        (other, _) => bail!("unsupported format: {}", other),
    }?;
    eprintln!("Saved {} rows to {}", rows, path.display());
    Ok(())
}

fn cmd_describe(args: DescribeArgs) -> Result<()> {
    let data = args.input.load()?;
    if args.by_country {
        for s in stats::describe_year_table(&data.by_year) {
            println!(
                "{}  count={}  mean={} std={} min={} 25%={} median={} 75%={} max={}",
                s.label,
                s.count,
                fmt_opt(s.mean, &args.locale),
                fmt_opt(s.std, &args.locale),
                fmt_opt(s.min, &args.locale),
                fmt_opt(s.q25, &args.locale),
                fmt_opt(s.median, &args.locale),
                fmt_opt(s.q75, &args.locale),
                fmt_opt(s.max, &args.locale)
            );
        }
        return Ok(());
    }
    report::describe_report(&data.by_country, &args.locale, &mut io::stdout().lock())
}

fn cmd_bar(args: BarArgs) -> Result<()> {
    let data = args.input.load()?;
    let opts = args.chart.options();
    let spec = BarSpec {
        title: opts.title.clone(),
        y_label: opts.y_label.clone(),
        countries: parse_list(&args.countries),
        years: args.years,
        y_range: None,
    };
    report::bar_report(&data.by_year, &spec, &opts, &args.chart.plot)?;
    eprintln!("Wrote plot to {}", args.chart.plot.display());
    Ok(())
}

fn cmd_series(args: SeriesArgs) -> Result<()> {
    let data = args.input.load()?;
    let opts = args.chart.options();
    let spec = SeriesSpec {
        title: opts.title.clone(),
        y_label: opts.y_label.clone(),
        countries: parse_list(&args.countries),
        tick_every: args.tick_every,
    };
    report::series_report(&data.by_year, &spec, &opts, &args.chart.plot)?;
    eprintln!("Wrote plot to {}", args.chart.plot.display());
    Ok(())
}

fn cmd_heatmap(args: HeatmapArgs) -> Result<()> {
    let mut tables = Vec::with_capacity(args.data.len());
    for pair in &args.data {
        let (label, path) = pair
            .split_once('=')
            .with_context(|| format!("invalid --data `{pair}`, expected LABEL=PATH"))?;
        let data = loader::load_indicator(path, &ReshapeOptions::default())?;
        tables.push((label.to_string(), data.by_country));
    }
    let columns: Vec<(&str, _)> = tables.iter().map(|(l, t)| (l.as_str(), t)).collect();
    let frame = compare::assemble(&columns, &args.year)?;
    let matrix = report::heatmap_report(&frame, &args.chart.options(), &args.chart.plot)?;
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        let cells: Vec<String> = row
            .iter()
            .map(|v| v.map(|r| format!("{r:+.2}")).unwrap_or_else(|| "  NA ".into()))
            .collect();
        println!("{}  {}", cells.join(" "), label);
    }
    eprintln!("Wrote plot to {}", args.chart.plot.display());
    Ok(())
}

fn cmd_boxplot(args: BoxplotArgs) -> Result<()> {
    let data = args.input.load()?;
    let b = report::box_plot_report(&data.by_year, &args.country, &args.chart.options(), &args.chart.plot)?;
    println!(
        "{}  n={}  whiskers=[{}, {}]  q1={} median={} q3={}  outliers={}",
        b.label,
        b.count,
        b.lower_whisker,
        b.upper_whisker,
        b.q1,
        b.median,
        b.q3,
        b.outliers.len()
    );
    eprintln!("Wrote plot to {}", args.chart.plot.display());
    Ok(())
}
