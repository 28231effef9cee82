use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use overview_report::naming::DEFAULT_REPORT_NAME;
use overview_report::{ParamPolicy, ReportConfig, ReportContext, StyleOverflow};

/// Render comparison charts and parameter tables for experiment result files
#[derive(Parser, Debug)]
#[command(name = "overview-report")]
#[command(about = "Compare tabular experiment results in one paginated report", long_about = None)]
#[command(version)]
struct Args {
    /// Result files to compare (same MEASURE: columns in each)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Folder the report is written to
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Report name, used in the title and as OVERVIEW_<name>
    #[arg(short, long, default_value = DEFAULT_REPORT_NAME)]
    name: String,

    /// JSON layout configuration; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Plot rows per page
    #[arg(long)]
    rows: Option<usize>,

    /// Plot columns per page
    #[arg(long)]
    cols: Option<usize>,

    /// Base font size in points
    #[arg(long)]
    font_size: Option<f64>,

    /// Columns in the legend
    #[arg(long)]
    legend_cols: Option<usize>,

    /// Render in shades of gray
    #[arg(long)]
    grayscale: bool,

    /// Parameter tables per description page
    #[arg(long)]
    descriptions_per_page: Option<usize>,

    /// Fail instead of reusing line styles when files outnumber them
    #[arg(long)]
    strict_styles: bool,

    /// Fail if a described parameter is not constant within its file
    #[arg(long)]
    strict_params: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = build_config(&args)?;
    let context = ReportContext::new(config).context("invalid report configuration")?;
    let summary = context
        .write_report(&args.files, &args.output, &args.name)
        .with_context(|| format!("failed to build report '{}'", args.name))?;

    if !args.quiet {
        if let Some(path) = &summary.output {
            println!("{}", path.display());
        }
        println!(
            "  {} files, {} measures, {} chart pages, {} description pages",
            summary.files, summary.measures, summary.chart_pages, summary.description_pages
        );
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    if let Some(rows) = args.rows {
        config.rows_per_page = rows;
    }
    if let Some(cols) = args.cols {
        config.cols_per_page = cols;
    }
    if let Some(size) = args.font_size {
        config.font_size = size;
    }
    if let Some(legend_cols) = args.legend_cols {
        config.legend_cols = legend_cols;
    }
    if let Some(n) = args.descriptions_per_page {
        config.descriptions_per_page = n;
    }
    if args.grayscale {
        config.gray_scale = true;
    }
    if args.strict_styles {
        config.style_overflow = StyleOverflow::Error;
    }
    if args.strict_params {
        config.param_policy = ParamPolicy::RequireConstant;
    }
    Ok(config)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
