//! Opportunity Scoreboard
//!
//! Loads score-ranked sales opportunities from a JSON file or HTTP endpoint
//! and shows them as a filtered, sorted table with pipeline totals.

mod config;
mod constants;
mod render;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scoreboard::{CategoryFilter, Scoreboard, SortField};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{Config, FileConfig};

#[derive(Parser, Debug)]
#[command(name = "scoreboard")]
#[command(about = "Score-ranked sales opportunities with category filter and sortable columns")]
struct Args {
    /// Config file (optional)
    #[arg(short, long, default_value = constants::CONFIG_FILE)]
    config: PathBuf,

    /// Read the opportunity payload from a JSON file
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch the opportunity payload from an HTTP endpoint
    #[arg(long)]
    url: Option<String>,

    /// Category filter: All, Hot, Warm or Cold
    #[arg(long)]
    category: Option<CategoryFilter>,

    /// Click a column header: Name, StageName, Amount, Opportunity_Score__c or
    /// CloseDate. Repeat to click again (a second click flips the direction)
    #[arg(long = "sort", value_name = "FIELD")]
    sorts: Vec<SortField>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write csv/json output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file_config = FileConfig::load_or_default(&args.config)?;
    let config = Config::from_file(&file_config, args.file.clone(), args.url.clone())?;
    tracing::debug!(source = ?config.source, "resolved configuration");

    let mut board = Scoreboard::new();
    apply_view_actions(&mut board, &args, &config);

    let result = source::fetch(&config.source, config.timeout).await;
    board.on_data_received(result);

    if let Some(error) = board.error() {
        render::print_error(error);
        anyhow::bail!("Failed to load opportunities");
    }

    write_output(&board, args.format, args.output.as_ref())
}

/// Replay the requested category selection and column clicks
fn apply_view_actions(board: &mut Scoreboard, args: &Args, config: &Config) {
    if let Some(category) = args.category.or(config.default_category) {
        board.set_category(category);
    }

    for field in &args.sorts {
        board.toggle_sort(*field);
        tracing::debug!(
            field = %field,
            direction = board.sort_direction_indicator(),
            "sort column clicked"
        );
    }
}

fn write_output(board: &Scoreboard, format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if output.is_some() {
                tracing::warn!("--output is ignored for table output");
            }
            render::print_table(board);
            return Ok(());
        }
        OutputFormat::Csv => render::write_csv(board, open_writer(output)?)?,
        OutputFormat::Json => render::write_json(board, open_writer(output)?)?,
    }

    if let Some(path) = output {
        println!("  Generated: {}", path.display());
    }

    Ok(())
}

/// Output file if one was given, otherwise stdout
fn open_writer(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(default_category: Option<CategoryFilter>) -> Config {
        Config {
            source: config::Source::File(PathBuf::from("opportunities.json")),
            timeout: Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
            default_category,
        }
    }

    #[test]
    fn test_parse_view_flags() {
        let args = Args::try_parse_from([
            "scoreboard",
            "--file",
            "opps.json",
            "--category",
            "Warm",
            "--sort",
            "Amount",
            "--sort",
            "Amount",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(args.category, Some(CategoryFilter::Warm));
        assert_eq!(args.sorts, vec![SortField::Amount, SortField::Amount]);
        assert_eq!(args.format, OutputFormat::Csv);
    }

    #[test]
    fn test_file_and_url_conflict() {
        let result = Args::try_parse_from(["scoreboard", "--file", "a.json", "--url", "https://example.com"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(Args::try_parse_from(["scoreboard", "--category", "Lukewarm"]).is_err());
    }

    #[test]
    fn test_apply_view_actions_replays_clicks() {
        let args = Args::try_parse_from(["scoreboard", "--sort", "Amount", "--sort", "Amount"]).unwrap();
        let mut board = Scoreboard::new();
        apply_view_actions(&mut board, &args, &test_config(Some(CategoryFilter::Cold)));

        assert!(board.sort_by_amount());
        assert_eq!(board.sort_direction_indicator(), "↑");
        assert_eq!(board.view_state().selected_category, CategoryFilter::Cold);
    }

    #[test]
    fn test_category_flag_beats_config_default() {
        let args = Args::try_parse_from(["scoreboard", "--category", "Hot"]).unwrap();
        let mut board = Scoreboard::new();
        apply_view_actions(&mut board, &args, &test_config(Some(CategoryFilter::Cold)));

        assert_eq!(board.view_state().selected_category, CategoryFilter::Hot);
    }
}
