//! CLI entry point for football_metrics.
//!
//! Each subcommand loads one match-event CSV, computes a metric table and
//! writes it as CSV (or JSON for a `.json` path) for a chart renderer to pick
//! up.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use football_metrics::config::MetricsConfig;
use football_metrics::metrics::discipline::discipline_summary;
use football_metrics::metrics::forecast::{rank_by_final, team_trajectories, trajectory_points};
use football_metrics::metrics::inequality::{InequalityMetric, inequality_table, sort_by_metric};
use football_metrics::metrics::shotmap::{ShotGrid, shot_map_for, shot_map_table};
use football_metrics::metrics::timeline::{match_summaries, timeline_points};
use football_metrics::metrics::types::{
    DisciplineRecord, EntityId, GroupFailure, MatchForecast, ShotEvent, ShotLocation, TouchRecord,
};
use football_metrics::output::{
    FailureRecord, append_record, print_json, print_pretty, write_json, write_rows,
};
use football_metrics::parser::load_records;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "football_metrics")]
#[command(about = "Summary metrics for football match-event datasets", long_about = None)]
struct Cli {
    /// JSON file overriding the default metric constants
    #[arg(long, global = true)]
    config: Option<String>,

    /// CSV file to append groups that could not be computed to
    #[arg(long, global = true)]
    failures: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cumulative Brier score of match forecasts per team
    Brier {
        /// CSV of matches with outcome probabilities and final scores
        #[arg(value_name = "FILE")]
        input: String,

        /// File to write one row per (team, match index) to
        #[arg(short, long, default_value = "brier.csv")]
        output: String,

        /// Optional: file to write teams ranked by final score to
        #[arg(long)]
        ranking: Option<String>,
    },
    /// Percentile ratio, Hoover index and Gini coefficient per team
    Inequality {
        /// CSV of per-player touches
        #[arg(value_name = "FILE")]
        input: String,

        #[arg(short, long, default_value = "inequality.csv")]
        output: String,

        /// Sort rows descending by this metric
        #[arg(long, value_enum)]
        sort_by: Option<SortMetric>,
    },
    /// Share of shots per goal-face cell for each team and match
    ShotMap {
        /// CSV of shot end locations
        #[arg(value_name = "FILE")]
        input: String,

        #[arg(short, long, default_value = "shot_map.csv")]
        output: String,

        /// Horizontal cells (positive, even)
        #[arg(long)]
        grid_x: Option<usize>,

        /// Vertical cells (positive, even)
        #[arg(long)]
        grid_y: Option<usize>,

        /// Only this match (requires --team-id)
        #[arg(long, requires = "team_id")]
        match_id: Option<String>,

        /// Only this team (requires --match-id)
        #[arg(long, requires = "match_id")]
        team_id: Option<String>,
    },
    /// Two-sided xG timeline positions per match
    Timeline {
        /// CSV of shots with minute, xG, venue and own-goal flag
        #[arg(value_name = "FILE")]
        input: String,

        #[arg(short, long, default_value = "timeline.csv")]
        output: String,

        /// Optional: file to write per-match xG and goal totals to
        #[arg(long)]
        summary: Option<String>,
    },
    /// Foul rates against the league medians
    Discipline {
        /// CSV of per-player fouls per 90 and cards per foul
        #[arg(value_name = "FILE")]
        input: String,

        #[arg(short, long, default_value = "discipline.json")]
        output: String,

        /// Player ids to flag, comma separated
        #[arg(long, value_delimiter = ',')]
        highlight: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortMetric {
    Palma,
    Hoover,
    Gini,
}

impl From<SortMetric> for InequalityMetric {
    fn from(m: SortMetric) -> Self {
        match m {
            SortMetric::Palma => InequalityMetric::PalmaRatio,
            SortMetric::Hoover => InequalityMetric::HooverIndex,
            SortMetric::Gini => InequalityMetric::GiniCoefficient,
        }
    }
}

#[derive(Serialize)]
struct RankedTeam {
    rank: usize,
    team_id: EntityId,
    team_name: Option<String>,
    matches: usize,
    final_score: Option<f64>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/football_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("football_metrics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("FOOTBALL_METRICS_CONFIG").ok());
    let config = MetricsConfig::load_or_default(config_path.as_deref())?;
    print_pretty(&config);

    let failures = cli.failures.as_deref();

    match cli.command {
        Commands::Brier {
            input,
            output,
            ranking,
        } => brier(&input, &output, ranking.as_deref())?,
        Commands::Inequality {
            input,
            output,
            sort_by,
        } => inequality(&input, &output, sort_by, &config, failures)?,
        Commands::ShotMap {
            input,
            output,
            grid_x,
            grid_y,
            match_id,
            team_id,
        } => {
            let grid = ShotGrid::new(
                config.goal.clone(),
                grid_x.unwrap_or(config.goal.grid_x),
                grid_y.unwrap_or(config.goal.grid_y),
            )?;
            let pair = match_id.as_deref().zip(team_id.as_deref());
            shot_map(&input, &output, &grid, pair, failures)?
        }
        Commands::Timeline {
            input,
            output,
            summary,
        } => timeline(&input, &output, summary.as_deref(), &config)?,
        Commands::Discipline {
            input,
            output,
            highlight,
        } => discipline(&input, &output, highlight)?,
    }

    Ok(())
}

/// Per-team expanding-mean Brier score.
#[tracing::instrument]
fn brier(input: &str, output: &str, ranking: Option<&str>) -> Result<()> {
    let matches: Vec<MatchForecast> = load_records(input)?;
    let mut trajectories = team_trajectories(&matches);

    write_rows(output, &trajectory_points(&trajectories))?;
    info!(matches = matches.len(), teams = trajectories.len(), output, "Brier trajectories written");

    if let Some(path) = ranking {
        rank_by_final(&mut trajectories);
        let ranked: Vec<RankedTeam> = trajectories
            .iter()
            .enumerate()
            .map(|(i, t)| RankedTeam {
                rank: i + 1,
                team_id: t.team_id.clone(),
                team_name: t.team_name.clone(),
                matches: t.scores.len(),
                final_score: t.final_score(),
            })
            .collect();
        write_rows(path, &ranked)?;
        info!(path, "Team ranking written");
    }

    Ok(())
}

/// Inequality indices per team.
#[tracing::instrument(skip(config, failures))]
fn inequality(
    input: &str,
    output: &str,
    sort_by: Option<SortMetric>,
    config: &MetricsConfig,
    failures: Option<&str>,
) -> Result<()> {
    let records: Vec<TouchRecord> = load_records(input)?;
    let mut table = inequality_table(&records, &config.percentile_ratio);

    if let Some(metric) = sort_by {
        sort_by_metric(&mut table.rows, metric.into(), true);
    }

    write_rows(output, &table.rows)?;
    record_failures("inequality", &table.failures, failures)?;
    info!(teams = table.rows.len(), failed = table.failures.len(), output, "Inequality table written");
    Ok(())
}

/// Shot shares per goal-face cell.
#[tracing::instrument(skip(grid, failures))]
fn shot_map(
    input: &str,
    output: &str,
    grid: &ShotGrid,
    pair: Option<(&str, &str)>,
    failures: Option<&str>,
) -> Result<()> {
    let shots: Vec<ShotLocation> = load_records(input)?;

    let maps = match pair {
        Some((match_id, team_id)) => {
            let map = shot_map_for(&shots, grid, match_id, team_id)?;
            if map.total == 0 {
                warn!(match_id, team_id, "No shots for this team and match");
            }
            vec![map]
        }
        None => {
            let table = shot_map_table(&shots, grid);
            record_failures("shot-map", &table.failures, failures)?;
            table.rows
        }
    };

    let rows: Vec<_> = maps.iter().flat_map(|m| m.to_rows()).collect();
    write_rows(output, &rows)?;

    let (gx, gy) = grid.dimensions();
    info!(groups = maps.len(), grid_x = gx, grid_y = gy, output, "Shot map written");
    Ok(())
}

/// Timeline positions and optional per-match totals.
#[tracing::instrument(skip(config))]
fn timeline(input: &str, output: &str, summary: Option<&str>, config: &MetricsConfig) -> Result<()> {
    let events: Vec<ShotEvent> = load_records(input)?;

    let points = timeline_points(&events, &config.timeline);
    write_rows(output, &points)?;
    info!(events = points.len(), output, "Timeline written");

    if let Some(path) = summary {
        let summaries = match_summaries(&events);
        write_rows(path, &summaries)?;
        info!(matches = summaries.len(), path, "Match summaries written");
    }

    Ok(())
}

/// Median foul rates and per-player quadrants.
#[tracing::instrument]
fn discipline(input: &str, output: &str, highlight: Vec<String>) -> Result<()> {
    let records: Vec<DisciplineRecord> = load_records(input)?;
    let highlight: HashSet<EntityId> = highlight.into_iter().collect();

    let summary = discipline_summary(&records, &highlight)?;
    print_json(&serde_json::json!({
        "median_fouls_per_90": summary.median_fouls_per_90,
        "median_cards_per_foul": summary.median_cards_per_foul,
    }))?;

    if output.ends_with(".json") {
        write_json(output, &summary)?;
    } else {
        write_rows(output, &summary.players)?;
    }
    info!(players = summary.players.len(), output, "Discipline summary written");
    Ok(())
}

fn record_failures(command: &str, groups: &[GroupFailure], path: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    for failure in groups {
        append_record(path, &FailureRecord::from_failure(command, failure))?;
    }
    Ok(())
}
