//! CLI for tastetree.
//!
//! Loads an item table and a user file, trains one decision tree per user and
//! reports what each user would be shown. Also answers the reverse question
//! (who would get a given item) and exports the catalog keys for surveys.

mod loader;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tastetree_core::UserId;
use tastetree_recommender::{Recommender, TreeSummary, DEFAULT_MAX_RECOMMENDATIONS};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fallback timestamp when formatting fails
const FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print up to `limit` recommendations for every user
    Recommend {
        #[command(flatten)]
        data: DataArgs,

        /// Seed for candidate sampling (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of items per user
        #[arg(long, default_value_t = DEFAULT_MAX_RECOMMENDATIONS)]
        limit: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also print every user's decision tree
        #[arg(long)]
        dump_trees: bool,
    },
    /// List the users whose tree would recommend one item
    Audience {
        #[command(flatten)]
        data: DataArgs,

        /// Key of the item to look up
        #[arg(long)]
        key: String,
    },
    /// Write every item key to a file, one per line
    Keys {
        /// Item table
        #[arg(long, default_value = "data/items.csv")]
        items: PathBuf,

        /// Output file
        #[arg(long, default_value = "data/keys.txt")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Item table (comma-separated, header `url, timedelta, <attributes>...`)
    #[arg(long, default_value = "data/items.csv")]
    items: PathBuf,

    /// User file with like/dislike records
    #[arg(long, default_value = "data/users.txt")]
    users: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize, Debug)]
struct UserRecommendations {
    user: UserId,
    items: Vec<String>,
}

#[derive(Serialize, Debug)]
struct RecommendationReport {
    ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    limit: usize,
    recommendations: Vec<UserRecommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trees: Option<Vec<TreeSummary>>,
}

fn iso8601_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| FALLBACK_TIMESTAMP.to_string())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_recommender(data: &DataArgs, seed: Option<u64>) -> Result<Recommender> {
    info!(path = ?data.items, "parsing item table");
    let catalog = loader::load_catalog(&data.items)?;
    info!(
        items = catalog.items.len(),
        attributes = catalog.universe.len(),
        "item table loaded"
    );

    info!(path = ?data.users, "parsing user file");
    let users = loader::load_users(&data.users, &catalog)?;
    info!(users = users.len(), "user file loaded");

    let items = catalog.items.into_values();
    let recommender = match seed {
        Some(seed) => Recommender::seeded(catalog.universe, users, items, seed),
        None => Recommender::new(catalog.universe, users, items),
    }
    .context("Failed to build recommender")?;
    Ok(recommender)
}

fn recommend_all(recommender: &mut Recommender) -> Result<Vec<UserRecommendations>> {
    recommender
        .user_ids()
        .into_iter()
        .map(|user| -> Result<UserRecommendations> {
            let items = recommender
                .recommend_to_user(user)?
                .iter()
                .map(|item| item.key().to_string())
                .collect();
            Ok(UserRecommendations { user, items })
        })
        .collect()
}

fn run_recommend(
    data: &DataArgs,
    seed: Option<u64>,
    limit: usize,
    format: OutputFormat,
    dump_trees: bool,
) -> Result<()> {
    let mut recommender = build_recommender(data, seed)?.with_max_recommendations(limit);
    let recommendations = recommend_all(&mut recommender)?;

    match format {
        OutputFormat::Text => {
            for entry in &recommendations {
                println!(
                    "The system recommends the following items to user {}:",
                    entry.user
                );
                for key in &entry.items {
                    println!("{key}");
                }
                println!();
            }
            if dump_trees {
                print!("{recommender}");
            }
        }
        OutputFormat::Json => {
            let report = RecommendationReport {
                ts: iso8601_now(),
                seed,
                limit,
                recommendations,
                trees: dump_trees.then(|| recommender.summaries()),
            };
            serde_json::to_writer_pretty(std::io::stdout(), &report)?;
            println!();
        }
    }
    Ok(())
}

fn run_audience(data: &DataArgs, key: &str) -> Result<()> {
    let recommender = build_recommender(data, None)?;
    let item = recommender
        .catalog()
        .iter()
        .find(|item| item.key() == key)
        .with_context(|| format!("Unknown item key '{key}'"))?;

    let audience = recommender.recommend_item_to_users(item);
    println!("{} would be recommended to {} user(s):", item, audience.len());
    for user in audience {
        println!("User {user}");
    }
    Ok(())
}

fn write_keys(items: &Path, out: &Path) -> Result<()> {
    info!(path = ?items, "writing item keys");
    let table = loader::load_table(items)?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(out).with_context(|| format!("Failed to create {out:?}"))?;
    let mut writer = BufWriter::new(file);
    for row in &table.rows {
        writeln!(writer, "{}", row.key)?;
    }
    writer.flush()?;
    println!("Wrote {} keys to {}", table.rows.len(), out.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Recommend {
            data,
            seed,
            limit,
            format,
            dump_trees,
        } => run_recommend(&data, seed, limit, format, dump_trees),
        Commands::Audience { data, key } => run_audience(&data, &key),
        Commands::Keys { items, out } => write_keys(&items, &out),
    }
}
