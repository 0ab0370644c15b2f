use chrono::Utc;
use clap::Parser;
use seeder::{ScoreGenerator, seed};
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "leaderboard-seed")]
#[command(about = "Fills the leaderboard database with synthetic players and scores", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Number of submissions to generate
    #[arg(short, long, default_value_t = 10_000)]
    count: usize,

    /// Highest score a generated submission can have
    #[arg(long, default_value_t = 10_000_000)]
    max_score: i64,

    /// Seed for reproducible runs
    #[arg(long)]
    rng_seed: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("seed={},seeder={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;
    tracing::info!("Database ready, generating {} submissions", cli.count);

    let mut generator = ScoreGenerator::new(cli.max_score, cli.rng_seed, Utc::now())?;
    let store = db.scores();
    let summary = seed(&store, &mut generator, cli.count).await?;

    tracing::info!(
        "Seeding complete: {} submissions across {} players",
        summary.submitted,
        summary.players
    );

    Ok(())
}
