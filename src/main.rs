use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cinematch_api::{
    config::Config,
    display,
    routes::{create_router, AppState},
    services::{catalog, embedding, CatalogIndex, Recommender},
};

#[derive(Parser)]
#[command(name = "cinematch-api")]
#[command(about = "Recommends movies and shows similar to a free-text description")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog index and serve the HTTP API (default)
    Serve,

    /// Build the catalog index, rank once and print a table
    Recommend {
        /// Description of what you want to watch
        description: String,

        /// Number of results (defaults to RECOMMENDATION_COUNT)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let recommender = build_recommender(&config).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, recommender).await,
        Commands::Recommend { description, top_n } => {
            let top_n = top_n.unwrap_or(config.recommendation_count);
            let recommendations = recommender.recommend(&description, top_n).await?;
            println!("{}", display::render_table(&recommendations));
            Ok(())
        }
    }
}

/// Loads the dataset and encodes it once; any failure aborts startup
async fn build_recommender(config: &Config) -> anyhow::Result<Recommender> {
    let rows = catalog::load_rows(&config.dataset_path)
        .with_context(|| format!("Failed to load dataset {}", config.dataset_path.display()))?;

    let embedder = embedding::create_embedder(config)
        .await
        .context("Failed to initialize embedding model")?;

    let index = CatalogIndex::build(rows, embedder.as_ref(), config.embedding_batch_size)
        .await
        .context("Failed to build catalog index")?;

    Ok(Recommender::new(embedder, index))
}

async fn serve(config: Config, recommender: Recommender) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(recommender, config.recommendation_count));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
