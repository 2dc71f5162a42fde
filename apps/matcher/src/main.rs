mod adapters;
mod config;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::ledger::HttpLedger;
use crate::adapters::profile_store::IpfsGateway;
use crate::config::{Config, StrategyKind};
use crate::llm_client::{TextGenerationClient, TextGenerator};
use crate::matching::extractor::RequirementExtractor;
use crate::matching::pipeline::{RecommendationPipeline, RecommendationReport};
use crate::matching::publisher::PublishOutcome;
use crate::matching::scorer::MatchScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default if no subcommand)
    Serve,
    /// Recommend freelancers for one job and print the ranking
    Recommend {
        /// Job identifier (bytes32 hex string)
        job_id: String,
    },
    /// Recommend freelancers for several jobs, one after another
    Batch {
        #[arg(required = true)]
        job_ids: Vec<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "matcher")]
#[command(about = "Matches marketplace jobs with registered freelancers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = build_pipeline(&config)?;
    info!(
        "Pipeline ready (extractor: {}, scorer: {}, top {}, output {})",
        pipeline.extractor().backend(),
        pipeline.scorer().backend(),
        config.top_n,
        pipeline.publisher().output_dir().display()
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, pipeline).await,
        Commands::Recommend { job_id } => {
            let report = pipeline.recommend(&job_id).await?;
            print_report(&report);
            Ok(())
        }
        Commands::Batch { job_ids } => {
            let batch = pipeline.recommend_batch(&job_ids).await;
            for entry in &batch.results {
                match (&entry.report, &entry.error) {
                    (Some(report), _) => print_report(report),
                    (None, Some(error)) => println!("Error processing job {}: {error}\n", entry.job_id),
                    (None, None) => {}
                }
            }
            println!(
                "Processed {} jobs ({} failed)",
                batch.processed_jobs, batch.failed_jobs
            );
            Ok(())
        }
    }
}

async fn serve(config: &Config, pipeline: RecommendationPipeline) -> Result<()> {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires collaborators and stage strategies from configuration.
fn build_pipeline(config: &Config) -> Result<RecommendationPipeline> {
    let fetch_timeout = Duration::from_secs(config.fetch_timeout_secs);

    let ledger = HttpLedger::new(
        &config.ledger_gateway_url,
        &config.marketplace_address,
        config.ledger_api_token.clone(),
        fetch_timeout,
    )
    .context("Failed to initialize ledger client")?;
    info!("Ledger gateway: {}", config.ledger_gateway_url);

    let profiles = IpfsGateway::new(&config.ipfs_gateway, fetch_timeout)
        .context("Failed to initialize IPFS gateway client")?;
    info!("IPFS gateway: {}", config.ipfs_gateway);

    let generator: Option<Arc<dyn TextGenerator>> = match &config.text_generation_api_key {
        Some(api_key) => {
            let client = TextGenerationClient::new(
                config.text_generation_url.clone(),
                api_key.clone(),
                Duration::from_secs(config.llm_timeout_secs),
            )
            .context("Failed to initialize text generation client")?;
            info!("Text generation client initialized ({})", config.text_generation_url);
            Some(Arc::new(client) as Arc<dyn TextGenerator>)
        }
        None => None,
    };

    // Config::from_env guarantees a generator whenever a stage is Delegated.
    let extractor = match (config.extraction_strategy, &generator) {
        (StrategyKind::Delegated, Some(g)) => RequirementExtractor::Delegated(g.clone()),
        _ => RequirementExtractor::Heuristic,
    };
    let scorer = match (config.scoring_strategy, &generator) {
        (StrategyKind::Delegated, Some(g)) => MatchScorer::Delegated(g.clone()),
        _ => MatchScorer::Heuristic,
    };

    Ok(RecommendationPipeline::new(
        Arc::new(ledger),
        Arc::new(profiles),
        extractor,
        scorer,
        config.output_dir.clone(),
        config.top_n,
    ))
}

fn print_report(report: &RecommendationReport) {
    println!("Job processed successfully!");
    println!("Job Title: {}", report.job_details.title);
    println!("Requirements: {}", join(&report.requirements.skills));

    println!("\nTop Recommendations:");
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!("{}. {} (Score: {})", i + 1, rec.name, rec.score);
        println!("   Address: {}", rec.address);
        println!("   Matching Skills: {}", join(&rec.matching_skills));
        println!("   Missing Skills: {}", join(&rec.missing_skills));
        println!("   Comments: {}", rec.comments);
        println!();
    }

    for skipped in &report.skipped_candidates {
        println!("Skipped {}: {}", skipped.address, skipped.reason);
    }

    match &report.publish {
        PublishOutcome::Submitted {
            transaction_hash,
            block_number,
        } => println!("Stored on-chain in tx {transaction_hash} (block {block_number})"),
        PublishOutcome::Skipped { reason } => println!("On-chain write skipped: {reason}"),
        PublishOutcome::Failed { error } => println!("On-chain write failed: {error}"),
    }

    println!(
        "Recommendations saved to {}\n",
        report.artifact_path.display()
    );
}

fn join(skills: &std::collections::BTreeSet<String>) -> String {
    skills.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
