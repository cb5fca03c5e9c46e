//! Fill the database with demo categories, authors, books and one loan.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use biblio_server::{
    clock::SystemClock,
    config::AppConfig,
    repository::{self, Repository},
    seed::{self, SeedOptions},
    services::Services,
};

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Populate the library with sample data")]
struct Args {
    /// Number of sample books
    #[arg(long, default_value_t = 3)]
    books: usize,

    /// Number of sample authors
    #[arg(long, default_value_t = 5)]
    authors: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("biblio_server={}", config.logging.level).into()),
        )
        .init();

    let pool = repository::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let clock = Arc::new(SystemClock);
    let services = Services::new(Repository::new(pool), &config, clock.clone());

    let options = SeedOptions {
        books: args.books,
        authors: args.authors,
    };
    let mut rng = StdRng::from_entropy();
    let report = seed::run(&services, clock.as_ref(), options, &mut rng).await?;

    println!("categories created: {}", report.categories_created);
    println!("authors created: {}", report.authors_created);
    println!("books created: {}", report.books_created);
    match report.sample_loan {
        Some(id) => println!("sample loan: {} (card {})", id, seed::SAMPLE_CARD),
        None => println!("sample loan: none"),
    }

    Ok(())
}
