//! Print the number of books and the first few of them.

use std::sync::Arc;

use anyhow::Context;

use biblio_server::{
    clock::SystemClock,
    config::AppConfig,
    repository::{self, Repository},
    services::Services,
};

const SHOWN: i64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let pool = repository::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let services = Services::new(Repository::new(pool), &config, Arc::new(SystemClock));

    let (total, books) = services.catalog.overview(SHOWN).await?;
    println!("books_count {}", total);
    for book in books {
        println!("{} {} {}", book.id, book.title, book.isbn);
    }

    Ok(())
}
