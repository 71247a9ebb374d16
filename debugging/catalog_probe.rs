//! Call one catalog operation and print the decoded result as pretty JSON.
//! Usage:
//!   cargo run --bin catalog_probe -- popular [page]
//!   cargo run --bin catalog_probe -- top-rated [page]
//!   cargo run --bin catalog_probe -- now-playing [page]
//!   cargo run --bin catalog_probe -- search <query> [page]
//!   cargo run --bin catalog_probe -- details <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use movie_explorer::tmdb::{TmdbApi, TmdbClient, DEFAULT_PAGE};
use std::env;

fn parse_page(arg: Option<&String>) -> Result<u32> {
    match arg {
        Some(raw) => raw.parse().with_context(|| format!("invalid page '{}'", raw)),
        None => Ok(DEFAULT_PAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("usage: catalog_probe <popular|top-rated|now-playing|search|details> [args]");
    };

    let client = TmdbClient::from_env().context("Failed to build TMDB client")?;

    let output = match command.as_str() {
        "popular" => serde_json::to_string_pretty(&client.popular(parse_page(args.get(1))?).await?)?,
        "top-rated" => {
            serde_json::to_string_pretty(&client.top_rated(parse_page(args.get(1))?).await?)?
        }
        "now-playing" => {
            serde_json::to_string_pretty(&client.now_playing(parse_page(args.get(1))?).await?)?
        }
        "search" => {
            let query = args.get(1).context("search needs a query")?;
            let page = parse_page(args.get(2))?;
            serde_json::to_string_pretty(&client.search(query, page).await?)?
        }
        "details" => {
            let id: u64 = args
                .get(1)
                .context("details needs a TMDB id")?
                .parse()
                .context("TMDB id must be a positive integer")?;
            match client.movie_details(id).await? {
                Some(details) => serde_json::to_string_pretty(&details)?,
                None => bail!("No TMDB movie with id {}", id),
            }
        }
        other => bail!("unknown command '{}'", other),
    };

    println!("{}", output);
    Ok(())
}
