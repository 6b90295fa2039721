//! Feed filter entry point.
//!
//! Usage: `filter-feed <input> <output> [category]`

use std::env;
use std::process::ExitCode;

use product_indexer::feed_filter::{filter_by_category, DEFAULT_CATEGORY};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_indexer=info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (input, output) = match (args.first(), args.get(1)) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            eprintln!("Usage: filter-feed <input> <output> [category]");
            return ExitCode::from(2);
        }
    };
    let category = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CATEGORY);

    match filter_by_category(input, output, category).await {
        Ok(summary) => {
            info!(
                kept = summary.kept,
                output = %output,
                "Wrote {} {} products",
                summary.kept,
                category
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Feed filter failed");
            ExitCode::FAILURE
        }
    }
}
