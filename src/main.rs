use std::env;
use std::process::ExitCode;

use log::error;

use recipe_scrape::{extract_recipe_with_config, ScrapeConfig, ScrapeError};

fn main() -> ExitCode {
    env_logger::init();

    let url = match url_from_args(env::args().skip(1)) {
        Some(url) => url,
        None => {
            eprintln!("Usage: recipe-scrape <recipe-url>");
            return ExitCode::from(2);
        }
    };

    let config = match ScrapeConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", ScrapeError::from(err));
            return ExitCode::FAILURE;
        }
    };

    match extract_recipe_with_config(&url, &config) {
        Ok(record) => match serde_json::to_string(&record) {
            Ok(line) => {
                println!("{}", line);
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("Failed to serialize recipe: {}", err);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!("Failed to scrape {}: {}", url, err);
            ExitCode::FAILURE
        }
    }
}

/// Exactly one non-empty argument: the recipe page URL.
fn url_from_args(mut args: impl Iterator<Item = String>) -> Option<String> {
    let url = args.next()?;
    if url.is_empty() || args.next().is_some() {
        return None;
    }
    Some(url)
}
