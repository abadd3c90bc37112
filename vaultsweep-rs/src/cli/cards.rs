//! `cards` command.

use crate::cards::{Card, CardQuery, build_cards, render_cards};
use crate::cli::args::CardsArgs;
use crate::cli::output::Output;
use crate::config::CardConfig;
use crate::error::{ExitCode, Result, VaultError};
use crate::vault::Vault;
use serde::Serialize;

/// Output for cards.
#[derive(Debug, Serialize)]
pub struct CardsOutput {
    pub folder: String,
    pub count: usize,
    pub cards: Vec<Card>,
}

/// Build the query from either a YAML file or the folder/tag flags.
///
/// Tags given with `--tag` are added to the ones in the query file.
pub fn query_from_args(args: &CardsArgs) -> Result<CardQuery> {
    let mut query = match (&args.query, &args.folder) {
        (Some(file), _) => CardQuery::from_yaml(&std::fs::read_to_string(file)?)?,
        (None, Some(folder)) => CardQuery::new(folder.clone(), Vec::new()),
        (None, None) => {
            return Err(VaultError::InvalidQuery(
                "either --query or --folder is required".to_string(),
            ));
        }
    };

    for tag in &args.tag {
        if !query.tags.contains(tag) {
            query.tags.push(tag.clone());
        }
    }

    Ok(query)
}

/// Print the cards for a folder.
pub fn cards(vault: &Vault, config: &CardConfig, args: &CardsArgs, output: &Output) -> Result<ExitCode> {
    let query = query_from_args(args)?;
    let cards = build_cards(vault, &query)?;

    if cards.is_empty() {
        output.info(&format!("No cards in {}.", query.folder_path));
    }

    if args.markdown {
        output.print_raw(&render_cards(&cards, &query.folder_path, &config.authors_folder));
    } else {
        output.print(&CardsOutput {
            folder: query.folder_path,
            count: cards.len(),
            cards,
        })?;
    }

    Ok(ExitCode::Success)
}
