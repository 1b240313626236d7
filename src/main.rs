use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_ops::config::{self, Config};
use board_ops::domain::{CreateItemRequest, ItemsQuery, QueryOperator, RuleOperator};
use board_ops::BoardsClient;

#[derive(Debug, Parser)]
#[command(name = "board-ops", version, about = "Search and add items across boards")]
struct Cli {
    /// Env file to load; defaults to the nearest `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search every board for items whose column matches a value
    Search(SearchArgs),
    /// Add an item to a board
    Add(AddArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Column title to filter on
    #[arg(short = 'c', long)]
    column: String,
    /// Value to compare against
    #[arg(short = 'v', long)]
    value: String,
    /// Comparison operator, e.g. contains_text, starts_with, is_empty
    #[arg(long, default_value = "contains_text")]
    operator: RuleOperator,
    /// Combine rules with `or` instead of `and`
    #[arg(long)]
    or: bool,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    board: String,
    #[arg(long, default_value = "")]
    group: String,
    /// Item title; defaults to --name
    #[arg(long)]
    item_name: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_file = config::load_env_file(cli.env_file.as_deref())?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,board_ops=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = &env_file {
        tracing::debug!(path = %path.display(), "Loaded env file");
    }
    let config = Config::from_env().context("Failed to load configuration")?;
    let client = BoardsClient::from_config(&config).context("Failed to set up API client")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    match cli.command {
        Command::Search(args) => search(&client, &cancel, args).await,
        Command::Add(args) => add(&client, &cancel, args).await,
    }
}

async fn search(
    client: &BoardsClient,
    cancel: &CancellationToken,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let operator = if args.or {
        QueryOperator::Or
    } else {
        QueryOperator::And
    };
    let query = ItemsQuery::new(operator).rule(args.column, args.operator, args.value);

    let mut items = client
        .search_all_boards(cancel, query)
        .await
        .context("Failed to list boards")?;

    while let Some(item) = items.next().await {
        tracing::info!("Found: {}", item);
    }

    match items.summary() {
        Some(summary) => {
            for failure in &summary.failures {
                tracing::warn!(
                    board = failure.board_name.as_str(),
                    error = failure.error.as_str(),
                    "Board could not be searched"
                );
            }
            if summary.cancelled {
                tracing::warn!("Search cancelled before all boards answered");
            }
            tracing::info!(
                boards = summary.boards_searched,
                matches = summary.items_delivered,
                "Search complete"
            );
        }
        None => tracing::warn!("Search ended before every board reported back"),
    }

    Ok(())
}

async fn add(
    client: &BoardsClient,
    cancel: &CancellationToken,
    args: AddArgs,
) -> anyhow::Result<()> {
    let request = CreateItemRequest {
        board_name: args.board,
        group_name: args.group,
        item_name: args.item_name.unwrap_or_else(|| args.name.clone()),
        name: args.name,
        email: args.email,
        phone: args.phone,
    };
    tracing::info!(?request, "Creating item");

    let created = client
        .create_item(cancel, &request)
        .await
        .context("Failed to create item")?;

    tracing::info!(item_id = created.id.as_str(), "Created item");
    Ok(())
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl+C, cancelling...");
        cancel.cancel();
    }
}
