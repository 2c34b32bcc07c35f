mod config;
mod shell;
mod transport;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inventory_core::{list::DELETE_CONFIRMATION, ProductClient, ProductService};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use crate::config::load_settings;
use crate::shell::{Command, Flow, Shell, Table};
use crate::transport::ReqwestTransport;

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Inventory product client")]
struct Cli {
    /// Base URL of the product API, overriding config and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file (defaults to ./inventory.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Interactive list and form (default).
    Shell,
    /// Print every product.
    List,
    /// Print one product.
    Get { id: i64 },
    /// Print products whose name contains NAME.
    Search { name: String },
    /// Print products with quantity below the threshold.
    LowStock {
        #[arg(long)]
        threshold: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(api_url = %settings.api_url, "inventory client starting");

    let service = ProductService::new(
        ProductClient::new(&settings.api_url),
        ReqwestTransport::default(),
    );

    match cli.command.unwrap_or(Action::Shell) {
        Action::Shell => run_shell(Shell::new(service, settings.low_stock_threshold)).await?,
        Action::List => {
            let products = service.list_products().await.context("listing products")?;
            print!("{}", Table::new(&products, None));
        }
        Action::Get { id } => {
            let product = service
                .get_product(id)
                .await
                .with_context(|| format!("fetching product {id}"))?;
            print!("{}", Table::new(std::slice::from_ref(&product), None));
        }
        Action::Search { name } => {
            let products = service
                .search_products(&name)
                .await
                .context("searching products")?;
            print!("{}", Table::new(&products, None));
        }
        Action::LowStock { threshold } => {
            let threshold = threshold.unwrap_or(settings.low_stock_threshold);
            let products = service
                .low_stock_products(threshold)
                .await
                .context("querying low stock")?;
            print!("{}", Table::new(&products, None));
        }
    }
    Ok(())
}

async fn run_shell(mut shell: Shell<ReqwestTransport>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    shell.mount().await;
    stdout.write_all(shell.render().as_bytes()).await?;

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await.context("reading input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                stdout.write_all(format!("{err}\n").as_bytes()).await?;
                continue;
            }
        };

        let approved = match command {
            Command::Delete(_) => ask(&mut lines, &mut stdout, DELETE_CONFIRMATION).await?,
            _ => false,
        };
        if shell.handle(command, &move |_: &str| approved).await == Flow::Quit {
            break;
        }
        stdout.write_all(shell.render().as_bytes()).await?;
    }
    Ok(())
}

async fn ask(
    lines: &mut Lines<BufReader<Stdin>>,
    stdout: &mut tokio::io::Stdout,
    question: &str,
) -> Result<bool> {
    stdout.write_all(format!("{question} [y/N] ").as_bytes()).await?;
    stdout.flush().await?;
    let answer = lines.next_line().await.context("reading confirmation")?;
    Ok(matches!(
        answer.as_deref().map(str::trim),
        Some("y" | "Y" | "yes" | "Yes")
    ))
}
