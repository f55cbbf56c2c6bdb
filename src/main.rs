mod api;
mod board;
mod db;
mod logging;
mod models;
mod server;
mod settings;
mod tui;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::{ApiClient, Backend};
use crate::board::view::{count_done, progress_percent};
use crate::db::Database;
use crate::server::{DEFAULT_ADDR, ServerConfig};
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "taskflow", about = "Kanban board for projects and tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API backend
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
        /// SQLite database file (defaults to $TASKFLOW_DB or ~/.taskflow/taskflow.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Launch the terminal board
    Tui {
        /// Base URL of the API, e.g. http://localhost:8000/api
        #[arg(long, env = "TASKFLOW_API_URL")]
        api_url: Option<String>,
    },
    /// Print every project with its completion
    Status {
        #[arg(long, env = "TASKFLOW_API_URL")]
        api_url: Option<String>,
    },
}

fn client_for(api_url: Option<&str>) -> Result<ApiClient> {
    let url = Settings::load().resolve_api_url(api_url);
    ApiClient::new(url).context("failed to build HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, db } => {
            logging::init_stderr();
            let db_path = match db {
                Some(path) => path,
                None => Database::default_path()?,
            };
            server::serve(ServerConfig { addr, db_path }).await?;
        }
        Commands::Tui { api_url } => {
            logging::init_tui();
            tui::run(client_for(api_url.as_deref())?).await?;
        }
        Commands::Status { api_url } => {
            logging::init_stderr();
            let client = client_for(api_url.as_deref())?;
            print_status(&client).await?;
        }
    }

    Ok(())
}

async fn print_status(client: &ApiClient) -> Result<()> {
    let projects = client
        .list_projects()
        .await
        .with_context(|| format!("failed to reach TaskFlow API at {}", client.base_url()))?;

    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let width = projects
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0);
    for project in &projects {
        println!(
            "{:<width$}  {:>3}/{:<3} done  {:>3}%",
            project.name,
            count_done(&project.tasks),
            project.task_count(),
            progress_percent(&project.tasks),
        );
    }
    Ok(())
}
