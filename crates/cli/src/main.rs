use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mims_api::{ApiClient, ListQuery};

/// Terminal client for the MIMS administration API.
///
/// Without a subcommand the interactive TUI starts. Subcommands print the
/// same API data as JSON for scripting.
#[derive(Debug, Parser)]
#[command(name = "mims", version, about)]
struct Cli {
    /// Base URL of the API server, overriding MIMS_API_BASE
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the dashboard statistics snapshot as JSON
    Dashboard,
    /// Student records
    Students {
        #[command(subcommand)]
        command: StudentsCommand,
    },
    /// Lookup tables (branches, classes, divisions)
    Utilities {
        #[command(subcommand)]
        command: UtilitiesCommand,
    },
}

#[derive(Debug, Subcommand)]
enum StudentsCommand {
    /// Print one page of the students list as JSON
    List {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Free-text search across name, admission number, and parent mobile
        #[arg(long)]
        search: Option<String>,
        /// Filter by status (active, inactive)
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum UtilitiesCommand {
    /// Print the branch lookup as JSON
    Branches,
    /// Print the class lookup as JSON
    Classes,
    /// Print the division lookup as JSON
    Divisions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::with_base(cli.base_url.as_deref())?;

    match cli.command {
        // No subcommand => TUI
        None => {
            init_file_tracing();
            mims_tui::run(client).await
        }
        Some(command) => {
            init_stderr_tracing();
            run_command(&client, command).await
        }
    }
}

/// TUI mode logs to a file; stdout belongs to the alternate screen.
fn init_file_tracing() {
    let Some(dir) = dirs_next::data_dir().map(|dir| dir.join("mims")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("mims.log"))
    else {
        return;
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .try_init();
}

fn init_stderr_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_command(client: &ApiClient, command: Command) -> Result<()> {
    tracing::debug!(?command, base_url = %client.base_url, "running one-shot command");
    match command {
        Command::Dashboard => {
            let stats = client
                .dashboard_stats()
                .await
                .context("failed to load dashboard statistics")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Students {
            command: StudentsCommand::List { page, search, status },
        } => {
            let mut query = ListQuery::new(page, mims_api::DEFAULT_PAGE_SIZE);
            if let Some(search) = search {
                query = query.with_search(search);
            }
            if let Some(status) = status {
                query = query.with_filter("status", status);
            }
            let result = client
                .fetch_list("/api/students/", &query)
                .await
                .context("failed to load students list")?;
            let out = serde_json::json!({
                "count": result.count,
                "results": result.rows,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Utilities { command } => {
            let out = match command {
                UtilitiesCommand::Branches => {
                    serde_json::to_value(client.branches().await.context("failed to load branches")?)?
                }
                UtilitiesCommand::Classes => {
                    serde_json::to_value(client.classes().await.context("failed to load classes")?)?
                }
                UtilitiesCommand::Divisions => {
                    serde_json::to_value(client.divisions().await.context("failed to load divisions")?)?
                }
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
