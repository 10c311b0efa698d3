//! icn-navigator: Company directory over ICN capability exports.
//!
//! Usage:
//!   icn-navigator --mcp                      # Start MCP server (stdin/stdout)
//!   icn-navigator --dataset data.json search steel
//!   icn-navigator state VIC                  # Companies in a state
//!   icn-navigator stats                      # Aggregate statistics

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use icn_navigator::server::NavigatorServer;
use icn_navigator::tools;
use icn_navigator::{DirectoryConfig, DirectoryError, DirectoryIndex, StateCode};
use rmcp::ServiceExt;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "icn-navigator")]
#[command(about = "Company directory index over ICN capability exports")]
#[command(version)]
struct Cli {
    /// Run as MCP server (stdin/stdout JSON-RPC)
    #[arg(long)]
    mcp: bool,

    /// Dataset path (default: <data_dir>/icn-navigator/icn-data.json)
    #[arg(long, global = true, env = "ICN_NAVIGATOR_DATASET")]
    dataset: Option<PathBuf>,

    /// State code assigned to unrecognized locations
    #[arg(long, global = true, default_value = "VIC")]
    fallback_state: String,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search companies by free text
    Search {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List companies in a state
    State {
        /// State code, e.g. VIC or nsw
        code: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List companies by type (both, supplier, manufacturer)
    Type {
        /// Company type
        company_type: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List companies working in a sector
    Sector {
        /// Exact sector name
        name: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one company
    Company {
        /// Company id
        id: String,
    },

    /// List distinct filter values
    Facets,

    /// Show aggregate statistics
    Stats {
        /// Include load counters and fingerprint
        #[arg(short, long)]
        detailed: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log to stderr only (stdout is JSON-RPC for MCP)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("icn_navigator=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let config = DirectoryConfig {
        fallback_state: cli
            .fallback_state
            .parse::<StateCode>()
            .map_err(DirectoryError::Config)?,
        ..DirectoryConfig::default()
    };
    let dataset = cli
        .dataset
        .clone()
        .unwrap_or_else(icn_navigator::default_dataset_path);

    if cli.mcp {
        run_mcp_server(config, dataset, cli.dataset.is_some()).await
    } else if let Some(cmd) = cli.command {
        let output = Output {
            json: cli.json,
            color: !cli.no_color && io::stdout().is_terminal(),
        };
        run_cli(config, dataset, cmd, output)
    } else {
        eprintln!("Use --mcp to start MCP server, or a subcommand for CLI mode.");
        eprintln!("Run with --help for more information.");
        std::process::exit(1);
    }
}

async fn run_mcp_server(
    config: DirectoryConfig,
    dataset: PathBuf,
    explicit: bool,
) -> anyhow::Result<()> {
    // An explicit dataset must load; the default one is optional
    let server = if explicit || dataset.is_file() {
        tracing::info!("Starting MCP server with dataset {}", dataset.display());
        NavigatorServer::with_dataset(config, &dataset)
            .with_context(|| format!("failed to load {}", dataset.display()))?
    } else {
        tracing::info!("Starting MCP server without a dataset");
        NavigatorServer::new(config)
    };

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
    color: bool,
}

impl Output {
    fn emit<T: Serialize>(
        self,
        value: &T,
        human: impl FnOnce(&mut io::StdoutLock<'_>, &T, bool) -> io::Result<()>,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
        } else {
            human(&mut out, value, self.color)?;
        }
        Ok(())
    }
}

fn run_cli(
    config: DirectoryConfig,
    dataset: PathBuf,
    cmd: Commands,
    output: Output,
) -> anyhow::Result<()> {
    let load = || -> anyhow::Result<DirectoryIndex> {
        let mut index = DirectoryIndex::with_config(config);
        index
            .load_from_path(&dataset)
            .with_context(|| format!("failed to load {}", dataset.display()))?;
        Ok(index)
    };

    match cmd {
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "icn-navigator", &mut io::stdout());
        }

        Commands::Search { query, limit } => {
            let index = load()?;
            let result = tools::execute_search(&index, tools::SearchInput { query, limit })?;
            output.emit(&result, |w, r, c| icn_navigator::fmt::fmt_search(w, r, c))?;
        }

        Commands::State { code, limit } => {
            let index = load()?;
            let state: StateCode = code.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let input = tools::FilterInput {
                state: Some(state.as_str().to_string()),
                limit,
                ..tools::FilterInput::default()
            };
            let result = tools::execute_filter(&index, input)?;
            output.emit(&result, |w, r, c| icn_navigator::fmt::fmt_filter(w, r, c))?;
        }

        Commands::Type {
            company_type,
            limit,
        } => {
            let index = load()?;
            let input = tools::FilterInput {
                company_type: Some(company_type),
                limit,
                ..tools::FilterInput::default()
            };
            let result = tools::execute_filter(&index, input)?;
            output.emit(&result, |w, r, c| icn_navigator::fmt::fmt_filter(w, r, c))?;
        }

        Commands::Sector { name, limit } => {
            let index = load()?;
            let input = tools::FilterInput {
                sector: Some(name),
                limit,
                ..tools::FilterInput::default()
            };
            let result = tools::execute_filter(&index, input)?;
            output.emit(&result, |w, r, c| icn_navigator::fmt::fmt_filter(w, r, c))?;
        }

        Commands::Company { id } => {
            let index = load()?;
            let result = tools::execute_company(&index, tools::CompanyInput { id })?;
            output.emit(&result, |w, r, c| {
                icn_navigator::fmt::fmt_company(w, &r.company, c)
            })?;
        }

        Commands::Facets => {
            let index = load()?;
            let result = tools::execute_facets(&index, tools::FacetsInput::default())?;
            output.emit(&result, |w, r, c| icn_navigator::fmt::fmt_facets(w, r, c))?;
        }

        Commands::Stats { detailed } => {
            let index = load()?;
            let result = tools::execute_stats(&index, tools::StatsInput { detailed })?;
            output.emit(&result, |w, r, c| icn_navigator::fmt::fmt_stats(w, r, c))?;
        }
    }

    Ok(())
}
