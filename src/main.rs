use std::path::PathBuf;

use backlog_core::views::{build_tree, render_kanban, render_tree};
use backlog_core::BacklogService;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backlog_view::{api, config::ServerConfig};

#[derive(Parser)]
#[command(name = "backlog-view")]
#[command(about = "Read-through cache and JSON API over a filesystem backlog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Backlog root (directory holding products/)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind
        #[arg(long)]
        host: Option<String>,
    },
    /// List products under the backlog root
    Products {
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Print a product's work items as a tree
    Tree {
        product: String,

        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Print a product's work items grouped by state
    Kanban {
        product: String,

        #[arg(short, long)]
        root: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for print commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
        "backlog_view=debug,backlog_core=debug,tower_http=debug".into()
    }));

    if use_stderr {
        // Print commands keep stdout for their output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let service = BacklogService::new(&config.workspace);
    let info = service.workspace_info();
    if !info.valid {
        tracing::warn!("No products directory under {}", info.workspace_root);
    }

    let app = api::create_router(service);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("backlog-view listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn service_for(root: Option<PathBuf>) -> anyhow::Result<BacklogService> {
    let config = ServerConfig::from_env()?.with_overrides(root, None, None);
    Ok(BacklogService::new(config.workspace))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { root, port, host }) => {
            let config = ServerConfig::from_env()?.with_overrides(root, host, port);
            serve(config).await?;
        }
        Some(Commands::Products { root }) => {
            for product in service_for(root)?.list_products() {
                println!("{product}");
            }
        }
        Some(Commands::Tree { product, root }) => {
            let service = service_for(root)?;
            let snapshot = service.snapshot(&product, false)?;
            let tree = build_tree(&snapshot);
            print!("{}", render_tree(&tree));
            print_warnings(&tree.warnings);
            eprintln!("loaded {}", snapshot.loaded_at().format("%Y-%m-%d %H:%M:%S UTC"));
        }
        Some(Commands::Kanban { product, root }) => {
            let board = service_for(root)?.build_kanban(&product, false)?;
            print!("{}", render_kanban(&board));
            print_warnings(&board.warnings);
        }
        None => {
            serve(ServerConfig::from_env()?).await?;
        }
    }

    Ok(())
}

fn print_warnings(warnings: &[backlog_core::models::Warning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}
