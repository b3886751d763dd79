//! FormExpo command line.
//!
//! Waits for the browser extension to connect, runs one action against
//! the active tab, and prints the outcome.

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use formexpo::session::DEFAULT_PORT;
use formexpo::{ExportFormat, Exporter, Importer, Result, Session, display, workflow};

// ============================================================================
// Cli
// ============================================================================

/// Scan, export and refill HTML forms in the active browser tab.
#[derive(Parser)]
#[command(name = "formexpo")]
#[command(version)]
struct Cli {
    /// Port the extension connects to
    #[arg(long, global = true, env = "FORMEXPO_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to listen on
    #[arg(long, global = true, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Seconds to wait for the extension to connect
    #[arg(long, global = true, default_value_t = 30)]
    connect_timeout: u64,

    /// Seconds to wait for each command
    #[arg(long, global = true, default_value_t = 30)]
    command_timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the forms on the active tab
    Scan,

    /// Save one form as JSON or XML
    Export {
        /// Form position as listed by `scan`
        index: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output directory (default: the user's download directory)
        #[arg(long, env = "FORMEXPO_DOWNLOAD_DIR")]
        out: Option<PathBuf>,
    },

    /// Fill one form from a `.json` or `.xml` export
    Import {
        /// Form position as listed by `scan`
        index: usize,

        /// Export file to apply
        file: Option<PathBuf>,
    },

    /// Show how an export would be applied, without writing to the page
    Preview {
        /// Form position as listed by `scan`
        index: usize,

        /// Export file to check
        file: Option<PathBuf>,
    },
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_user_facing() {
                println!("[ALERT] {e}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes tracing; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "formexpo=debug"
    } else {
        "formexpo=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    check_file_selected(&cli.command).await?;

    let mut builder = Session::builder()
        .ip(cli.bind)
        .port(cli.port)
        .connect_timeout(Duration::from_secs(cli.connect_timeout))
        .command_timeout(Duration::from_secs(cli.command_timeout));
    if let Commands::Export { out: Some(dir), .. } = &cli.command {
        builder = builder.download_dir(dir);
    }
    let config = builder.build()?;

    let pending = Session::listen(config).await?;
    println!("Waiting for the extension on {}", pending.ws_url());
    let session = pending.accept().await?;

    let result = run_command(&session, cli.command).await;
    session.close();
    result
}

/// Fails an import or preview without a file before waiting on the extension.
async fn check_file_selected(command: &Commands) -> Result<()> {
    match command {
        Commands::Import { index, file: None } | Commands::Preview { index, file: None } => {
            Importer::default().import(None, *index).await.map(drop)
        }
        _ => Ok(()),
    }
}

async fn run_command(session: &Session, command: Commands) -> Result<()> {
    let diagnostics = session.diagnostics();

    match command {
        Commands::Scan => {
            let result = workflow::scan_page(session).await;
            if let Err(e) = &result {
                warn!(error = %e, "Scan failed");
            }
            println!("{}", display::render_scan(&result));
        }

        Commands::Export { index, format, .. } => {
            let exporter = Exporter::new(session.download_dir());
            let outcome = workflow::export_form(session, &exporter, index, format).await?;
            println!("{}", display::render_export(&outcome.record, &outcome.path));
        }

        Commands::Import { index, file } => {
            debug!(accept = ExportFormat::ACCEPT, "Import requested");
            let importer = Importer::new(diagnostics.clone());
            let outcome =
                workflow::import_into_page(session, &importer, &diagnostics, file.as_deref(), index)
                    .await?;
            println!(
                "{}",
                display::render_fill_report(index, &outcome.plan, &outcome.report)
            );
        }

        Commands::Preview { index, file } => {
            let importer = Importer::new(diagnostics);
            let outcome =
                workflow::preview_import(session, &importer, file.as_deref(), index).await?;
            println!(
                "{}",
                display::render_preview(&outcome.plan, &outcome.resolutions)
            );
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
