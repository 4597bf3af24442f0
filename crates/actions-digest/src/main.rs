use actions_digest::cli::{self, output, report_cmd::NarrativeStyle};
use actions_digest::config::{ConfigOverrides, DigestConfig};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "actions-digest", version, about = "Workflow-run step reports for the clipboard and spreadsheets")]
struct Cli {
    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Suppress status output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log progress and list every step in summaries
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Never touch the system clipboard; print reports for manual copy
    #[arg(long, global = true)]
    no_clipboard: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the narrative run report
    Report {
        /// Saved run page (HTML or JSON dump, `-` for stdin)
        page: PathBuf,
        /// Copy HTML with a plain-text fallback
        #[arg(long, conflicts_with = "document")]
        html: bool,
        /// Copy a standalone HTML document with a plain-text fallback
        #[arg(long)]
        document: bool,
        /// Print instead of copying
        #[arg(long)]
        stdout: bool,
        /// Page URL to use when the saved page does not carry one
        #[arg(long)]
        url: Option<String>,
    },
    /// Copy one row per step as TSV (or CSV)
    Table {
        page: PathBuf,
        /// Quoted comma-separated rows instead of tabs
        #[arg(long)]
        csv: bool,
        #[arg(long)]
        stdout: bool,
        #[arg(long)]
        url: Option<String>,
    },
    /// Save the step table to github-actions-data.csv
    Export {
        page: PathBuf,
        /// Directory to save into (defaults to the downloads folder)
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Show run statistics in the terminal
    Summary {
        page: PathBuf,
        #[arg(long)]
        url: Option<String>,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Global flags reach the output helpers through the environment.
    if cli.json {
        std::env::set_var(output::ENV_JSON, "1");
    }
    if cli.quiet {
        std::env::set_var(output::ENV_QUIET, "1");
    }
    if cli.verbose {
        std::env::set_var(output::ENV_VERBOSE, "1");
    }
    if cli.no_color {
        std::env::set_var(output::ENV_NO_COLOR, "1");
    }

    init_tracing(cli.verbose, cli.json);

    if let Err(err) = run(cli).await {
        let s = output::Styled::new();
        eprintln!("  {} {err:#}", s.fail_sym());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose {
        "actions_digest=info"
    } else {
        "actions_digest=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let download_dir = match &cli.command {
        Commands::Export { dir, .. } => dir.clone(),
        _ => None,
    };
    let config = DigestConfig::resolve(ConfigOverrides {
        download_dir,
        no_clipboard: cli.no_clipboard,
    });
    tracing::debug!(?config, "resolved configuration");
    let sink = config.sink();
    tracing::debug!(dir = %sink.download_dir().display(), "download directory");

    match cli.command {
        Commands::Report {
            page,
            html,
            document,
            stdout,
            url,
        } => {
            let style = if document {
                NarrativeStyle::Document
            } else if html {
                NarrativeStyle::Html
            } else {
                NarrativeStyle::Text
            };
            cli::report_cmd::run(&page, url.as_deref(), style, stdout, &sink).await
        }
        Commands::Table {
            page,
            csv,
            stdout,
            url,
        } => cli::table_cmd::run(&page, url.as_deref(), csv, stdout, &sink).await,
        Commands::Export { page, url, .. } => {
            cli::export_cmd::run(&page, url.as_deref(), &sink).await
        }
        Commands::Summary { page, url } => cli::summary_cmd::run(&page, url.as_deref()).await,
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "actions-digest",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
