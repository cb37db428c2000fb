mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    action::ActionSubcommand, config::ConfigSubcommand, subtask::SubtaskSubcommand,
    task::TaskSubcommand, view::ViewSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "campaign",
    about = "Annual marketing plan: actions, tasks, calendar, timeline and PDF export",
    version,
    propagate_version = true
)]
struct Cli {
    /// Plan root (default: auto-detect from .campaign/)
    #[arg(long, global = true, env = "CAMPAIGN_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a marketing plan in the current directory
    Init,

    /// Manage marketing actions
    Action {
        #[command(subcommand)]
        subcommand: ActionSubcommand,
    },

    /// Manage the tasks of an action
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Manage the subtasks of a task
    Subtask {
        #[command(subcommand)]
        subcommand: SubtaskSubcommand,
    },

    /// Show the plan as a calendar, timeline or table
    View {
        #[command(subcommand)]
        subcommand: ViewSubcommand,
    },

    /// Totals: action count, budget, expected revenue, average ROAS
    Summary {
        /// Only actions overlapping this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Export the plan as a PDF report
    Export {
        /// Output file (default: report.file_name from config, in the plan root)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Open the report after writing it
        #[arg(long)]
        open: bool,
    },

    /// Import actions from a JSON array (e.g. a browser storage export)
    Import {
        file: PathBuf,

        /// Replace the whole plan instead of merging
        #[arg(long)]
        replace: bool,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Action { subcommand } => cmd::action::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Subtask { subcommand } => cmd::subtask::run(&root, subcommand, cli.json),
        Commands::View { subcommand } => cmd::view::run(&root, subcommand, cli.json),
        Commands::Summary { month } => cmd::summary::run(&root, month.as_deref(), cli.json),
        Commands::Export { output, open } => {
            cmd::export::run(&root, output.as_deref(), open, cli.json)
        }
        Commands::Import { file, replace } => cmd::import::run(&root, &file, replace, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
