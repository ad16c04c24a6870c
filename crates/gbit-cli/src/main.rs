#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use gbit_core::config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "gbit: yearly goal tracker with an activity heatmap",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for gbit.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Goal document to read and write (overrides GBIT_DATA and config).
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Goals",
        about = "Create a goal",
        long_about = "Create a goal. The unit comes from the category's default unit table.",
        after_help = "EXAMPLES:\n    # A book goal with a chapter target\n    gbit new --title \"Rust book\" --category book --target 20\n\n    # An activity goal with no target\n    gbit new --title Meditate\n\n    # Emit machine-readable output\n    gbit new --title Save --category money --target 50000 --json"
    )]
    New(cmd::new::NewArgs),

    #[command(
        next_help_heading = "Goals",
        about = "List goals",
        long_about = "List every goal with its completion percentage and running total.",
        after_help = "EXAMPLES:\n    # List goals\n    gbit list\n\n    # Emit machine-readable output\n    gbit list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Goals",
        about = "Show one goal",
        long_about = "Show a goal's stats, cumulative progress series, and entry history.",
        after_help = "EXAMPLES:\n    # Show a goal by ID prefix\n    gbit show 3f2a\n\n    # Emit machine-readable output\n    gbit show 3f2a --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Goals",
        about = "Edit a goal",
        long_about = "Change a goal's title, category, target, or link. Entries and totals are untouched.",
        after_help = "EXAMPLES:\n    # Raise the target\n    gbit edit 3f2a --target 30\n\n    # Clear the link\n    gbit edit 3f2a --link \"\""
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        next_help_heading = "Goals",
        about = "Delete a goal",
        long_about = "Delete a goal together with all of its entries.",
        after_help = "EXAMPLES:\n    # Delete a goal\n    gbit delete 3f2a"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Progress",
        about = "Log progress on a goal",
        long_about = "Append an entry to a goal and add its value to the running total.",
        after_help = "EXAMPLES:\n    # Log two chapters today\n    gbit log 3f2a --value 2 --description \"ch 4-5\"\n\n    # Log activity on a goal without a target (value defaults to 1)\n    gbit log 9c1e --description \"20 min sit\"\n\n    # Backdate an entry\n    gbit log 3f2a --value 1 --description ch6 --date 2026-02-01"
    )]
    Log(cmd::log::LogArgs),

    #[command(
        next_help_heading = "Progress",
        about = "Remove a logged entry",
        long_about = "Remove an entry from a goal and take its value back out of the total.",
        after_help = "EXAMPLES:\n    # Remove an entry by ID prefix\n    gbit unlog 3f2a 81b0"
    )]
    Unlog(cmd::unlog::UnlogArgs),

    #[command(
        next_help_heading = "Dashboard",
        about = "Show the activity heatmap",
        long_about = "Show one year of logging activity across all goals, one cell per day.",
        after_help = "EXAMPLES:\n    # Heatmap for the configured year\n    gbit heatmap\n\n    # A different year\n    gbit heatmap --year 2025"
    )]
    Heatmap(cmd::heatmap::HeatmapArgs),

    #[command(
        next_help_heading = "Dashboard",
        about = "Show category and status charts",
        long_about = "Show average progress per category and completed vs. in-progress goals.",
        after_help = "EXAMPLES:\n    # Charts\n    gbit charts\n\n    # Emit machine-readable output\n    gbit charts --json"
    )]
    Charts(cmd::charts::ChartsArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Check stored totals against entries",
        long_about = "Report goals whose stored running total disagrees with their entries.",
        after_help = "EXAMPLES:\n    # Check the document\n    gbit verify\n\n    # Rewrite drifted totals\n    gbit verify --fix"
    )]
    Verify(cmd::verify::VerifyArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    gbit completions bash\n\n    # Generate zsh completions\n    gbit completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GBIT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "gbit=debug,info"
        } else {
            "gbit=info,warn"
        })
    });

    let format = env::var("GBIT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let effective = match config::resolve_config(cli.data.as_deref()) {
        Ok(effective) => effective,
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            render_error(
                output,
                &CliError::from_code(format!("{err:#}"), gbit_core::ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };

    let output = resolve_output_mode(
        cli.format,
        cli.json,
        effective.config.output.format.as_deref(),
    );
    debug!(?output, data = %effective.data_path.display(), "starting command");

    let ctx = cmd::Context::new(output, effective);

    match &cli.command {
        Commands::New(args) => cmd::new::run_new(args, &ctx),
        Commands::List(args) => cmd::list::run_list(args, &ctx),
        Commands::Show(args) => cmd::show::run_show(args, &ctx),
        Commands::Edit(args) => cmd::edit::run_edit(args, &ctx),
        Commands::Delete(args) => cmd::delete::run_delete(args, &ctx),
        Commands::Log(args) => cmd::log::run_log(args, &ctx),
        Commands::Unlog(args) => cmd::unlog::run_unlog(args, &ctx),
        Commands::Heatmap(args) => cmd::heatmap::run_heatmap(args, &ctx),
        Commands::Charts(args) => cmd::charts::run_charts(args, &ctx),
        Commands::Verify(args) => cmd::verify::run_verify(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["gbit", "list", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["gbit", "--format", "text", "charts"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn data_flag_parses_anywhere() {
        let cli = Cli::parse_from(["gbit", "heatmap", "--data", "/tmp/goals.json"]);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/goals.json")));
    }

    #[test]
    fn verbose_flag_parsed() {
        let cli = Cli::parse_from(["gbit", "-v", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn every_subcommand_parses() {
        let cases: [&[&str]; 11] = [
            &["gbit", "new", "--title", "Read"],
            &["gbit", "list"],
            &["gbit", "show", "abc"],
            &["gbit", "edit", "abc", "--target", "5"],
            &["gbit", "delete", "abc"],
            &["gbit", "log", "abc", "--description", "x"],
            &["gbit", "unlog", "abc", "def"],
            &["gbit", "heatmap", "--year", "2026"],
            &["gbit", "charts"],
            &["gbit", "verify", "--fix"],
            &["gbit", "completions", "bash"],
        ];
        for args in cases {
            assert!(Cli::try_parse_from(args).is_ok(), "{args:?}");
        }
    }
}
