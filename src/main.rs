use anyhow::Result;
use bit_compare::OutputFormat;
use bit_compare::areas::repository::Repository;
use bit_compare::artifacts::compare::enricher::EnrichOptions;
use bit_compare::artifacts::compare::error::CompareError;
use bit_compare::artifacts::identity::account::StaticAccountDirectory;
use bit_compare::artifacts::signature::allowed_signers::AllowedSigners;
use bit_compare::commands::porcelain::compare::CompareOptions;
use bit_compare::config::CompareConfig;
use bit_compare::logging;
use clap::Parser;
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

/// Exit status for revisions that resolve to nothing
const NOT_FOUND_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "bit-compare",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Compare two revisions of a git repository",
    long_about = "Resolves a `base...head` (merge-base relative) or `base..head` (literal) \
    expression, lists the commits reachable from head but not from base, and optionally \
    reports diff statistics, changed files and signature status for each of them.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        index = 1,
        default_value = "",
        help = "Revisions to compare: base...head, base..head or a single head"
    )]
    basehead: String,
    #[arg(short = 'C', long, default_value = ".", help = "Path to the repository")]
    repository: String,
    #[arg(long, help = "Revision used for an omitted side (defaults to the HEAD branch)")]
    default_branch: Option<String>,
    #[arg(long, help = "Include the commit list in the output")]
    commits: bool,
    #[arg(long, help = "Count inserted and deleted lines per commit (implies --commits)")]
    stat: bool,
    #[arg(long, help = "List changed files per commit (implies --commits)")]
    files: bool,
    #[arg(long, help = "Verify commit signatures (implies --commits)")]
    verify: bool,
    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    format: OutputFormat,
    #[arg(long, help = "Commits enriched concurrently")]
    workers: Option<usize>,
    #[arg(long, help = "Configuration file (defaults to .git/compare.toml)")]
    config: Option<PathBuf>,
    #[arg(long, help = "Allowed signers file used by --verify")]
    allowed_signers: Option<PathBuf>,
    #[arg(short, long, help = "Log the comparison phases to stderr")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli).await {
        if let Some(compare_err) = err.downcast_ref::<CompareError>()
            && compare_err.is_not_found()
        {
            eprintln!("fatal: {compare_err}");
            std::process::exit(NOT_FOUND_EXIT_CODE);
        }

        return Err(err);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let repository = Repository::new(&cli.repository, Box::new(std::io::stdout()))?;
    let config = CompareConfig::load(cli.config.as_deref(), repository.git_path())?;

    let signers_path = cli
        .allowed_signers
        .clone()
        .or_else(|| config.allowed_signers_path(repository.path()));
    let repository = match signers_path {
        Some(path) => repository.with_allowed_signers(AllowedSigners::load(&path)?),
        None => repository,
    };

    let directory = Arc::new(StaticAccountDirectory::new(config.accounts.clone()));
    let opts = CompareOptions {
        basehead: cli.basehead,
        default_branch: cli.default_branch.or(config.default_branch.clone()),
        include_commits: cli.commits || cli.stat || cli.files || cli.verify,
        enrich: EnrichOptions {
            compute_stats: cli.stat,
            compute_files: cli.files,
            verify_signature: cli.verify,
        },
        workers: cli.workers.unwrap_or_else(|| config.workers()),
        format: cli.format,
    };

    repository.compare(&opts, directory).await
}
