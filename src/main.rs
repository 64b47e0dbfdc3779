use std::path::PathBuf;

use anyhow::Result;
use changeflow::App;
use changeflow::Config;
use changeflow::clients::runner::RealRunner;
use changeflow::commands::run::RunOptions;
use changeflow::config::DEFAULT_CONFIG_FILE;
use changeflow::prompt::TerminalPrompt;
use changeflow::repository::RepositoryHandle;
use changeflow::workflow::DEFAULT_BASE_BRANCH;
use changeflow::workflow::RunOutcome;
use changeflow::workflow::WorkflowMode;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "changeflow")]
#[command(about = "Branch, stage, commit and push database changes for a story", long_about = None)]
pub struct Cli {
    /// Preferences file
    #[arg(long, global = true, env = "CHANGEFLOW_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set username and git identity
    Init,
    /// Clone a repository into a new folder named after it
    Clone {
        /// Repository URL (asked for when omitted)
        url: Option<String>,
        /// Folder to clone into (asked for when omitted)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },
    /// List the repositories inside a folder and pick one
    Select {
        /// Folder to scan (asked for when omitted)
        folder: Option<PathBuf>,
    },
    /// Create a story branch, stage files, commit and push (default)
    Run(RunArgs),
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Repository root (clone or select one when omitted)
    #[arg(short, long)]
    pub repo: Option<PathBuf>,
    /// Story ID, used in the branch name and commit message
    #[arg(short, long)]
    pub story: Option<String>,
    /// Branch name, prefixed with the story ID unless it already contains '_'
    #[arg(short, long)]
    pub branch: Option<String>,
    /// Commit headline
    #[arg(long)]
    pub headline: Option<String>,
    /// What to stage
    #[arg(short, long, value_enum)]
    pub mode: Option<WorkflowMode>,
    /// Branch to start from
    #[arg(long, default_value = DEFAULT_BASE_BRANCH)]
    pub base: String,
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    let mut app = App::new(Config::load(&cli.config), RealRunner, TerminalPrompt);
    let stdout = &mut std::io::stdout();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs {
            base: DEFAULT_BASE_BRANCH.to_string(),
            ..Default::default()
        }));
    if !matches!(command, Commands::Init) {
        app.ensure_preferences()?;
    }

    match command {
        Commands::Init => app.cmd_init(stdout)?,
        Commands::Clone { url, dest } => {
            app.cmd_clone(url, dest, stdout).await?;
        }
        Commands::Select { folder } => {
            app.cmd_select(folder, stdout).await?;
        }
        Commands::Run(args) => {
            let repo = args.repo.map(RepositoryHandle::open).transpose()?;
            let options = RunOptions {
                story_id: args.story,
                branch_name: args.branch,
                commit_headline: args.headline,
                mode: args.mode,
                base_branch: Some(args.base),
            };
            match app.cmd_run(repo, options, stdout).await? {
                RunOutcome::Completed { branch, .. } => println!("Pushed {}", branch),
                RunOutcome::NothingToCommit => {}
                RunOutcome::Declined => println!("Nothing was committed"),
            }
        }
    }

    Ok(())
}
