mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::message;
use crate::config::{AppConfig, CliOverrides, StoredConfig};
use crate::context::AppContext;
use crate::domain::change::categorize;
use crate::domain::prompt::PromptTemplate;
use crate::error::{AppError, AppResult};
use crate::infra::git::GitCli;
use crate::infra::llm::OpenAiClient;

#[derive(Parser)]
#[command(
    name = "grit",
    author,
    version,
    about = "AI-assisted Git commit message generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    message: MessageArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored defaults.
    Config(ConfigArgs),
}

#[derive(Args)]
struct MessageArgs {
    /// Git repository location.
    #[arg(long, default_value = ".")]
    repo: PathBuf,
    /// Create the commit instead of only printing the message.
    #[arg(long)]
    commit: bool,
    /// Include unstaged changes, not just staged ones.
    #[arg(long)]
    all: bool,
    /// Language model to use.
    #[arg(long)]
    model: Option<String>,
    /// Custom prompt template file containing {diff} and {files} placeholders.
    #[arg(long)]
    prompt: Option<PathBuf>,
    /// Disable the file-categorization summary.
    #[arg(long)]
    no_categorize: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config(args)) => config_cmd::run(args.command),
        None => run_message(cli.message).await,
    }
}

async fn run_message(args: MessageArgs) -> AppResult<()> {
    dotenvy::dotenv().ok();

    let stored = StoredConfig::load()?;
    let config = AppConfig::resolve(
        CliOverrides {
            repo: args.repo,
            commit: args.commit,
            all: args.all,
            model: args.model,
            prompt: args.prompt,
            no_categorize: args.no_categorize,
        },
        &stored,
    )?;

    let template = match &config.prompt_file {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|err| {
                AppError::Template(format!(
                    "failed to read prompt file '{}': {err}",
                    path.display()
                ))
            })?;
            PromptTemplate::from_text(text)?
        }
        None => PromptTemplate::built_in(config.language),
    };

    let git = Arc::new(GitCli::new(config.repo_path.clone()));
    let language_model = Arc::new(OpenAiClient::new(
        config.api_key.clone(),
        config.api_base.clone(),
        config.model.clone(),
    ));

    let context = AppContext::new(config, git, language_model);

    println!("Generating commit message with {}...", context.config.model);
    let outcome = message::run(&context, &template).await?;

    if context.config.categorize {
        println!("\nChanged files:");
        for (category, paths) in categorize(&outcome.changes.files) {
            println!("  {}:", category.as_str());
            for path in paths {
                println!("    {path}");
            }
        }
    }

    let separator = "-".repeat(50);
    println!("\nGenerated commit message:");
    println!("{separator}");
    println!("{}", outcome.message);
    println!("{separator}");

    if outcome.committed {
        println!("\nCommitted with the message above.");
    } else {
        println!("\nTo commit, run:");
        println!("git commit -m \"{}\"", outcome.message);
    }

    Ok(())
}
