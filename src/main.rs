use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use warden_core::WardenConfig;
use warden_review::agent::LlmReviewAgent;
use warden_review::github::GitHubClient;
use warden_review::llm::LlmClient;
use warden_review::pipeline::ReviewPipeline;
use warden_review::slack::SlackClient;

const DEFAULT_CONFIG_PATH: &str = "warden.toml";

const CONFIG_TEMPLATE: &str = r##"# Warden configuration
# Credentials can also come from the environment: GITHUB_TOKEN, SLACK_TOKEN,
# SLACK_CHANNEL, LLM_API_KEY (or GROQ_API_KEY).

[github]
# token = "ghp_..."
# api_base = "https://api.github.com"

[slack]
# token = "xoxb-..."
# channel = "#code-reviews"

[llm]
# provider = "groq"
# model = "llama-3.3-70b-versatile"
# api_key = "gsk_..."
# base_url = "https://api.groq.com/openai"
# timeout_secs = 120

[server]
# bind_addr = "0.0.0.0:8000"
# history_capacity = 50
"##;

#[derive(Parser)]
#[command(
    name = "warden",
    version,
    about = "LLM-backed pull request review bot",
    long_about = "Warden reviews GitHub pull requests with an LLM, posts an\n\
                   acknowledgment comment on the PR, and relays the review to Slack.\n\n\
                   Examples:\n  \
                     warden serve                                  Run the HTTP service\n  \
                     warden review https://github.com/o/r 7        Review one PR from the CLI\n  \
                     warden init                                   Create a default warden.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (default: warden.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP review service
    #[command(long_about = "Run the HTTP review service.\n\n\
        Serves the dashboard on / and the JSON API under /api.\n\
        Requires GitHub, Slack, and LLM credentials.")]
    Serve {
        /// Address to bind (overrides [server].bind_addr)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Review a single pull request and print the result
    #[command(long_about = "Review a single pull request and print the result.\n\n\
        Runs the same pipeline as the service: existence check, LLM review,\n\
        PR acknowledgment comment, and Slack notification.\n\n\
        Example:\n  warden review https://github.com/acme/widgets 7")]
    Review {
        /// Link to the repository
        repo_link: String,
        /// Pull request number
        pr_number: u64,
    },
    /// Create a default warden.toml configuration file
    #[command(long_about = "Create a default warden.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if warden.toml already exists.")]
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            warden_server::serve(&config).await.into_diagnostic()
        }
        Command::Review {
            repo_link,
            pr_number,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_review(&config, &repo_link, pr_number).await
        }
        Command::Init => init_config(),
    }
}

/// Load configuration from the given path, or `warden.toml` when present,
/// then overlay credentials from the environment.
fn load_config(path: Option<&Path>) -> Result<WardenConfig> {
    let mut config = match path {
        Some(path) => WardenConfig::from_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                WardenConfig::from_file(default)
                    .into_diagnostic()
                    .wrap_err("failed to load warden.toml")?
            } else {
                WardenConfig::default()
            }
        }
    };
    config.apply_env();
    Ok(config)
}

async fn run_review(config: &WardenConfig, repo_link: &str, pr_number: u64) -> Result<()> {
    let github = GitHubClient::new(&config.github).into_diagnostic()?;
    let agent = LlmReviewAgent::new(
        GitHubClient::new(&config.github).into_diagnostic()?,
        LlmClient::new(&config.llm).into_diagnostic()?,
    );
    let slack = SlackClient::new(&config.slack).into_diagnostic()?;
    let pipeline = ReviewPipeline::new(github, agent, slack);

    let outcome = pipeline
        .run(repo_link, pr_number)
        .await
        .into_diagnostic()?;

    println!("===== PR REVIEW =====\n");
    println!("{}\n", outcome.review);
    println!("===== GITHUB COMMENT STATUS =====");
    println!(
        "{} {}",
        if outcome.github.ok { "ok:" } else { "failed:" },
        outcome.github.message
    );
    println!("===== SLACK STATUS =====");
    println!(
        "{} {}",
        if outcome.slack.ok { "ok:" } else { "failed:" },
        outcome.slack.message
    );
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        return Err(miette::miette!(
            "{DEFAULT_CONFIG_PATH} already exists; remove it first to regenerate"
        ));
    }
    std::fs::write(path, CONFIG_TEMPLATE).into_diagnostic()?;
    println!("Created {DEFAULT_CONFIG_PATH}");
    Ok(())
}
