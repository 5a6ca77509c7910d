use anyhow::Result;
use clap::{Parser, Subcommand};
use commit_pulse::ingest::PulseClient;
use commit_pulse::types::PollOutcome;

#[derive(Parser)]
#[command(name = "commit-pulse", version, about = "Ingest and summarize GitHub commit history")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a project and run its first ingestion cycle
    Add {
        /// Project display name
        name: String,
        /// Repository URL, e.g. https://github.com/owner/repo
        github_url: String,
        /// Access token overriding the global credential for this project
        #[arg(long, env = "COMMIT_PULSE_PROJECT_TOKEN")]
        github_token: Option<String>,
    },
    /// Run one ingestion cycle for a project
    Poll {
        /// Project id as printed by `add`
        project_id: String,
    },
    /// Show recorded commits for a project
    Log {
        /// Project id as printed by `add`
        project_id: String,
        /// Run an ingestion cycle before printing
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = PulseClient::new()?;

    match cli.command {
        Command::Add {
            name,
            github_url,
            github_token,
        } => {
            let project = client.create_project(&name, &github_url, github_token).await?;
            println!("registered project '{}' with id {}", project.name, project.id);
        }
        Command::Poll { project_id } => {
            let outcome = client.poll_commits(&project_id).await?;
            print_outcome(&outcome);
        }
        Command::Log { project_id, refresh } => {
            if refresh {
                let outcome = client.poll_commits(&project_id).await?;
                print_outcome(&outcome);
            }
            let commits = client.project_commits(&project_id).await?;
            if commits.is_empty() {
                println!("no commits recorded");
            }
            for commit in commits {
                let short = &commit.commit_hash[..commit.commit_hash.len().min(12)];
                let subject = commit.commit_message.lines().next().unwrap_or("");
                println!("{}  {}  {}", short, commit.commit_date, subject);
                if !commit.summary.is_empty() {
                    for line in commit.summary.lines() {
                        println!("    {line}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &PollOutcome) {
    match outcome {
        PollOutcome::NotConfigured => println!("project has no linked repository"),
        PollOutcome::UpToDate => println!("no new commits"),
        PollOutcome::Ingested(rows) => println!("ingested {} commits", rows.len()),
    }
}
