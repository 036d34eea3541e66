mod cli;
mod config;
mod extract;
mod format;
mod http;
mod model;
mod patch;
mod pipeline;
mod preview;
mod publish;
mod source;
#[cfg(test)]
mod testing;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::FileConfig;
use pipeline::{Pipeline, RunOutcome};
use preview::HttpPreview;
use publish::GitPublisher;
use source::GitHubEvents;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose` when set.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("latest_commit={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the pipeline once, returning an error message on failure.
fn run(cli: &Cli) -> Result<(), String> {
    let file = FileConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let settings = cli.settings(file);

    let source = GitHubEvents::new(&settings.api_url, settings.timeout);
    let preview = HttpPreview::new(&settings.preview_endpoint, settings.timeout);
    let publisher = GitPublisher::new(settings.author.clone(), settings.push);

    let outcome = Pipeline::new(&source, &preview, &publisher)
        .run(&settings)
        .map_err(|e| e.to_string())?;

    let readme = settings.readme.display();
    match outcome {
        RunOutcome::Updated(commit) => {
            println!("Updated {readme} with {}@{}", commit.repo_name, commit.sha);
        }
        RunOutcome::Unchanged(commit) => {
            println!(
                "{readme} already shows {}@{}; nothing to commit",
                commit.repo_name, commit.sha
            );
        }
        RunOutcome::DryRun { commit, document } => {
            let region = patch::region(&document).map_err(|e| e.to_string())?;
            eprintln!(
                "Would update {readme} with {}@{}:\n{region}",
                commit.repo_name, commit.sha
            );
            print!("{document}");
        }
    }

    Ok(())
}
