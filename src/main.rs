use std::process;

use clap::Parser;
use colored::Colorize;
use khist::{cli::Args, config::Config, run};

fn main() {
    let args = Args::parse();

    #[cfg(feature = "tracing")]
    init_tracing();

    let config = Config::try_from(args).unwrap_or_else(|e| {
        eprintln!(
            "{}\n {}",
            "Problem parsing arguments:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    });

    if !config.quiet {
        eprintln!("{}: {}", "k-length".bold(), config.k.to_string().blue().bold());
        eprintln!(
            "{}: {}",
            "input".bold(),
            config.input.to_string().underline().bold().blue()
        );
        eprintln!();
    }

    match run::run(&config) {
        Ok(summary) if !config.quiet => {
            eprintln!(
                "{}: {} sequences; {} distinct k-mers",
                "processed".bold(),
                summary.sequences.to_string().blue().bold(),
                summary.distinct_kmers.to_string().blue().bold()
            );
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`).
#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
