//! Sextant CLI - lifecycle readiness and dependency analysis for work tracking.

use clap::Parser;
use sextant::analysis::AnalyzerConfig;
use sextant::cli::{Cli, Commands};
use sextant::commands::{self, Output};
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_tracing();

    if let Err(e) = run_command(cli.command, human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        }
        process::exit(1);
    }
}

/// Install a stderr tracing subscriber; `SX_LOG` controls the filter.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(command: Commands, human: bool) -> sextant::Result<()> {
    match command {
        Commands::Readiness { input } => {
            output(&commands::readiness(input.as_deref())?, human);
        }
        Commands::Analyze {
            input,
            default_duration,
            max_bottlenecks,
        } => {
            let config = AnalyzerConfig {
                default_duration_hours: default_duration,
                max_bottlenecks,
            };
            output(&commands::analyze(input.as_deref(), &config)?, human);
        }
        Commands::Review {
            input,
            item,
            target_phase,
            action,
            role,
        } => {
            output(
                &commands::review(input.as_deref(), &item, &target_phase, &action, &role)?,
                human,
            );
        }
        Commands::Transition {
            item_type,
            from,
            to,
        } => {
            output(&commands::transition(&item_type, &from, &to)?, human);
        }
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
