use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mission_engine::{EngineConfig, ExecutionResult, Orchestrator, Verdict, scenarios};

#[derive(Parser, Debug)]
#[command(name = "mission-engine", version, about = "Compile, run and grade Java missions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grade a student file against a registered mission step.
    Mission {
        #[arg(long)]
        mission: String,
        #[arg(long)]
        step: u32,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print the raw execution result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compile and run a standalone program through its main method.
    Run {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// List registered mission steps.
    Scenarios,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    set_panic_hook();

    let cli = Cli::parse();
    let config = EngineConfig::from_env();
    tracing::debug!(?config, "engine configuration");
    let orchestrator = Orchestrator::from_config(&config);

    match cli.command {
        Command::Mission {
            mission,
            step,
            file,
            timeout_ms,
            json,
        } => {
            let Some(scenario) = scenarios::lookup(&mission, step) else {
                return Err(format!("no scenario registered for {} step {}", mission, step).into());
            };
            let source = tokio::fs::read_to_string(&file).await?;
            let result = orchestrator
                .execute_mission_code(
                    &source,
                    scenario.harness_source,
                    scenario.target_class_hint,
                    timeout_ms,
                )
                .await;
            report(&result, json)
        }
        Command::Run {
            file,
            timeout_ms,
            json,
        } => {
            let source = tokio::fs::read_to_string(&file).await?;
            let result = orchestrator.execute_code(&source, timeout_ms).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", Verdict::from_result(&result).render());
            }
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Scenarios => {
            for (key, scenario) in scenarios::all() {
                println!(
                    "{}\t{}\t{}",
                    key.mission_id, key.step_id, scenario.target_class_hint
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(result: &ExecutionResult, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let verdict = Verdict::from_result(result);
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", verdict.render());
    }

    Ok(if verdict.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
