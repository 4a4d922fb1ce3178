//! model-invoker command-line entry point
//!
//! Loads configuration, builds the invoker, and runs one subcommand.

use clap::Parser;
use model_invoker::{
    cli::{self, Cli, Command},
    config::Config,
    invoker::{ModelClient, ModelInvoker},
    metrics::Metrics,
    models::ModelId,
    telemetry,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Config { output } => {
            let template = cli::generate_config_template();
            match output {
                Some(path) => {
                    std::fs::write(&path, template)?;
                    eprintln!("Configuration template written to {}", path);
                }
                None => print!("{}", template),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Models => {
            for model in ModelId::ALL {
                println!("{:<18} {}", model.name(), model.model_id());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Invoke {
            request,
            print_metrics,
        } => {
            let config = Config::from_file(&cli.config)?;
            telemetry::init(&config.observability.log_level);

            let request = cli::read_request(&request)?;
            let metrics = Arc::new(Metrics::new()?);
            let invoker = ModelInvoker::from_config(&config)?.with_metrics(metrics.clone());

            tracing::info!(
                config = %cli.config,
                default_model = ?invoker.default_model(),
                credential_entries = config.credentials.len(),
                "Invoker ready"
            );

            let result = invoker.invoke(&request).await;

            if print_metrics {
                eprint!("{}", metrics.gather()?);
            }

            match result {
                Some(text) => {
                    println!("{}", text);
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::FAILURE),
            }
        }
    }
}
