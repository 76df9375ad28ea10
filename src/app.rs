//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads `.env` settings and installs logging
//! - dispatches to the convert/batch/sample handlers
//! - writes optional exports

use std::io::Write;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Cli, Command, ConvertArgs, SampleArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::BatchConfig;
use crate::engine::Engine;
use crate::error::AppError;
use crate::io::export::{JsonReport, write_json_report, write_results_csv, write_sample, write_sample_csv};
use crate::report::{format_result, format_summary};

pub mod config;
pub mod pipeline;

use config::{Settings, check_threads};

/// Entry point for the `cfx` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    init_logging(&settings.log_filter);

    match cli.command {
        Command::Convert(args) => handle_convert(args),
        Command::Batch(args) => handle_batch(args, &settings),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Install the stderr subscriber. Safe to call more than once.
fn init_logging(filter: &str) {
    let (env_filter, bad_filter) = match EnvFilter::try_new(filter) {
        Ok(f) => (f, false),
        Err(_) => (EnvFilter::new("info"), true),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
    if bad_filter {
        warn!(filter, "invalid {} directive, falling back to `info`", config::LOG_VAR);
    }
}

fn handle_convert(args: ConvertArgs) -> Result<(), AppError> {
    let engine = Engine::new();
    let result = match args.kind {
        Some(kind) => engine.process_with_kind(args.x.as_str(), args.y.as_str(), kind),
        None => engine.process(args.x.as_str(), args.y.as_str()),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| AppError::internal(format!("Failed to encode result: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", format_result(&result));
    }
    Ok(())
}

fn handle_batch(args: BatchArgs, settings: &Settings) -> Result<(), AppError> {
    let config = batch_config_from_args(&args, settings)?;
    let run = pipeline::run_batch(&config)?;

    println!("{}", format_summary(&run.summary));

    if let Some(path) = &config.output {
        write_results_csv(path, &run.records)?;
        info!(path = %path.display(), "wrote results CSV");
    }
    if let Some(path) = &config.json_output {
        let report = JsonReport {
            generated_at: Utc::now(),
            input: config.input.display().to_string(),
            summary: &run.summary,
            row_errors: &run.ingest.row_errors,
            records: &run.records,
        };
        write_json_report(path, &report)?;
        info!(path = %path.display(), "wrote JSON report");
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let records = generate_sample(&SampleConfig {
        count: args.count,
        seed: args.seed,
    })?;

    match &args.output {
        Some(path) => {
            write_sample_csv(path, &records)?;
            info!(path = %path.display(), count = records.len(), "wrote sample CSV");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_sample(&mut lock, &records)?;
            lock.flush()
                .map_err(|e| AppError::input(format!("Failed to write to stdout: {e}")))?;
        }
    }
    Ok(())
}

/// Resolve CLI flags plus `.env` defaults into the pipeline's config.
pub fn batch_config_from_args(args: &BatchArgs, settings: &Settings) -> Result<BatchConfig, AppError> {
    Ok(BatchConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        json_output: args.json.clone(),
        id_col: args.id_col.clone(),
        x_col: args.x_col.clone(),
        y_col: args.y_col.clone(),
        threads: check_threads(args.threads)?.or(settings.threads),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(threads: Option<usize>) -> BatchArgs {
        BatchArgs {
            input: "in.csv".into(),
            output: None,
            json: Some("out.json".into()),
            x_col: "Este".to_string(),
            y_col: "Norte".to_string(),
            id_col: Some("folio".to_string()),
            threads,
        }
    }

    fn settings(threads: Option<usize>) -> Settings {
        Settings {
            log_filter: "info".to_string(),
            threads,
        }
    }

    #[test]
    fn cli_threads_override_env() {
        let c = batch_config_from_args(&args(Some(2)), &settings(Some(8))).unwrap();
        assert_eq!(c.threads, Some(2));
        let c = batch_config_from_args(&args(None), &settings(Some(8))).unwrap();
        assert_eq!(c.threads, Some(8));
        assert_eq!(c.x_col, "Este");
        assert_eq!(c.json_output.as_deref(), Some(std::path::Path::new("out.json")));
    }

    #[test]
    fn zero_threads_rejected() {
        assert!(batch_config_from_args(&args(Some(0)), &settings(None)).is_err());
    }
}
