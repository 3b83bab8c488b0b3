//! File-based front end for the conversion engine.
//!
//! ```text
//! traduki script.r script.py
//! traduki script.r script.py --max-iterations 5 --model llama-3.3-70b-versatile
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use traduki_core::{ConversionRequest, ConversionService, LogTelemetry};
use traduki_llm::{GroqAdapter, LlmAdapter, LlmConfig, LlmIntentService};

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Parser)]
#[command(name = "traduki")]
#[command(about = "Intent-based code conversion between programming languages")]
struct Cli {
    /// Source file to convert
    input: PathBuf,

    /// Destination file for the generated code
    output: PathBuf,

    /// Source language (inferred from the input extension when omitted)
    #[arg(long = "from")]
    source_language: Option<String>,

    /// Target language (inferred from the output extension when omitted)
    #[arg(long = "to")]
    target_language: Option<String>,

    /// Retry budget for the intent-extraction loop
    #[arg(long, default_value_t = 3)]
    max_iterations: u32,

    /// Model to use for all pipeline stages
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

fn language_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let language = match ext.as_str() {
        "r" => "R",
        "py" => "Python",
        "jl" => "Julia",
        "js" => "JavaScript",
        "ts" => "TypeScript",
        _ => return None,
    };
    Some(language.to_string())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let source_code = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let source_language = cli
        .source_language
        .clone()
        .or_else(|| language_from_extension(&cli.input))
        .context("could not infer the source language, pass --from")?;
    let target_language = cli
        .target_language
        .clone()
        .or_else(|| language_from_extension(&cli.output))
        .context("could not infer the target language, pass --to")?;

    let config = LlmConfig::groq(&cli.model);
    if config.api_key.is_empty() {
        bail!("GROQ_API_KEY is not set");
    }

    let capability = LlmIntentService::new(GroqAdapter::from_config(config));

    let healthy = capability
        .adapter()
        .health_check()
        .await
        .context("could not reach the Groq API")?;
    if !healthy {
        bail!("Groq API health check failed, check GROQ_API_KEY");
    }

    let service =
        ConversionService::new(Arc::new(capability)).with_telemetry(Arc::new(LogTelemetry));

    info!(
        source = %source_language,
        target = %target_language,
        input = %cli.input.display(),
        "starting conversion"
    );

    let request = ConversionRequest::new(source_code, source_language, target_language)
        .with_max_iterations(cli.max_iterations);
    let outcome = service.convert(request).await?;

    if !outcome.success {
        eprintln!(
            "conversion failed: {}",
            outcome.error_message.as_deref().unwrap_or("unknown error")
        );
        return Ok(ExitCode::FAILURE);
    }

    std::fs::write(&cli.output, &outcome.generated_code)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!(
        "converted {} -> {} in {:.1}s ({} iteration{}, {} bytes)",
        cli.input.display(),
        cli.output.display(),
        outcome.processing_time_seconds,
        outcome.iterations,
        if outcome.iterations == 1 { "" } else { "s" },
        outcome.generated_code.len(),
    );

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(
            language_from_extension(Path::new("script.r")).as_deref(),
            Some("R")
        );
        assert_eq!(
            language_from_extension(Path::new("SCRIPT.R")).as_deref(),
            Some("R")
        );
        assert_eq!(
            language_from_extension(Path::new("script.py")).as_deref(),
            Some("Python")
        );
        assert_eq!(language_from_extension(Path::new("script.txt")), None);
        assert_eq!(language_from_extension(Path::new("script")), None);
    }

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::try_parse_from(["traduki", "in.r", "out.py"]).unwrap();

        assert_eq!(cli.max_iterations, 3);
        assert_eq!(cli.model, DEFAULT_MODEL);
        assert!(cli.source_language.is_none());
    }

    #[test]
    fn test_cli_parsing_overrides() {
        let cli = Cli::try_parse_from([
            "traduki",
            "in.r",
            "out.py",
            "--from",
            "R",
            "--to",
            "Python",
            "--max-iterations",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.source_language.as_deref(), Some("R"));
        assert_eq!(cli.target_language.as_deref(), Some("Python"));
        assert_eq!(cli.max_iterations, 5);
    }

    #[test]
    fn test_cli_requires_both_paths() {
        assert!(Cli::try_parse_from(["traduki", "in.r"]).is_err());
    }
}
