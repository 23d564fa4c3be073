//! specprobe CLI - smoke-test every endpoint declared in an OpenAPI document

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use specprobe_core::plan::validate_config;
use specprobe_core::verdict::{EXIT_PASS, EXIT_TOOL_ERROR};
use specprobe_core::{Config, RunPlan, VerdictStatus};
use specprobe_runner::{ContractRunner, SpecDocument};

#[derive(Parser)]
#[command(name = "specprobe")]
#[command(about = "Smoke-test every endpoint declared in an OpenAPI document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose logging (debug level, overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one request per declared endpoint and check the responses
    Run {
        /// Config file (default: .specprobe.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Spec document (overrides config)
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Write the JSON report to this path (overrides config)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write .http reproductions of non-passing endpoints (overrides config)
        #[arg(long)]
        reproductions: Option<PathBuf>,

        /// Show the requests that would be sent without sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the report format
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_TOOL_ERROR as u8)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Config file plus command-line overrides.
fn resolve_config(
    config: Option<&Path>,
    spec: Option<PathBuf>,
    report: Option<PathBuf>,
    reproductions: Option<PathBuf>,
) -> Result<Config> {
    let mut cfg = match config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(spec) = spec {
        cfg.spec = spec;
    }
    if report.is_some() {
        cfg.report = report;
    }
    if reproductions.is_some() {
        cfg.reproductions = reproductions;
    }
    Ok(cfg)
}

/// One-line summary of failed or questionable validations, if any.
fn dry_run_notice(plan: &RunPlan) -> Option<&'static str> {
    if plan.has_errors() {
        Some("Error: validation failed, the run would not start")
    } else if plan.has_warnings() {
        Some("Warning: validation reported warnings, see above")
    } else {
        None
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            config,
            spec,
            report,
            reproductions,
            dry_run,
        } => {
            let cfg = resolve_config(config.as_deref(), spec, report, reproductions)?;
            let doc = SpecDocument::load(&cfg.spec)?;

            // Dry run: show plan and exit
            if dry_run {
                let mut plan = ContractRunner::plan(&doc)?;
                plan.validations.extend(validate_config(&cfg));
                match cli.output {
                    OutputFormat::Terminal => println!("{}", plan.to_terminal()),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                    OutputFormat::Silent => {}
                }
                if let Some(notice) = dry_run_notice(&plan) {
                    if cli.output != OutputFormat::Silent {
                        eprintln!("{notice}");
                    }
                }
                return Ok(if plan.has_errors() {
                    EXIT_TOOL_ERROR
                } else {
                    EXIT_PASS
                });
            }

            if cli.output != OutputFormat::Silent {
                eprintln!("Spec: {}", cfg.spec.display());
            }

            let runner = ContractRunner::new()?;
            let run_report = runner.run(&doc)?;
            let verdict = run_report.verdict();

            match cli.output {
                OutputFormat::Terminal => {
                    println!("{}", report::to_terminal(&run_report, &verdict));
                }
                OutputFormat::Json => {
                    let json = report::to_json(&run_report, &verdict);
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Silent => {}
            }

            if let Some(path) = &cfg.report {
                report::save_report(path, &run_report, &verdict)
                    .with_context(|| format!("failed to write report {}", path.display()))?;
                if cli.output != OutputFormat::Silent {
                    eprintln!("Report saved: {}", path.display());
                }
            }

            if let Some(path) = &cfg.reproductions {
                match report::save_reproductions(path, &run_report) {
                    Ok(true) if cli.output != OutputFormat::Silent => {
                        eprintln!("Reproductions: {}", path.display());
                    }
                    Ok(_) => {}
                    Err(e) => eprintln!("Warning: failed to write .http file: {e}"),
                }
            }

            if verdict.status == VerdictStatus::Fail {
                tracing::debug!(exit_code = verdict.exit_code, "run did not pass");
            }
            Ok(verdict.exit_code)
        }

        Commands::Init => {
            let config_path = ".specprobe.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - spec: path to your OpenAPI spec (first server is the target)");
            println!("  - report: where to write the JSON report");
            println!("  - reproductions: where to write .http files for failures");
            Ok(0)
        }

        Commands::Schema => {
            let schema = specprobe_core::report::generate_schema();
            println!("{schema}");
            Ok(0)
        }
    }
}
