use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use kernel_vulndb::config;
use kernel_vulndb::orchestrator::{check_argument_count, report_line, USAGE};
use kernel_vulndb::{AppError, LogCollector, SourceTree, Workflow};

/// Prepare a kernel tree at a vulnerability fix and build a CodeQL database for it
#[derive(Parser, Debug)]
#[command(name = "analyze", version, override_usage = USAGE)]
struct Cli {
    /// Kernel working tree (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    source_tree: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/kernel-vulndb/settings.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the plan without checking out or running anything
    #[arg(long)]
    dry_run: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// <version:1|2> <fix-revision> <vuln-id> <output-base-path> <build:1|2> <target-path> [build-option]
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let collector = LogCollector::new(level);
    if let Err(e) = collector.install() {
        eprintln!("[Main] WARNING: Failed to install logger: {}", e);
    }

    let code = match run(&cli, &collector) {
        Ok(code) => code,
        Err(err) => {
            let app_error = err.downcast_ref::<AppError>();
            match app_error {
                // No context attached: the typed message says it all
                Some(app) if app.to_string() == err.to_string() => {
                    log::error!("✗ {}", app.user_message())
                }
                _ => log::error!("✗ {:#}", err),
            }
            if app_error.is_some_and(AppError::is_usage) {
                eprintln!("Usage: {}", USAGE);
            }
            ExitCode::from(app_error.map(AppError::exit_code).unwrap_or(1))
        }
    };

    log::logger().flush();
    code
}

fn run(cli: &Cli, collector: &LogCollector) -> Result<ExitCode> {
    // A wrong argument count is reported as such, whatever the settings say
    check_argument_count(&cli.args).map_err(AppError::from)?;

    let settings = config::load_or_default(cli.config.as_deref())
        .map_err(AppError::from)
        .context("Failed to load settings")?;

    let tree = match &cli.source_tree {
        Some(dir) => SourceTree::open(dir),
        None => SourceTree::current(),
    };
    let mut tree = tree
        .map_err(AppError::from)
        .context("Failed to open kernel source tree")?;

    let mut workflow = Workflow::new(&mut tree, &settings);
    let params = workflow.validate(&cli.args)?;
    let plan = workflow.plan(&params);

    if cli.dry_run {
        for line in plan.describe() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(logs_dir) = settings.resolved_logs_dir() {
        match collector.start_session(&logs_dir, plan.identifier.as_str()) {
            Ok(path) => log::info!("[Main] Session log: {}", path.display()),
            Err(e) => log::warn!("[Main] Session log disabled: {}", e),
        }
    }

    let outcome = workflow.execute(&plan)?;
    println!("{}", report_line(&outcome));

    Ok(ExitCode::from(outcome.exit_code()))
}
