// crates/appt-analytics-cli/src/main.rs
// ============================================================================
// Module: Appointment Analytics CLI Entry Point
// Description: Command dispatcher for the analytics server and check runner.
// Purpose: Provide a safe, localized CLI for serving and property checks.
// Dependencies: appt-analytics-core, appt-analytics-server, clap, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The Appointment Analytics CLI starts the loopback-guarded data endpoint
//! and runs named property cases from the built-in registry. All user-facing
//! strings are routed through the i18n catalog to prepare for future
//! localization. Security posture: config and environment inputs are
//! untrusted and must be validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use appt_analytics_cli::i18n::Locale;
use appt_analytics_cli::i18n::set_locale;
use appt_analytics_cli::t;
use appt_analytics_core::AppointmentSummaryService;
use appt_analytics_core::CaseName;
use appt_analytics_core::CaseRegistry;
use appt_analytics_core::CheckOutcome;
use appt_analytics_core::DispatchTable;
use appt_analytics_core::builtin_registry;
use appt_analytics_server::ALLOW_NON_LOOPBACK_ENV;
use appt_analytics_server::AnalyticsServer;
use appt_analytics_server::AppConfig;
use appt_analytics_server::BindOutcome;
use appt_analytics_server::NoopMetrics;
use appt_analytics_server::enforce_local_only;
use appt_analytics_server::resolve_allow_non_loopback;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "APPT_ANALYTICS_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "appt-analytics", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `APPT_ANALYTICS_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the appointment analytics data endpoint.
    Serve(ServeCommand),
    /// Run registered property cases and report their outcomes.
    Check(CheckCommand),
    /// List registered property cases.
    Cases,
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to appt-analytics.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Allow binding the data endpoint to non-loopback addresses.
    #[arg(long, action = ArgAction::SetTrue)]
    allow_non_loopback: bool,
}

/// Configuration for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Name of the property case to run.
    #[arg(value_name = "CASE")]
    case: Option<String>,
    /// Run every registered property case.
    #[arg(long, action = ArgAction::SetTrue)]
    all: bool,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Check(command) => command_check(&command, &builtin_registry()),
        Commands::Cases => command_cases(),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = AppConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("serve.config.load_failed", error = err)))?;
    let allow_non_loopback = resolve_allow_non_loopback(command.allow_non_loopback)
        .map_err(|err| CliError::new(err.to_string()))?;
    let bind_outcome = enforce_local_only(&config, allow_non_loopback)
        .map_err(|err| CliError::new(err.to_string()))?;
    if bind_outcome.network_exposed {
        warn_network_exposure(&bind_outcome)?;
    } else {
        write_stderr_line(&t!("serve.warn.loopback_only", env = ALLOW_NON_LOOPBACK_ENV))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    let table = DispatchTable::data_table(Arc::new(AppointmentSummaryService::new()));
    let server = AnalyticsServer::bind(
        bind_outcome.addr,
        Arc::new(table),
        Arc::new(NoopMetrics),
        config.server.max_request_bytes,
    )
    .await
    .map_err(|err| CliError::new(t!("serve.init_failed", error = err)))?;
    write_stdout_line(&t!("serve.listening", addr = server.local_addr()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    server.serve().await.map_err(|err| CliError::new(t!("serve.failed", error = err)))?;

    Ok(ExitCode::SUCCESS)
}

/// Emits the network exposure warning banner.
fn warn_network_exposure(outcome: &BindOutcome) -> CliResult<()> {
    write_stderr_line(&t!("serve.warn.network.header"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    write_stderr_line(&t!("serve.warn.network.bind", bind = outcome.addr))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    write_stderr_line(&t!("serve.warn.network.footer"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command against the provided case registry.
///
/// Every executed case exits successfully regardless of outcome; the outcome
/// is reported on stdout. Only usage errors and unknown case names fail.
fn command_check(command: &CheckCommand, registry: &CaseRegistry) -> CliResult<ExitCode> {
    match (&command.case, command.all) {
        (Some(_), true) => Err(CliError::new(t!("check.args.conflict"))),
        (None, false) => Err(CliError::new(t!("check.args.missing"))),
        (None, true) => {
            for (name, outcome) in registry.run_all() {
                write_stdout_line(&outcome_line(&name, &outcome))
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        (Some(case), false) => {
            let name = CaseName::new(case.as_str());
            let Some(outcome) = registry.run(&name) else {
                return Err(CliError::new(t!("check.unknown_case", case = name)));
            };
            write_stdout_line(&outcome_line(&name, &outcome))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Formats the localized report line for a case outcome.
fn outcome_line(name: &CaseName, outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::Passed => t!("check.case.passed", case = name),
        CheckOutcome::Failed => t!("check.case.failed", case = name),
        CheckOutcome::Error(message) => t!("check.case.error", case = name, error = message),
    }
}

// ============================================================================
// SECTION: Cases Command
// ============================================================================

/// Executes the `cases` command.
fn command_cases() -> CliResult<ExitCode> {
    let registry = builtin_registry();
    write_stdout_line(&t!("cases.header"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for name in registry.names() {
        write_stdout_line(&t!("cases.entry", case = name))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Locale Helpers
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
