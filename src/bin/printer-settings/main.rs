use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use printer_settings::channel::{MethodCall, MethodChannel, MethodResponse};
use printer_settings::dispatcher::CommandDispatcher;
use printer_settings::error::PluginError;
use printer_settings::launcher::ShellLauncher;
use printer_settings::registry::{catalog, ActionRegistry};
use printer_settings::settings::{self, SettingsSource};

mod logging;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "printer-settings",
    about = "Drive the printer_settings channel from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log launches instead of performing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a method on the channel, e.g. `invoke openWindowsPrinterSettings`
    Invoke {
        method: String,
        /// Method arguments as JSON
        #[arg(long)]
        args: Option<String>,
    },
    /// List registered commands
    List,
    /// Print the JSON schema of the channel envelope
    Schema,
    /// Serve the channel over a loopback HTTP API until interrupted
    Serve {
        /// Port to bind (overrides the settings file)
        #[arg(long)]
        port: Option<u16>,
    },
}

// ── Exit codes ───────────────────────────────────────────────────

const EXIT_OK: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOT_IMPLEMENTED: i32 = 2;

fn exit_code(response: &MethodResponse) -> i32 {
    match response {
        MethodResponse::Success { .. } => EXIT_OK,
        MethodResponse::Error { .. } => EXIT_ERROR,
        MethodResponse::NotImplemented => EXIT_NOT_IMPLEMENTED,
    }
}

fn format_response(method: &str, response: &MethodResponse) -> String {
    match response {
        MethodResponse::Success { value: None } => "ok".to_string(),
        MethodResponse::Success { value: Some(v) } => {
            serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
        }
        MethodResponse::Error { code, message, .. } => format!("error [{code}]: {message}"),
        MethodResponse::NotImplemented => format!("not implemented: {method}"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), PluginError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_args(raw: Option<&str>) -> Result<Option<Value>, PluginError> {
    raw.map(serde_json::from_str).transpose().map_err(PluginError::from)
}

/// Reported after `logging::init`; anything logged while loading would be lost.
fn log_settings_source(source: SettingsSource, path: Option<&PathBuf>) {
    let path = path.map(|p| p.display().to_string()).unwrap_or_default();
    match source {
        SettingsSource::Defaults => debug!("no settings file given, using defaults"),
        SettingsSource::MissingFile => info!(%path, "settings file not found, using defaults"),
        SettingsSource::File => debug!(%path, "settings loaded from file"),
    }
}

// ── Entry point ──────────────────────────────────────────────────

fn run(cli: Cli) -> Result<i32, PluginError> {
    let config = cli.config.as_deref();
    let source = SettingsSource::of(config);
    let settings = settings::load_settings(config)?;
    logging::init(logging::level_for(
        cli.verbose,
        cli.quiet,
        settings.log_level.as_deref(),
    ))?;
    log_settings_source(source, cli.config.as_ref());
    debug!(?settings, "loaded settings");

    let launcher = ShellLauncher::for_current_platform().dry_run(cli.dry_run || settings.dry_run);
    let registry = ActionRegistry::with_defaults(Arc::new(launcher))?;
    let channel = Arc::new(MethodChannel::new(
        settings.channel.clone(),
        CommandDispatcher::new(registry),
    ));

    match cli.command {
        Commands::Invoke { method, args } => {
            let arguments = parse_args(args.as_deref())?;
            let response = channel.invoke(MethodCall::new(method.clone(), arguments));
            if cli.json {
                print_json(&response)?;
            } else {
                println!("{}", format_response(&method, &response));
            }
            Ok(exit_code(&response))
        }
        Commands::List => {
            let entries = channel.catalog();
            if cli.json {
                print_json(&entries)?;
            } else {
                println!("{}", catalog::help_text(&entries));
            }
            Ok(EXIT_OK)
        }
        Commands::Schema => {
            print_json(&catalog::channel_schema())?;
            Ok(EXIT_OK)
        }
        Commands::Serve { port } => serve(channel, port.unwrap_or(settings.http_port)),
    }
}

#[cfg(feature = "http-api")]
fn serve(channel: Arc<MethodChannel>, port: u16) -> Result<i32, PluginError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let (port, server) = printer_settings::api::start_api_server(channel, port).await?;
        eprintln!("listening on http://127.0.0.1:{port}");
        tokio::signal::ctrl_c().await?;
        server.abort();
        Ok(EXIT_OK)
    })
}

#[cfg(not(feature = "http-api"))]
fn serve(_channel: Arc<MethodChannel>, _port: u16) -> Result<i32, PluginError> {
    Err(PluginError::Config {
        message: "built without the http-api feature".to_string(),
    })
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(EXIT_ERROR);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use clap::CommandFactory;
    use serde_json::json;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_invoke_with_args() {
        let cli = Cli::try_parse_from([
            "printer-settings",
            "invoke",
            "openWindowsPrinterSettings",
            "--args",
            r#"{"a":1}"#,
            "--dry-run",
        ])
        .unwrap();
        assert!(cli.dry_run);
        match cli.command {
            Commands::Invoke { method, args } => {
                assert_eq!(method, "openWindowsPrinterSettings");
                assert_eq!(parse_args(args.as_deref()).unwrap(), Some(json!({ "a": 1 })));
            }
            _ => unreachable!("expected invoke"),
        }
    }

    #[test]
    fn exit_codes_follow_response_kind() {
        assert_eq!(exit_code(&MethodResponse::Success { value: None }), 0);
        assert_eq!(exit_code(&MethodResponse::error("x", "y")), 1);
        assert_eq!(exit_code(&MethodResponse::NotImplemented), 2);
    }

    #[test]
    fn formats_responses_for_humans() {
        assert_eq!(format_response("m", &MethodResponse::Success { value: None }), "ok");
        assert_eq!(
            format_response("foo", &MethodResponse::NotImplemented),
            "not implemented: foo"
        );
        assert_eq!(
            format_response("m", &MethodResponse::error("os_invocation_error", "boom")),
            "error [os_invocation_error]: boom"
        );
    }

    #[test]
    fn bad_args_json_is_rejected() {
        assert!(matches!(
            parse_args(Some("{oops")),
            Err(PluginError::Codec { .. })
        ));
        assert_eq!(parse_args(None).unwrap(), None);
    }
}
