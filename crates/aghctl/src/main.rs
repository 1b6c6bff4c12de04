// # aghctl - AdGuard Home Rewrite CLI
//
// Thin shell around agh-core: all reconcile logic lives in the library.
// The binary is responsible for:
// 1. Parsing command line flags
// 2. Initializing tracing (to stderr, so stdout stays machine-readable)
// 3. Building the HTTP store against the appliance
// 4. Running a single reconcile and printing the report
//
// ## Flags
//
// - `--url`: Base URL of the AdGuard Home instance
// - `--username`: Admin username for HTTP basic auth
// - `--password`: Admin password (falls back to `AGHCTL_PASSWORD`)
// - `--domain`: Domain the rewrite answers for
// - `--answer`: Rewrite target, IP address or hostname
// - `--state`: Desired presence (present, absent)
// - `--insecure`: Skip TLS certificate validation
// - `--dry-run`: Report what would change without touching the appliance
// - `--timeout-secs`: Request timeout in seconds
// - `--format`: Report format (text, json)
// - `--log-level`: Log verbosity (trace, debug, info, warn, error)
//
// ## Exit Codes
//
// - 0: Reconcile completed (changed or already converged)
// - 1: Configuration or validation error
// - 2: Appliance error (HTTP status or transport failure)
//
// ## Example
//
// ```bash
// export AGHCTL_PASSWORD=hunter2
//
// aghctl --url http://adguard.lan:3000 --username admin \
//        --domain nas.home.lan --answer 192.168.1.50
//
// aghctl --url http://adguard.lan:3000 --username admin \
//        --domain nas.home.lan --state absent
// ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use agh_core::{DesiredRewrite, EndpointConfig, Error, Presence, ReconcileReport, Reconciler};
use agh_store_http::HttpRewriteStore;

/// Environment variable consulted when `--password` is not given
const PASSWORD_ENV: &str = "AGHCTL_PASSWORD";

/// Exit codes for different termination scenarios
///
/// - 0: Reconcile completed
/// - 1: Configuration or validation error
/// - 2: Appliance (API or transport) error
#[derive(Debug, Clone, Copy)]
enum AghExitCode {
    /// Reconcile completed (changed or already converged)
    Success = 0,
    /// Configuration or validation error
    ConfigError = 1,
    /// Appliance error (HTTP status or transport failure)
    RemoteError = 2,
}

impl From<AghExitCode> for ExitCode {
    fn from(code: AghExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Desired presence of the rewrite rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum State {
    /// The rule must exist with the given answer
    Present,
    /// The rule must not exist
    Absent,
}

impl From<State> for Presence {
    fn from(state: State) -> Self {
        match state {
            State::Present => Presence::Present,
            State::Absent => Presence::Absent,
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Pretty-printed JSON report
    Json,
}

#[derive(Parser)]
#[command(
    name = "aghctl",
    version,
    about = "Reconcile a DNS rewrite rule on an AdGuard Home instance"
)]
struct Cli {
    /// Base URL of the AdGuard Home instance (e.g. http://adguard.lan:3000)
    #[arg(long)]
    url: String,

    /// Admin username for HTTP basic auth
    #[arg(long)]
    username: String,

    /// Admin password (falls back to the AGHCTL_PASSWORD environment variable)
    #[arg(long)]
    password: Option<String>,

    /// Domain the rewrite answers for
    #[arg(long)]
    domain: String,

    /// Rewrite target: an IP address or hostname (required when state is present)
    #[arg(long)]
    answer: Option<String>,

    /// Desired presence of the rewrite rule
    #[arg(long, value_enum, default_value = "present")]
    state: State,

    /// Skip TLS certificate validation
    #[arg(long)]
    insecure: bool,

    /// Report what would change without touching the appliance
    #[arg(long)]
    dry_run: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Report output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Resolve the endpoint configuration from flags and environment
    ///
    /// The password comes from `--password` when given, otherwise from
    /// `AGHCTL_PASSWORD`. It never appears in logs or error messages.
    fn endpoint(&self) -> Result<EndpointConfig> {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => env::var(PASSWORD_ENV).map_err(|_| {
                anyhow::anyhow!(
                    "password is required. Pass --password or set {}",
                    PASSWORD_ENV
                )
            })?,
        };

        Ok(EndpointConfig::new(&self.url, &self.username, password)
            .with_validate_certs(!self.insecure)
            .with_timeout_secs(self.timeout_secs))
    }

    /// The desired rewrite state described by the flags
    fn desired(&self) -> DesiredRewrite {
        let mut desired = DesiredRewrite::new(&self.domain).with_presence(self.state.into());
        if let Some(answer) = &self.answer {
            desired = desired.with_answer(answer);
        }
        desired
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!(
                "Invalid log level '{}'. Valid levels: trace, debug, info, warn, error",
                other
            );
            return AghExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr so the report on stdout stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AghExitCode::ConfigError.into();
    }

    // Resolve and validate configuration before any network activity
    let endpoint = match cli.endpoint() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return AghExitCode::ConfigError.into();
        }
    };

    if let Err(e) = endpoint.validate() {
        eprintln!("Configuration validation error: {}", e);
        return AghExitCode::ConfigError.into();
    }

    let desired = cli.desired();
    if let Err(e) = desired.validate() {
        eprintln!("Configuration validation error: {}", e);
        return AghExitCode::ConfigError.into();
    }

    info!("Reconciling {} on {}", desired.domain, endpoint.base_url());

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AghExitCode::ConfigError.into();
        }
    };

    rt.block_on(run(endpoint, desired, cli.dry_run, cli.format))
        .into()
}

/// Run a single reconcile and print the report
async fn run(
    endpoint: EndpointConfig,
    desired: DesiredRewrite,
    dry_run: bool,
    format: OutputFormat,
) -> AghExitCode {
    let store = match HttpRewriteStore::new(&endpoint) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return exit_code_for(&e);
        }
    };

    let reconciler = Reconciler::new(Box::new(store), dry_run);

    match reconciler.reconcile(&desired).await {
        Ok(report) => print_report(&report, format),
        Err(e) => {
            error!("Reconcile failed: {}", e);
            exit_code_for(&e)
        }
    }
}

/// Map a reconcile error onto the exit code taxonomy
fn exit_code_for(error: &Error) -> AghExitCode {
    if error.is_remote() {
        AghExitCode::RemoteError
    } else {
        AghExitCode::ConfigError
    }
}

fn print_report(report: &ReconcileReport, format: OutputFormat) -> AghExitCode {
    match format {
        OutputFormat::Text => {
            println!("{}", report.message);
            println!("changed: {}", report.changed);
            if let Some(rewrite) = &report.rewrite {
                println!("rewrite: {} -> {}", rewrite.domain, rewrite.answer);
            }
            AghExitCode::Success
        }
        OutputFormat::Json => match report.to_json() {
            Ok(json) => {
                println!("{}", json);
                AghExitCode::Success
            }
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                AghExitCode::ConfigError
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agh_core::RewriteRule;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "aghctl",
            "--url",
            "http://adguard.lan:3000",
            "--username",
            "admin",
            "--password",
            "hunter2",
            "--domain",
            "nas.home.lan",
        ];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn test_state_maps_to_presence() {
        assert_eq!(Presence::from(State::Present), Presence::Present);
        assert_eq!(Presence::from(State::Absent), Presence::Absent);
    }

    #[test]
    fn test_exit_codes_match_documented_values() {
        assert_eq!(AghExitCode::Success as u8, 0);
        assert_eq!(AghExitCode::ConfigError as u8, 1);
        assert_eq!(AghExitCode::RemoteError as u8, 2);
    }

    #[test]
    fn test_remote_errors_exit_two() {
        assert!(matches!(
            exit_code_for(&Error::api(403, "Forbidden")),
            AghExitCode::RemoteError
        ));
        assert!(matches!(
            exit_code_for(&Error::transport("connection refused")),
            AghExitCode::RemoteError
        ));
        assert!(matches!(
            exit_code_for(&Error::validation("bad input")),
            AghExitCode::ConfigError
        ));
    }

    #[test]
    fn test_flags_build_desired_state() {
        let cli = parse(&["--answer", "192.168.1.50"]);
        let desired = cli.desired();

        assert_eq!(desired.domain, "nas.home.lan");
        assert_eq!(desired.answer.as_deref(), Some("192.168.1.50"));
        assert_eq!(desired.presence, Presence::Present);
        assert!(desired.validate().is_ok());
    }

    #[test]
    fn test_absent_state_needs_no_answer() {
        let cli = parse(&["--state", "absent"]);
        let desired = cli.desired();

        assert_eq!(desired.presence, Presence::Absent);
        assert_eq!(desired.answer, None);
        assert!(desired.validate().is_ok());
    }

    #[test]
    fn test_flags_build_endpoint() {
        let cli = parse(&["--insecure", "--timeout-secs", "5"]);
        let endpoint = cli.endpoint().unwrap();

        assert_eq!(endpoint.url, "http://adguard.lan:3000");
        assert_eq!(endpoint.username, "admin");
        assert_eq!(endpoint.password, "hunter2");
        assert!(!endpoint.validate_certs);
        assert_eq!(endpoint.timeout_secs, 5);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);

        assert_eq!(cli.state, State::Present);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.log_level, "warn");
        assert!(!cli.dry_run);
        assert!(!cli.insecure);

        let endpoint = cli.endpoint().unwrap();
        assert!(endpoint.validate_certs);
        assert_eq!(endpoint.timeout_secs, 30);
    }

    #[test]
    fn test_print_report_succeeds_for_both_formats() {
        // JSON output comes from the report's own serializer, so the
        // binary needs no JSON crate of its own
        let report = ReconcileReport {
            changed: true,
            message: "DNS rewrite created successfully".to_string(),
            rewrite: Some(RewriteRule::new("nas.home.lan", "192.168.1.50")),
        };

        assert!(matches!(
            print_report(&report, OutputFormat::Text),
            AghExitCode::Success
        ));
        assert!(matches!(
            print_report(&report, OutputFormat::Json),
            AghExitCode::Success
        ));
    }
}
