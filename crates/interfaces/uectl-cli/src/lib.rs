use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uectl_app_core::{UpdateClient, UpdateEngineService};
use uectl_config::{DEFAULT_PAYLOAD_URI, DEFAULT_SOCKET_PATH, SERVICE_NAME, SOCKET_ENV_VAR};
use uectl_core::exit_codes::{EXIT_FAILURE, EX_OK};
use uectl_core::{CommandSelection, PayloadRequest};
use uectl_infra::SocketUpdateEngine;

/// Update engine control client
#[derive(Parser, Debug)]
#[command(name = "uectl", author, version, about)]
pub struct Cli {
    /// Start a new update, if no update in progress.
    #[arg(long)]
    pub update: bool,

    /// The URI to the update payload to use.
    #[arg(long, default_value = DEFAULT_PAYLOAD_URI)]
    pub payload: String,

    /// A list of key-value pairs, one element of the list per line.
    #[arg(long, default_value = "")]
    pub headers: String,

    /// Suspend an ongoing update and exit.
    #[arg(long)]
    pub suspend: bool,

    /// Resume a suspended update.
    #[arg(long)]
    pub resume: bool,

    /// Cancel the ongoing update and exit.
    #[arg(long)]
    pub cancel: bool,

    /// Follow status update changes until a final state is reached.
    /// Exit status is 0 if the update succeeded, and 1 otherwise.
    #[arg(long)]
    pub follow: bool,

    /// Socket the update engine service listens on.
    #[arg(long, env = SOCKET_ENV_VAR, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(hide = true)]
    pub positional: Vec<String>,
}

impl Cli {
    pub fn selection(&self) -> CommandSelection {
        CommandSelection {
            update: self.update,
            suspend: self.suspend,
            resume: self.resume,
            cancel: self.cancel,
            follow: self.follow,
        }
    }

    pub fn payload_request(&self) -> PayloadRequest {
        PayloadRequest::from_flags(self.payload.clone(), &self.headers)
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Connects to the update engine over its Unix socket.
pub fn connect_service(cli: &Cli) -> anyhow::Result<SocketUpdateEngine> {
    SocketUpdateEngine::connect(&cli.socket)
        .with_context(|| format!("Failed to get {SERVICE_NAME} from the service socket"))
}

/// Runs one client invocation and returns the process exit code.
///
/// `args` includes the program name. `connect` is only called once the
/// command line has been validated.
pub fn run_client<I, T, C, S>(args: I, connect: C) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: FnOnce(&Cli) -> anyhow::Result<S>,
    S: UpdateEngineService,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EX_OK,
                _ => EXIT_FAILURE,
            };
        }
    };
    setup_logging(cli.verbose);

    if args.len() <= 1 {
        tracing::error!("Nothing to do. Run with --help for help.");
        return EXIT_FAILURE;
    }

    if let Some(arg) = cli.positional.first() {
        tracing::error!(
            "Found a positional argument '{arg}'. If you want to pass a value to a flag, \
             pass it as --flag=value."
        );
        return EXIT_FAILURE;
    }

    let service = match connect(&cli) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("{e:#}");
            return EXIT_FAILURE;
        }
    };

    UpdateClient::new(service).run(&cli.selection(), &cli.payload_request())
}
