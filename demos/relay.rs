//! Relay one payload to a vehicle and print the responses.
//!
//! Usage:
//!
//! ```text
//! cargo run --example relay -- --vin <VIN> --owner-token <FILE> [--payload <FILE>] [--wait <SECS>] [--debug]
//! ```
//!
//! The payload file must hold an already-signed session-layer message; the
//! connector forwards it as-is.

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use hermes_connector::{Connector, ConnectorConfig, OwnerApi, Result, Vin};
use tokio::time::{Instant, timeout_at};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    vin: Option<String>,
    owner_token: Option<PathBuf>,
    payload: Option<PathBuf>,
    wait: Duration,
    debug: bool,
}

impl Args {
    /// Parse command-line arguments.
    fn parse() -> Self {
        let mut args = Self {
            vin: None,
            owner_token: None,
            payload: None,
            wait: Duration::from_secs(30),
            debug: false,
        };

        let mut raw = std::env::args().skip(1);
        while let Some(flag) = raw.next() {
            match flag.as_str() {
                "--vin" => args.vin = raw.next(),
                "--owner-token" => args.owner_token = raw.next().map(PathBuf::from),
                "--payload" => args.payload = raw.next().map(PathBuf::from),
                "--wait" => {
                    if let Some(secs) = raw.next().and_then(|s| s.parse().ok()) {
                        args.wait = Duration::from_secs(secs);
                    }
                }
                "--debug" => args.debug = true,
                other => eprintln!("ignoring unknown argument: {other}"),
            }
        }

        args
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "hermes_connector=trace"
    } else {
        "hermes_connector=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let (Some(vin), Some(token_file)) = (args.vin, args.owner_token) else {
        eprintln!("Must specify --vin and --owner-token");
        std::process::exit(2);
    };
    let vin = Vin::new(vin);
    let owner_token = std::fs::read_to_string(token_file)?;

    let api = OwnerApi::new()?;
    let user_token = api.fetch_user_token(&owner_token).await?;
    let vehicle_token = api.fetch_vehicle_token(&owner_token, &vin).await?;

    let connector =
        Connector::connect(ConnectorConfig::default(), vin, &user_token, &vehicle_token).await?;
    println!("Connected to {}", connector.vin());

    if let Some(path) = args.payload {
        let payload = std::fs::read(path)?;
        let txid = connector.send(payload).await?;
        println!("Sent command {txid}");
    }

    let deadline = Instant::now() + args.wait;
    let responses = connector.responses();
    while let Ok(Some(response)) = timeout_at(deadline, responses.recv()).await {
        println!("Response: {} bytes", response.len());
    }

    println!("Stats: {:?}", connector.stats());
    connector.close().await;
    Ok(())
}
