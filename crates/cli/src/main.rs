//! `rideline` -- ride coordination client.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default                  | Description                          |
//! |-------------------------|----------|--------------------------|--------------------------------------|
//! | `AUTH_SERVICE_URL`      | no       | `http://localhost:5000`  | Auth service base URL                |
//! | `TRIP_SERVICE_URL`      | no       | `http://localhost:5001`  | Trip service base URL                |
//! | `VEHICLE_SERVICE_URL`   | no       | `http://localhost:5002`  | Vehicle service base URL             |
//! | `DISPATCH_SERVICE_URL`  | no       | `http://localhost:5003`  | Confirmations and assignments        |
//! | `LOCATION_SERVICE_URL`  | no       | `http://localhost:5004`  | Driver locations                     |
//! | `ROUTING_SERVICE_URL`   | no       | `http://localhost:5005`  | Trip dispatch and routes             |
//! | `REQUEST_TIMEOUT_SECS`  | no       | `10`                     | Per-request HTTP timeout             |
//! | `POLL_INTERVAL_MS`      | no       | `2000`                   | Pause between assignment lookups     |
//! | `POLL_MAX_ATTEMPTS`     | no       | --                       | Stop `status` after this many lookups|
//! | `RIDELINE_SESSION_FILE` | no       | `.rideline-session.json` | Session state between invocations    |
//! | `RUST_LOG`              | no       | `rideline=info`          | Log filter (logs go to stderr)       |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rideline_cli::args::Cli;
use rideline_cli::commands::App;
use rideline_cli::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rideline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    tracing::debug!(
        dispatch = %config.endpoints.dispatch,
        session_file = %config.session_file.display(),
        "Loaded configuration",
    );

    let app = App::from_config(&config)?;
    let mut stdout = std::io::stdout();
    app.run(cli.command, &mut stdout).await?;

    Ok(())
}
