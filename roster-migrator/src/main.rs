//! Roster Migrator Main Entry Point
//!
//! Runs one unit-then-member migration from the source database into the
//! target database and exits non-zero when the run is rejected or fails.

use dotenv::dotenv;
use roster_migrator::{Dependencies, LogFormat, MigratorError, Settings};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roster_migrator=info,roster_migrator_pipeline=info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
                .init();
        }
    }

    info!(
        service_name = "roster-migrator",
        service_version = env!("CARGO_PKG_VERSION"),
        format = ?format,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), MigratorError> {
    dotenv().ok();
    init_tracing(LogFormat::from_env());

    let settings = Settings::from_env().inspect_err(|e| error!(error = %e, "Invalid settings"))?;
    let dependencies = Dependencies::new(&settings)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to initialize dependencies"))?;

    let result = match dependencies.orchestrator.run_migration().await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Migration run rejected");
            return Err(e.into());
        }
    };

    let summary = serde_json::to_string(&result)?;
    if result.is_success() {
        info!(result = %summary, "Migration finished");
        Ok(())
    } else {
        error!(result = %summary, "Migration finished with failure");
        Err(MigratorError::RunFailed(result.run_id))
    }
}
