//! API server entrypoint.

use ashpaste_core::sweeper::spawn_expiry_sweeper;
use ashpaste_core::DEFAULT_PORT;
use ashpaste_server::{config::Config, db::Database, serve_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ashpaste=info,ashpaste_core=info,ashpaste_server=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if parse_cli_flags(&args)?.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    tracing::info!(
        "Starting ashpaste (storage: {}, burn mode: {:?})",
        config.storage_target().describe(),
        config.burn_mode
    );

    // Exhausted retries are fatal here and only here.
    let database = Database::connect(&config).await?;
    let state = AppState::new(config.clone(), database);

    let sweeper = spawn_expiry_sweeper(
        state.service.store().clone(),
        state.service.clock().clone(),
        config.sweep_interval,
    );

    let allow_public = ashpaste_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    let bind_addr = ashpaste_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("ashpaste running at http://{}", actual_addr);

    let db = state.db.clone();
    let serve_result = serve_router(listener, state, shutdown_signal()).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    match db.close().await {
        Ok(()) => tracing::info!("Storage closed"),
        Err(err) => tracing::error!("Failed to close storage: {}", err),
    }

    serve_result?;

    Ok(())
}

fn print_help() {
    println!("ashpaste server\n");
    println!("Usage: ashpaste [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Embedded store directory (default: ~/.cache/ashpaste/db)");
    println!("  DATABASE_URL      PostgreSQL connection string (selects networked mode)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
    println!("  ALLOW_PUBLIC_ACCESS  Permit non-loopback bind addresses");
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 10MB)");
    println!("  BURN_MODE         destroy (default) or serve-once");
    println!("  DB_CONNECT_ATTEMPTS  Startup connection attempts (default: 5)");
    println!("  DB_MAX_IDLE_CONNS    Pool idle connections (default: 5)");
    println!("  DB_MAX_OPEN_CONNS    Pool size (default: 25)");
    println!("  DB_CONN_MAX_LIFETIME_SECS  Connection lifetime (default: 1800)");
    println!("  DB_CONN_MAX_IDLE_SECS      Idle connection reap time (default: 600)");
    println!("  STORAGE_TIMEOUT_SECS  Per-operation storage timeout (default: 30)");
    println!("  SWEEP_INTERVAL_SECS   Expiry sweep period, 0 disables (default: 300)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["ashpaste".to_string(), "--burn".to_string()],
                "Unknown option",
            ),
            (
                vec!["ashpaste".to_string(), "serve".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_help() {
        let args = vec!["ashpaste".to_string(), "--help".to_string()];
        assert_eq!(
            parse_cli_flags(&args).expect("help parses"),
            CliFlags { help: true }
        );
        assert_eq!(
            parse_cli_flags(&["ashpaste".to_string()]).expect("no args"),
            CliFlags::default()
        );
    }
}
