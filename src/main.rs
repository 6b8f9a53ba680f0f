use noteshare_client::{
    ApiClient,
    config::{ClientConfig, Env},
    router::{GuardDecision, ROUTES},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Command-line smoke check for a deployment: loads configuration, wires the
/// client against the configured backend, reports the public counters and
/// which views the persisted session may open.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = ClientConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for this crate and info for reqwest.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "noteshare_client=debug,reqwest=info".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Client starting in {:?} mode", config.env);

    // 4. Client Wiring (transport + persisted session + notifier)
    let client = ApiClient::connect(&config)
        .expect("FATAL: Failed to build the HTTP client. Check NOTESHARE_TIMEOUT_SECS.");

    // 5. Backend Reachability
    match client.home().public_stats().await {
        Ok(stats) => tracing::info!(
            users = stats.users,
            courses = stats.courses,
            notes = stats.notes,
            comments = stats.comments,
            "backend reachable"
        ),
        Err(e) => tracing::error!(category = ?e.category(), "backend check failed: {}", e),
    }

    // 6. Session Summary
    let policy = client.policy();
    tracing::info!(
        logged_in = policy.is_logged_in(),
        role = %policy.current_role(),
        "persisted session loaded"
    );

    let guard = client.guard();
    for route in ROUTES.iter() {
        let decision = guard.check(&route.meta);
        if decision != GuardDecision::Allow {
            tracing::info!(route = route.name, path = route.path, ?decision, "view not available");
        }
    }
}
