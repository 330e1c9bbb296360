use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

mod app;
mod auth;
mod error;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hackplan_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: HACKPLAN_CONFIG env > ~/.hackplan/hackplan.toml
    let config_path = std::env::var("HACKPLAN_CONFIG").ok();
    let config = hackplan_core::config::HackplanConfig::load(config_path.as_deref())
        .unwrap_or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults", e);
            hackplan_core::config::HackplanConfig::default()
        });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    // initialize SQLite database — single file for all subsystems
    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    // run all schema migrations (idempotent)
    hackplan_users::db::init_db(&db)?;
    hackplan_events::db::init_db(&db)?;
    hackplan_tasks::db::init_db(&db)?;
    info!("database migrations complete");

    // build subsystems — each gets its own connection for thread safety
    let users = hackplan_users::UserManager::new(
        open_conn(db_path)?,
        config.auth.token_secret.clone(),
        config.auth.token_ttl_hours,
    );
    let events = hackplan_events::EventManager::new(open_conn(db_path)?);
    let tasks = hackplan_tasks::TaskManager::new(open_conn(db_path)?);

    let (planner, gemini, groq) = build_providers(&config);

    let state = Arc::new(app::AppState {
        config,
        users,
        events,
        tasks,
        planner,
        gemini,
        groq,
    });
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Hackplan gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Build the proxy providers and the plan-generation provider from config.
///
/// The planner prefers Gemini, then Groq; when neither is configured the
/// built-in mock keeps /tasks/generate usable for local development.
fn build_providers(
    config: &hackplan_core::config::HackplanConfig,
) -> (
    Box<dyn hackplan_llm::LlmProvider>,
    Option<Box<dyn hackplan_llm::LlmProvider>>,
    Option<Box<dyn hackplan_llm::LlmProvider>>,
) {
    let gemini: Option<Box<dyn hackplan_llm::LlmProvider>> =
        config.providers.gemini.as_ref().map(|g| {
            info!(model = %g.model, "Gemini provider configured");
            Box::new(hackplan_llm::gemini::GeminiProvider::new(
                g.api_key.clone(),
                g.base_url.clone(),
                g.model.clone(),
            )) as Box<dyn hackplan_llm::LlmProvider>
        });
    let groq: Option<Box<dyn hackplan_llm::LlmProvider>> = config.providers.groq.as_ref().map(|g| {
        info!(model = %g.model, "Groq provider configured");
        Box::new(hackplan_llm::groq::GroqProvider::new(
            g.api_key.clone(),
            g.base_url.clone(),
            g.model.clone(),
        )) as Box<dyn hackplan_llm::LlmProvider>
    });

    let planner: Box<dyn hackplan_llm::LlmProvider> = if let Some(ref g) = config.providers.gemini {
        Box::new(hackplan_llm::gemini::GeminiProvider::new(
            g.api_key.clone(),
            g.base_url.clone(),
            g.model.clone(),
        ))
    } else if let Some(ref g) = config.providers.groq {
        Box::new(hackplan_llm::groq::GroqProvider::new(
            g.api_key.clone(),
            g.base_url.clone(),
            g.model.clone(),
        ))
    } else {
        tracing::warn!("No LLM provider configured — task generation uses the mock planner");
        Box::new(hackplan_llm::mock::MockPlanner)
    };

    (planner, gemini, groq)
}

fn open_conn(db_path: &str) -> anyhow::Result<rusqlite::Connection> {
    let conn = rusqlite::Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
