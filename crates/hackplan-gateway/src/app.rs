use axum::{
    routing::{get, post, put},
    Router,
};
use hackplan_core::config::HackplanConfig;
use hackplan_events::EventManager;
use hackplan_llm::LlmProvider;
use hackplan_tasks::TaskManager;
use hackplan_users::UserManager;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: HackplanConfig,
    pub users: UserManager,
    pub events: EventManager,
    pub tasks: TaskManager,
    /// Plan generation provider: Gemini if configured, else Groq, else the
    /// built-in mock planner.
    pub planner: Box<dyn LlmProvider>,
    /// Proxy targets — None means the endpoint needs a caller-supplied key.
    pub gemini: Option<Box<dyn LlmProvider>>,
    pub groq: Option<Box<dyn LlmProvider>>,
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/auth/register", post(crate::http::auth::register_handler))
        .route("/auth/login", post(crate::http::auth::login_handler))
        .route(
            "/hackathons",
            get(crate::http::hackathons::list_handler).post(crate::http::hackathons::create_handler),
        )
        .route(
            "/hackathons/{id}",
            get(crate::http::hackathons::get_handler)
                .put(crate::http::hackathons::update_handler)
                .delete(crate::http::hackathons::delete_handler),
        )
        .route(
            "/hackathons/{id}/members",
            get(crate::http::members::list_handler).post(crate::http::members::add_handler),
        )
        .route(
            "/hackathons/{id}/members/{member_id}",
            put(crate::http::members::update_handler).delete(crate::http::members::remove_handler),
        )
        .route(
            "/hackathons/{id}/tasks",
            get(crate::http::tasks::list_handler).post(crate::http::tasks::create_handler),
        )
        .route(
            "/hackathons/{id}/tasks/generate",
            post(crate::http::generate::generate_handler),
        )
        .route(
            "/hackathons/{id}/tasks/{task_id}",
            put(crate::http::tasks::update_handler).delete(crate::http::tasks::delete_handler),
        )
        .route(
            "/hackathons/{id}/tasks/{task_id}/dependencies/{dep_id}",
            post(crate::http::tasks::add_dependency_handler)
                .delete(crate::http::tasks::remove_dependency_handler),
        )
        .route(
            "/hackathons/{id}/tasks/{task_id}/assignee",
            put(crate::http::tasks::assign_handler).delete(crate::http::tasks::unassign_handler),
        )
        .route(
            "/hackathons/{id}/schedule",
            post(crate::http::schedule::schedule_handler),
        )
        .route(
            "/hackathons/{id}/calendar",
            get(crate::http::schedule::calendar_handler),
        )
        .route("/ai/gemini", post(crate::http::ai_proxy::gemini_handler))
        .route("/ai/groq", post(crate::http::ai_proxy::groq_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
