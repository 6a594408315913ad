use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{fixtures, DatabaseManager, MemoryStore, MetisStore, PgStore};
use crate::handlers::{answer_posts, system};
use crate::metis::AnswerPostService;
use crate::middleware::{jwt_auth_middleware, validate_user_middleware};
use crate::notification::{NoopSink, NotificationSink, TracingSink};

/// Shared, cheaply cloneable state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub answer_posts: AnswerPostService,
}

impl AppState {
    pub fn new(store: Arc<dyn MetisStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            answer_posts: AnswerPostService::new(store, sink),
        }
    }

    /// Picks PostgreSQL when a database URL is configured, otherwise an
    /// in-memory store (seeded with demo data in development).
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn MetisStore> = match config.database.url {
            Some(_) => {
                let pool = DatabaseManager::connect(&config.database).await?;
                let store = PgStore::new(pool);
                store.migrate().await?;
                Arc::new(store)
            }
            None => {
                warn!("DATABASE_URL not set, using the in-memory store");
                let store = MemoryStore::new();
                if crate::is_development!() {
                    fixtures::seed_demo_data(&store).await?;
                    info!("Seeded demo courses, users and posts");
                }
                Arc::new(store)
            }
        };

        let sink: Arc<dyn NotificationSink> = if config.notifications.enabled {
            Arc::new(TracingSink)
        } else {
            Arc::new(NoopSink)
        };

        Ok(Self::new(store, sink))
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        // Protected API
        .merge(answer_post_routes(state.clone()))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn answer_post_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/courses/:course_id/answer-posts",
            axum::routing::post(answer_posts::create).put(answer_posts::update),
        )
        .route(
            "/api/courses/:course_id/answer-posts/:answer_post_id",
            get(answer_posts::get).delete(answer_posts::delete),
        )
        // Layers run bottom-up: the JWT is validated before the user is loaded
        .layer(middleware::from_fn_with_state(state, validate_user_middleware))
        .layer(middleware::from_fn(jwt_auth_middleware))
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config).await?;
    let app = app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Metis API listening on http://{} ({:?})", bind_addr, config.environment);

    axum::serve(listener, app).await?;
    Ok(())
}
