use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use std::sync::Arc;

use crate::{AuthError, ServerError, TokenKeys, auth, budgets, goals, reports, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenKeys>,
}

/// The authenticated caller, inserted by the auth middleware.
#[derive(Clone, Copy, Debug)]
pub struct Identity {
    pub user_id: i32,
}

async fn require_token(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return Err(AuthError::Missing.into());
    };

    let user_id = state.tokens.verify(bearer.token())?;
    request.extensions_mut().insert(Identity { user_id });
    Ok(next.run(request).await)
}

/// Every route of the API, served both at the root and under `/api`.
pub fn router(state: ServerState) -> Router {
    let routes = routes(&state);
    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(state)
}

/// Collection routes answer with and without the trailing slash.
fn routes(state: &ServerState) -> Router<ServerState> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/update-profile", put(auth::update_profile))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/categories",
            get(transactions::list_categories).post(transactions::create_category),
        )
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            put(budgets::update).delete(budgets::delete),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/", get(goals::list).post(goals::create))
        .route("/goals/{id}", put(goals::update).delete(goals::delete))
        .route("/goals/{id}/contribute", post(goals::contribute))
        .route("/reports/dashboard", get(reports::dashboard))
        .route("/reports/monthly-trend", get(reports::monthly_trend))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
}

pub async fn run(engine: Engine, tokens: TokenKeys, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, tokens, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(tokens),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    tokens: TokenKeys,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, tokens, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
