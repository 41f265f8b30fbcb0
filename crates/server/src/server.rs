use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use ledger::Ledger;
use tokio_util::sync::CancellationToken;

use api_types::health::Health;

use crate::{ServerError, TokenVerifier, analytics, auth::Owner, expenses, theme};

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Deadline after which a request's cancellation token fires.
    pub request_timeout: Option<Duration>,
}

impl ServerState {
    pub fn new(ledger: Ledger, verifier: impl TokenVerifier + 'static) -> Self {
        Self {
            ledger: Arc::new(ledger),
            verifier: Arc::new(verifier),
            request_timeout: None,
        }
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Resolves the bearer token into an [`Owner`] request extension.
async fn auth(
    State(state): State<ServerState>,
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let header = match auth_header {
        Ok(TypedHeader(header)) => header,
        Err(rejection) if rejection.is_missing() => {
            return Err(ServerError::unauthorized(
                "MISSING_TOKEN",
                "missing Authorization header",
            ));
        }
        Err(_) => {
            return Err(ServerError::unauthorized(
                "INVALID_TOKEN",
                "invalid bearer token format",
            ));
        }
    };

    let token = header.token().trim();
    if token.is_empty() {
        return Err(ServerError::unauthorized(
            "INVALID_TOKEN",
            "invalid bearer token format",
        ));
    }

    let uid = state.verifier.verify(token).await.map_err(|err| {
        tracing::debug!("token verification failed: {err}");
        ServerError::unauthorized("INVALID_TOKEN", "token verification failed")
    })?;
    if uid.trim().is_empty() {
        return Err(ServerError::unauthorized(
            "UNAUTHORIZED",
            "user missing from context",
        ));
    }

    request.extensions_mut().insert(Owner(uid));
    Ok(next.run(request).await)
}

/// Gives every request a [`CancellationToken`].
///
/// The token fires when the configured deadline elapses or when the request
/// future is dropped (e.g. the client went away).
async fn request_deadline(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cancel = CancellationToken::new();
    if let Some(timeout) = state.request_timeout {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => deadline.cancel(),
                _ = deadline.cancelled() => {}
            }
        });
    }
    let _guard = cancel.clone().drop_guard();

    request.extensions_mut().insert(cancel);
    next.run(request).await
}

async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Authorization, Content-Type"),
    );
    response
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

async fn not_found() -> ServerError {
    ServerError::route_not_found()
}

async fn method_not_allowed() -> ServerError {
    ServerError::Rejected {
        status: StatusCode::METHOD_NOT_ALLOWED,
        code: "METHOD_NOT_ALLOWED",
        message: "unsupported method",
    }
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/api/v1/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/v1/expenses/{id}",
            axum::routing::put(expenses::update).delete(expenses::delete),
        )
        .route("/api/v1/analytics", get(analytics::get_analytics))
        .route("/api/v1/dashboard/snapshot", get(analytics::dashboard_snapshot))
        .route_layer(middleware::from_fn_with_state(state.clone(), request_deadline))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/theme-packs", get(theme::list))
        .merge(protected)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::debug!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
