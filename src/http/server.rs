//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router; every path goes through one gate handler
//! - Wire up middleware (request ID, tracing, timeout, body limit, headers)
//! - Bind server to listener and drain on shutdown
//! - Run admitted requests through token checks and dispatch

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, DefaultBodyLimit, FromRequest, State},
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::NotesConfig;
use crate::export::PasteExporter;
use crate::http::form::FormFields;
use crate::http::request::{decode_path, request_id, MakeRequestUuid};
use crate::lifecycle::wait_for_shutdown;
use crate::notes::{NoteHandlers, NoteStore};
use crate::observability::metrics;
use crate::routing::{Route, RouteTable};
use crate::security::{GateError, RequestGate, Throttle, TokenIssuer};

/// Application state injected into the gate handler.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate>,
    pub handlers: NoteHandlers,
}

/// HTTP server for the notes application.
pub struct HttpServer {
    router: Router,
    config: NotesConfig,
    tokens: Arc<TokenIssuer>,
}

impl HttpServer {
    /// Create a new HTTP server over the given store and optional exporter.
    pub fn new(
        config: NotesConfig,
        store: Arc<dyn NoteStore>,
        exporter: Option<Arc<dyn PasteExporter>>,
    ) -> Self {
        let tokens = Arc::new(TokenIssuer::new());
        let gate = Arc::new(RequestGate::new(
            Throttle::new(config.throttle.min_interval()),
            RouteTable::notes(),
            tokens.clone(),
        ));
        let handlers = NoteHandlers::new(store, exporter, tokens.clone());

        let state = AppState {
            gate,
            handlers,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            tokens,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &NotesConfig, state: AppState) -> Router {
        let mut router = Router::new().fallback(gate_handler).with_state(state);

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ));
        }

        router
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            database = %self.config.store.database_path,
            paste_enabled = self.config.paste.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Issuer shared by the form pages and the gate.
    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }
}

/// Single entry point: throttle, match, authorize, dispatch.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = decode_path(request.uri().path()).into_owned();

    let route = match state.gate.admit(&path) {
        Ok(route) => route,
        Err(e) => return finish(&request_id, "unmatched", start, e.into_response()),
    };

    let name = route.name();
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = name,
        "Request admitted"
    );

    let response = match handle(&state, route, request).await {
        Ok(response) => response,
        Err(e) => {
            if matches!(e, GateError::Upstream(_)) {
                tracing::error!(request_id = %request_id, route = name, error = %e, "Handler failed");
            }
            e.into_response()
        }
    };

    finish(&request_id, name, start, response)
}

async fn handle(
    state: &AppState,
    route: Route,
    request: Request<Body>,
) -> Result<Response, GateError> {
    let query = request.uri().query().map(str::to_owned);
    let body = Bytes::from_request(request, &())
        .await
        .map_err(body_rejection)?;
    let form = FormFields::parse(query.as_deref(), &body);

    state.gate.authorize(&route, form.token().as_ref())?;
    state.handlers.dispatch(route, &form).await
}

/// Over-limit bodies answer 413 whether or not they carried a Content-Length.
fn body_rejection(rejection: BytesRejection) -> GateError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GateError::PayloadTooLarge
    } else {
        GateError::BadRequest(format!("Unreadable request body: {}", rejection.body_text()))
    }
}

fn finish(request_id: &str, route: &'static str, start: Instant, response: Response) -> Response {
    let status = response.status();
    metrics::record_request(route, status.as_u16(), start);
    tracing::info!(
        request_id = %request_id,
        route = route,
        status = status.as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    response
}
