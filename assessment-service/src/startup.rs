use crate::config::{AssessmentConfig, AuthMode, ProviderKind};
use crate::handlers;
use crate::models::TemplateVersion;
use crate::services::{
    AnalysisRequester, GeminiConfig, GeminiTextProvider, HttpIdentityVerifier, IdentityVerifier,
    JwtIdentityVerifier, MockTextProvider, MongoDb, PromptRepository, SessionRecorder,
    SessionRepository, TestProvisioner, TextProvider,
};
use axum::{
    http::Request,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub provisioner: Arc<TestProvisioner>,
    pub recorder: Arc<SessionRecorder>,
    pub analysis: Arc<AnalysisRequester>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl AppState {
    pub fn new(
        prompts: Arc<dyn PromptRepository>,
        sessions: Arc<dyn SessionRepository>,
        provider: Arc<dyn TextProvider>,
        verifier: Arc<dyn IdentityVerifier>,
        version: TemplateVersion,
    ) -> Self {
        Self {
            provisioner: Arc::new(TestProvisioner::new(prompts)),
            recorder: Arc::new(SessionRecorder::new(sessions.clone())),
            analysis: Arc::new(AnalysisRequester::new(sessions.clone(), provider, version)),
            verifier,
            sessions,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/new-wat-test", get(handlers::new_wat_test))
        .route("/api/new-srt-test", get(handlers::new_srt_test))
        .route("/api/save-wat-session", post(handlers::save_wat_session))
        .route("/api/save-srt-session", post(handlers::save_srt_session))
        .route("/api/analyze-session/:id", post(handlers::analyze_session))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

type Server = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: AssessmentConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;
        let db = Arc::new(db);

        let provider = text_provider(&config);
        let verifier = identity_verifier(&config)?;

        tracing::info!(
            model = provider.model(),
            template_version = %config.analysis.template_version,
            auth_mode = ?config.auth.mode,
            "Assessment services configured"
        );

        let state = AppState::new(
            db.clone(),
            db,
            provider,
            verifier,
            config.analysis.template_version,
        );
        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn text_provider(config: &AssessmentConfig) -> Arc<dyn TextProvider> {
    match config.genai.provider {
        ProviderKind::Gemini => Arc::new(GeminiTextProvider::new(GeminiConfig {
            api_key: config.genai.api_key.clone(),
            model: config.genai.text_model.clone(),
            api_base: config.genai.api_base.clone(),
        })),
        ProviderKind::Mock => {
            tracing::warn!("Using mock text provider; analyses are canned");
            Arc::new(MockTextProvider::new(config.analysis.template_version))
        }
    }
}

fn identity_verifier(config: &AssessmentConfig) -> Result<Arc<dyn IdentityVerifier>, AppError> {
    let auth = &config.auth;
    match auth.mode {
        AuthMode::Remote => {
            let user_url = auth.user_url.clone().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("AUTH_USER_URL is required in remote mode"))
            })?;
            Ok(Arc::new(HttpIdentityVerifier::new(
                user_url,
                auth.api_key.clone(),
            )))
        }
        AuthMode::Jwt => {
            let secret = auth.jwt_secret.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("AUTH_JWT_SECRET is required in jwt mode"))
            })?;
            Ok(Arc::new(JwtIdentityVerifier::new(
                secret,
                auth.jwt_audience.as_deref(),
            )))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
