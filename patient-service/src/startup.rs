use crate::config::{PatientServiceConfig, StorageBackend};
use crate::handlers;
use crate::middleware::require_authorization;
use crate::services::{
    InMemoryPatientRepository, MongoDb, MongoPatientRepository, PatientRepository,
};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PatientRepository>,
}

pub fn build_router(state: AppState) -> Router {
    let patient_routes = Router::new()
        .route("/list", get(handlers::list_patients))
        .route("/updateForm/:id", get(handlers::get_patient))
        .route("/update/:id", post(handlers::update_patient))
        .route("/add", post(handlers::add_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .layer(from_fn(require_authorization));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/patientBack", patient_routes)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
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
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Connect the configured store and bind the listener.
    pub async fn build(config: PatientServiceConfig) -> Result<Self, AppError> {
        let repository: Arc<dyn PatientRepository> = match config.storage.backend {
            StorageBackend::Mongo => {
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
                Arc::new(MongoPatientRepository::new(db))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory patient store; records are lost on restart");
                Arc::new(InMemoryPatientRepository::new())
            }
        };

        Self::with_repository(config, repository).await
    }

    pub async fn with_repository(
        config: PatientServiceConfig,
        repository: Arc<dyn PatientRepository>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let app = build_router(AppState { repository });
        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
