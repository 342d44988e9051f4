//! HTTP client for the patient service.
//!
//! Every call carries the browser's `Authorization` header unchanged plus the
//! trace headers of the current request. One browser request maps to exactly
//! one upstream call; nothing is retried or cached.

use crate::config::{GatewaySettings, UpstreamSettings};
use crate::models::Patient;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
};
use metrics::counter;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use service_core::extract::{AuthorizationHeader, RecordId};
use service_core::middleware::RequestId;
use service_core::observability::{TracedClientExt, TracedRequest};
use std::time::Duration;

/// What a handler forwards upstream from the inbound request.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub authorization: HeaderValue,
    pub request_id: Option<String>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Forwarded
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthorizationHeader(authorization) =
            AuthorizationHeader::from_request_parts(parts, state).await?;
        let request_id = parts.extensions.get::<RequestId>().map(|id| id.0.clone());

        Ok(Self {
            authorization,
            request_id,
        })
    }
}

pub struct PatientClient {
    client: Client,
    base_url: String,
    check_mutation_status: bool,
}

impl PatientClient {
    pub fn new(gateway: &GatewaySettings, upstream: &UpstreamSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(upstream.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: gateway.base_url().to_string(),
            check_mutation_status: upstream.check_mutation_status,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Where the browser lands after any mutation.
    pub fn list_page_url(&self) -> String {
        format!("{}/patientFront/list", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/patientBack{}", self.base_url, path)
    }

    pub async fn list(&self, fwd: &Forwarded) -> Result<Vec<Patient>, AppError> {
        tracing::info!("Fetching patient list");
        let url = self.url("/list");
        let request = self.client.traced_get(&url);
        self.fetch("list", &url, request, fwd).await
    }

    pub async fn get(&self, id: &RecordId, fwd: &Forwarded) -> Result<Patient, AppError> {
        tracing::info!(patient_id = %id, "Fetching patient for update form");
        let url = self.url(&format!("/updateForm/{}", id));
        let request = self.client.traced_get(&url);
        self.fetch("get", &url, request, fwd).await
    }

    pub async fn add(&self, patient: &Patient, fwd: &Forwarded) -> Result<(), AppError> {
        tracing::info!("Adding patient");
        let url = self.url("/add");
        let request = self.client.traced_post(&url).json(patient);
        self.mutate("add", &url, request, fwd).await
    }

    pub async fn update(
        &self,
        id: &RecordId,
        patient: &Patient,
        fwd: &Forwarded,
    ) -> Result<(), AppError> {
        tracing::info!(patient_id = %id, "Updating patient");
        let url = self.url(&format!("/update/{}", id));
        let request = self.client.traced_post(&url).json(patient);
        self.mutate("update", &url, request, fwd).await
    }

    pub async fn delete(&self, id: &RecordId, fwd: &Forwarded) -> Result<(), AppError> {
        tracing::info!(patient_id = %id, "Deleting patient");
        let url = self.url(&format!("/delete/{}", id));
        let request = self.client.traced_delete(&url);
        self.mutate("delete", &url, request, fwd).await
    }

    async fn send(
        &self,
        operation: &'static str,
        url: &str,
        request: TracedRequest,
        fwd: &Forwarded,
    ) -> Result<reqwest::Response, AppError> {
        request
            .header(AUTHORIZATION, fwd.authorization.clone())
            .request_id(fwd.request_id.as_deref())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Patient service request failed");
                record(operation, "transport_error");
                AppError::BadGateway(format!("patient service unreachable: {}", e))
            })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
        request: TracedRequest,
        fwd: &Forwarded,
    ) -> Result<T, AppError> {
        let response = self.send(operation, url, request, fwd).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            record(operation, "not_found");
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Patient service returned 404 for {}",
                url
            )));
        }
        if !status.is_success() {
            tracing::error!(url = %url, status = %status, "Patient service returned an error");
            record(operation, "upstream_error");
            return Err(AppError::BadGateway(format!(
                "patient service returned {}",
                status
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Invalid patient service response");
            record(operation, "decode_error");
            AppError::BadGateway(format!("invalid patient service response: {}", e))
        })?;

        record(operation, "ok");
        Ok(body)
    }

    /// Issue a mutation. The response body is never read.
    async fn mutate(
        &self,
        operation: &'static str,
        url: &str,
        request: TracedRequest,
        fwd: &Forwarded,
    ) -> Result<(), AppError> {
        let response = self.send(operation, url, request, fwd).await?;
        let status = response.status();

        if status.is_success() {
            record(operation, "ok");
            return Ok(());
        }

        if self.check_mutation_status && status == StatusCode::NOT_FOUND {
            record(operation, "not_found");
            tracing::warn!(url = %url, "Patient service has no such record");
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Patient service returned 404 for {}",
                url
            )));
        }

        record(operation, "upstream_error");
        if self.check_mutation_status {
            tracing::error!(url = %url, status = %status, "Patient service rejected mutation");
            return Err(AppError::BadGateway(format!(
                "patient service returned {}",
                status
            )));
        }

        tracing::warn!(
            url = %url,
            status = %status,
            "Patient service rejected mutation; redirecting anyway"
        );
        Ok(())
    }
}

fn record(operation: &'static str, outcome: &'static str) {
    counter!(
        "patient_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
