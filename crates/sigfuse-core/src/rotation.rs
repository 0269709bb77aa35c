//! Ordered provider fallback for one category.
//!
//! Providers are tried strictly in rotation order, one attempt each. The
//! first 2xx response with a JSON body wins and later providers are never
//! contacted. Every failure is logged and recorded as a [`ProviderAttempt`].

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::config::AggregatorConfig;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::provider::{ProviderDescriptor, ProviderId};
use crate::{AggregationError, Category, CategoryRequest};

/// Why a single provider did not serve the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    Status(u16),
    Transport { message: String, timed_out: bool },
    InvalidJson(String),
}

/// One provider call made during a rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider: ProviderId,
    pub failure: Option<AttemptFailure>,
}

/// Successful rotated fetch.
#[derive(Debug, Clone)]
pub struct RotationSuccess {
    pub data: Value,
    pub source: ProviderId,
    pub attempts: Vec<ProviderAttempt>,
    pub latency_ms: u64,
}

/// Every provider in the category failed, or none was configured.
#[derive(Debug, Clone)]
pub struct RotationFailure {
    pub category: Category,
    pub attempts: Vec<ProviderAttempt>,
    pub latency_ms: u64,
}

impl RotationFailure {
    pub fn to_error(&self) -> AggregationError {
        AggregationError::AllSourcesFailed {
            category: self.category,
        }
    }
}

pub type RotationResult = Result<RotationSuccess, RotationFailure>;

/// Walks a category's provider rotation over an [`HttpClient`].
#[derive(Clone)]
pub struct RotationFetcher {
    config: Arc<AggregatorConfig>,
    http_client: Arc<dyn HttpClient>,
}

impl RotationFetcher {
    pub fn new(config: Arc<AggregatorConfig>) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: Arc<AggregatorConfig>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetch the category's own request shape (see [`Category::request`]).
    pub async fn fetch_category(&self, category: Category, request: &CategoryRequest) -> RotationResult {
        self.fetch_with_rotation(category, &request.path, &request.params)
            .await
    }

    pub async fn fetch_with_rotation(
        &self,
        category: Category,
        path: &str,
        params: &[(String, String)],
    ) -> RotationResult {
        let started = Instant::now();
        let mut attempts = Vec::new();

        for provider in self.config.rotation().providers(category) {
            let Some(descriptor) = self.config.catalog().get(provider) else {
                tracing::debug!(%category, %provider, "provider not in catalog; skipping");
                continue;
            };

            tracing::debug!(
                %category,
                %provider,
                url = %self.redacted_url(descriptor, path, params),
                "fetching from provider"
            );

            match self.attempt(descriptor, path, params).await {
                Ok(data) => {
                    tracing::info!(
                        %category,
                        %provider,
                        failed_before = attempts.len(),
                        "provider served category"
                    );
                    attempts.push(ProviderAttempt {
                        provider: provider.clone(),
                        failure: None,
                    });
                    return Ok(RotationSuccess {
                        data,
                        source: provider.clone(),
                        attempts,
                        latency_ms: elapsed_ms(started),
                    });
                }
                Err(failure) => {
                    tracing::warn!(%category, %provider, ?failure, "provider failed; trying next");
                    attempts.push(ProviderAttempt {
                        provider: provider.clone(),
                        failure: Some(failure),
                    });
                }
            }
        }

        tracing::warn!(
            %category,
            attempted = attempts.len(),
            "all sources failed for category"
        );
        Err(RotationFailure {
            category,
            attempts,
            latency_ms: elapsed_ms(started),
        })
    }

    async fn attempt(
        &self,
        descriptor: &ProviderDescriptor,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, AttemptFailure> {
        let credentials = self.config.credentials();
        let url = build_url(
            &descriptor.base_url,
            path,
            params,
            credentials.api_key_for(&descriptor.id),
        );

        let request = HttpRequest::get(url)
            .with_headers(credentials.auth_headers_for(descriptor))
            .with_header(
                "cache-control",
                format!("max-age={}", self.config.cache_hint_secs()),
            )
            .with_timeout_ms(self.config.request_timeout_ms());

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| AttemptFailure::Transport {
                message: error.message().to_owned(),
                timed_out: error.timed_out(),
            })?;

        if !response.is_success() {
            return Err(AttemptFailure::Status(response.status));
        }

        serde_json::from_str(&response.body)
            .map_err(|error| AttemptFailure::InvalidJson(error.to_string()))
    }

    fn redacted_url(&self, descriptor: &ProviderDescriptor, path: &str, params: &[(String, String)]) -> String {
        let key = self
            .config
            .credentials()
            .api_key_for(&descriptor.id)
            .map(|_| "***");
        build_url(&descriptor.base_url, path, params, key)
    }
}

/// `base + path + ?k=v&...&apikey=<key>`, with every key and value percent-encoded.
pub fn build_url(base_url: &str, path: &str, params: &[(String, String)], api_key: Option<&str>) -> String {
    let mut url = format!("{base_url}{path}");
    let mut pairs = params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect::<Vec<_>>();
    if let Some(key) = api_key {
        pairs.push(("apikey", key));
    }

    for (index, (key, value)) in pairs.into_iter().enumerate() {
        url.push(if index == 0 && !path.contains('?') { '?' } else { '&' });
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }

    url
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
