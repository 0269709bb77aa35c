//! Scripted in-memory transport shared by the behaviour tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use sigfuse_core::{
    AggregatorConfig, AggregatorConfigBuilder, Category, HttpClient, HttpError, HttpRequest,
    HttpResponse, ProviderCatalog, ProviderDescriptor, ProviderId, RotationTable,
};

type Reply = Result<HttpResponse, HttpError>;

/// Answers by the first URL prefix that matches; unmatched URLs fail at transport level.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Vec<(String, Reply)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url_prefix: &str, reply: Reply) -> Self {
        self.routes.push((url_prefix.to_owned(), reply));
        self
    }

    pub fn json(self, url_prefix: &str, body: serde_json::Value) -> Self {
        self.respond(url_prefix, Ok(HttpResponse::ok_json(body.to_string())))
    }

    pub fn status(self, url_prefix: &str, status: u16) -> Self {
        self.respond(url_prefix, Ok(HttpResponse::with_status(status, "{}")))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }

    pub fn calls_to(&self, url_prefix: &str) -> usize {
        self.urls()
            .iter()
            .filter(|url| url.starts_with(url_prefix))
            .count()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let reply = self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Err(HttpError::new(format!("no route for {}", request.url))));
        self.requests.lock().expect("request log").push(request);

        Box::pin(async move { reply })
    }
}

pub fn id(value: &str) -> ProviderId {
    ProviderId::parse(value).expect("valid provider id")
}

pub fn descriptor(name: &str) -> ProviderDescriptor {
    ProviderDescriptor::new(id(name), name, format!("https://{name}.test"))
        .expect("valid descriptor")
}

/// Config over `*.test` providers; every category rotates through `providers`.
pub fn test_config(providers: &[&str]) -> AggregatorConfigBuilder {
    let catalog = ProviderCatalog::new(providers.iter().map(|name| descriptor(name)));
    let mut rotation = RotationTable::empty();
    for category in Category::ALL {
        rotation.set(category, providers.iter().map(|name| id(name)).collect());
    }

    AggregatorConfig::builder()
        .with_catalog(catalog)
        .with_rotation_table(rotation)
}

/// One dedicated `*.test` provider per category, named after it.
pub fn per_category_config() -> AggregatorConfigBuilder {
    let mut builder = AggregatorConfig::builder()
        .with_catalog(ProviderCatalog::default())
        .with_rotation_table(RotationTable::empty());
    for category in Category::ALL {
        builder = builder
            .with_provider(descriptor(category.as_str()))
            .with_rotation(category, vec![id(category.as_str())]);
    }
    builder
}

pub fn shared(config: AggregatorConfig) -> Arc<AggregatorConfig> {
    Arc::new(config)
}
