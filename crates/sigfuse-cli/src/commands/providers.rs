use serde::Serialize;

use sigfuse_core::{AggregatorConfig, Category, ProviderId};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ProviderStatus {
    id: ProviderId,
    name: String,
    base_url: String,
    requires_auth: bool,
    key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct CategoryRotation {
    category: Category,
    weight: f64,
    providers: Vec<ProviderStatus>,
}

#[derive(Debug, Serialize)]
struct DanglingProvider {
    category: Category,
    id: ProviderId,
}

#[derive(Debug, Serialize)]
struct ProvidersResponseData {
    rotation: Vec<CategoryRotation>,
    dangling: Vec<DanglingProvider>,
    request_timeout_ms: u64,
}

pub fn run(config: &AggregatorConfig) -> Result<CommandResult, CliError> {
    let rotation = Category::ALL
        .into_iter()
        .map(|category| CategoryRotation {
            category,
            weight: category.weight(),
            providers: config
                .rotation()
                .providers(category)
                .iter()
                .filter_map(|id| config.catalog().get(id))
                .map(|descriptor| ProviderStatus {
                    id: descriptor.id.clone(),
                    name: descriptor.name.clone(),
                    base_url: descriptor.base_url.clone(),
                    requires_auth: descriptor.requires_auth,
                    key_configured: config.credentials().has_key(&descriptor.id),
                    rate_limit: descriptor.rate_limit.clone(),
                })
                .collect(),
        })
        .collect();

    let dangling = config
        .dangling_providers()
        .into_iter()
        .map(|(category, id)| DanglingProvider { category, id })
        .collect();

    let data = serde_json::to_value(ProvidersResponseData {
        rotation,
        dangling,
        request_timeout_ms: config.request_timeout_ms(),
    })?;

    Ok(CommandResult::ok(data))
}

#[cfg(test)]
mod tests {
    use sigfuse_core::ProviderId;

    use super::*;

    #[test]
    fn listing_reports_key_presence_but_never_the_key() {
        let config = AggregatorConfig::builder()
            .with_api_key(ProviderId::parse("coingecko").expect("id"), "secret-key")
            .build()
            .expect("config");

        let data = run(&config).expect("listing").data;
        let rendered = data.to_string();

        assert!(!rendered.contains("secret-key"));
        assert_eq!(data["rotation"][0]["category"], "price");
        assert_eq!(data["rotation"][0]["providers"][0]["id"], "coingecko");
        assert_eq!(data["rotation"][0]["providers"][0]["key_configured"], true);
        assert_eq!(data["rotation"][0]["providers"][1]["key_configured"], false);
    }

    #[test]
    fn dangling_rotation_ids_are_listed_separately() {
        let config = AggregatorConfig::builder()
            .with_rotation(
                Category::Social,
                vec![ProviderId::parse("ghost").expect("id")],
            )
            .build()
            .expect("config");

        let data = run(&config).expect("listing").data;

        assert_eq!(data["dangling"][0]["category"], "social");
        assert_eq!(data["dangling"][0]["id"], "ghost");
        assert_eq!(data["rotation"][2]["providers"], serde_json::json!([]));
    }
}
