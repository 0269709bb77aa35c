//! Provider identifiers, descriptors and the built-in catalog.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Unique provider key such as `coingecko`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyProviderId);
        }

        if let Some(ch) = normalized
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-'))
        {
            return Err(ValidationError::InvalidProviderId {
                value: normalized,
                ch,
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `SIGFUSE_<ID>_API_KEY`, the preferred environment variable for this provider's key.
    pub fn prefixed_env_var(&self) -> String {
        format!(
            "SIGFUSE_{}_API_KEY",
            self.0.to_ascii_uppercase().replace('-', "_")
        )
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProviderId> for String {
    fn from(value: ProviderId) -> Self {
        value.0
    }
}

/// How a configured API key is presented to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    #[default]
    Bearer,
    /// Key sent verbatim in a provider-specific header.
    Header { name: String },
    /// Provider requires a per-request signature. Not implemented; no auth header is sent.
    SignedRequest,
}

/// Static description of one external data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub rate_limit: Option<String>,
    #[serde(default)]
    pub auth: AuthScheme,
    /// Environment variable consulted for the key after the `SIGFUSE_` prefixed one.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderDescriptor {
    pub fn new(
        id: ProviderId,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let descriptor = Self {
            id,
            name: name.into(),
            base_url: base_url.into(),
            requires_auth: false,
            rate_limit: None,
            auth: AuthScheme::Bearer,
            api_key_env: None,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_requires_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: impl Into<String>) -> Self {
        self.rate_limit = Some(rate_limit.into());
        self
    }

    pub fn with_api_key_env(mut self, env_var: impl Into<String>) -> Self {
        self.api_key_env = Some(env_var.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.starts_with("https://") || self.base_url.starts_with("http://") {
            Ok(())
        } else {
            Err(ValidationError::InvalidBaseUrl {
                id: self.id.to_string(),
                value: self.base_url.clone(),
            })
        }
    }
}

/// Registry of provider descriptors keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCatalog {
    providers: BTreeMap<ProviderId, ProviderDescriptor>,
}

impl ProviderCatalog {
    pub fn new(providers: impl IntoIterator<Item = ProviderDescriptor>) -> Self {
        let mut catalog = Self::default();
        for descriptor in providers {
            catalog.insert(descriptor);
        }
        catalog
    }

    /// Descriptors for every provider the aggregator knows out of the box.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_PROVIDERS.iter().map(BuiltinProvider::descriptor))
    }

    /// Insert or replace a descriptor, returning the previous one.
    pub fn insert(&mut self, descriptor: ProviderDescriptor) -> Option<ProviderDescriptor> {
        self.providers.insert(descriptor.id.clone(), descriptor)
    }

    pub fn get(&self, id: &ProviderId) -> Option<&ProviderDescriptor> {
        self.providers.get(id)
    }

    pub fn contains(&self, id: &ProviderId) -> bool {
        self.providers.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

struct BuiltinProvider {
    id: &'static str,
    name: &'static str,
    base_url: &'static str,
    requires_auth: bool,
    rate_limit: &'static str,
    auth: BuiltinAuth,
    api_key_env: Option<&'static str>,
}

enum BuiltinAuth {
    Bearer,
    Header(&'static str),
    Signed,
}

impl BuiltinProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        let auth = match self.auth {
            BuiltinAuth::Bearer => AuthScheme::Bearer,
            BuiltinAuth::Header(name) => AuthScheme::Header {
                name: name.to_owned(),
            },
            BuiltinAuth::Signed => AuthScheme::SignedRequest,
        };

        ProviderDescriptor {
            id: ProviderId(self.id.to_owned()),
            name: self.name.to_owned(),
            base_url: self.base_url.to_owned(),
            requires_auth: self.requires_auth,
            rate_limit: Some(self.rate_limit.to_owned()),
            auth,
            api_key_env: self.api_key_env.map(str::to_owned),
        }
    }
}

macro_rules! builtin {
    ($id:literal, $name:literal, $url:literal, $requires:literal, $rate:literal, $auth:expr, $env:expr) => {
        BuiltinProvider {
            id: $id,
            name: $name,
            base_url: $url,
            requires_auth: $requires,
            rate_limit: $rate,
            auth: $auth,
            api_key_env: $env,
        }
    };
}

const BUILTIN_PROVIDERS: &[BuiltinProvider] = &[
    // price
    builtin!("coingecko", "CoinGecko", "https://api.coingecko.com/api/v3", true, "10-30 calls/minute", BuiltinAuth::Header("x-cg-pro-api-key"), Some("COINGECKO_API_KEY")),
    builtin!("coinmarketcap", "CoinMarketCap", "https://pro-api.coinmarketcap.com/v1", true, "333 calls/day (free tier)", BuiltinAuth::Header("X-CMC_PRO_API_KEY"), Some("COINMARKETCAP_API_KEY")),
    builtin!("coinlayer", "CoinLayer", "https://api.coinlayer.com", true, "100 calls/month (free tier)", BuiltinAuth::Bearer, Some("COINLAYER_API_KEY")),
    builtin!("coinglass", "CoinGlass", "https://open-api.coinglass.com/public/v2", true, "varies by tier", BuiltinAuth::Bearer, Some("COINGLASS_API_KEY")),
    // exchange
    builtin!("binance", "Binance", "https://api.binance.com/api/v3", false, "1200 weight/minute", BuiltinAuth::Bearer, Some("BINANCE_API_KEY")),
    builtin!("coinbase", "Coinbase", "https://api.exchange.coinbase.com", false, "10 calls/second", BuiltinAuth::Bearer, Some("COINBASE_API_KEY")),
    builtin!("kraken", "Kraken", "https://api.kraken.com/0", false, "15 calls/second", BuiltinAuth::Bearer, Some("KRAKEN_API_KEY")),
    builtin!("okx", "OKX", "https://www.okx.com/api/v5", false, "20 calls/2 seconds", BuiltinAuth::Signed, Some("OKX_API_KEY")),
    // onchain
    builtin!("glassnode", "Glassnode", "https://api.glassnode.com/v1", true, "10 calls/minute (free tier)", BuiltinAuth::Bearer, Some("GLASSNODE_API_KEY")),
    builtin!("intotheblock", "IntoTheBlock", "https://api.intotheblock.com/v1", true, "varies by tier", BuiltinAuth::Bearer, Some("INTOTHEBLOCK_API_KEY")),
    builtin!("etherscan", "Etherscan", "https://api.etherscan.io/api", true, "5 calls/second", BuiltinAuth::Bearer, Some("ETHERSCAN_API_KEY")),
    builtin!("debank", "DeBank", "https://pro-openapi.debank.com/v1", true, "varies by tier", BuiltinAuth::Bearer, Some("DEBANK_API_KEY")),
    builtin!("flipside", "Flipside", "https://api-v2.flipsidecrypto.xyz", true, "varies by tier", BuiltinAuth::Bearer, Some("FLIPSIDE_API_KEY")),
    builtin!("wallet_tracker", "Crypto Wallet Tracker", "https://api.cryptowallet.com/v1", true, "varies by tier", BuiltinAuth::Bearer, Some("CRYPTO_WALLET_TRACKER_API_KEY")),
    builtin!("whale_alert", "Whale Alert", "https://api.whale-alert.io/v1", true, "10 calls/minute (free tier)", BuiltinAuth::Bearer, Some("WHALE_ALERT_API_KEY")),
    builtin!("ethgasstation", "ETH Gas Station", "https://ethgasstation.info/api", false, "no strict limit", BuiltinAuth::Bearer, None),
    // social
    builtin!("lunarcrush", "LunarCrush", "https://api.lunarcrush.com/v2", true, "varies by tier", BuiltinAuth::Bearer, Some("LUNARCRUSH_API_KEY")),
    builtin!("santiment", "Santiment", "https://api.santiment.net/graphql", true, "varies by tier", BuiltinAuth::Bearer, Some("SANTIMENT_API_KEY")),
    builtin!("cryptometer", "Cryptometer", "https://cryptometer.io/api/v1", true, "varies by tier", BuiltinAuth::Bearer, Some("CRYPTOMETER_API_KEY")),
    // news
    builtin!("cryptopanic", "CryptoPanic", "https://cryptopanic.com/api/v1", true, "varies by tier", BuiltinAuth::Bearer, Some("CRYPTOPANIC_API_KEY")),
    builtin!("newsapi", "NewsAPI", "https://newsapi.org/v2", true, "100 calls/day (free tier)", BuiltinAuth::Bearer, Some("NEWSAPI_API_KEY")),
    // defi
    builtin!("defillama", "DefiLlama", "https://api.llama.fi", false, "no strict limit", BuiltinAuth::Bearer, None),
    builtin!("dexscreener", "DexScreener", "https://api.dexscreener.com/latest", false, "300 calls/minute", BuiltinAuth::Bearer, None),
    builtin!("dextools", "DEXTools", "https://api.dextools.io/v1", true, "varies by tier", BuiltinAuth::Bearer, Some("DEXTOOLS_API_KEY")),
    // technical
    builtin!("tradingview", "TradingView Scanner", "https://scanner.tradingview.com", false, "unpublished", BuiltinAuth::Bearer, None),
    builtin!("taapi", "TAAPI.IO", "https://api.taapi.io", true, "1 call/15 seconds (free tier)", BuiltinAuth::Bearer, Some("TAAPI_API_KEY")),
    builtin!("cryptocompare", "CryptoCompare", "https://min-api.cryptocompare.com/data", true, "100k calls/month (free tier)", BuiltinAuth::Bearer, Some("CRYPTOCOMPARE_API_KEY")),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> ProviderId {
        ProviderId::parse(value).expect("valid provider id")
    }

    #[test]
    fn provider_id_is_normalized_to_lowercase() {
        assert_eq!(id(" CoinGecko ").as_str(), "coingecko");
    }

    #[test]
    fn provider_id_rejects_url_characters() {
        let err = ProviderId::parse("coin/gecko").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidProviderId { ch: '/', .. }));
    }

    #[test]
    fn prefixed_env_var_is_uppercase_with_underscores() {
        assert_eq!(id("wallet-tracker").prefixed_env_var(), "SIGFUSE_WALLET_TRACKER_API_KEY");
    }

    #[test]
    fn builtin_catalog_describes_every_default_rotation_member() {
        let catalog = ProviderCatalog::builtin();
        for name in [
            "coingecko", "coinmarketcap", "coinlayer", "binance", "okx", "coinbase", "kraken",
            "glassnode", "debank", "flipside", "lunarcrush", "cryptometer", "cryptocompare", "taapi",
        ] {
            assert!(catalog.contains(&id(name)), "missing builtin provider {name}");
        }
        assert!(catalog.iter().all(|descriptor| descriptor.validate().is_ok()));
    }

    #[test]
    fn builtin_auth_rules_match_provider_families() {
        let catalog = ProviderCatalog::builtin();
        let auth = |name: &str| catalog.get(&id(name)).map(|d| d.auth.clone());

        assert_eq!(
            auth("coinmarketcap"),
            Some(AuthScheme::Header {
                name: String::from("X-CMC_PRO_API_KEY")
            })
        );
        assert_eq!(auth("okx"), Some(AuthScheme::SignedRequest));
        assert_eq!(auth("lunarcrush"), Some(AuthScheme::Bearer));
    }

    #[test]
    fn descriptor_rejects_relative_base_url() {
        let err = ProviderDescriptor::new(id("local"), "Local", "localhost:8080")
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let descriptor: ProviderDescriptor = serde_json::from_str(
            r#"{"id":"mirror","name":"Mirror","base_url":"https://mirror.test",
                "auth":{"type":"header","name":"X-Key"}}"#,
        )
        .expect("descriptor should deserialize");

        assert_eq!(descriptor.id.as_str(), "mirror");
        assert!(!descriptor.requires_auth);
        assert_eq!(
            descriptor.auth,
            AuthScheme::Header {
                name: String::from("X-Key")
            }
        );
        assert_eq!(descriptor.api_key_env, None);
    }
}
