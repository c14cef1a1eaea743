//! API configuration registry
//!
//! Holds the built-in demo configurations plus any loaded from the user's
//! config directory. Constructed once at startup and shared by `Arc`.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{ExplorerError, Result};
use crate::models::{ApiConfiguration, ApiEndpoint};

const BUILTIN_CONFIGS: &[(&str, &str)] = &[
    ("ecommerce.yaml", include_str!("data/ecommerce.yaml")),
    ("fastapi.yaml", include_str!("data/fastapi.yaml")),
    ("finance.yaml", include_str!("data/finance.yaml")),
];

/// Summary counts over every registered configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_apis: usize,
    pub total_endpoints: usize,
    pub authentication_types: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    configs: Vec<ApiConfiguration>,
}

impl Registry {
    pub fn new(configs: Vec<ApiConfiguration>) -> Self {
        Registry { configs }
    }

    /// Registry with the three compiled-in demo APIs
    pub fn builtin() -> Result<Self> {
        let configs = BUILTIN_CONFIGS
            .iter()
            .map(|(name, source)| parse_config(name, source, ConfigFormat::Yaml))
            .collect::<Result<Vec<_>>>()?;
        Ok(Registry { configs })
    }

    pub fn all(&self) -> &[ApiConfiguration] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ApiConfiguration> {
        self.configs.iter().find(|c| c.id == id)
    }

    pub fn try_get(&self, id: &str) -> Result<&ApiConfiguration> {
        self.get(id)
            .ok_or_else(|| ExplorerError::UnknownApi(id.to_string()))
    }

    /// Look up an endpoint, failing on either an unknown API or endpoint
    pub fn endpoint(&self, api_id: &str, endpoint_id: &str) -> Result<(&ApiConfiguration, &ApiEndpoint)> {
        let config = self.try_get(api_id)?;
        let endpoint = config
            .endpoint(endpoint_id)
            .ok_or_else(|| ExplorerError::UnknownEndpoint {
                api: api_id.to_string(),
                endpoint: endpoint_id.to_string(),
            })?;
        Ok((config, endpoint))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&ApiConfiguration> {
        self.configs
            .iter()
            .filter(|c| c.categories.iter().any(|cat| cat == category))
            .collect()
    }

    /// Case-insensitive substring search over name and description
    pub fn search(&self, query: &str) -> Vec<&ApiConfiguration> {
        let query = query.to_lowercase();
        self.configs
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// First registered configuration
    pub fn default_api(&self) -> Option<&ApiConfiguration> {
        self.configs.first()
    }

    pub fn stats(&self) -> RegistryStats {
        let mut auth_types = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for config in &self.configs {
            if let Some(auth) = &config.authentication {
                auth_types.insert(auth.auth_type.id().to_string());
            }
            categories.extend(config.categories.iter().cloned());
        }

        RegistryStats {
            total_apis: self.configs.len(),
            total_endpoints: self.configs.iter().map(|c| c.endpoints.len()).sum(),
            authentication_types: auth_types.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Add or replace a configuration by id
    pub fn insert(&mut self, config: ApiConfiguration) {
        match self.configs.iter_mut().find(|c| c.id == config.id) {
            Some(existing) => *existing = config,
            None => self.configs.push(config),
        }
    }

    /// Load every `*.yaml`, `*.yml` and `*.json` file in `dir`.
    ///
    /// A missing directory is not an error. Returns how many configurations
    /// were loaded; a file that fails to parse aborts the load.
    pub fn extend_from_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let format = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => ConfigFormat::Yaml,
                Some("json") => ConfigFormat::Json,
                _ => continue,
            };

            let source = fs::read_to_string(&path)?;
            let name = path.display().to_string();
            let config = parse_config(&name, &source, format)?;
            tracing::info!(id = %config.id, path = %name, "Loaded API configuration");
            self.insert(config);
            loaded += 1;
        }

        Ok(loaded)
    }
}

#[derive(Clone, Copy)]
enum ConfigFormat {
    Yaml,
    Json,
}

fn parse_config(name: &str, source: &str, format: ConfigFormat) -> Result<ApiConfiguration> {
    let parsed = match format {
        ConfigFormat::Yaml => serde_yaml::from_str::<ApiConfiguration>(source).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str::<ApiConfiguration>(source).map_err(|e| e.to_string()),
    };

    let config = parsed.map_err(|reason| ExplorerError::InvalidConfiguration {
        source_name: name.to_string(),
        reason,
    })?;

    if config.id.trim().is_empty() {
        return Err(ExplorerError::InvalidConfiguration {
            source_name: name.to_string(),
            reason: String::from("configuration id is empty"),
        });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthenticationType, HttpMethod, KeyLocation};

    #[test]
    fn test_builtin_configs_parse() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.ids(), vec!["ecommerce-api", "fastapi-template", "finance-mcp"]);
        assert_eq!(registry.default_api().unwrap().id, "ecommerce-api");
    }

    #[test]
    fn test_finance_endpoint_catalog() {
        let registry = Registry::builtin().unwrap();
        let ids: Vec<&str> = registry
            .try_get("finance-mcp")
            .unwrap()
            .endpoints
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "get-market-status",
                "get-market-overview",
                "get-stock-quote",
                "get-stock-history",
                "search-stocks",
                "get-crypto-quote",
                "get-top-cryptos",
                "get-market-news",
                "get-stock-news",
                "get-technical-indicators",
            ]
        );

        let (_, news) = registry.endpoint("finance-mcp", "get-stock-news").unwrap();
        assert_eq!(news.path, "/stocks/{symbol}/news");
        let params = news.parameters.as_ref().unwrap();
        assert_eq!(params.path["symbol"].required, Some(true));
        let limit = &params.query["limit"];
        assert_eq!(limit.default, Some(serde_json::json!(10)));
        assert_eq!(limit.max, Some(50.0));
    }

    #[test]
    fn test_endpoint_lookup() {
        let registry = Registry::builtin().unwrap();
        let (config, endpoint) = registry.endpoint("finance-mcp", "get-stock-quote").unwrap();
        assert_eq!(config.base_url, "https://api.finance-mcp.example.com/v1");
        assert_eq!(endpoint.method, HttpMethod::GET);
        assert_eq!(endpoint.path, "/stocks/{symbol}/quote");

        let auth = config.authentication.as_ref().unwrap();
        assert_eq!(auth.auth_type, AuthenticationType::ApiKey);
        assert_eq!(auth.location, Some(KeyLocation::Header));
        assert_eq!(auth.parameter_name.as_deref(), Some("X-API-Key"));
    }

    #[test]
    fn test_unknown_lookups_fail() {
        let registry = Registry::builtin().unwrap();
        assert!(matches!(
            registry.try_get("nope"),
            Err(ExplorerError::UnknownApi(id)) if id == "nope"
        ));
        assert!(matches!(
            registry.endpoint("finance-mcp", "nope"),
            Err(ExplorerError::UnknownEndpoint { .. })
        ));
    }

    #[test]
    fn test_search_and_category() {
        let registry = Registry::builtin().unwrap();

        let found: Vec<_> = registry.search("FASTAPI").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(found, vec!["fastapi-template"]);

        let found: Vec<_> = registry.search("market data").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(found, vec!["finance-mcp"]);

        let cart: Vec<_> = registry.by_category("Cart").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(cart, vec!["ecommerce-api"]);
        assert!(registry.by_category("Nope").is_empty());
    }

    #[test]
    fn test_stats() {
        let registry = Registry::builtin().unwrap();
        let stats = registry.stats();
        assert_eq!(stats.total_apis, 3);
        assert_eq!(
            stats.total_endpoints,
            registry.all().iter().map(|c| c.endpoints.len()).sum::<usize>()
        );
        assert_eq!(stats.authentication_types, vec!["apiKey", "bearer"]);
        assert!(stats.categories.contains(&String::from("Stocks")));
    }

    #[test]
    fn test_extend_from_dir_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("local.json"),
            r#"{"id":"local","name":"Local","baseUrl":"http://localhost:8000","version":"0.1.0",
                "endpoints":[{"id":"ping","name":"Ping","method":"GET","path":"/ping"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("finance.yml"),
            "id: finance-mcp\nname: Finance Override\nbaseUrl: http://localhost:9000\nversion: 2.0.0\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = Registry::builtin().unwrap();
        let loaded = registry.extend_from_dir(dir.path()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("finance-mcp").unwrap().name, "Finance Override");
        assert!(registry.endpoint("local", "ping").is_ok());
    }

    #[test]
    fn test_extend_from_dir_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.yaml"), "id: [unterminated").unwrap();

        let mut registry = Registry::default();
        let err = registry.extend_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let mut registry = Registry::default();
        let loaded = registry
            .extend_from_dir(Path::new("/definitely/not/here"))
            .unwrap();
        assert_eq!(loaded, 0);
        assert!(registry.is_empty());
    }
}
