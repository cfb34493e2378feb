use crate::core::sink::render_lines;
use crate::core::{CertRecord, ConfigProvider, Pipeline, RegistrableDomain, Storage, SubdomainSet};
use crate::utils::error::{HarvestError, Result};
use reqwest::{Client, StatusCode};

/// Pulls every name a record lists that falls under `domain`.
/// Wildcard entries are dropped, the rest are lowercased and deduplicated.
pub fn extract_subdomains(records: &[CertRecord], domain: &RegistrableDomain) -> SubdomainSet {
    let mut subdomains = SubdomainSet::new();

    for record in records {
        tracing::trace!("{}", record.summary());
        let Some(names) = record.name_value.as_deref() else {
            continue;
        };

        for name in names.split('\n') {
            let candidate = name.trim().to_lowercase();
            if candidate.is_empty() || candidate.contains('*') {
                continue;
            }
            if domain.covers(&candidate) {
                subdomains.insert(candidate);
            } else {
                tracing::debug!("Skipping unrelated name '{}' (record {:?})", candidate, record.id);
            }
        }
    }

    subdomains
}

pub fn build_query_url(endpoint: &str, domain: &RegistrableDomain) -> String {
    format!(
        "{}/?q=%25.{}&output=json",
        endpoint.trim_end_matches('/'),
        domain
    )
}

pub struct CrtShPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> CrtShPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    /// Query and filter, keeping upstream failures distinct from an empty result.
    pub async fn harvest(&self, domain: &RegistrableDomain) -> Result<SubdomainSet> {
        let records = self.extract(domain).await?;
        Ok(self.transform(domain, records))
    }

    /// Same as `harvest`, but a failure is logged and reported as nothing found.
    pub async fn harvest_or_empty(&self, domain: &RegistrableDomain) -> SubdomainSet {
        match self.harvest(domain).await {
            Ok(subdomains) => subdomains,
            Err(e) => {
                tracing::error!("{} ({:?})", e, e.category());
                SubdomainSet::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CrtShPipeline<S, C> {
    async fn extract(&self, domain: &RegistrableDomain) -> Result<Vec<CertRecord>> {
        let url = build_query_url(self.config.endpoint(), domain);

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status != StatusCode::OK {
            return Err(HarvestError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records: Vec<CertRecord> = serde_json::from_str(&body)?;

        tracing::info!("Received {} certificate records for {}", records.len(), domain);
        Ok(records)
    }

    fn transform(&self, domain: &RegistrableDomain, records: Vec<CertRecord>) -> SubdomainSet {
        let subdomains = extract_subdomains(&records, domain);
        tracing::debug!(
            "Kept {} unique names out of {} records",
            subdomains.len(),
            records.len()
        );
        subdomains
    }

    async fn load(&self, domain: &RegistrableDomain, subdomains: &SubdomainSet) -> Result<String> {
        let file_name = domain.output_file_name();
        let contents = render_lines(subdomains);

        tracing::debug!("Writing {} lines to {}", subdomains.len(), file_name);
        self.storage.write_file(&file_name, contents.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::normalize_domain;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("mock/{}", path))
        }
    }

    struct MockConfig {
        endpoint: String,
    }

    impl MockConfig {
        fn new(endpoint: String) -> Self {
            Self { endpoint }
        }
    }

    impl ConfigProvider for MockConfig {
        fn endpoint(&self) -> &str {
            &self.endpoint
        }

        fn output_dir(&self) -> &str {
            "mock"
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    fn record(name_value: &str) -> CertRecord {
        CertRecord {
            name_value: Some(name_value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_drops_wildcards_and_lowercases() {
        let domain = normalize_domain("example.com").unwrap();
        let records = vec![record("a.example.com\n*.b.example.com\nEXAMPLE.COM")];

        let subdomains = extract_subdomains(&records, &domain);

        let expected: SubdomainSet = ["a.example.com", "example.com"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(subdomains, expected);
    }

    #[test]
    fn test_extract_excludes_unrelated_hosts() {
        let domain = normalize_domain("example.com").unwrap();
        let records = vec![
            record("evil.com\nnotexample.com\n  api.example.com  "),
            CertRecord::default(),
            record("api.example.com\n\n"),
        ];

        let subdomains = extract_subdomains(&records, &domain);

        assert_eq!(subdomains.len(), 1);
        assert!(subdomains.contains("api.example.com"));
    }

    #[test]
    fn test_build_query_url() {
        let domain = normalize_domain("example.com").unwrap();
        assert_eq!(
            build_query_url("https://crt.sh/", &domain),
            "https://crt.sh/?q=%25.example.com&output=json"
        );
    }

    #[tokio::test]
    async fn test_harvest_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/")
                .query_param("output", "json")
                .query_param_exists("q");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 1, "name_value": "a.example.com\n*.b.example.com\nEXAMPLE.COM"},
                    {"id": 2, "name_value": "evil.com"},
                    {"id": 3, "issuer_name": "C=US, O=Let's Encrypt"}
                ]));
        });

        let pipeline = CrtShPipeline::new(MockStorage::new(), MockConfig::new(server.base_url()))
            .unwrap();
        let domain = normalize_domain("example.com").unwrap();

        let subdomains = pipeline.harvest(&domain).await.unwrap();

        api_mock.assert();
        assert_eq!(
            subdomains.into_iter().collect::<Vec<_>>(),
            vec!["a.example.com", "example.com"]
        );
    }

    #[tokio::test]
    async fn test_harvest_status_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        });

        let pipeline = CrtShPipeline::new(MockStorage::new(), MockConfig::new(server.base_url()))
            .unwrap();
        let domain = normalize_domain("example.com").unwrap();

        let result = pipeline.harvest(&domain).await;
        assert!(matches!(result, Err(HarvestError::UpstreamStatus { status: 500 })));

        let fallback = pipeline.harvest_or_empty(&domain).await;
        assert!(fallback.is_empty());
        api_mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_harvest_rejects_non_200_success_codes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(204);
        });

        let pipeline = CrtShPipeline::new(MockStorage::new(), MockConfig::new(server.base_url()))
            .unwrap();
        let domain = normalize_domain("example.com").unwrap();

        let result = pipeline.harvest(&domain).await;
        assert!(matches!(result, Err(HarvestError::UpstreamStatus { status: 204 })));
    }

    #[tokio::test]
    async fn test_harvest_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("<html>crt.sh is overloaded</html>");
        });

        let pipeline = CrtShPipeline::new(MockStorage::new(), MockConfig::new(server.base_url()))
            .unwrap();
        let domain = normalize_domain("example.com").unwrap();

        let result = pipeline.harvest(&domain).await;
        assert!(matches!(result, Err(HarvestError::UpstreamParse(_))));
    }

    #[tokio::test]
    async fn test_harvest_transport_error() {
        // Nothing listens on port 1.
        let pipeline = CrtShPipeline::new(
            MockStorage::new(),
            MockConfig::new("http://127.0.0.1:1".to_string()),
        )
        .unwrap();
        let domain = normalize_domain("example.com").unwrap();

        let result = pipeline.harvest(&domain).await;
        assert!(matches!(result, Err(HarvestError::Transport(_))));
        assert!(pipeline.harvest_or_empty(&domain).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_writes_sorted_lines() {
        let storage = MockStorage::new();
        let pipeline =
            CrtShPipeline::new(storage.clone(), MockConfig::new("http://test".to_string())).unwrap();
        let domain = normalize_domain("example.com").unwrap();

        let subdomains: SubdomainSet = ["b.example.com", "a.example.com"]
            .into_iter()
            .map(String::from)
            .collect();

        let path = pipeline.load(&domain, &subdomains).await.unwrap();

        assert_eq!(path, "mock/example.com_subdomains.txt");
        let data = storage.get_file("example.com_subdomains.txt").await.unwrap();
        assert_eq!(String::from_utf8(data).unwrap(), "a.example.com\nb.example.com\n");
    }
}
