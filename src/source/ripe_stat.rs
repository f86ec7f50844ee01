use serde::Deserialize;

use super::{CountryCode, RangeSource, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://stat.ripe.net";

/// Registry-backed provider querying the RIPEstat country resource list.
///
/// The IPv4 entries come back as a mix of CIDR and start-end tokens; both
/// are returned as-is for the expander to classify.
#[derive(Clone, Debug)]
pub struct RipeStatSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ResourceListResponse {
    data: ResourceListData,
}

#[derive(Debug, Deserialize)]
struct ResourceListData {
    resources: Resources,
}

#[derive(Debug, Deserialize)]
struct Resources {
    ipv4: Vec<String>,
}

impl RipeStatSource {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl RangeSource for RipeStatSource {
    fn name(&self) -> &'static str {
        "ripe-stat"
    }

    async fn fetch_ranges(&self, country: &CountryCode) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/data/country-resource-list/data.json?resource={}",
            self.base_url,
            country.as_str(),
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: ResourceListResponse = serde_json::from_str(&body)?;
        Ok(response.data.resources.ipv4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method;
    use serde_json::json;

    fn make_source(server: &MockServer) -> RipeStatSource {
        RipeStatSource::new(reqwest::Client::new(), server.base_url())
    }

    #[tokio::test]
    async fn fetches_the_ipv4_resource_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::GET)
                .path("/data/country-resource-list/data.json")
                .query_param("resource", "NL");
            then.status(200).json_body(json!({
                "data": {
                    "resources": {
                        "asn": ["1103", "3333"],
                        "ipv4": ["2.56.160.0/22", "5.2.0.0-5.2.255.255"],
                        "ipv6": ["2a00:1c10::/29"]
                    },
                    "query_time": "2024-06-01T00:00:00"
                },
                "status": "ok"
            }));
        });

        let ranges = make_source(&server)
            .fetch_ranges(&CountryCode::new("NL"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(ranges, ["2.56.160.0/22", "5.2.0.0-5.2.255.255"]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/data/country-resource-list/data.json");
            then.status(503);
        });

        let result = make_source(&server).fetch_ranges(&CountryCode::new("NL")).await;

        assert!(matches!(result, Err(SourceError::Http(_))));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_payload_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/data/country-resource-list/data.json");
            then.status(200).body("<html>maintenance</html>");
        });

        let result = make_source(&server).fetch_ranges(&CountryCode::new("NL")).await;

        assert!(matches!(result, Err(SourceError::Payload(_))));
    }

    #[tokio::test]
    async fn missing_ipv4_key_is_a_payload_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/data/country-resource-list/data.json");
            then.status(200).json_body(json!({"data": {"resources": {"asn": []}}}));
        });

        let result = make_source(&server).fetch_ranges(&CountryCode::new("NL")).await;

        assert!(matches!(result, Err(SourceError::Payload(_))));
    }
}
