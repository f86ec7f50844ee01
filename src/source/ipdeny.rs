use super::{CountryCode, RangeSource, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://www.ipdeny.com";

/// Zone-file provider fetching the ipdeny per-country CIDR aggregate.
///
/// Zone files are plain text, one CIDR per line, and are published under
/// the lowercased country code.
#[derive(Clone, Debug)]
pub struct IpDenySource {
    client: reqwest::Client,
    base_url: String,
}

impl IpDenySource {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl RangeSource for IpDenySource {
    fn name(&self) -> &'static str {
        "ipdeny"
    }

    async fn fetch_ranges(&self, country: &CountryCode) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/ipblocks/data/countries/{}.zone",
            self.base_url,
            country.as_str().to_ascii_lowercase(),
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        // Zone files ship with trailing newlines and occasionally CRLF;
        // only non-blank lines are tokens.
        Ok(body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }
}
