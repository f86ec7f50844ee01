pub mod ipdeny;
pub mod ripe_stat;

use std::collections::HashSet;
use std::fmt;

pub use ipdeny::IpDenySource;
pub use ripe_stat::RipeStatSource;

use crate::app::config::Config;

pub const USER_AGENT: &str = concat!("country-blocklist/", env!("CARGO_PKG_VERSION"));

/// Two-letter country identifier, e.g. "NL".
///
/// Treated as an opaque label and passed through to the providers; never
/// checked against the ISO registry. An unknown code simply fetches
/// nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ways a provider fetch can fail. Any of these degrade that provider to
/// an empty contribution; none of them abort the run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Payload(#[from] serde_json::Error),
}

/// A provider of raw range tokens for a country's address space.
pub trait RangeSource {
    fn name(&self) -> &'static str;

    /// Fetches the provider's ranges, unparsed, one token per entry.
    async fn fetch_ranges(&self, country: &CountryCode) -> Result<Vec<String>, SourceError>;
}

/// Static dispatch over the known providers.
pub enum Source {
    RipeStat(RipeStatSource),
    IpDeny(IpDenySource),
}

impl RangeSource for Source {
    fn name(&self) -> &'static str {
        match self {
            Self::RipeStat(source) => source.name(),
            Self::IpDeny(source) => source.name(),
        }
    }

    async fn fetch_ranges(&self, country: &CountryCode) -> Result<Vec<String>, SourceError> {
        match self {
            Self::RipeStat(source) => source.fetch_ranges(country).await,
            Self::IpDeny(source) => source.fetch_ranges(country).await,
        }
    }
}

/// Builds the full provider list from the configuration. The providers
/// share one HTTP client.
pub fn all_sources(config: &Config) -> Result<Vec<Source>, SourceError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    Ok(vec![
        Source::RipeStat(RipeStatSource::new(
            client.clone(),
            config.ripe_stat_base_url.clone(),
        )),
        Source::IpDeny(IpDenySource::new(client, config.ipdeny_base_url.clone())),
    ])
}

/// Queries every provider in order and unions the successful payloads as
/// raw tokens.
///
/// A failed provider contributes nothing; the failure is logged under the
/// provider's name and the run carries on with whatever the others
/// returned.
pub async fn collect_ranges(sources: &[Source], country: &CountryCode) -> HashSet<String> {
    let mut tokens = HashSet::new();

    for source in sources {
        match source.fetch_ranges(country).await {
            Ok(ranges) => {
                tracing::info!(source = source.name(), count = ranges.len(), "fetched range tokens");
                tokens.extend(ranges);
            }
            Err(error) => {
                tracing::warn!(source = source.name(), %error, "source failed, continuing without it");
            }
        }
    }

    tokens
}
