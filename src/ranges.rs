use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;

/// A single range expression as delivered by a provider.
///
/// Tokens are classified by their separator: `/` means a CIDR network, `-`
/// means an inclusive start-end interval, anything else is a lone address.
/// Classification happens once, at parse time, so downstream code only ever
/// dispatches on the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeToken {
    /// A CIDR network. Parsing is non-strict: host bits set in the base
    /// address are tolerated and preserved, the way the data feeds publish
    /// them; the network and broadcast addresses derive from the prefix.
    Network(Ipv4Net),

    /// An inclusive `start-end` interval. A reversed interval (start above
    /// end) parses fine and denotes the empty set; no automatic swap.
    Interval { start: Ipv4Addr, end: Ipv4Addr },

    /// A bare address.
    Single(Ipv4Addr),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseTokenError {
    #[error("invalid network: {0}")]
    Network(#[from] ipnet::AddrParseError),

    #[error("invalid address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("expected exactly two interval endpoints")]
    IntervalShape,
}

impl FromStr for RangeToken {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('/') {
            Ok(Self::Network(s.parse()?))
        } else if s.contains('-') {
            let mut endpoints = s.split('-');
            match (endpoints.next(), endpoints.next(), endpoints.next()) {
                (Some(start), Some(end), None) => Ok(Self::Interval {
                    start: start.trim().parse()?,
                    end: end.trim().parse()?,
                }),
                _ => Err(ParseTokenError::IntervalShape),
            }
        } else {
            Ok(Self::Single(s.parse()?))
        }
    }
}

impl RangeToken {
    /// The inclusive span of address values this token denotes, if any.
    ///
    /// Networks exclude their network and broadcast addresses, so a `/31`
    /// or `/32` denotes no hosts at all. The arithmetic is checked so the
    /// edges of the address space (`0.0.0.0/32`, `255.255.255.255/32`)
    /// cannot wrap.
    pub fn host_span(&self) -> Option<(u32, u32)> {
        match *self {
            Self::Network(net) => {
                let start = u32::from(net.network()).checked_add(1)?;
                let end = u32::from(net.broadcast()).checked_sub(1)?;
                (start <= end).then_some((start, end))
            }
            Self::Interval { start, end } => {
                let (start, end) = (u32::from(start), u32::from(end));
                (start <= end).then_some((start, end))
            }
            Self::Single(addr) => {
                let value = u32::from(addr);
                Some((value, value))
            }
        }
    }

    /// Every address the token denotes, ascending.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> {
        self.host_span()
            .map(|(start, end)| start..=end)
            .into_iter()
            .flatten()
            .map(Ipv4Addr::from)
    }
}

/// Accumulates the host spans denoted by a batch of range tokens.
///
/// Spans are kept as inclusive u32 intervals and nothing is enumerated
/// until the sorted form is iterated, so a `/8` token costs one entry here
/// rather than sixteen million strings.
#[derive(Debug, Default)]
pub struct AddressSet {
    spans: Vec<(u32, u32)>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &RangeToken) {
        if let Some(span) = token.host_span() {
            self.spans.push(span);
        }
    }

    /// Normalizes into ascending, deduplicated form: spans are sorted and
    /// overlapping or adjacent spans coalesced.
    pub fn into_sorted(mut self) -> SortedAddresses {
        self.spans.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(self.spans.len());
        for (start, end) in self.spans {
            match merged.last_mut() {
                Some((_, last_end)) if start <= last_end.saturating_add(1) => {
                    *last_end = (*last_end).max(end);
                }
                _ => merged.push((start, end)),
            }
        }

        SortedAddresses { spans: merged }
    }
}

/// A deduplicated address set in ascending numeric order.
///
/// Spans are disjoint and non-adjacent after normalization, so iteration
/// yields every address exactly once and the length is the plain sum of the
/// span widths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedAddresses {
    spans: Vec<(u32, u32)>,
}

impl SortedAddresses {
    /// Exact number of addresses. Computed from the span widths; the full
    /// address space is representable, hence u64.
    pub fn len(&self) -> u64 {
        self.spans
            .iter()
            .map(|&(start, end)| u64::from(end) - u64::from(start) + 1)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Lazily yields every address once, ascending.
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.spans
            .iter()
            .flat_map(|&(start, end)| (start..=end).map(Ipv4Addr::from))
    }
}

/// Expands a batch of raw range tokens into a sorted address set.
///
/// Tokens are independent: a malformed token is logged and skipped, and
/// never aborts the rest of the batch.
pub fn expand<'a, I>(raw_tokens: I) -> SortedAddresses
where
    I: IntoIterator<Item = &'a str>,
{
    let mut set = AddressSet::new();

    for raw in raw_tokens {
        match raw.parse::<RangeToken>() {
            Ok(token) => set.insert(&token),
            Err(error) => {
                tracing::warn!(token = raw, %error, "skipping malformed range token");
            }
        }
    }

    set.into_sorted()
}
