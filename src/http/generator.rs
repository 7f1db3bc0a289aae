use url::Url;

use crate::args::HttpMethod;

/// One request to issue. Every spec of a run is identical apart from `sequence`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub target: Url,
    /// 1-based issue order.
    pub sequence: u64,
}

/// Finite source of request specs, counting down from the configured total.
#[derive(Clone, Debug)]
pub struct RequestGenerator {
    method: HttpMethod,
    target: Url,
    total: u64,
    remaining: u64,
}

impl RequestGenerator {
    /// Prepares `total` requests against an already validated target.
    #[must_use]
    pub const fn new(method: HttpMethod, target: Url, total: u64) -> Self {
        Self {
            method,
            target,
            total,
            remaining: total,
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.total.saturating_sub(self.remaining)
    }
}

impl Iterator for RequestGenerator {
    type Item = RequestSpec;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(RequestSpec {
            method: self.method,
            target: self.target.clone(),
            sequence: self.issued(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}
