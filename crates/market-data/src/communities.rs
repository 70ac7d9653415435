//! Community link lookup for snapshots and details.
//!
//! The mapping from symbol to discussion community is deployment data, not
//! market data, so it is injected behind a trait. The default
//! [`NullCommunityLookup`] resolves nothing.

use std::collections::HashMap;

/// Resolves a symbol (or its display name) to a community discussion URL.
pub trait CommunityLookup: Send + Sync {
    fn community_url(&self, symbol: &str, name: &str) -> Option<String>;
}

/// Lookup that never resolves. Default for callers without community data.
pub struct NullCommunityLookup;

impl CommunityLookup for NullCommunityLookup {
    fn community_url(&self, _symbol: &str, _name: &str) -> Option<String> {
        None
    }
}

/// Fixed symbol-to-URL table, matched case-insensitively on the symbol.
pub struct StaticCommunityLookup {
    by_symbol: HashMap<String, String>,
}

impl StaticCommunityLookup {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            by_symbol: entries
                .into_iter()
                .map(|(symbol, url)| (symbol.to_uppercase(), url))
                .collect(),
        }
    }
}

impl CommunityLookup for StaticCommunityLookup {
    fn community_url(&self, symbol: &str, _name: &str) -> Option<String> {
        self.by_symbol.get(&symbol.to_uppercase()).cloned()
    }
}
