//! Ticker alias resolution.
//!
//! Canadian listings are frequently requested without their Toronto exchange
//! suffix ("VFV" for "VFV.TO"). [`resolve_with_alias`] tries the symbol as
//! given and, on failure, retries exactly once with the `.TO` suffix
//! appended. When both attempts fail the original error is propagated, since
//! it carries the more informative failure context.

use std::future::Future;

use log::debug;

use crate::errors::FetchError;

/// Toronto Stock Exchange suffix used as the single alias candidate.
pub const TSX_SUFFIX: &str = ".TO";

/// Uppercase, trimmed symbol form used everywhere in this layer.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A successful fetch plus the symbol variant that produced it.
#[derive(Clone, Debug)]
pub struct Resolved<T> {
    pub data: T,
    /// The symbol that succeeded; never empty.
    pub symbol: String,
}

/// Call `fetch` with the normalized symbol; on failure, retry once with the
/// `.TO` alias unless the symbol already carries it.
///
/// `fetch` is expected to wrap its own retry policy - this layer only
/// decides which symbol variants to try.
pub async fn resolve_with_alias<T, F, Fut>(
    symbol: &str,
    mut fetch: F,
) -> Result<Resolved<T>, FetchError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let symbol = normalize_symbol(symbol);
    if symbol.is_empty() {
        return Err(FetchError::SymbolNotFound {
            symbol: String::new(),
        });
    }

    let original_error = match fetch(symbol.clone()).await {
        Ok(data) => return Ok(Resolved { data, symbol }),
        Err(err) => err,
    };

    if symbol.ends_with(TSX_SUFFIX) {
        return Err(original_error);
    }

    let alias = format!("{}{}", symbol, TSX_SUFFIX);
    debug!("'{}' failed, retrying as '{}'", symbol, alias);
    match fetch(alias.clone()).await {
        Ok(data) => Ok(Resolved {
            data,
            symbol: alias,
        }),
        // The alias attempt's error is usually a generic not-found; keep
        // the original.
        Err(_) => Err(original_error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn direct_hit_keeps_symbol() {
        let resolved = resolve_with_alias("aapl", |symbol| async move {
            Ok::<_, FetchError>(symbol.len())
        })
        .await
        .unwrap();
        assert_eq!(resolved.symbol, "AAPL");
        assert_eq!(resolved.data, 4);
    }

    #[tokio::test]
    async fn alias_is_tried_exactly_once() {
        let calls = AtomicU32::new(0);
        let resolved = resolve_with_alias("VFV", |symbol| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if symbol == "VFV.TO" {
                    Ok(symbol.clone())
                } else {
                    Err(FetchError::SymbolNotFound { symbol })
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(resolved.symbol, "VFV.TO");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn suffixed_symbol_is_not_aliased_again() {
        let calls = AtomicU32::new(0);
        let result = resolve_with_alias("XEQT.TO", |symbol| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err::<(), _>(FetchError::SymbolNotFound { symbol }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn original_error_wins_when_both_fail() {
        let result = resolve_with_alias("BAD", |symbol| async move {
            if symbol.ends_with(TSX_SUFFIX) {
                Err::<(), _>(FetchError::SymbolNotFound { symbol })
            } else {
                Err(FetchError::Status {
                    provider: "YAHOO".to_string(),
                    code: 500,
                })
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(FetchError::Status { code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn empty_symbol_is_rejected() {
        let result = resolve_with_alias("  ", |symbol| async move {
            Ok::<_, FetchError>(symbol)
        })
        .await;
        assert!(matches!(result, Err(FetchError::SymbolNotFound { .. })));
    }
}
