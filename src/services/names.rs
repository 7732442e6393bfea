//! Best-effort ticker display names
//!
//! Looks up human-readable names for symbols, memoized per symbol with a
//! 24-hour TTL. Lookup failures degrade to the symbol string itself; name
//! resolution never fails the pipeline and never surfaces an error.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::constants::NAME_CACHE_TTL_SECONDS;
use crate::services::cache::{CacheKey, Clock, TtlCache};
use crate::services::provider::ProviderError;

/// Display-name source
pub trait NameSource {
    fn display_name(
        &self,
        symbol: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>>;
}

pub struct NameResolver<S> {
    source: Arc<S>,
    cache: TtlCache<String>,
}

impl<S: NameSource> NameResolver<S> {
    pub fn new(source: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: TtlCache::new(NAME_CACHE_TTL_SECONDS, clock),
        }
    }

    /// Resolve one symbol, falling back to the symbol itself
    pub async fn resolve(&self, symbol: &str) -> String {
        let key = CacheKey::new("name", &[symbol.to_string()], 0, None);

        if let Some(name) = self.cache.get(&key) {
            return name;
        }

        let name = match self.source.display_name(symbol).await {
            Ok(name) => name,
            Err(e) => {
                debug!(symbol, error = %e, "name lookup failed, using symbol");
                symbol.to_string()
            }
        };

        self.cache.insert(key, name.clone());
        name
    }

    /// Resolve a set of symbols into a symbol -> name map
    pub async fn resolve_all(&self, symbols: &[String]) -> HashMap<String, String> {
        let mut names = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let name = self.resolve(symbol).await;
            names.insert(symbol.clone(), name);
        }
        names
    }
}
