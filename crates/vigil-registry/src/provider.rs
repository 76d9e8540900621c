//! Constraint provider service with per-target caching.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::constraints::ConstraintDescriptor;

/// Supplies constraint descriptors for a kind of model element.
pub trait ConstraintProvider: Send + Sync {
    fn constraints_for(&self, target_kind: &str) -> Vec<ConstraintDescriptor>;
}

/// Caches provider answers per target kind.
///
/// An empty answer is cached too: the provider is asked at most once per
/// target kind per epoch. [`CachingProviderService::invalidate`] starts a
/// new epoch.
pub struct CachingProviderService<P> {
    provider: P,
    cache: Mutex<HashMap<String, Vec<ConstraintDescriptor>>>,
}

impl<P: ConstraintProvider> CachingProviderService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn constraints_for(&self, target_kind: &str) -> Vec<ConstraintDescriptor> {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(hit) = cache.get(target_kind) {
            return hit.clone();
        }
        let fetched = self.provider.constraints_for(target_kind);
        debug!(
            target_kind,
            constraints = fetched.len(),
            "provider answer cached"
        );
        cache.insert(target_kind.to_string(), fetched.clone());
        fetched
    }

    /// Drop all cached answers; the next lookup asks the provider again.
    pub fn invalidate(&self) {
        match self.cache.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts how often it is asked, per target kind.
    #[derive(Default)]
    struct CountingProvider {
        hits: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
    }

    impl CountingProvider {
        fn hit_count(&self, target_kind: &str) -> usize {
            match self.hits.lock() {
                Ok(guard) => guard.get(target_kind).copied().unwrap_or(0),
                Err(poisoned) => poisoned.into_inner().get(target_kind).copied().unwrap_or(0),
            }
        }
    }

    impl ConstraintProvider for CountingProvider {
        fn constraints_for(&self, target_kind: &str) -> Vec<ConstraintDescriptor> {
            self.total.fetch_add(1, Ordering::SeqCst);
            match self.hits.lock() {
                Ok(mut guard) => *guard.entry(target_kind.to_string()).or_insert(0) += 1,
                Err(poisoned) => {
                    *poisoned
                        .into_inner()
                        .entry(target_kind.to_string())
                        .or_insert(0) += 1;
                }
            }
            // No constraints needed to register a hit; the cache remembers
            // empty answers as well.
            Vec::new()
        }
    }

    #[test]
    fn provider_is_hit_once_per_target_kind() {
        let service = CachingProviderService::new(CountingProvider::default());

        for _ in 0..5 {
            assert!(service.constraints_for("part").is_empty());
        }
        assert!(service.constraints_for("assembly").is_empty());

        assert_eq!(service.provider().hit_count("part"), 1);
        assert_eq!(service.provider().hit_count("assembly"), 1);
        assert_eq!(service.provider().total.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_starts_a_new_epoch() {
        let service = CachingProviderService::new(CountingProvider::default());

        service.constraints_for("part");
        service.invalidate();
        service.constraints_for("part");

        assert_eq!(service.provider().hit_count("part"), 2);
    }
}
