//! Client-context eligibility with a rebuildable allow-list cache.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::config::ConfigurationSource;

/// Decides whether an event's client contexts are registered for live
/// presentation.
///
/// The allow-list is built lazily from the configuration source and kept
/// until [`ClientContextFilter::invalidate`] drops it. Build-or-fetch is a
/// single check-then-act under one lock: at most one caller queries the
/// source per epoch, concurrent callers wait for the in-flight build, and
/// readers only ever observe a completely built set.
pub struct ClientContextFilter {
    source: Arc<dyn ConfigurationSource>,
    allow_list: Mutex<Option<Arc<BTreeSet<String>>>>,
}

impl ClientContextFilter {
    pub fn new(source: Arc<dyn ConfigurationSource>) -> Self {
        Self {
            source,
            allow_list: Mutex::new(None),
        }
    }

    /// True iff any of `client_context_ids` is registered.
    ///
    /// An empty set is never eligible. A failed registry query counts as
    /// "no eligible contexts" for this call and is not cached, so a later
    /// call retries the query.
    pub fn is_eligible(&self, client_context_ids: &BTreeSet<String>) -> bool {
        if client_context_ids.is_empty() {
            return false;
        }
        let Some(allow_list) = self.allow_list() else {
            return false;
        };
        client_context_ids.iter().any(|id| allow_list.contains(id))
    }

    /// Drop the cached allow-list; the next eligibility check rebuilds it.
    pub fn invalidate(&self) {
        match self.allow_list.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        debug!("client context allow-list invalidated");
    }

    fn allow_list(&self) -> Option<Arc<BTreeSet<String>>> {
        let mut guard = match self.allow_list.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ref allow_list) = *guard {
            return Some(Arc::clone(allow_list));
        }
        match self.source.list_registered_context_ids() {
            Ok(ids) => {
                let allow_list: Arc<BTreeSet<String>> = Arc::new(ids.into_iter().collect());
                debug!(contexts = allow_list.len(), "client context allow-list built");
                *guard = Some(Arc::clone(&allow_list));
                Some(allow_list)
            }
            Err(err) => {
                warn!(error = %err, "client context registry unavailable; treating event as ineligible");
                None
            }
        }
    }
}
