//! Registry and gather logic for status-bar item providers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use log::warn;
use tokio_util::sync::CancellationToken;

use super::provider::{StatusBarItemList, StatusBarItemProvider};
use crate::error::{Error, Result};
use crate::event::Emitter;
use crate::lifecycle::Subscription;

/// A registered provider plus its change-event wiring.
struct Registration {
    id: u64,
    provider: Arc<dyn StatusBarItemProvider>,
    /// Re-broadcast subscription on the provider's change event, canceled
    /// when the provider is unregistered.
    change_listener: Option<Subscription>,
}

/// Keeps status-bar item providers and gathers their contributions.
///
/// Providers are matched to a query by view type (exact or `"*"`), queried
/// concurrently, and individually fault-isolated: one failing provider
/// contributes an empty list instead of failing the gather.
pub struct StatusBarService {
    providers: Arc<Mutex<Vec<Registration>>>,
    next_id: AtomicU64,
    providers_changed: Emitter<()>,
    items_changed: Emitter<()>,
}

impl StatusBarService {
    /// Create a service with no providers.
    pub fn new() -> Self {
        Self {
            providers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
            providers_changed: Emitter::new(),
            items_changed: Emitter::new(),
        }
    }

    /// Register a provider.
    ///
    /// Fires the providers-changed event and wires the provider's own change
    /// event (if any) into this service's items-changed event. Canceling the
    /// returned subscription unregisters the provider and tears the wiring
    /// down.
    pub fn register_provider(&self, provider: Arc<dyn StatusBarItemProvider>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let change_listener = provider.changes().map(|changes| {
            let items_changed = self.items_changed.clone();
            changes.subscribe(move |_| items_changed.fire(()))
        });

        self.providers.lock().unwrap().push(Registration {
            id,
            provider,
            change_listener,
        });
        self.providers_changed.fire(());

        let providers = Arc::clone(&self.providers);
        Subscription::new(move || {
            let mut providers = providers.lock().unwrap();
            if let Some(idx) = providers.iter().position(|r| r.id == id) {
                let mut registration = providers.remove(idx);
                if let Some(listener) = registration.change_listener.as_mut() {
                    listener.cancel();
                }
            }
        })
    }

    /// Gather the contributions of every provider matching `view_type`, in
    /// registration order.
    ///
    /// A provider that fails is logged and contributes an empty list.
    /// Returns [`Error::Cancelled`] when `token` is canceled before the
    /// gather completes.
    pub async fn items_for_cell(
        &self,
        doc: &str,
        cell_index: usize,
        view_type: &str,
        token: &CancellationToken,
    ) -> Result<Vec<StatusBarItemList>> {
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let matching: Vec<Arc<dyn StatusBarItemProvider>> = self
            .providers
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                let vt = r.provider.view_type();
                vt == view_type || vt == "*"
            })
            .map(|r| Arc::clone(&r.provider))
            .collect();

        let gather = join_all(matching.iter().map(|provider| async {
            match provider.provide_items(doc, cell_index, token).await {
                Ok(items) => StatusBarItemList { items },
                Err(e) => {
                    warn!(
                        "status bar provider for '{}' failed: {e}",
                        provider.view_type()
                    );
                    StatusBarItemList::default()
                }
            }
        }));

        tokio::select! {
            () = token.cancelled() => Err(Error::Cancelled),
            lists = gather => Ok(lists),
        }
    }

    /// Subscribe to provider registrations.
    pub fn on_did_change_providers(
        &self,
        listener: impl Fn(&()) + Send + Sync + 'static,
    ) -> Subscription {
        self.providers_changed.subscribe(listener)
    }

    /// Subscribe to item invalidations (provider-driven or explicit).
    pub fn on_did_change_items(
        &self,
        listener: impl Fn(&()) + Send + Sync + 'static,
    ) -> Subscription {
        self.items_changed.subscribe(listener)
    }

    /// Mark every provider's items stale, notifying items-changed listeners.
    pub fn notify_items_changed(&self) {
        self.items_changed.fire(());
    }

    /// Number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.providers.lock().unwrap().len()
    }
}

impl Default for StatusBarService {
    fn default() -> Self {
        Self::new()
    }
}
