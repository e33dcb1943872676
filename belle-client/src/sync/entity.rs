//! Entity store
//!
//! Owns one backend collection in memory. All writes go through the
//! collection API; derived stats are recomputed under the same write lock
//! that changes the items, so they never lag the collection.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::RwLock;

use super::coordinator::{Admission, RequestCoordinator};
use crate::error::{ServiceError, ServiceResult};
use crate::services::CollectionApi;
use crate::types::{Entity, FetchOutcome, OpResult};

/// Point-in-time copy of a store's state
#[derive(Debug, Clone)]
pub struct EntityState<T: Entity> {
    pub items: Vec<T>,
    pub stats: T::Stats,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_initialized: bool,
}

impl<T: Entity> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            stats: T::compute_stats(&[]),
            is_loading: false,
            error: None,
            is_initialized: false,
        }
    }
}

impl<T: Entity> EntityState<T> {
    fn recompute_stats(&mut self) {
        self.stats = T::compute_stats(&self.items);
    }
}

/// Counts a mutation or query as in flight until dropped
struct PendingCall<'a>(&'a AtomicUsize);

impl<'a> PendingCall<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingCall<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct EntityStore<T: Entity, A: CollectionApi<T> + ?Sized = dyn CollectionApi<T>> {
    api: Arc<A>,
    state: RwLock<EntityState<T>>,
    fetches: RequestCoordinator,
    /// Guards the first fetch; distinct from `is_initialized`
    started: AtomicBool,
    pending: AtomicUsize,
}

impl<T: Entity, A: CollectionApi<T> + ?Sized> EntityStore<T, A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(EntityState::default()),
            fetches: RequestCoordinator::new(),
            started: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Current state; `is_loading` reflects the calls running now
    pub async fn snapshot(&self) -> EntityState<T> {
        let mut snapshot = self.state.read().await.clone();
        snapshot.is_loading = self.is_loading();
        snapshot
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn stats(&self) -> T::Stats {
        self.state.read().await.stats.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// A fetch or a mutation is in flight
    pub fn is_loading(&self) -> bool {
        self.fetches.is_busy() || self.pending.load(Ordering::SeqCst) > 0
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_initialized
    }

    /// Replace the collection from the backend.
    ///
    /// A call made while another fetch is pending issues nothing and returns
    /// [`FetchOutcome::AlreadyInFlight`]. Dropping the returned future
    /// abandons the fetch and frees the store for the next one.
    pub async fn fetch_all(&self) -> FetchOutcome {
        let request = match self.fetches.start_or_reject() {
            Admission::Started(request) => request,
            Admission::Rejected => {
                tracing::debug!(entity = T::NAME, "Fetch already in flight, skipping");
                return FetchOutcome::AlreadyInFlight;
            }
        };

        self.state.write().await.error = None;
        tracing::debug!(entity = T::NAME, generation = request.generation(), "Fetching collection");

        let result = tokio::select! {
            biased;
            _ = request.cancelled() => Err(ServiceError::cancelled()),
            result = self.api.list() => result,
        };

        let mut state = self.state.write().await;
        if !self.fetches.is_current(&request) || matches!(&result, Err(e) if e.is_cancelled()) {
            tracing::debug!(entity = T::NAME, "Fetch cancelled, result discarded");
            return FetchOutcome::Cancelled;
        }

        let outcome = match result {
            Ok(items) => {
                let count = items.len();
                state.items = items;
                tracing::debug!(entity = T::NAME, count, "Collection loaded");
                FetchOutcome::Loaded(count)
            }
            Err(e) => {
                state.items.clear();
                state.error = Some(e.message.clone());
                tracing::warn!(entity = T::NAME, kind = ?e.kind, "Fetch failed: {}", e.message);
                FetchOutcome::Failed(e.message)
            }
        };
        state.recompute_stats();
        state.is_initialized = true;
        outcome
    }

    pub async fn refetch(&self) -> FetchOutcome {
        self.fetch_all().await
    }

    /// First fetch, at most once per store. Later calls return `None`.
    pub async fn initialize(&self) -> Option<FetchOutcome> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.fetch_all().await)
    }

    /// Run a call with loading/error bookkeeping; `apply` sees the success
    /// value under the write lock, then stats are recomputed.
    async fn tracked<R, F>(
        &self,
        call: F,
        apply: impl FnOnce(&mut EntityState<T>, &R),
    ) -> ServiceResult<R>
    where
        F: Future<Output = ServiceResult<R>>,
    {
        let _pending = PendingCall::enter(&self.pending);
        self.state.write().await.error = None;

        let result = call.await;

        let mut state = self.state.write().await;
        match &result {
            Ok(value) => {
                apply(&mut *state, value);
                state.recompute_stats();
            }
            Err(e) => state.error = Some(e.message.clone()),
        }
        result
    }

    /// Create and prepend
    pub async fn create(&self, data: T::Create) -> OpResult {
        self.tracked(self.api.create(data), |state, created: &T| {
            tracing::debug!(entity = T::NAME, id = created.id(), "Created");
            state.items.insert(0, created.clone());
        })
        .await
        .into()
    }

    /// Update and replace in place, keeping order
    pub async fn update(&self, id: &str, data: T::Update) -> OpResult {
        self.tracked(self.api.update(id, data), |state, updated: &T| {
            if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
                *slot = updated.clone();
            }
        })
        .await
        .into()
    }

    /// Delete and remove. Callers confirm with the user before calling.
    pub async fn delete(&self, id: &str) -> OpResult {
        self.tracked(self.api.delete(id), |state, _: &()| {
            state.items.retain(|item| item.id() != id);
        })
        .await
        .into()
    }

    /// Single entity lookup; the collection is left as is
    pub async fn get(&self, id: &str) -> Option<T> {
        self.tracked(self.api.get(id), |_, _| {}).await.ok()
    }

    /// Run a read-only query with the store's loading/error bookkeeping
    pub(crate) async fn query<R, F>(&self, call: F) -> ServiceResult<R>
    where
        F: Future<Output = ServiceResult<R>>,
    {
        self.tracked(call, |_, _| {}).await
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Cancel the in-flight fetch. Its result will not be applied.
    pub fn cancel(&self) {
        self.fetches.cancel();
    }
}
