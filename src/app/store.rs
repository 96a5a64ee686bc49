//! Fetch/mutate orchestration over a page-keyed cache.
//!
//! Requests run on the tokio runtime and report back through an
//! [`Outcome`] channel; the UI loop drains the channel and feeds each outcome
//! to [`UserStore::apply`]. All cache changes therefore happen on the loop's
//! thread.
//!
//! Cache contract: one entry per page number. A successful mutation marks
//! every entry stale, so the next [`UserStore::ensure_page`] for the page on
//! screen issues a fresh fetch. Stale entries stay readable until replaced.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use crate::api::UsersApi;
use crate::error::ApiError;
use crate::model::{NewUser, Page, User, UserDraft};

/// Result of a request, delivered back to the UI loop.
#[derive(Debug)]
pub enum Outcome {
    Fetched {
        page: u32,
        generation: u64,
        result: Result<Page<User>, ApiError>,
    },
    Created(Result<User, ApiError>),
    Updated(Result<User, ApiError>),
    Deleted {
        id: u64,
        result: Result<bool, ApiError>,
    },
}

/// The three write operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    pub fn success_message(self) -> &'static str {
        match self {
            Mutation::Create => "User created successfully",
            Mutation::Update => "User updated successfully",
            Mutation::Delete => "User deleted successfully",
        }
    }
}

/// What applying an [`Outcome`] changed, for the page composition to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { page: u32 },
    FetchFailed { page: u32, message: String },
    Mutated { kind: Mutation },
    MutationFailed { kind: Mutation, message: String },
}

#[derive(Clone, Debug)]
struct Entry {
    data: Page<User>,
    stale: bool,
}

/// Fetched pages keyed by page number.
#[derive(Clone, Debug, Default)]
pub struct PageCache {
    entries: HashMap<u32, Entry>,
    generation: u64,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last fetched data for `page`, fresh or stale.
    pub fn get(&self, page: u32) -> Option<&Page<User>> {
        self.entries.get(&page).map(|e| &e.data)
    }

    pub fn is_fresh(&self, page: u32) -> bool {
        self.entries.get(&page).is_some_and(|e| !e.stale)
    }

    pub fn insert(&mut self, page: u32, data: Page<User>) {
        self.entries.insert(page, Entry { data, stale: false });
    }

    /// Mark every entry stale. Fetches issued before this call belong to an
    /// older generation and are discarded when they complete.
    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.stale = true;
        }
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Issues list fetches and mutations and keeps the page cache current.
pub struct UserStore {
    api: Arc<dyn UsersApi>,
    runtime: Handle,
    tx: UnboundedSender<Outcome>,
    cache: PageCache,
    in_flight: HashSet<u32>,
    failed: HashMap<u32, String>,
    pending_mutations: usize,
}

impl UserStore {
    /// Create a store dispatching on `runtime`, plus the receiver the UI loop
    /// drains.
    pub fn new(api: Arc<dyn UsersApi>, runtime: Handle) -> (Self, UnboundedReceiver<Outcome>) {
        let (tx, rx) = unbounded_channel();
        let store = Self {
            api,
            runtime,
            tx,
            cache: PageCache::new(),
            in_flight: HashSet::new(),
            failed: HashMap::new(),
            pending_mutations: 0,
        };
        (store, rx)
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Data to display for `page`, if any was fetched.
    pub fn page(&self, page: u32) -> Option<&Page<User>> {
        self.cache.get(page)
    }

    pub fn is_loading(&self, page: u32) -> bool {
        self.in_flight.contains(&page)
    }

    pub fn fetch_error(&self, page: u32) -> Option<&str> {
        self.failed.get(&page).map(String::as_str)
    }

    pub fn pending_mutations(&self) -> usize {
        self.pending_mutations
    }

    /// Make sure `page` is fetched. Issues a request unless the page is
    /// cached and fresh, already being fetched, or its last fetch failed
    /// while it stayed the requested page. Returns whether a request was
    /// issued.
    ///
    /// A failure is only remembered for the page being asked for, so moving
    /// to another page and back fetches again.
    pub fn ensure_page(&mut self, page: u32) -> bool {
        self.failed.retain(|p, _| *p == page);
        if self.cache.is_fresh(page) || self.in_flight.contains(&page) || self.failed.contains_key(&page) {
            return false;
        }
        self.in_flight.insert(page);
        let generation = self.cache.generation();
        let api = Arc::clone(&self.api);
        debug!(page, generation, "fetching users page");
        self.dispatch(async move {
            let result = api.list_users(page).await;
            Outcome::Fetched { page, generation, result }
        });
        true
    }

    /// Drop every cached page and recorded fetch failure so the next
    /// [`ensure_page`](Self::ensure_page) refetches.
    pub fn invalidate_all(&mut self) {
        self.cache.invalidate_all();
        self.in_flight.clear();
        self.failed.clear();
    }

    pub fn create(&mut self, new_user: NewUser) {
        let api = Arc::clone(&self.api);
        self.pending_mutations += 1;
        self.dispatch(async move { Outcome::Created(api.create_user(&new_user).await) });
    }

    pub fn update(&mut self, id: u64, draft: UserDraft) {
        let api = Arc::clone(&self.api);
        self.pending_mutations += 1;
        self.dispatch(async move { Outcome::Updated(api.update_user(id, &draft).await) });
    }

    pub fn delete(&mut self, id: u64) {
        let api = Arc::clone(&self.api);
        self.pending_mutations += 1;
        self.dispatch(async move {
            let result = api.delete_user(id).await;
            Outcome::Deleted { id, result }
        });
    }

    /// Fold a completed request into the store.
    ///
    /// Returns `None` for fetches that were overtaken by an invalidation.
    pub fn apply(&mut self, outcome: Outcome) -> Option<StoreEvent> {
        match outcome {
            Outcome::Fetched { page, generation, result } => {
                if generation != self.cache.generation() {
                    debug!(page, generation, "discarding fetch from before invalidation");
                    return None;
                }
                self.in_flight.remove(&page);
                match result {
                    Ok(data) => {
                        debug!(page, rows = data.data.len(), "users page loaded");
                        self.failed.remove(&page);
                        self.cache.insert(page, data);
                        Some(StoreEvent::Loaded { page })
                    }
                    Err(err) => {
                        warn!(page, error = %err, "users page fetch failed");
                        let message = err.to_string();
                        self.failed.insert(page, message.clone());
                        Some(StoreEvent::FetchFailed { page, message })
                    }
                }
            }
            Outcome::Created(result) => Some(self.finish(Mutation::Create, result.map(|u| {
                info!(id = u.id, "user created");
            }))),
            Outcome::Updated(result) => Some(self.finish(Mutation::Update, result.map(|u| {
                info!(id = u.id, "user updated");
            }))),
            Outcome::Deleted { id, result } => {
                let result = match result {
                    Ok(true) => {
                        info!(id, "user deleted");
                        Ok(())
                    }
                    Ok(false) => Err(ApiError::Rejected("Failed to delete user".to_string())),
                    Err(err) => Err(err),
                };
                Some(self.finish(Mutation::Delete, result))
            }
        }
    }

    fn finish(&mut self, kind: Mutation, result: Result<(), ApiError>) -> StoreEvent {
        self.pending_mutations = self.pending_mutations.saturating_sub(1);
        match result {
            Ok(()) => {
                self.invalidate_all();
                StoreEvent::Mutated { kind }
            }
            Err(err) => {
                warn!(?kind, error = %err, "mutation failed");
                StoreEvent::MutationFailed { kind, message: err.to_string() }
            }
        }
    }

    fn dispatch<F>(&self, fut: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = fut.await;
            if tx.send(outcome).is_err() {
                debug!("outcome dropped: receiver closed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn mk_user(id: u64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: "user".to_string(),
        }
    }

    fn mk_page(page: u32) -> Page<User> {
        Page {
            data: vec![mk_user(u64::from(page) * 10 + 1, "Ann"), mk_user(u64::from(page) * 10 + 2, "Bob")],
            page,
            per_page: 5,
            total: 12,
            total_pages: 3,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        list_calls: Mutex<Vec<u32>>,
        // pages whose next fetch fails
        fail_once: Mutex<HashSet<u32>>,
        delete_error: Option<ApiError>,
        delete_refused: bool,
    }

    impl FakeApi {
        fn list_calls(&self) -> Vec<u32> {
            self.list_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UsersApi for FakeApi {
        async fn list_users(&self, page: u32) -> Result<Page<User>, ApiError> {
            self.list_calls.lock().unwrap().push(page);
            if self.fail_once.lock().unwrap().remove(&page) {
                return Err(ApiError::Status { status: 500, message: "Failed to fetch users".into() });
            }
            Ok(mk_page(page))
        }

        async fn create_user(&self, new_user: &NewUser) -> Result<User, ApiError> {
            Ok(User::from_new(99, new_user))
        }

        async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<User, ApiError> {
            Ok(User::from_draft(id, draft))
        }

        async fn delete_user(&self, _id: u64) -> Result<bool, ApiError> {
            match &self.delete_error {
                Some(err) => Err(err.clone()),
                None => Ok(!self.delete_refused),
            }
        }
    }

    async fn settle(store: &mut UserStore, rx: &mut UnboundedReceiver<Outcome>) -> Option<StoreEvent> {
        let outcome = rx.recv().await.expect("outcome");
        store.apply(outcome)
    }

    #[tokio::test]
    async fn page_change_fetches_exactly_once() {
        let api = Arc::new(FakeApi::default());
        let (mut store, mut rx) = UserStore::new(api.clone(), Handle::current());

        assert!(store.ensure_page(1));
        assert!(!store.ensure_page(1), "in-flight page must not be refetched");
        assert!(store.is_loading(1));
        assert_eq!(settle(&mut store, &mut rx).await, Some(StoreEvent::Loaded { page: 1 }));
        assert!(!store.ensure_page(1), "fresh page must not be refetched");

        assert!(store.ensure_page(2));
        settle(&mut store, &mut rx).await;
        assert!(!store.ensure_page(1));
        assert!(!store.ensure_page(2));

        assert_eq!(api.list_calls(), vec![1, 2]);
        assert_eq!(store.page(2).unwrap().page, 2);
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_cache() {
        let api = Arc::new(FakeApi::default());
        let (mut store, mut rx) = UserStore::new(api.clone(), Handle::current());
        store.ensure_page(1);
        settle(&mut store, &mut rx).await;

        store.create(NewUser { name: "Jane Doe".into(), email: "jane@x.com".into(), role: "editor".into() });
        assert_eq!(store.pending_mutations(), 1);
        let event = settle(&mut store, &mut rx).await;
        assert_eq!(event, Some(StoreEvent::Mutated { kind: Mutation::Create }));
        assert_eq!(store.pending_mutations(), 0);

        // stale data stays readable until the refetch lands
        assert!(store.page(1).is_some());
        assert!(!store.cache().is_fresh(1));
        assert!(store.ensure_page(1));
        settle(&mut store, &mut rx).await;
        assert_eq!(api.list_calls(), vec![1, 1]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_cache_untouched() {
        let api = Arc::new(FakeApi {
            delete_error: Some(ApiError::Status { status: 404, message: "Not found".into() }),
            ..Default::default()
        });
        let (mut store, mut rx) = UserStore::new(api.clone(), Handle::current());
        store.ensure_page(1);
        settle(&mut store, &mut rx).await;
        let before = store.page(1).cloned();

        store.delete(11);
        let event = settle(&mut store, &mut rx).await;
        assert_eq!(
            event,
            Some(StoreEvent::MutationFailed { kind: Mutation::Delete, message: "Not found".into() })
        );
        assert!(store.cache().is_fresh(1));
        assert_eq!(store.page(1).cloned(), before);
        assert!(!store.ensure_page(1));
        assert_eq!(api.list_calls(), vec![1]);
    }

    #[tokio::test]
    async fn fetch_overtaken_by_invalidation_is_discarded() {
        let api = Arc::new(FakeApi::default());
        let (mut store, mut rx) = UserStore::new(api.clone(), Handle::current());
        assert!(store.ensure_page(1));
        store.invalidate_all();
        assert!(store.ensure_page(1), "invalidation must allow a new fetch");

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        let events: Vec<_> = [first, second].into_iter().filter_map(|o| store.apply(o)).collect();
        assert_eq!(events, vec![StoreEvent::Loaded { page: 1 }]);
        assert!(store.cache().is_fresh(1));
        assert!(!store.is_loading(1));
    }

    #[tokio::test]
    async fn failed_page_is_refetched_after_leaving_it() {
        let api = Arc::new(FakeApi::default());
        api.fail_once.lock().unwrap().insert(2);
        let (mut store, mut rx) = UserStore::new(api.clone(), Handle::current());

        store.ensure_page(1);
        settle(&mut store, &mut rx).await;
        assert!(store.ensure_page(2));
        let event = settle(&mut store, &mut rx).await;
        assert!(matches!(event, Some(StoreEvent::FetchFailed { page: 2, .. })));
        assert!(!store.ensure_page(2), "staying on a failed page must not loop");
        assert_eq!(store.fetch_error(2), Some("Failed to fetch users"));

        assert!(!store.ensure_page(1));
        assert!(store.ensure_page(2), "coming back to the page fetches it again");
        assert_eq!(settle(&mut store, &mut rx).await, Some(StoreEvent::Loaded { page: 2 }));
        assert_eq!(api.list_calls(), vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn refused_delete_is_reported_without_status() {
        let api = Arc::new(FakeApi { delete_refused: true, ..Default::default() });
        let (mut store, mut rx) = UserStore::new(api, Handle::current());
        store.delete(5);
        let event = settle(&mut store, &mut rx).await;
        assert_eq!(
            event,
            Some(StoreEvent::MutationFailed { kind: Mutation::Delete, message: "Failed to delete user".into() })
        );
    }

    #[test]
    fn cache_invalidation_bumps_generation() {
        let mut cache = PageCache::new();
        assert!(cache.is_empty());
        cache.insert(1, mk_page(1));
        assert!(cache.is_fresh(1));
        cache.invalidate_all();
        assert_eq!(cache.generation(), 1);
        assert!(!cache.is_fresh(1));
        assert_eq!(cache.len(), 1);
    }
}
