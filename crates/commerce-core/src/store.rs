//! The application state store.
//!
//! `Store` owns the current [`SessionState`] and is the only place it changes.
//! It is built once at process start and handed to consumers (usually as
//! `Arc<Store>`). Every dispatch runs the pure reducer, then writes the
//! persisted projection to the repository and notifies subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use tokio::sync::watch;

use crate::action::{Action, RawAction};
use crate::reducer::reduce;
use crate::repository::SnapshotRepository;
use crate::snapshot::{HydrationMode, PersistedSnapshot, hydrate};
use crate::state::SessionState;

/// Callback invoked with the new state after each applied dispatch.
pub type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Single source of truth for shopping and session data.
pub struct Store {
    /// Current snapshot. The write lock covers the reducer and the watch
    /// publish only; readers never wait on the repository.
    state: RwLock<Arc<SessionState>>,
    /// Taken before the state lock is released and held through the save,
    /// so saves land in dispatch order.
    persist_lock: Mutex<()>,
    listeners: Arc<Mutex<Listeners>>,
    watch_tx: watch::Sender<Arc<SessionState>>,
    repository: Option<Arc<dyn SnapshotRepository>>,
}

impl Store {
    /// Creates an in-memory store with default state and no persistence.
    pub fn new() -> Self {
        Self::build(SessionState::default(), None)
    }

    /// Creates a store starting from `state`, without persistence.
    pub fn with_state(state: SessionState) -> Self {
        Self::build(state, None)
    }

    /// Creates a store with default state that saves to `repository` after
    /// every dispatch. Nothing is loaded; see [`Store::open`] for hydration.
    pub fn with_repository(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self::build(SessionState::default(), Some(repository))
    }

    /// Opens a store backed by `repository`, hydrating from its last snapshot.
    ///
    /// A missing or unreadable snapshot is not an error: the store starts
    /// empty and the failure is logged. The hydrated state is saved once.
    pub fn open(repository: Arc<dyn SnapshotRepository>, mode: HydrationMode) -> Self {
        let initial = match repository.load() {
            Ok(Some(snapshot)) => {
                let state = hydrate(SessionState::default(), snapshot, mode);
                tracing::info!(
                    "[Store] Hydrated {} cart line(s), {} wishlist item(s) ({:?})",
                    state.cart.len(),
                    state.wishlist.len(),
                    mode
                );
                state
            }
            Ok(None) => {
                tracing::debug!("[Store] No persisted snapshot, starting empty");
                SessionState::default()
            }
            Err(e) => {
                tracing::warn!("[Store] Ignoring unreadable snapshot: {}", e);
                SessionState::default()
            }
        };

        let store = Self::build(initial, Some(repository));
        store.persist(&store.get_state());
        store
    }

    fn build(state: SessionState, repository: Option<Arc<dyn SnapshotRepository>>) -> Self {
        let state = Arc::new(state);
        let (watch_tx, _) = watch::channel(state.clone());
        Self {
            state: RwLock::new(state),
            persist_lock: Mutex::new(()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            watch_tx,
            repository,
        }
    }

    /// Returns the current immutable snapshot.
    pub fn get_state(&self) -> Arc<SessionState> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Applies one action and returns the resulting state.
    ///
    /// Unknown actions leave the state untouched and skip persistence and
    /// notification. Persistence failures are logged, never returned.
    ///
    /// Under concurrent dispatch the watch channel always ends on the newest
    /// state. Listener calls from different threads may interleave.
    pub fn dispatch(&self, action: Action) -> Arc<SessionState> {
        if let Action::Unknown(name) = &action {
            tracing::warn!("[Store] Ignoring unknown action '{}'", name);
            return self.get_state();
        }

        let (next, persist_guard) = {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = Arc::new(reduce(SessionState::clone(&guard), &action));
            *guard = next.clone();
            self.watch_tx.send_replace(next.clone());
            tracing::debug!("[Store] Applied {}", action.name());
            (next, lock(&self.persist_lock))
        };

        self.persist(&next);
        drop(persist_guard);

        self.notify(&next);
        next
    }

    /// Decodes and applies an untyped action envelope.
    ///
    /// A known action name with a malformed payload is logged and treated
    /// like an unknown action.
    pub fn dispatch_raw(&self, raw: RawAction) -> Arc<SessionState> {
        match Action::try_from(raw) {
            Ok(action) => self.dispatch(action),
            Err(e) => {
                tracing::warn!("[Store] Dropping action: {}", e);
                self.get_state()
            }
        }
    }

    /// Registers a listener called after every applied dispatch.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let mut listeners = lock(&self.listeners);
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Returns a receiver that always holds the latest state.
    pub fn watch(&self) -> watch::Receiver<Arc<SessionState>> {
        self.watch_tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }

    fn persist(&self, state: &SessionState) {
        let Some(repository) = &self.repository else {
            return;
        };
        if let Err(e) = repository.save(&PersistedSnapshot::from(state)) {
            tracing::warn!("[Store] Failed to persist snapshot: {}", e);
        }
    }

    fn notify(&self, state: &Arc<SessionState>) {
        // Copy out so listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<Listener> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(state);
        }
    }
}

/// Locks `mutex`, recovering the guard if a listener panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.get_state())
            .field("subscribers", &self.subscriber_count())
            .field("persistent", &self.repository.is_some())
            .finish()
    }
}

/// Handle for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Removes the listener.
    pub fn unsubscribe(self) {}

    /// Keeps the listener registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.listeners = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CommerceError, Result};
    use crate::model::Product;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;

    #[derive(Default)]
    struct RecordingRepository {
        stored: Mutex<Option<PersistedSnapshot>>,
        saves: AtomicUsize,
    }

    impl SnapshotRepository for RecordingRepository {
        fn load(&self) -> Result<Option<PersistedSnapshot>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn save(&self, snapshot: &PersistedSnapshot) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.stored.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }
    }

    struct BrokenRepository;

    impl SnapshotRepository for BrokenRepository {
        fn load(&self) -> Result<Option<PersistedSnapshot>> {
            Err(CommerceError::Serialization {
                format: "JSON".to_string(),
                message: "expected value at line 1 column 1".to_string(),
            })
        }

        fn save(&self, _snapshot: &PersistedSnapshot) -> Result<()> {
            Err(CommerceError::io("quota exceeded"))
        }
    }

    fn product(id: &str) -> Product {
        Product::new(id, id.to_uppercase(), 10.0)
    }

    #[test]
    fn test_dispatch_returns_new_state() {
        let store = Store::new();
        let state = store.dispatch(Action::AddToCart(product("x")));
        assert_eq!(state.cart.len(), 1);
        assert_eq!(store.get_state().cart.len(), 1);
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let store = Store::new();
        let before = store.get_state();
        store.dispatch(Action::AddToCart(product("x")));
        assert!(before.cart.is_empty());
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let repository = Arc::new(RecordingRepository::default());
        let store = Store::with_repository(repository.clone());
        store.dispatch(Action::AddToCart(product("x")));

        let before = store.get_state();
        let after = store.dispatch(Action::Unknown("DANCE".to_string()));
        assert_eq!(*after, *before);
        assert_eq!(repository.saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_raw_handles_bad_input() {
        let store = Store::new();
        let payload = json!({"id": "x", "price": 10});
        store.dispatch_raw(RawAction::new("ADD_TO_CART", payload));
        let before = store.get_state();

        let after = store.dispatch_raw(RawAction::new("ADD_TO_CART", json!(42)));
        assert_eq!(*after, *before);
        let after = store.dispatch_raw(RawAction::new("NOT_AN_ACTION", json!(null)));
        assert_eq!(*after, *before);
    }

    #[test]
    fn test_every_dispatch_is_persisted() {
        let repository = Arc::new(RecordingRepository::default());
        let store = Store::with_repository(repository.clone());

        store.dispatch(Action::AddToCart(product("x")));
        store.dispatch(Action::AddToSearchHistory("lamps".to_string()));
        store.dispatch(Action::ToggleVoice);

        assert_eq!(repository.saves.load(Ordering::SeqCst), 3);
        let stored = repository.stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored, PersistedSnapshot::from(&*store.get_state()));
    }

    #[test]
    fn test_persistence_failure_does_not_reach_caller() {
        let store = Store::with_repository(Arc::new(BrokenRepository));
        let state = store.dispatch(Action::AddToCart(product("x")));
        assert_eq!(state.cart.len(), 1);
    }

    #[test]
    fn test_open_with_unreadable_snapshot_starts_empty() {
        let store = Store::open(Arc::new(BrokenRepository), HydrationMode::CartAndWishlist);
        assert_eq!(*store.get_state(), SessionState::default());
    }

    #[test]
    fn test_open_round_trip() {
        let repository = Arc::new(RecordingRepository::default());
        {
            let store = Store::with_repository(repository.clone());
            store.dispatch(Action::AddToCart(product("a")));
            store.dispatch(Action::AddToCart(product("b")));
            store.dispatch(Action::AddToCart(product("a")));
            store.dispatch(Action::AddToWishlist(product("w")));
        }

        let store = Store::open(repository.clone(), HydrationMode::CartAndWishlist);
        let state = store.get_state();
        let lines: Vec<(&str, u32)> = state
            .cart
            .iter()
            .map(|line| (line.id().as_str(), line.quantity))
            .collect();
        assert_eq!(lines, vec![("a", 2), ("b", 1)]);
        assert_eq!(state.wishlist.len(), 1);
        // open() writes the hydrated state back once
        assert_eq!(repository.saves.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let subscription = store.subscribe(move |state| {
            counter.fetch_add(state.cart.len(), Ordering::SeqCst);
        });

        store.dispatch(Action::AddToCart(product("x")));
        store.dispatch(Action::AddToCart(product("y")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        subscription.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
        store.dispatch(Action::ClearCart);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unknown_action_does_not_notify() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(Action::Unknown("???".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = Arc::new(Store::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&store);
        let sink = seen.clone();
        store
            .subscribe(move |_| {
                if let Some(store) = weak.upgrade() {
                    sink.lock().unwrap().push(store.get_state().cart_item_count());
                }
            })
            .detach();

        store.dispatch(Action::AddToCart(product("x")));
        store.dispatch(Action::AddToCart(product("x")));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_watch_sees_latest_state() {
        let store = Store::new();
        let mut rx = store.watch();
        assert!(rx.borrow().cart.is_empty());

        store.dispatch(Action::AddToCart(product("x")));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().cart.len(), 1);
    }

    /// Signals when a save starts, then blocks it until released.
    struct GatedRepository {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl SnapshotRepository for GatedRepository {
        fn load(&self) -> Result<Option<PersistedSnapshot>> {
            Ok(None)
        }

        fn save(&self, _snapshot: &PersistedSnapshot) -> Result<()> {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(())
        }
    }

    #[test]
    fn test_watch_ends_on_newest_state_when_dispatches_overlap() {
        let store = Arc::new(Store::new());
        let rx = store.watch();

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);
        let parked = AtomicBool::new(false);
        let subscription = store.subscribe(move |_| {
            // Hold up the first dispatch inside its listener call.
            if !parked.swap(true, Ordering::SeqCst) {
                entered_tx.lock().unwrap().send(()).unwrap();
                release_rx.lock().unwrap().recv().unwrap();
            }
        });
        subscription.detach();

        let worker = {
            let store = store.clone();
            thread::spawn(move || {
                store.dispatch(Action::AddToCart(product("a")));
            })
        };
        entered_rx.recv().unwrap();

        store.dispatch(Action::AddToCart(product("b")));
        assert_eq!(rx.borrow().cart.len(), 2);

        release_tx.send(()).unwrap();
        worker.join().unwrap();

        assert_eq!(store.get_state().cart.len(), 2);
        assert_eq!(rx.borrow().cart.len(), 2);
    }

    #[test]
    fn test_readers_do_not_wait_on_save() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let repository = GatedRepository {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        let store = Arc::new(Store::with_repository(Arc::new(repository)));

        let worker = {
            let store = store.clone();
            thread::spawn(move || {
                store.dispatch(Action::AddToCart(product("x")));
            })
        };
        entered_rx.recv().unwrap();

        // The save is still blocked; the new state is already readable.
        assert_eq!(store.get_state().cart.len(), 1);
        assert_eq!(store.watch().borrow().cart.len(), 1);

        release_tx.send(()).unwrap();
        worker.join().unwrap();
    }
}
