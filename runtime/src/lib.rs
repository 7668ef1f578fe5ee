//! # Tripvote Runtime
//!
//! Runtime implementation for the tripvote state model.
//!
//! This crate provides the [`Store`]: the explicitly constructed, owned state
//! container that the presentation layer holds a handle to.
//!
//! ## Core Components
//!
//! - **Store**: Owns the current state snapshot, the reducer and the environment
//! - **Shutdown**: Stops accepting actions once the shell is done with the store
//!
//! ## Dispatch Model
//!
//! Actions are applied one at a time, in dispatch order. Each transition
//! produces a new snapshot (copy-on-write over an `Arc`), so snapshots that
//! were handed out earlier never change underneath their holders.
//!
//! ## Example
//!
//! ```ignore
//! use tripvote_runtime::Store;
//!
//! let store = Store::new(VotingState::new(), VotingReducer::new(), env);
//!
//! // Send an action
//! store.send(VotingAction::SetLoading(true)).await?;
//!
//! // Read state
//! let loading = store.state(|s| s.is_loading).await;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tripvote_core::reducer::Reducer;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Store module - the runtime coordinator
pub mod store {
    use super::{Arc, AtomicBool, Ordering, Reducer, RwLock, StoreError};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (an `Arc` snapshot behind a `RwLock`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: RwLock<Arc<S>>,
        reducer: R,
        environment: E,
        shutdown: AtomicBool,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        S: Clone + Send + Sync + 'static,
        A: Send + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: RwLock::new(Arc::new(initial_state)),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
            }
        }

        /// The environment this store injects into its reducer
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Stop accepting new actions
        ///
        /// Actions already being reduced finish normally; every later `send()`
        /// returns [`StoreError::ShutdownInProgress`].
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            metrics::counter!("store.shutdown.initiated").increment(1);
            self.shutdown.store(true, Ordering::Release);
        }

        /// Whether [`Store::shutdown`] has been called
        pub fn is_shutdown(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment) on a
        ///    copy-on-write snapshot
        /// 3. Publishes the new snapshot and releases the lock
        ///
        /// `send()` returns once the new snapshot is visible to readers.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shutdown() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let mut snapshot = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let state = Arc::make_mut(&mut *snapshot);
            let effects = self.reducer.reduce(state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds").record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let activity_count = store.state(|s| s.activities.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let snapshot = self.state.read().await;
            f(&snapshot)
        }

        /// The current immutable snapshot
        ///
        /// Later actions never modify the returned value; they produce new
        /// snapshots instead.
        pub async fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.state.read().await)
        }
    }
}

pub use store::Store;
