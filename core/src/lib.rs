//! # Tripvote Core
//!
//! Core traits and types for the tripvote state model.
//!
//! This crate provides the abstractions every feature is built from:
//!
//! - **State**: Owned, `Clone`-able domain state
//! - **Action**: A closed enum of every input a reducer accepts
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (the state model returns none)
//! - **Environment**: Injected dependencies via traits (clock, id generation)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - No hidden I/O: the shell performs it and dispatches outcomes
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use tripvote_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!             CounterAction::Reset => state.count = 0,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let _ = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for VotingReducer {
    ///     type State = VotingState;
    ///     type Action = VotingAction;
    ///     type Environment = VotingEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut VotingState,
    ///         action: VotingAction,
    ///         env: &VotingEnvironment,
    ///     ) -> SmallVec<[Effect<VotingAction>; 4]> {
    ///         match action {
    ///             VotingAction::SetLoading(loading) => state.is_loading = loading,
    ///             // ...
    ///         }
    ///         SmallVec::new()
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Inspects the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Reducers must not fail: invalid or unknown inputs leave state unchanged.
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime (always `Effect::None` here)
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }

    /// Reduce an action against a copy of `state`.
    ///
    /// The input snapshot is never touched; the next snapshot is returned
    /// together with the effects the reducer produced.
    ///
    /// # Example
    ///
    /// ```
    /// use tripvote_core::{effect::Effect, reducer::{reduce_snapshot, Reducer}, SmallVec};
    ///
    /// struct Add;
    ///
    /// impl Reducer for Add {
    ///     type State = Vec<u32>;
    ///     type Action = u32;
    ///     type Environment = ();
    ///
    ///     fn reduce(&self, state: &mut Vec<u32>, action: u32, _env: &()) -> SmallVec<[Effect<u32>; 4]> {
    ///         state.push(action);
    ///         SmallVec::new()
    ///     }
    /// }
    ///
    /// let before = vec![1];
    /// let (after, _) = reduce_snapshot(&Add, &before, 2, &());
    /// assert_eq!(before, vec![1]);
    /// assert_eq!(after, vec![1, 2]);
    /// ```
    pub fn reduce_snapshot<R>(
        reducer: &R,
        state: &R::State,
        action: R::Action,
        env: &R::Environment,
    ) -> (R::State, SmallVec<[Effect<R::Action>; 4]>)
    where
        R: Reducer + ?Sized,
        R::State: Clone,
    {
        let mut next = state.clone();
        let effects = reducer.reduce(&mut next, action, env);
        (next, effects)
    }
}

/// Effect module - Side effect descriptions
///
/// Reducers describe follow-up work as effects; the state model itself is
/// synchronous, so the only effect a reducer can return is [`Effect::None`].
/// I/O is performed by the shell around the store, which dispatches the
/// outcome as plain actions.
pub mod effect {
    use std::convert::Infallible;
    use std::marker::PhantomData;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type an effect would feed back to the reducer
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Uninhabited; ties the effect to its action type
        #[doc(hidden)]
        Never(Infallible, PhantomData<fn() -> Action>),
    }

    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Never(never, _) => match *never {},
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Re-type the effect for a parent action
        ///
        /// Used when a child reducer's effects are lifted into a parent action type.
        #[must_use]
        #[allow(clippy::needless_pass_by_value)] // Only inhabited variants would call `embed`
        pub fn map<B>(self, _embed: impl Fn(Action) -> B) -> Effect<B> {
            match self {
                Effect::None => Effect::None,
                Effect::Never(never, _) => match never {},
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All non-deterministic inputs (time, identifiers) are abstracted behind
/// traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use tripvote_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh unique identifiers
    pub trait IdGenerator: Send + Sync {
        /// Produce an identifier that has not been handed out before
        fn next_id(&self) -> Uuid;
    }

    /// Random (v4) UUID generator
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}
