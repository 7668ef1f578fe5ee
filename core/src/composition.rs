//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Embed a child reducer in a parent's state, action and
//!   environment
//!
//! A feature reducer (voting, auth) is written against its own small types and
//! then scoped into the application-wide state. The application reducer is the
//! combination of every scoped child.
//!
//! # Examples
//!
//! ```
//! use tripvote_core::composition::{combine_reducers, scope_reducer};
//! use tripvote_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct Counter {
//!     count: i32,
//! }
//!
//! #[derive(Clone)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Counter, _action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct App {
//!     left: Counter,
//!     right: Counter,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Left(CounterAction),
//!     Right(CounterAction),
//! }
//!
//! let app = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut App| &mut s.left,
//!         |a: AppAction| match a { AppAction::Left(a) => Some(a), AppAction::Right(_) => None },
//!         AppAction::Left,
//!         |_: &()| &(),
//!     )),
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut App| &mut s.right,
//!         |a: AppAction| match a { AppAction::Right(a) => Some(a), AppAction::Left(_) => None },
//!         AppAction::Right,
//!         |_: &()| &(),
//!     )),
//! ]);
//!
//! let mut state = App::default();
//! let _ = app.reduce(&mut state, AppAction::Right(CounterAction::Increment), &());
//! assert_eq!(state.left.count, 0);
//! assert_eq!(state.right.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer over a shared state, action and environment.
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a child reducer into a parent's state, action and environment.
///
/// - `state` projects the parent state onto the child's slice
/// - `extract` picks the child action out of a parent action (or `None` to skip)
/// - `embed` lifts child actions produced by effects back into the parent type
/// - `environment` projects the parent environment onto the child's
pub fn scope_reducer<R, S, A, E>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
) -> ScopedReducer<R, S, A, E>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
    }
}

/// A child reducer embedded in a parent domain.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<R, S, A, E>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
}

impl<R, S, A, E> Reducer for ScopedReducer<R, S, A, E>
where
    R: Reducer,
    R::Action: 'static,
    A: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let child_env = (self.environment)(env);

        self.reducer
            .reduce(child_state, child_action, child_env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}
