//! Slices: reducers and action creators bound to one name.
//!
//! A [`Slice`] ties a [`Registry`] of transition factories to an initial
//! state and a [`ListenerTable`]. It exposes two halves of the protocol:
//!
//! - [`Slice::reduce`], the reducer a host container calls for every action
//!   on the shared channel, and
//! - [`Slice::wrap`], which produces [`ActionCreator`]s that encode typed
//!   arguments into [`Action`]s addressed to this slice.
//!
//! # Routing
//!
//! ```text
//! action.type
//!   → decode against "prefix + name + _"   (miss → listeners → unchanged)
//!   → registry lookup                      (miss → listeners → unchanged)
//!   → decode payload into the factory args (mismatch → unchanged)
//!   → transition(state)
//! ```
//!
//! Every miss leaves the state untouched. That is what lets many slices share
//! one dispatch channel: each reducer sees every action and ignores the ones
//! that are not addressed to it.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{Action, Args, PayloadPolicy};
use crate::catalog::{Catalog, NameLease};
use crate::error::{ConfigurationError, UsageError};
use crate::listener::{Listener, ListenerTable};
use crate::registry::{ReducerEntry, Registry};

/// The wire type prefix used by early releases of the format.
pub const LEGACY_TYPE_PREFIX: &str = "ATOMIC_";

/// Options applied when building a slice.
///
/// All fields have defaults, so options can be read from partial config:
///
/// ```rust
/// use atomic_slice::{PayloadPolicy, SliceOptions};
///
/// let options: SliceOptions = serde_json::from_str(r#"{"payload_policy": "positional"}"#)?;
/// assert_eq!(options.payload_policy, PayloadPolicy::Positional);
/// assert_eq!(options.type_prefix, "");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceOptions {
    /// Fixed string placed in front of every wire type.
    pub type_prefix: String,
    /// How absent arguments are written into payloads.
    pub payload_policy: PayloadPolicy,
}

/// Builder for [`Slice`].
pub struct SliceBuilder<S> {
    name: String,
    initial: S,
    options: SliceOptions,
    reducers: Vec<ReducerEntry<S>>,
    listeners: Vec<Listener<S>>,
}

impl<S: Clone + 'static> SliceBuilder<S> {
    /// Starts a slice definition.
    pub fn new(name: impl Into<String>, initial: S) -> Self {
        Self {
            name: name.into(),
            initial,
            options: SliceOptions::default(),
            reducers: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Registers a transition factory under `action`.
    ///
    /// The factory's argument type `A` is the tuple that action creators for
    /// this action will accept.
    pub fn reducer<A, F, T>(mut self, action: impl Into<String>, factory: F) -> Self
    where
        A: Args,
        F: Fn(A) -> T + 'static,
        T: FnOnce(S) -> S + 'static,
    {
        self.reducers.push(ReducerEntry::new(action, factory));
        self
    }

    /// Registers a listener for a foreign action type.
    pub fn listener<F>(mut self, match_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(S, &Action) -> S + 'static,
    {
        self.listeners.push(Listener::new(match_type, handler));
        self
    }

    /// Sets the wire type prefix.
    pub fn type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.type_prefix = prefix.into();
        self
    }

    /// Sets the payload policy.
    pub fn payload_policy(mut self, policy: PayloadPolicy) -> Self {
        self.options.payload_policy = policy;
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: SliceOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the definition and claims the slice name in `catalog`.
    ///
    /// Fails when the name is taken, or when one of this slice's wire types
    /// would also route to another live slice in the catalog.
    pub fn build(self, catalog: &Catalog) -> Result<Slice<S>, ConfigurationError> {
        let registry = Registry::new(self.name, self.options.type_prefix, self.reducers)?;
        let listeners = ListenerTable::new(registry.slice_name(), self.listeners)?;
        let actions = registry.entries().map(|e| e.name().to_string()).collect();
        let lease = catalog.lease(registry.slice_name(), registry.prefix(), actions)?;

        if registry.is_empty() && listeners.is_empty() {
            tracing::warn!(
                slice = registry.slice_name(),
                "slice has no reducers or listeners and will ignore every action"
            );
        }
        tracing::debug!(
            slice = registry.slice_name(),
            reducers = registry.len(),
            listeners = listeners.len(),
            "slice built"
        );

        Ok(Slice {
            registry,
            listeners,
            initial: self.initial,
            policy: self.options.payload_policy,
            _lease: lease,
        })
    }
}

/// A named slice of state.
///
/// ```rust
/// use atomic_slice::{Catalog, Slice};
///
/// let catalog = Catalog::new();
/// let counter = Slice::builder("counter", 0i64)
///     .reducer("add", |(n,): (i64,)| move |total: i64| total + n)
///     .reducer("reset", |_: ()| |_: i64| 0)
///     .build(&catalog)?;
///
/// let add = counter.wrap::<(i64,)>("add")?;
/// let state = counter.reduce(None, &add.create((5,)));
/// assert_eq!(state, 5);
/// # Ok::<(), atomic_slice::Error>(())
/// ```
pub struct Slice<S> {
    registry: Registry<S>,
    listeners: ListenerTable<S>,
    initial: S,
    policy: PayloadPolicy,
    _lease: NameLease,
}

impl<S: Clone + 'static> Slice<S> {
    /// Starts a slice definition.
    pub fn builder(name: impl Into<String>, initial: S) -> SliceBuilder<S> {
        SliceBuilder::new(name, initial)
    }

    /// Applies an action to the slice state.
    ///
    /// An absent state is replaced by the initial state. Actions addressed to
    /// other slices, unknown actions, and payloads that do not fit the
    /// targeted factory all return the state unchanged.
    pub fn reduce(&self, state: Option<S>, action: &Action) -> S {
        let state = state.unwrap_or_else(|| self.initial.clone());

        let Some(entry) = self.registry.resolve(&action.action_type) else {
            tracing::trace!(
                slice = self.name(),
                action_type = %action.action_type,
                "not addressed to slice"
            );
            return self.listeners.dispatch(state, action);
        };

        match entry.prepare(&action.payload) {
            Some(transition) => transition(state),
            None => {
                tracing::debug!(
                    slice = self.name(),
                    action = entry.name(),
                    expected = entry.args_type(),
                    payload = ?action.payload,
                    "payload does not fit reducer arguments, ignoring"
                );
                state
            }
        }
    }

    /// Applies an arbitrary JSON action to the slice state.
    ///
    /// Values without a string `type` are ignored.
    pub fn reduce_value(&self, state: Option<S>, action: &Value) -> S {
        match Action::from_value(action) {
            Some(action) => self.reduce(state, &action),
            None => {
                tracing::trace!(slice = self.name(), "ignoring malformed action");
                state.unwrap_or_else(|| self.initial.clone())
            }
        }
    }

    /// Turns the slice into a plain reducer function.
    pub fn into_reducer(self) -> impl Fn(Option<S>, &Action) -> S {
        move |state: Option<S>, action: &Action| self.reduce(state, action)
    }
}

impl<S> Slice<S> {
    /// Returns the slice name.
    pub fn name(&self) -> &str {
        self.registry.slice_name()
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// Returns the wire type prefix.
    pub fn type_prefix(&self) -> &str {
        self.registry.prefix()
    }

    /// Returns the payload policy.
    pub fn payload_policy(&self) -> PayloadPolicy {
        self.policy
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Returns the listener table.
    pub fn listeners(&self) -> &ListenerTable<S> {
        &self.listeners
    }

    /// Creates a typed action creator for a registered action.
    ///
    /// Fails if the name is empty, was never registered, or was registered
    /// with a different argument type.
    pub fn wrap<A: Args>(&self, action: &str) -> Result<ActionCreator<A>, UsageError> {
        if action.is_empty() {
            return Err(UsageError::InvalidActionName {
                slice: self.name().to_string(),
            });
        }
        let entry = self
            .registry
            .lookup(action)
            .ok_or_else(|| UsageError::UnregisteredAction {
                slice: self.name().to_string(),
                action: action.to_string(),
            })?;
        if !entry.accepts::<A>() {
            return Err(UsageError::ArgumentMismatch {
                slice: self.name().to_string(),
                action: action.to_string(),
                expected: entry.args_type(),
                requested: std::any::type_name::<A>(),
            });
        }

        Ok(ActionCreator {
            raw: self.raw_creator(action),
            _args: PhantomData,
        })
    }

    /// Returns untyped creators for every registered action, keyed by action name.
    pub fn actions(&self) -> BTreeMap<String, RawActionCreator> {
        self.registry
            .entries()
            .map(|e| (e.name().to_string(), self.raw_creator(e.name())))
            .collect()
    }

    /// Returns every wire type this slice reacts to: registered actions
    /// first, then listener match types.
    pub fn action_types(&self) -> Vec<String> {
        let mut types = self.registry.list_names();
        types.extend(self.listeners.match_types());
        types
    }

    fn raw_creator(&self, action: &str) -> RawActionCreator {
        RawActionCreator {
            action_type: self.registry.wire_type(action),
            policy: self.policy,
        }
    }
}

impl<S> fmt::Debug for Slice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("registry", &self.registry)
            .field("listeners", &self.listeners)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Builds actions from untyped argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawActionCreator {
    action_type: String,
    policy: PayloadPolicy,
}

impl RawActionCreator {
    /// Returns the wire type of created actions.
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Creates an action from payload values, applying the payload policy.
    pub fn create(&self, values: Vec<Value>) -> Action {
        Action::new(self.action_type.clone(), self.policy.apply(values))
    }
}

/// Builds actions from a typed argument tuple.
pub struct ActionCreator<A> {
    raw: RawActionCreator,
    _args: PhantomData<fn(A)>,
}

impl<A: Args> ActionCreator<A> {
    /// Returns the wire type of created actions.
    pub fn action_type(&self) -> &str {
        self.raw.action_type()
    }

    /// Creates an action carrying `args`.
    pub fn create(&self, args: A) -> Action {
        self.raw.create(args.into_values())
    }

    /// Returns the untyped creator.
    pub fn raw(&self) -> &RawActionCreator {
        &self.raw
    }
}

impl<A> Clone for ActionCreator<A> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _args: PhantomData,
        }
    }
}

impl<A> fmt::Debug for ActionCreator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.raw.action_type)
            .field("args", &std::any::type_name::<A>())
            .finish()
    }
}
