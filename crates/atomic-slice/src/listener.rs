//! Listeners for foreign actions.
//!
//! Actions that were not produced by a slice's own action creators (framework
//! init actions, actions from other libraries, hand-written actions) can
//! still be handled by matching their wire type exactly. The table is fixed
//! when the slice is built and is only consulted after a routing miss.

use std::fmt;
use std::rc::Rc;

use crate::action::Action;
use crate::error::ConfigurationError;

/// Type alias for listener handlers.
pub type ListenerFn<S> = Rc<dyn Fn(S, &Action) -> S>;

/// A handler bound to one exact wire type.
pub struct Listener<S> {
    match_type: String,
    handler: ListenerFn<S>,
}

impl<S> Listener<S> {
    /// Creates a listener for `match_type`.
    pub fn new<F>(match_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(S, &Action) -> S + 'static,
    {
        Self {
            match_type: match_type.into(),
            handler: Rc::new(handler),
        }
    }

    /// Returns the wire type this listener matches.
    pub fn match_type(&self) -> &str {
        &self.match_type
    }
}

impl<S> Clone for Listener<S> {
    fn clone(&self) -> Self {
        Self {
            match_type: self.match_type.clone(),
            handler: Rc::clone(&self.handler),
        }
    }
}

/// The listeners of one slice.
pub struct ListenerTable<S> {
    entries: Vec<Listener<S>>,
}

impl<S> ListenerTable<S> {
    /// Validates and stores the listeners for `slice`.
    ///
    /// Match types must be non-empty and unique.
    pub fn new(slice: &str, entries: Vec<Listener<S>>) -> Result<Self, ConfigurationError> {
        for (index, listener) in entries.iter().enumerate() {
            if listener.match_type.is_empty() {
                return Err(ConfigurationError::EmptyListenerType {
                    slice: slice.to_string(),
                });
            }
            if entries[..index]
                .iter()
                .any(|l| l.match_type == listener.match_type)
            {
                return Err(ConfigurationError::DuplicateListener {
                    slice: slice.to_string(),
                    action_type: listener.match_type.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Runs the listener matching the action, or returns `state` unchanged.
    pub fn dispatch(&self, state: S, action: &Action) -> S {
        match self
            .entries
            .iter()
            .find(|l| l.match_type == action.action_type)
        {
            Some(listener) => {
                tracing::trace!(action_type = %action.action_type, "listener matched");
                (listener.handler)(state, action)
            }
            None => state,
        }
    }

    /// Returns the match types in registration order.
    pub fn match_types(&self) -> Vec<String> {
        self.entries.iter().map(|l| l.match_type.clone()).collect()
    }

    /// Returns the number of listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no listeners.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Default for ListenerTable<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S> fmt::Debug for ListenerTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTable")
            .field("match_types", &self.match_types())
            .finish()
    }
}
