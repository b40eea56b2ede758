//! Named transition factories for one slice.
//!
//! A transition factory takes an argument list and returns a transition: a
//! pure `S -> S` function. The registry stores factories type-erased behind
//! the payload format, so the reducer can rebuild the arguments from an
//! incoming action without knowing their types statically.

use std::any::{type_name, TypeId};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::action::Args;
use crate::codec;
use crate::error::ConfigurationError;

/// A prepared state transition.
pub type Transition<S> = Box<dyn FnOnce(S) -> S>;

type ErasedFactory<S> = Rc<dyn Fn(&[Value]) -> Option<Transition<S>>>;

/// A transition factory registered under an action name.
pub struct ReducerEntry<S> {
    name: String,
    args: TypeId,
    args_name: &'static str,
    factory: ErasedFactory<S>,
}

impl<S: 'static> ReducerEntry<S> {
    /// Wraps a typed factory.
    ///
    /// ```rust
    /// use atomic_slice::ReducerEntry;
    /// use serde_json::json;
    ///
    /// let add = ReducerEntry::new("add", |(n,): (i64,)| move |total: i64| total + n);
    /// let transition = add.prepare(&[json!(2)]).unwrap();
    /// assert_eq!(transition(40), 42);
    /// ```
    pub fn new<A, F, T>(name: impl Into<String>, factory: F) -> Self
    where
        A: Args,
        F: Fn(A) -> T + 'static,
        T: FnOnce(S) -> S + 'static,
    {
        let factory: ErasedFactory<S> = Rc::new(move |values: &[Value]| {
            let args = A::from_values(values)?;
            Some(Box::new(factory(args)) as Transition<S>)
        });
        Self {
            name: name.into(),
            args: TypeId::of::<A>(),
            args_name: type_name::<A>(),
            factory,
        }
    }
}

impl<S> ReducerEntry<S> {
    /// Returns the action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the argument type the factory takes.
    pub fn args_type(&self) -> &'static str {
        self.args_name
    }

    /// Returns true if the factory takes arguments of type `A`.
    pub fn accepts<A: Args>(&self) -> bool {
        self.args == TypeId::of::<A>()
    }

    /// Applies the factory to a payload.
    ///
    /// Returns `None` when the payload does not decode into the factory's
    /// arguments.
    pub fn prepare(&self, values: &[Value]) -> Option<Transition<S>> {
        (self.factory)(values)
    }
}

impl<S> Clone for ReducerEntry<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            args: self.args,
            args_name: self.args_name,
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<S> fmt::Debug for ReducerEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerEntry")
            .field("name", &self.name)
            .field("args", &self.args_name)
            .finish_non_exhaustive()
    }
}

/// The validated set of transition factories for one slice.
pub struct Registry<S> {
    slice: String,
    prefix: String,
    entries: Vec<ReducerEntry<S>>,
}

impl<S> Registry<S> {
    /// Validates and stores the entries.
    ///
    /// Fails on an empty slice name, an unnamed entry, a duplicate action
    /// name, or an action name that embeds the `slice_` token.
    pub fn new(
        slice: impl Into<String>,
        prefix: impl Into<String>,
        entries: Vec<ReducerEntry<S>>,
    ) -> Result<Self, ConfigurationError> {
        let slice = slice.into();
        if slice.is_empty() {
            return Err(ConfigurationError::EmptySliceName);
        }

        let total = entries.len();
        for (index, entry) in entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(ConfigurationError::UnnamedReducer {
                    slice,
                    index: index + 1,
                    total,
                });
            }
            if entries[..index].iter().any(|e| e.name == entry.name) {
                return Err(ConfigurationError::DuplicateReducer {
                    slice,
                    action: entry.name.clone(),
                });
            }
            if codec::is_ambiguous(&slice, &entry.name) {
                return Err(ConfigurationError::AmbiguousReducer {
                    slice,
                    action: entry.name.clone(),
                });
            }
        }

        Ok(Self {
            slice,
            prefix: prefix.into(),
            entries,
        })
    }

    /// Returns the slice name.
    pub fn slice_name(&self) -> &str {
        &self.slice
    }

    /// Returns the fixed wire type prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Finds the factory registered under `action`.
    pub fn lookup(&self, action: &str) -> Option<&ReducerEntry<S>> {
        self.entries.iter().find(|e| e.name == action)
    }

    /// Returns true if `action` is registered.
    pub fn contains(&self, action: &str) -> bool {
        self.lookup(action).is_some()
    }

    /// Finds the factory a wire type is addressed to.
    pub fn resolve(&self, wire: &str) -> Option<&ReducerEntry<S>> {
        codec::decode_with_prefix(&self.prefix, &self.slice, wire).and_then(|a| self.lookup(a))
    }

    /// Encodes an action name under this slice.
    pub fn wire_type(&self, action: &str) -> String {
        codec::encode_with_prefix(&self.prefix, &self.slice, action)
    }

    /// Returns the wire types of every registered action, in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| self.wire_type(&e.name)).collect()
    }

    /// Iterates over the registered entries.
    pub fn entries(&self) -> impl Iterator<Item = &ReducerEntry<S>> {
        self.entries.iter()
    }

    /// Returns the number of registered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("slice", &self.slice)
            .field("prefix", &self.prefix)
            .field("entries", &self.entries)
            .finish()
    }
}
