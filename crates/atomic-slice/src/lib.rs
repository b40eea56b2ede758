//! Namespaced reducers and action creators for sliced application state.
//!
//! `atomic-slice` lets many independent slices of state share one action
//! dispatch channel. Each slice is defined by a name, an initial value, and a
//! set of named transition factories. From that definition it produces:
//!
//! - a **reducer** that a host state container calls with every action, and
//! - **action creators** that encode typed arguments into plain,
//!   serializable [`Action`]s addressed to one slice.
//!
//! # Features
//!
//! - **Collision-aware wire types**: `slice_action` strings that never route
//!   to a slice whose name merely shares a prefix ([`codec`]), and a
//!   [`Catalog`] that refuses slices whose wire types would overlap
//! - **Fail-fast setup**: duplicate slice names, duplicate or unroutable
//!   action names, overlapping wire types, and wrapping unregistered actions
//!   are reported at build time ([`ConfigurationError`], [`UsageError`])
//! - **Silent routing misses**: actions for other slices, unknown actions,
//!   and malformed foreign actions leave the state untouched
//! - **Typed arguments of any arity**: one [`Slice::wrap`] for every
//!   argument tuple ([`Args`])
//! - **Listeners**: exact-match handlers for actions authored elsewhere
//!
//! # Example
//!
//! ```rust
//! use atomic_slice::{Action, Catalog, Slice};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Todos {
//!     items: Vec<String>,
//! }
//!
//! let catalog = Catalog::new();
//! let todos = Slice::builder("todos", Todos::default())
//!     .reducer("add", |(item,): (String,)| {
//!         move |mut state: Todos| {
//!             state.items.push(item);
//!             state
//!         }
//!     })
//!     .reducer("clear", |_: ()| |_: Todos| Todos::default())
//!     .build(&catalog)?;
//!
//! let add = todos.wrap::<(String,)>("add")?;
//! let action = add.create(("write docs".into(),));
//! assert_eq!(action.action_type, "todos_add");
//!
//! let state = todos.reduce(None, &action);
//! assert_eq!(state.items, vec!["write docs"]);
//!
//! // Actions addressed elsewhere are ignored.
//! let state = todos.reduce(Some(state), &Action::bare("todosArchive_add"));
//! assert_eq!(state.items.len(), 1);
//! # Ok::<(), atomic_slice::Error>(())
//! ```
//!
//! # Catalogs
//!
//! Slice names are claimed in a [`Catalog`] that is passed to
//! [`SliceBuilder::build`]. Build all slices of one dispatch channel against
//! the same catalog; tests can use a fresh catalog each.

pub mod codec;

mod action;
mod catalog;
mod error;
mod listener;
mod registry;
mod slice;

pub use action::{normalize_payload, Action, Args, PayloadPolicy};
pub use catalog::Catalog;
pub use error::{ConfigurationError, Error, Result, UsageError};
pub use listener::{Listener, ListenerFn, ListenerTable};
pub use registry::{ReducerEntry, Registry, Transition};
pub use slice::{
    ActionCreator, RawActionCreator, Slice, SliceBuilder, SliceOptions, LEGACY_TYPE_PREFIX,
};
