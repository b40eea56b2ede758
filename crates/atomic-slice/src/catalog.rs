//! Slice name catalog.
//!
//! Slice names share one dispatch channel, so two live slices with the same
//! name would each react to the other's actions. A [`Catalog`] records the
//! names currently in use. It is passed to [`crate::SliceBuilder::build`]
//! explicitly, which keeps its lifetime visible and lets every test start
//! from a fresh catalog.
//!
//! Distinct names are not enough on their own: a slice `user` with an action
//! `x_hello` and a slice `user_x` with an action `hello` both produce
//! `user_x_hello`. Built slices therefore also record their prefix and action
//! names, and a new slice is rejected when one of its wire types would route
//! to another live slice, or the other way round.
//!
//! A built slice holds a lease on its name and returns it when dropped, so
//! slices with a dynamic lifetime can be rebuilt under the same name.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::codec;
use crate::error::ConfigurationError;

#[derive(Default)]
struct Claims {
    names: RefCell<BTreeMap<String, Claim>>,
    next_id: Cell<u64>,
}

/// What a live slice routes: its wire type prefix and action names.
#[derive(Default)]
struct Claim {
    id: u64,
    prefix: String,
    actions: Vec<String>,
}

impl Claim {
    fn routes(&self, name: &str, wire: &str) -> bool {
        codec::decode_with_prefix(&self.prefix, name, wire)
            .is_some_and(|action| self.actions.iter().any(|a| a == action))
    }

    fn wire_types<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        self.actions
            .iter()
            .map(move |action| codec::encode_with_prefix(&self.prefix, name, action))
    }
}

/// Shared registry of slice names in use.
///
/// Cloning a catalog yields another handle to the same set of names.
///
/// ```rust
/// use atomic_slice::Catalog;
///
/// let catalog = Catalog::new();
/// catalog.claim("todos")?;
/// assert!(catalog.claim("todos").is_err());
///
/// assert!(catalog.release("todos"));
/// catalog.claim("todos")?;
/// # Ok::<(), atomic_slice::ConfigurationError>(())
/// ```
#[derive(Clone, Default)]
pub struct Catalog {
    claims: Rc<Claims>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a slice name.
    ///
    /// Fails with [`ConfigurationError::DuplicateSlice`] if the name is taken.
    pub fn claim(&self, name: &str) -> Result<(), ConfigurationError> {
        self.claim_id(name, Claim::default()).map(|_| ())
    }

    /// Releases a slice name. Returns true if it was claimed.
    pub fn release(&self, name: &str) -> bool {
        self.claims.names.borrow_mut().remove(name).is_some()
    }

    /// Returns true if the name is claimed.
    pub fn contains(&self, name: &str) -> bool {
        self.claims.names.borrow().contains_key(name)
    }

    /// Returns the claimed names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.claims.names.borrow().keys().cloned().collect()
    }

    /// Returns the number of claimed names.
    pub fn len(&self) -> usize {
        self.claims.names.borrow().len()
    }

    /// Returns true if no names are claimed.
    pub fn is_empty(&self) -> bool {
        self.claims.names.borrow().is_empty()
    }

    pub(crate) fn lease(
        &self,
        name: &str,
        prefix: &str,
        actions: Vec<String>,
    ) -> Result<NameLease, ConfigurationError> {
        let claim = Claim {
            id: 0,
            prefix: prefix.to_string(),
            actions,
        };
        let id = self.claim_id(name, claim)?;
        Ok(NameLease {
            catalog: self.clone(),
            name: name.to_string(),
            id,
        })
    }

    fn claim_id(&self, name: &str, mut claim: Claim) -> Result<u64, ConfigurationError> {
        let mut names = self.claims.names.borrow_mut();
        if names.contains_key(name) {
            return Err(ConfigurationError::DuplicateSlice(name.to_string()));
        }

        for (other, existing) in names.iter() {
            let collision = claim
                .wire_types(name)
                .find(|wire| existing.routes(other, wire))
                .or_else(|| {
                    existing
                        .wire_types(other)
                        .find(|wire| claim.routes(name, wire))
                });
            if let Some(action_type) = collision {
                return Err(ConfigurationError::ConflictingActionType {
                    slice: name.to_string(),
                    other: other.clone(),
                    action_type,
                });
            }
        }

        let id = self.claims.next_id.get();
        self.claims.next_id.set(id + 1);
        claim.id = id;
        names.insert(name.to_string(), claim);
        Ok(id)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("names", &self.names())
            .finish()
    }
}

/// A claimed name that is released on drop.
///
/// The release only happens if the catalog still maps the name to this
/// lease, so a manual [`Catalog::release`] followed by a new claim is not
/// undone when the old holder goes away.
pub(crate) struct NameLease {
    catalog: Catalog,
    name: String,
    id: u64,
}

impl Drop for NameLease {
    fn drop(&mut self) {
        let mut names = self.catalog.claims.names.borrow_mut();
        if names.get(&self.name).map(|claim| claim.id) == Some(self.id) {
            names.remove(&self.name);
        }
    }
}

impl fmt::Debug for NameLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameLease")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
