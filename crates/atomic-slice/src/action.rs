//! Action descriptors and typed argument lists.
//!
//! An [`Action`] is the plain data placed on the shared dispatch channel:
//!
//! ```json
//! { "type": "todos_add", "payload": ["write docs", 3] }
//! ```
//!
//! The payload is the ordered argument list of the transition factory the
//! action targets. [`Args`] converts between a typed argument tuple and that
//! list, so a factory taking `(String, u8)` is wrapped once and called with a
//! tuple of any arity rather than through a family of fixed-arity wrappers.
//!
//! # Absent arguments
//!
//! An argument that serializes to `null` (typically `None`) is *absent*.
//! Under [`PayloadPolicy::StripAbsent`] absent entries are removed from the
//! payload, which keeps trailing optional arguments off the wire but shifts
//! any argument that follows a hole. [`PayloadPolicy::Positional`] keeps
//! holes as `null` so every argument stays in its slot.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

static ABSENT: Value = Value::Null;

/// A dispatchable action: a wire type plus an ordered payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The wire type, usually produced by [`crate::codec::encode`].
    #[serde(rename = "type")]
    pub action_type: String,

    /// Arguments for the targeted transition factory.
    ///
    /// Deserialization is lenient: a missing or `null` payload becomes an
    /// empty list and a bare value becomes a one-element list.
    #[serde(default, deserialize_with = "lenient_payload")]
    pub payload: Vec<Value>,
}

impl Action {
    /// Creates an action with the given payload.
    pub fn new(action_type: impl Into<String>, payload: Vec<Value>) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// Creates an action with an empty payload.
    ///
    /// Handy for foreign actions such as `"@@INIT"` that only carry a type.
    pub fn bare(action_type: impl Into<String>) -> Self {
        Self::new(action_type, Vec::new())
    }

    /// Reads an action out of arbitrary JSON.
    ///
    /// Returns `None` when there is no string `type` field. The payload is
    /// normalized the same way as during deserialization.
    pub fn from_value(value: &Value) -> Option<Self> {
        let action_type = value.get("type")?.as_str()?;
        let payload = value
            .get("payload")
            .cloned()
            .map(normalize_payload)
            .unwrap_or_default();
        Some(Self::new(action_type, payload))
    }
}

/// Normalizes a raw payload into an argument list.
pub fn normalize_payload(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(normalize_payload)
}

/// How absent arguments are written into a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPolicy {
    /// Drop absent arguments entirely.
    #[default]
    StripAbsent,
    /// Keep absent arguments as `null` so positions are preserved.
    Positional,
}

impl PayloadPolicy {
    /// Applies the policy to an argument list.
    pub fn apply(self, values: Vec<Value>) -> Vec<Value> {
        match self {
            PayloadPolicy::StripAbsent => values.into_iter().filter(|v| !v.is_null()).collect(),
            PayloadPolicy::Positional => values,
        }
    }
}

/// A typed, ordered argument list for a transition factory.
///
/// Implemented for `()` and for tuples of up to twelve elements whose
/// members are `Serialize + DeserializeOwned`.
///
/// ```rust
/// use atomic_slice::Args;
/// use serde_json::json;
///
/// let values = ("hum".to_string(), 65u32).into_values();
/// assert_eq!(values, vec![json!("hum"), json!(65)]);
///
/// let back = <(String, u32)>::from_values(&values).unwrap();
/// assert_eq!(back, ("hum".to_string(), 65));
/// ```
pub trait Args: Sized + 'static {
    /// Converts the arguments into payload values, one per element.
    ///
    /// An element that cannot be represented as JSON is written as absent.
    fn into_values(self) -> Vec<Value>;

    /// Rebuilds the arguments from payload values.
    ///
    /// Missing trailing values decode from `null`. Returns `None` when a
    /// value has the wrong type or when non-null values are left over.
    fn from_values(values: &[Value]) -> Option<Self>;
}

impl Args for () {
    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }

    fn from_values(values: &[Value]) -> Option<Self> {
        values.iter().all(Value::is_null).then_some(())
    }
}

fn to_arg<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "argument could not be encoded, treating it as absent");
        Value::Null
    })
}

fn from_arg<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    T::deserialize(value.unwrap_or(&ABSENT)).ok()
}

macro_rules! impl_args {
    ($($name:ident),+) => {
        impl<$($name),+> Args for ($($name,)+)
        where
            $($name: Serialize + DeserializeOwned + 'static),+
        {
            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($($name,)+) = self;
                vec![$(to_arg($name)),+]
            }

            fn from_values(values: &[Value]) -> Option<Self> {
                let mut iter = values.iter();
                let args = ($(from_arg::<$name>(iter.next())?,)+);
                iter.all(Value::is_null).then_some(args)
            }
        }
    };
}

impl_args!(A);
impl_args!(A, B);
impl_args!(A, B, C);
impl_args!(A, B, C, D);
impl_args!(A, B, C, D, E);
impl_args!(A, B, C, D, E, F);
impl_args!(A, B, C, D, E, F, G);
impl_args!(A, B, C, D, E, F, G, H);
impl_args!(A, B, C, D, E, F, G, H, I);
impl_args!(A, B, C, D, E, F, G, H, I, J);
impl_args!(A, B, C, D, E, F, G, H, I, J, K);
impl_args!(A, B, C, D, E, F, G, H, I, J, K, L);
