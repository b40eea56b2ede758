//! Wire type encoding.
//!
//! A wire type is the flat string that identifies an action on the shared
//! dispatch channel: `prefix + slice + "_" + action`. Decoding recovers the
//! action name for one specific slice and rejects everything else.
//!
//! ```text
//! encode("todos", "add")                 -> "todos_add"
//! decode("todos", "todos_add")           -> Some("add")
//! decode("user", "userAdvanced_hello")   -> None
//! ```

/// Separator between the slice name and the action name.
pub const SEPARATOR: char = '_';

/// Encodes a slice/action pair into a wire type.
pub fn encode(slice: &str, action: &str) -> String {
    encode_with_prefix("", slice, action)
}

/// Encodes a slice/action pair behind a fixed type prefix.
pub fn encode_with_prefix(prefix: &str, slice: &str, action: &str) -> String {
    let mut wire = String::with_capacity(prefix.len() + slice.len() + action.len() + 1);
    wire.push_str(prefix);
    wire.push_str(slice);
    wire.push(SEPARATOR);
    wire.push_str(action);
    wire
}

/// Decodes the action name addressed to `slice`, if any.
///
/// The wire type must start with the `slice_` token. The action name is
/// whatever follows the last occurrence of that token, so a slice whose
/// name is a prefix of another slice's name never claims its actions.
pub fn decode<'a>(slice: &str, wire: &'a str) -> Option<&'a str> {
    decode_with_prefix("", slice, wire)
}

/// Decodes the action name addressed to `slice` behind a fixed prefix.
pub fn decode_with_prefix<'a>(prefix: &str, slice: &str, wire: &'a str) -> Option<&'a str> {
    if slice.is_empty() {
        return None;
    }
    let rest = wire.strip_prefix(prefix)?;
    let token = slice_token(slice);
    if !rest.starts_with(&token) {
        return None;
    }
    let start = rest.rfind(&token)? + token.len();
    let action = &rest[start..];
    (!action.is_empty()).then_some(action)
}

/// Returns true if `action` would not survive an encode/decode round trip
/// under `slice`.
///
/// This happens when the action name repeats the `slice_` token, possibly
/// overlapping the end of the slice name itself.
pub fn is_ambiguous(slice: &str, action: &str) -> bool {
    decode(slice, &encode(slice, action)) != Some(action)
}

fn slice_token(slice: &str) -> String {
    let mut token = String::with_capacity(slice.len() + 1);
    token.push_str(slice);
    token.push(SEPARATOR);
    token
}
