//! End-to-end tests: slices sharing one dispatch channel.

use atomic_slice::{
    Action, ActionCreator, Catalog, ConfigurationError, Error, PayloadPolicy, Slice, UsageError,
};
use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct StateMate {
    number: i64,
    string: String,
}

fn test_slice(catalog: &Catalog, name: &str) -> Slice<StateMate> {
    Slice::builder(name, StateMate::default())
        .reducer("zero", |_: ()| {
            |state: StateMate| StateMate {
                number: state.number + 1,
                ..state
            }
        })
        .reducer("one", |(n,): (i64,)| {
            move |state: StateMate| StateMate {
                number: state.number + n,
                ..state
            }
        })
        .reducer("two", |(n, s): (i64, String)| {
            move |state: StateMate| StateMate {
                number: n,
                string: s,
                ..state
            }
        })
        .reducer("three", |(a, b, n): (String, String, i64)| {
            move |state: StateMate| StateMate {
                string: a + &b,
                number: n,
                ..state
            }
        })
        .build(catalog)
        .unwrap()
}

/// Minimal host container: every action goes to every slice.
struct Combined<'a> {
    slices: Vec<&'a Slice<StateMate>>,
    states: Vec<StateMate>,
}

impl<'a> Combined<'a> {
    fn new(slices: Vec<&'a Slice<StateMate>>) -> Self {
        let states = slices.iter().map(|s| s.reduce(None, &Action::bare("@@INIT"))).collect();
        Self { slices, states }
    }

    fn dispatch(&mut self, action: &Action) {
        let states = std::mem::take(&mut self.states);
        self.states = self
            .slices
            .iter()
            .zip(states)
            .map(|(slice, state)| slice.reduce(Some(state), action))
            .collect();
    }
}

// ============================================================================
// Action creation
// ============================================================================

#[test]
fn creates_actions_with_encoded_types() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");

    let one: ActionCreator<(i64,)> = slice.wrap("one").unwrap();
    let two = slice.wrap::<(i64, String)>("two").unwrap();
    let three = slice.wrap::<(String, String, i64)>("three").unwrap();

    assert_eq!(
        serde_json::to_value(one.create((1,))).unwrap(),
        json!({"type": "test_one", "payload": [1]})
    );
    assert_eq!(
        serde_json::to_value(two.create((100, "yeah".into()))).unwrap(),
        json!({"type": "test_two", "payload": [100, "yeah"]})
    );
    assert_eq!(
        serde_json::to_value(three.create(("yeah".into(), "no".into(), 1))).unwrap(),
        json!({"type": "test_three", "payload": ["yeah", "no", 1]})
    );
}

#[test]
fn zero_argument_action() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");
    let zero = slice.wrap::<()>("zero").unwrap();

    let action = zero.create(());
    assert_eq!(action, Action::new("test_zero", vec![]));
    assert_eq!(slice.reduce(None, &action).number, 1);
}

#[test]
fn strips_trailing_absent_arguments() {
    let catalog = Catalog::new();
    let slice = Slice::builder("opt", 0i64)
        .reducer(
            "sum",
            |(a, b, c): (i64, Option<i64>, Option<i64>)| {
                move |_: i64| a + b.unwrap_or(0) + c.unwrap_or(0)
            },
        )
        .build(&catalog)
        .unwrap();
    let sum = slice.wrap::<(i64, Option<i64>, Option<i64>)>("sum").unwrap();

    let action = sum.create((4, None, None));
    assert_eq!(action.payload, vec![json!(4)]);
    assert_eq!(slice.reduce(None, &action), 4);
}

#[test]
fn stripping_middle_hole_shifts_arguments() {
    let catalog = Catalog::new();
    let build = |name: &str, policy: PayloadPolicy| {
        Slice::builder(name, String::new())
            .reducer("join", |(a, b, n): (String, Option<String>, i64)| {
                move |_: String| format!("{a}{}{n}", b.unwrap_or_default())
            })
            .payload_policy(policy)
            .build(&catalog)
            .unwrap()
    };

    // Stripped: ["x", 5] no longer fits (String, Option<String>, i64).
    let stripped = build("stripped", PayloadPolicy::StripAbsent);
    let join = stripped
        .wrap::<(String, Option<String>, i64)>("join")
        .unwrap();
    let action = join.create(("x".into(), None, 5));
    assert_eq!(action.payload, vec![json!("x"), json!(5)]);
    assert_eq!(stripped.reduce(None, &action), "");

    // Positional: the hole survives as null.
    let positional = build("positional", PayloadPolicy::Positional);
    let join = positional
        .wrap::<(String, Option<String>, i64)>("join")
        .unwrap();
    let action = join.create(("x".into(), None, 5));
    assert_eq!(action.payload, vec![json!("x"), json!(null), json!(5)]);
    assert_eq!(positional.reduce(None, &action), "x5");
}

// ============================================================================
// Reducing
// ============================================================================

#[test]
fn applies_actions_to_state() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");
    let initial = StateMate::default();

    let one = slice.wrap::<(i64,)>("one").unwrap();
    assert_eq!(
        slice.reduce(Some(initial.clone()), &one.create((1,))),
        StateMate {
            number: 1,
            string: String::new(),
        }
    );

    let three = slice.wrap::<(String, String, i64)>("three").unwrap();
    assert_eq!(
        slice.reduce(Some(initial), &three.create(("hum".into(), "drum".into(), 65))),
        StateMate {
            number: 65,
            string: "humdrum".into(),
        }
    );
}

#[test]
fn unknown_action_leaves_state_unchanged() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");
    let state = StateMate {
        number: 3,
        string: "keep".into(),
    };

    let result = slice.reduce(Some(state.clone()), &Action::bare("totally_unrelated_garbage"));
    assert_eq!(result, state);
}

#[test]
fn tolerates_malformed_foreign_actions() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");
    let state = StateMate {
        number: 3,
        string: "keep".into(),
    };

    for raw in [
        json!({}),
        json!({"type": null}),
        json!({"type": "test_one"}),
        json!({"type": "test_one", "payload": {"n": 1}}),
        json!({"type": "test_two", "payload": [1]}),
        json!({"type": "test_three", "payload": "hum"}),
        json!([1, 2, 3]),
    ] {
        assert_eq!(slice.reduce_value(Some(state.clone()), &raw), state, "{raw}");
    }
}

#[test]
fn accepts_hand_written_actions() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");

    let action: Action = serde_json::from_str(r#"{"type": "test_one", "payload": 7}"#).unwrap();
    assert_eq!(slice.reduce(None, &action).number, 7);
}

#[test]
fn listeners_handle_foreign_actions() {
    let catalog = Catalog::new();
    let slice = Slice::builder("session", StateMate::default())
        .reducer("rename", |(s,): (String,)| {
            move |state: StateMate| StateMate { string: s, ..state }
        })
        .listener("auth/LOGOUT", |_: StateMate, _: &Action| StateMate::default())
        .listener("auth/LOGIN", |state: StateMate, action: &Action| StateMate {
            string: action
                .payload
                .first()
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            ..state
        })
        .build(&catalog)
        .unwrap();

    assert_eq!(
        slice.action_types(),
        vec!["session_rename", "auth/LOGOUT", "auth/LOGIN"]
    );

    let state = slice.reduce(None, &Action::new("auth/LOGIN", vec![json!("ada")]));
    assert_eq!(state.string, "ada");

    let state = slice.reduce(Some(state), &Action::bare("auth/LOGOUT"));
    assert_eq!(state, StateMate::default());

    let state = slice.reduce(Some(state), &Action::bare("auth/REFRESH"));
    assert_eq!(state, StateMate::default());
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn slices_sharing_a_channel_are_isolated() {
    let catalog = Catalog::new();
    let first = test_slice(&catalog, "atomic1");
    let second = test_slice(&catalog, "atomic2");
    let mut store = Combined::new(vec![&first, &second]);

    let first_two = first.wrap::<(i64, String)>("two").unwrap();
    let second_two = second.wrap::<(i64, String)>("two").unwrap();

    store.dispatch(&first_two.create((1, "Shitter".into())));
    assert_eq!(store.states[0].string, "Shitter");
    assert_eq!(store.states[1], StateMate::default());

    store.dispatch(&second_two.create((2, "Shotter".into())));
    assert_eq!(store.states[0].string, "Shitter");
    assert_eq!(store.states[1].string, "Shotter");
}

#[test]
fn prefix_named_slices_are_isolated() {
    let catalog = Catalog::new();
    let user = test_slice(&catalog, "user");
    let advanced = test_slice(&catalog, "userAdvanced");
    let mut store = Combined::new(vec![&user, &advanced]);

    let one = advanced.wrap::<(i64,)>("one").unwrap();
    store.dispatch(&one.create((10,)));

    assert_eq!(store.states[0], StateMate::default());
    assert_eq!(store.states[1].number, 10);
}

#[test]
fn overlapping_wire_types_are_rejected() {
    let catalog = Catalog::new();
    let user = Slice::builder("user", 0i64)
        .reducer("x_hello", |_: ()| |n: i64| n + 100)
        .build(&catalog)
        .unwrap();

    let err = Slice::builder("user_x", 0i64)
        .reducer("hello", |_: ()| |n: i64| n + 1)
        .build(&catalog)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ConflictingActionType {
            slice: "user_x".into(),
            other: "user".into(),
            action_type: "user_x_hello".into(),
        }
    );

    // A non-overlapping sibling still builds, and neither reacts to the other.
    let user_x = Slice::builder("user_x", 0i64)
        .reducer("bye", |_: ()| |n: i64| n + 1)
        .build(&catalog)
        .unwrap();
    let bye = user_x.wrap::<()>("bye").unwrap().create(());
    let x_hello = user.wrap::<()>("x_hello").unwrap().create(());
    assert_eq!(user.reduce(Some(0), &bye), 0);
    assert_eq!(user_x.reduce(Some(0), &x_hello), 0);
}

#[test]
fn overlapping_wire_types_are_rejected_in_either_order() {
    let catalog = Catalog::new();
    let _ab = Slice::builder("a_b", 0i64)
        .reducer("c", |_: ()| |n: i64| n + 1)
        .build(&catalog)
        .unwrap();

    let err = Slice::builder("a", 0i64)
        .reducer("b_c", |_: ()| |n: i64| n + 1)
        .build(&catalog)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::ConflictingActionType { ref other, .. } if other == "a_b"
    ));
    assert!(!catalog.contains("a"));
}

#[test]
fn distinct_type_prefixes_do_not_overlap() {
    let catalog = Catalog::new();
    let plain = Slice::builder("user", 0i64)
        .reducer("x_hello", |_: ()| |n: i64| n + 100)
        .build(&catalog)
        .unwrap();
    let legacy = Slice::builder("user_x", 0i64)
        .reducer("hello", |_: ()| |n: i64| n + 1)
        .type_prefix(atomic_slice::LEGACY_TYPE_PREFIX)
        .build(&catalog)
        .unwrap();

    let hello = legacy.wrap::<()>("hello").unwrap().create(());
    assert_eq!(hello.action_type, "ATOMIC_user_x_hello");
    assert_eq!(plain.reduce(Some(0), &hello), 0);
    assert_eq!(legacy.reduce(Some(0), &hello), 1);
}

// ============================================================================
// Setup errors
// ============================================================================

#[test]
fn duplicate_slice_names_fail() {
    let catalog = Catalog::new();
    let _first = Slice::builder("wooo", 0u8).build(&catalog).unwrap();

    let err = Slice::builder("wooo", 0u8).build(&catalog).unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicateSlice("wooo".into()));
}

#[test]
fn duplicate_reducer_names_fail() {
    let catalog = Catalog::new();
    let err = Slice::builder("dup", 0u8)
        .reducer("inc", |_: ()| |n: u8| n + 1)
        .reducer("inc", |_: ()| |n: u8| n + 2)
        .build(&catalog)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateReducer {
            slice: "dup".into(),
            action: "inc".into(),
        }
    );
    assert!(!catalog.contains("dup"));
}

#[test]
fn wrapping_unregistered_action_fails() {
    let catalog = Catalog::new();
    let slice = test_slice(&catalog, "test");

    let err = slice.wrap::<(i64,)>("nameNeverRegistered").unwrap_err();
    assert_eq!(
        err,
        UsageError::UnregisteredAction {
            slice: "test".into(),
            action: "nameNeverRegistered".into(),
        }
    );
}

#[test]
fn setup_errors_propagate_with_question_mark() {
    fn setup(catalog: &Catalog) -> atomic_slice::Result<Action> {
        let slice = test_slice(catalog, "test");
        let creator = slice.wrap::<(String,)>("one")?;
        Ok(creator.create(("x".into(),)))
    }

    let catalog = Catalog::new();
    let err = setup(&catalog).unwrap_err();
    assert!(matches!(
        err,
        Error::Usage(UsageError::ArgumentMismatch { .. })
    ));
}
