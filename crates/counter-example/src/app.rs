//! The example application: a counter and a todo list on one channel.

use atomic_slice::{Action, ActionCreator, Catalog, Slice};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Todos {
    pub items: Vec<String>,
    pub done: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub counter: i64,
    pub todos: Todos,
}

/// Action creators for the application.
pub struct Actions {
    pub increment: ActionCreator<()>,
    pub add: ActionCreator<(i64,)>,
    pub push: ActionCreator<(String,)>,
    pub complete: ActionCreator<(Option<usize>,)>,
}

/// Host container: owns the slices and the combined state.
pub struct Store {
    counter: Slice<i64>,
    todos: Slice<Todos>,
    state: AppState,
}

pub fn counter_slice(catalog: &Catalog) -> atomic_slice::Result<Slice<i64>> {
    Ok(Slice::builder("counter", 0i64)
        .reducer("increment", |_: ()| |n: i64| n.saturating_add(1))
        .reducer("add", |(by,): (i64,)| move |n: i64| n.saturating_add(by))
        .listener("app/RESET", |_: i64, _: &Action| 0)
        .build(catalog)?)
}

pub fn todos_slice(catalog: &Catalog) -> atomic_slice::Result<Slice<Todos>> {
    Ok(Slice::builder("todos", Todos::default())
        .reducer("push", |(item,): (String,)| {
            move |mut todos: Todos| {
                todos.items.push(item);
                todos
            }
        })
        .reducer("complete", |(count,): (Option<usize>,)| {
            move |todos: Todos| Todos {
                done: todos
                    .done
                    .saturating_add(count.unwrap_or(1))
                    .min(todos.items.len()),
                ..todos
            }
        })
        .listener("app/RESET", |_: Todos, _: &Action| Todos::default())
        .build(catalog)?)
}

impl Store {
    pub fn new(catalog: &Catalog) -> atomic_slice::Result<(Self, Actions)> {
        let counter = counter_slice(catalog)?;
        let todos = todos_slice(catalog)?;

        let actions = Actions {
            increment: counter.wrap("increment")?,
            add: counter.wrap("add")?,
            push: todos.wrap("push")?,
            complete: todos.wrap("complete")?,
        };

        let init = Action::bare("app/INIT");
        let state = AppState {
            counter: counter.reduce(None, &init),
            todos: todos.reduce(None, &init),
        };

        Ok((
            Self {
                counter,
                todos,
                state,
            },
            actions,
        ))
    }

    pub fn dispatch(&mut self, action: &Action) {
        tracing::debug!(action_type = %action.action_type, "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = AppState {
            counter: self.counter.reduce(Some(state.counter), action),
            todos: self.todos.reduce(Some(state.todos), action),
        };
    }

    pub fn dispatch_value(&mut self, action: &serde_json::Value) {
        let state = std::mem::take(&mut self.state);
        self.state = AppState {
            counter: self.counter.reduce_value(Some(state.counter), action),
            todos: self.todos.reduce_value(Some(state.todos), action),
        };
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn action_types(&self) -> Vec<String> {
        let mut types = self.counter.action_types();
        types.extend(self.todos.action_types());
        types
    }
}
