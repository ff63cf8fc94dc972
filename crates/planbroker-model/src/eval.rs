//! Ground evaluation of quantifier-free expressions against a state.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::expr::Expr;
use crate::problem::Problem;

/// A ground value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    Bool(bool),
    Int(i64),
}

impl Value {
    pub fn as_bool(self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Int(_) => Err(EvalError::TypeMismatch),
        }
    }

    pub fn as_int(self) -> Result<i64, EvalError> {
        match self {
            Value::Int(i) => Ok(i),
            Value::Bool(_) => Err(EvalError::TypeMismatch),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Errors from ground evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The expression contains a quantifier, bound variable or parameter.
    #[error("expression `{0}` is not ground")]
    NotGround(String),

    /// The state records no value for this grounded fluent.
    #[error("fluent `{0}` has no value in the state")]
    Undefined(String),

    /// A boolean was used as an integer or vice versa.
    #[error("type mismatch in expression")]
    TypeMismatch,

    /// Integer arithmetic left the representable range.
    #[error("integer overflow in expression")]
    Overflow,
}

/// Key of a grounded fluent in a state: fluent name plus object-name
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FluentKey {
    pub fluent: String,
    pub args: Vec<String>,
}

impl FluentKey {
    /// Builds the key of a ground fluent expression.
    ///
    /// Arguments must be objects (or integers, rendered by value).
    pub fn of(expr: &Expr) -> Result<FluentKey, EvalError> {
        let Expr::Fluent { name, args } = expr else {
            return Err(EvalError::NotGround(expr.to_string()));
        };
        let mut key_args = Vec::with_capacity(args.len());
        for a in args {
            match a {
                Expr::Object { name, .. } => key_args.push(name.clone()),
                Expr::Int(i) => key_args.push(i.to_string()),
                other => return Err(EvalError::NotGround(other.to_string())),
            }
        }
        Ok(FluentKey {
            fluent: name.clone(),
            args: key_args,
        })
    }
}

impl fmt::Display for FluentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.fluent)
        } else {
            write!(f, "{}({})", self.fluent, self.args.join(", "))
        }
    }
}

/// A total assignment of values to grounded fluents.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct State {
    values: BTreeMap<FluentKey, Value>,
}

impl State {
    pub fn new() -> Self {
        State::default()
    }

    pub fn set(&mut self, key: FluentKey, value: Value) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &FluentKey) -> Option<Value> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Problem {
    /// Builds the initial state from the problem's initial value pairs.
    pub fn initial_state(&self) -> Result<State, EvalError> {
        let mut state = State::new();
        for (fluent, value) in self.initial_values() {
            let key = FluentKey::of(fluent)?;
            let value = match value {
                Expr::Bool(b) => Value::Bool(*b),
                Expr::Int(i) => Value::Int(*i),
                other => eval(other, &state)?,
            };
            state.set(key, value);
        }
        Ok(state)
    }
}

/// Evaluates a ground, quantifier-free expression against a state.
pub fn eval(expr: &Expr, state: &State) -> Result<Value, EvalError> {
    match expr {
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(i) => Ok(Value::Int(*i)),
        Expr::Fluent { .. } => {
            let key = FluentKey::of(expr)?;
            state
                .get(&key)
                .ok_or_else(|| EvalError::Undefined(key.to_string()))
        }
        Expr::Not(e) => Ok(Value::Bool(!eval(e, state)?.as_bool()?)),
        Expr::And(es) => {
            for e in es {
                if !eval(e, state)?.as_bool()? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        Expr::Or(es) => {
            for e in es {
                if eval(e, state)?.as_bool()? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Expr::Eq(l, r) => {
            let (l, r) = (eval_term(l, state)?, eval_term(r, state)?);
            Ok(Value::Bool(l == r))
        }
        Expr::Lt(l, r) => Ok(Value::Bool(
            eval(l, state)?.as_int()? < eval(r, state)?.as_int()?,
        )),
        Expr::Le(l, r) => Ok(Value::Bool(
            eval(l, state)?.as_int()? <= eval(r, state)?.as_int()?,
        )),
        Expr::Add(l, r) => eval(l, state)?
            .as_int()?
            .checked_add(eval(r, state)?.as_int()?)
            .map(Value::Int)
            .ok_or(EvalError::Overflow),
        Expr::Sub(l, r) => eval(l, state)?
            .as_int()?
            .checked_sub(eval(r, state)?.as_int()?)
            .map(Value::Int)
            .ok_or(EvalError::Overflow),
        Expr::Param(_) | Expr::Var(_) | Expr::Exists { .. } | Expr::Forall { .. } => {
            Err(EvalError::NotGround(expr.to_string()))
        }
        // A bare object only appears under equality; eval_term handles it.
        Expr::Object { .. } => Err(EvalError::NotGround(expr.to_string())),
    }
}

/// A term under equality: an object name, or any evaluable value.
#[derive(Debug, PartialEq, Eq)]
enum Term {
    Object(String),
    Value(Value),
}

fn eval_term(expr: &Expr, state: &State) -> Result<Term, EvalError> {
    match expr {
        Expr::Object { name, .. } => Ok(Term::Object(name.clone())),
        other => Ok(Term::Value(eval(other, state)?)),
    }
}
