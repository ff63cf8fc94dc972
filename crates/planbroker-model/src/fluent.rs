//! Fluent declarations.

use std::fmt;

use crate::typing::Parameter;

/// The value type of a fluent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
}

/// A declared state variable, possibly parameterized by typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fluent {
    pub name: String,
    pub value_type: ValueType,
    pub params: Vec<Parameter>,
}

impl Fluent {
    /// Declares a boolean fluent with no parameters.
    pub fn bool(name: impl Into<String>) -> Self {
        Fluent {
            name: name.into(),
            value_type: ValueType::Bool,
            params: Vec::new(),
        }
    }

    /// Declares an integer fluent with no parameters.
    pub fn int(name: impl Into<String>) -> Self {
        Fluent {
            name: name.into(),
            value_type: ValueType::Int,
            params: Vec::new(),
        }
    }

    /// Adds a typed parameter to the signature.
    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Fluent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {:?}", self.value_type)
    }
}
