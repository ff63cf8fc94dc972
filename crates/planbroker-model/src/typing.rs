//! User types, objects, variables and action parameters.

use std::fmt;

/// A named user type, optionally with a parent type.
///
/// A parent link makes the typing hierarchical: objects of a subtype
/// also populate the domain of every ancestor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserType {
    pub name: String,
    pub parent: Option<String>,
}

impl UserType {
    /// Creates a root user type.
    pub fn new(name: impl Into<String>) -> Self {
        UserType {
            name: name.into(),
            parent: None,
        }
    }

    /// Creates a user type with a parent type.
    pub fn with_parent(name: impl Into<String>, parent: impl Into<String>) -> Self {
        UserType {
            name: name.into(),
            parent: Some(parent.into()),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(p) => write!(f, "{} < {}", self.name, p),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A ground object of a user type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Object {
    pub name: String,
    pub ty: String,
}

impl Object {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Object {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A typed variable bound by a quantifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Variable {
    pub name: String,
    pub ty: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.ty)
    }
}

/// A typed action parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}
