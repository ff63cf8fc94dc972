//! Expression trees for conditions, goals and effect values.

use std::fmt;
use std::ops::Not;

use crate::typing::Variable;

/// Argument list of a fluent expression.
pub type Args = Vec<Expr>;

/// A typed expression tree node.
///
/// Boolean connectives are kept flat: the [`Expr::and`] and [`Expr::or`]
/// constructors merge nested children of the same operator and never
/// produce a single-child `And`/`Or`, so an `And`/`Or` node always has
/// at least two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Boolean constant.
    Bool(bool),
    /// Integer constant.
    Int(i64),
    /// Application of a declared fluent to arguments.
    Fluent { name: String, args: Args },
    /// Reference to an action parameter by name.
    Param(String),
    /// Occurrence of a quantifier-bound variable.
    Var(Variable),
    /// A ground object.
    Object { name: String, ty: String },
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Le(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    /// Existential quantification of `body` over the objects of `var`'s type.
    Exists { var: Variable, body: Box<Expr> },
    /// Universal quantification of `body` over the objects of `var`'s type.
    Forall { var: Variable, body: Box<Expr> },
}

impl Expr {
    // Constructors for common expressions

    pub fn bool(value: bool) -> Self {
        Expr::Bool(value)
    }

    pub fn int(value: i64) -> Self {
        Expr::Int(value)
    }

    pub fn fluent(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Fluent {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param(name.into())
    }

    pub fn var(var: Variable) -> Self {
        Expr::Var(var)
    }

    pub fn object(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Expr::Object {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Builds a flattened conjunction.
    ///
    /// Nested `And` children are merged, `true` operands are dropped and
    /// a `false` operand collapses the whole expression. The empty
    /// conjunction is `true`; a single operand is returned unwrapped.
    pub fn and(operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for e in operands {
            match e {
                Expr::Bool(true) => {}
                Expr::Bool(false) => return Expr::Bool(false),
                Expr::And(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::Bool(true),
            1 => flat.pop().unwrap_or(Expr::Bool(true)),
            _ => Expr::And(flat),
        }
    }

    /// Builds a flattened disjunction.
    ///
    /// Dual of [`Expr::and`]: the empty disjunction is `false`.
    pub fn or(operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for e in operands {
            match e {
                Expr::Bool(false) => {}
                Expr::Bool(true) => return Expr::Bool(true),
                Expr::Or(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::Bool(false),
            1 => flat.pop().unwrap_or(Expr::Bool(false)),
            _ => Expr::Or(flat),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        match expr {
            Expr::Bool(b) => Expr::Bool(!b),
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Expr::Eq(Box::new(left), Box::new(right))
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Expr::Lt(Box::new(left), Box::new(right))
    }

    pub fn le(left: Expr, right: Expr) -> Self {
        Expr::Le(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::Add(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::Sub(Box::new(left), Box::new(right))
    }

    pub fn exists(var: Variable, body: Expr) -> Self {
        Expr::Exists {
            var,
            body: Box::new(body),
        }
    }

    pub fn forall(var: Variable, body: Expr) -> Self {
        Expr::Forall {
            var,
            body: Box::new(body),
        }
    }

    // Predicates

    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Bool(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Expr::Bool(false))
    }

    pub fn is_fluent_exp(&self) -> bool {
        matches!(self, Expr::Fluent { .. })
    }

    pub fn is_and(&self) -> bool {
        matches!(self, Expr::And(_))
    }

    pub fn is_or(&self) -> bool {
        matches!(self, Expr::Or(_))
    }

    pub fn is_exists(&self) -> bool {
        matches!(self, Expr::Exists { .. })
    }

    pub fn is_forall(&self) -> bool {
        matches!(self, Expr::Forall { .. })
    }

    /// Returns true if the tree contains any `Exists` or `Forall` node.
    pub fn has_quantifiers(&self) -> bool {
        match self {
            Expr::Exists { .. } | Expr::Forall { .. } => true,
            Expr::Not(e) => e.has_quantifiers(),
            Expr::And(es) | Expr::Or(es) => es.iter().any(Expr::has_quantifiers),
            Expr::Eq(l, r)
            | Expr::Lt(l, r)
            | Expr::Le(l, r)
            | Expr::Add(l, r)
            | Expr::Sub(l, r) => l.has_quantifiers() || r.has_quantifiers(),
            Expr::Fluent { args, .. } => args.iter().any(Expr::has_quantifiers),
            Expr::Bool(_) | Expr::Int(_) | Expr::Param(_) | Expr::Var(_) | Expr::Object { .. } => {
                false
            }
        }
    }
}

/// Replaces every free occurrence of `var` in `expr` with `term`.
///
/// Pure tree rebuild; the input is not mutated. An inner quantifier
/// binding a variable with the same name shadows `var`, so substitution
/// does not descend into its body.
pub fn substitute(expr: &Expr, var: &Variable, term: &Expr) -> Expr {
    match expr {
        Expr::Var(v) if v == var => term.clone(),
        Expr::Var(_) | Expr::Bool(_) | Expr::Int(_) | Expr::Param(_) | Expr::Object { .. } => {
            expr.clone()
        }
        Expr::Fluent { name, args } => Expr::Fluent {
            name: name.clone(),
            args: args.iter().map(|a| substitute(a, var, term)).collect(),
        },
        Expr::Not(e) => Expr::not(substitute(e, var, term)),
        Expr::And(es) => Expr::and(es.iter().map(|e| substitute(e, var, term))),
        Expr::Or(es) => Expr::or(es.iter().map(|e| substitute(e, var, term))),
        Expr::Eq(l, r) => Expr::eq(substitute(l, var, term), substitute(r, var, term)),
        Expr::Lt(l, r) => Expr::lt(substitute(l, var, term), substitute(r, var, term)),
        Expr::Le(l, r) => Expr::le(substitute(l, var, term), substitute(r, var, term)),
        Expr::Add(l, r) => Expr::add(substitute(l, var, term), substitute(r, var, term)),
        Expr::Sub(l, r) => Expr::sub(substitute(l, var, term), substitute(r, var, term)),
        Expr::Exists { var: bound, body } => {
            if bound.name == var.name {
                expr.clone()
            } else {
                Expr::exists(bound.clone(), substitute(body, var, term))
            }
        }
        Expr::Forall { var: bound, body } => {
            if bound.name == var.name {
                expr.clone()
            } else {
                Expr::forall(bound.clone(), substitute(body, var, term))
            }
        }
    }
}

/// Replaces every [`Expr::Param`] reference with its bound actual value.
///
/// Used when grounding an action against the actual parameters of an
/// action instance. Names not present in `bindings` are left untouched.
pub fn bind_parameters(expr: &Expr, bindings: &std::collections::BTreeMap<String, Expr>) -> Expr {
    match expr {
        Expr::Param(name) => bindings.get(name).cloned().unwrap_or_else(|| expr.clone()),
        Expr::Bool(_) | Expr::Int(_) | Expr::Var(_) | Expr::Object { .. } => expr.clone(),
        Expr::Fluent { name, args } => Expr::Fluent {
            name: name.clone(),
            args: args.iter().map(|a| bind_parameters(a, bindings)).collect(),
        },
        Expr::Not(e) => Expr::not(bind_parameters(e, bindings)),
        Expr::And(es) => Expr::and(es.iter().map(|e| bind_parameters(e, bindings))),
        Expr::Or(es) => Expr::or(es.iter().map(|e| bind_parameters(e, bindings))),
        Expr::Eq(l, r) => Expr::eq(bind_parameters(l, bindings), bind_parameters(r, bindings)),
        Expr::Lt(l, r) => Expr::lt(bind_parameters(l, bindings), bind_parameters(r, bindings)),
        Expr::Le(l, r) => Expr::le(bind_parameters(l, bindings), bind_parameters(r, bindings)),
        Expr::Add(l, r) => Expr::add(bind_parameters(l, bindings), bind_parameters(r, bindings)),
        Expr::Sub(l, r) => Expr::sub(bind_parameters(l, bindings), bind_parameters(r, bindings)),
        Expr::Exists { var, body } => Expr::exists(var.clone(), bind_parameters(body, bindings)),
        Expr::Forall { var, body } => Expr::forall(var.clone(), bind_parameters(body, bindings)),
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, es: &[Expr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, e) in es.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", e)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Int(i) => write!(f, "{}", i),
            Expr::Fluent { name, args } => {
                if args.is_empty() {
                    write!(f, "{}", name)
                } else {
                    write!(f, "{}(", name)?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ")")
                }
            }
            Expr::Param(name) => write!(f, "{}", name),
            Expr::Var(v) => write!(f, "{}", v.name),
            Expr::Object { name, .. } => write!(f, "{}", name),
            Expr::Not(e) => write!(f, "(not {})", e),
            Expr::And(es) => write_joined(f, es, " and "),
            Expr::Or(es) => write_joined(f, es, " or "),
            Expr::Eq(l, r) => write!(f, "({} == {})", l, r),
            Expr::Lt(l, r) => write!(f, "({} < {})", l, r),
            Expr::Le(l, r) => write!(f, "({} <= {})", l, r),
            Expr::Add(l, r) => write!(f, "({} + {})", l, r),
            Expr::Sub(l, r) => write!(f, "({} - {})", l, r),
            Expr::Exists { var, body } => write!(f, "Exists {}: {}", var, body),
            Expr::Forall { var, body } => write!(f, "Forall {}: {}", var, body),
        }
    }
}
