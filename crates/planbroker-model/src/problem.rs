//! Planning problems: declaration tables plus a stable action arena.

use std::cell::OnceCell;
use std::fmt;

use crate::action::{Action, Effect};
use crate::error::ModelError;
use crate::expr::Expr;
use crate::fluent::Fluent;
use crate::kind::ProblemKind;
use crate::timing::{TimeInterval, Timing};
use crate::typing::{Object, UserType};

/// Stable identifier of an action within its owning problem.
///
/// Assigned at build time, in declaration order. Transformers key their
/// action maps by this id rather than by object identity, so the maps
/// survive cloning and serialization boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A planning problem: typed declarations, actions, initial values,
/// goals and timed constructs.
///
/// The [`kind`](Problem::kind) descriptor is computed on demand and
/// cached; every mutating method clears the cache.
#[derive(Debug, Clone)]
pub struct Problem {
    name: String,
    user_types: Vec<UserType>,
    fluents: Vec<Fluent>,
    objects: Vec<Object>,
    actions: Vec<Action>,
    init: Vec<(Expr, Expr)>,
    goals: Vec<Expr>,
    timed_goals: Vec<(TimeInterval, Expr)>,
    timed_effects: Vec<(Timing, Effect)>,
    kind_cache: OnceCell<ProblemKind>,
}

impl Problem {
    pub fn new(name: impl Into<String>) -> Self {
        Problem {
            name: name.into(),
            user_types: Vec::new(),
            fluents: Vec::new(),
            objects: Vec::new(),
            actions: Vec::new(),
            init: Vec::new(),
            goals: Vec::new(),
            timed_goals: Vec::new(),
            timed_effects: Vec::new(),
            kind_cache: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Declarations

    /// Declares a user type. The parent, if any, must already be declared.
    pub fn add_user_type(&mut self, ty: UserType) -> Result<(), ModelError> {
        if self.user_types.iter().any(|t| t.name == ty.name) {
            return Err(ModelError::Duplicate(ty.name));
        }
        if let Some(parent) = &ty.parent {
            if !self.has_user_type(parent) {
                return Err(ModelError::UndeclaredType(parent.clone()));
            }
        }
        self.kind_cache.take();
        self.user_types.push(ty);
        Ok(())
    }

    pub fn add_fluent(&mut self, fluent: Fluent) -> Result<(), ModelError> {
        if self.fluents.iter().any(|f| f.name == fluent.name) {
            return Err(ModelError::Duplicate(fluent.name));
        }
        for param in &fluent.params {
            if !self.has_user_type(&param.ty) {
                return Err(ModelError::UndeclaredType(param.ty.clone()));
            }
        }
        self.kind_cache.take();
        self.fluents.push(fluent);
        Ok(())
    }

    pub fn add_object(&mut self, object: Object) -> Result<(), ModelError> {
        if self.objects.iter().any(|o| o.name == object.name) {
            return Err(ModelError::Duplicate(object.name));
        }
        if !self.has_user_type(&object.ty) {
            return Err(ModelError::UndeclaredType(object.ty.clone()));
        }
        self.kind_cache.take();
        self.objects.push(object);
        Ok(())
    }

    /// Adds an action and returns its stable id.
    ///
    /// Every effect's assigned fluent must already be declared.
    pub fn add_action(&mut self, action: impl Into<Action>) -> Result<ActionId, ModelError> {
        let action = action.into();
        if self.actions.iter().any(|a| a.name() == action.name()) {
            return Err(ModelError::Duplicate(action.name().to_string()));
        }
        for effect in action.effects() {
            self.check_effect_target(effect)?;
        }
        self.kind_cache.take();
        let id = ActionId(self.actions.len() as u32);
        self.actions.push(action);
        Ok(id)
    }

    pub fn set_initial_value(&mut self, fluent: Expr, value: Expr) -> Result<(), ModelError> {
        self.check_fluent_head(&fluent)?;
        self.kind_cache.take();
        if let Some(entry) = self.init.iter_mut().find(|(f, _)| *f == fluent) {
            entry.1 = value;
        } else {
            self.init.push((fluent, value));
        }
        Ok(())
    }

    pub fn add_goal(&mut self, goal: Expr) {
        self.kind_cache.take();
        self.goals.push(goal);
    }

    pub fn add_timed_goal(&mut self, interval: TimeInterval, goal: Expr) {
        self.kind_cache.take();
        self.timed_goals.push((interval, goal));
    }

    pub fn add_timed_effect(&mut self, timing: Timing, effect: Effect) -> Result<(), ModelError> {
        self.check_effect_target(&effect)?;
        self.kind_cache.take();
        self.timed_effects.push((timing, effect));
        Ok(())
    }

    // Lookups

    pub fn has_user_type(&self, name: &str) -> bool {
        self.user_types.iter().any(|t| t.name == name)
    }

    pub fn user_types(&self) -> impl Iterator<Item = &UserType> {
        self.user_types.iter()
    }

    pub fn fluent(&self, name: &str) -> Option<&Fluent> {
        self.fluents.iter().find(|f| f.name == name)
    }

    pub fn fluents(&self) -> impl Iterator<Item = &Fluent> {
        self.fluents.iter()
    }

    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    /// True if `sub` names the same type as `ancestor` or a descendant
    /// of it via parent links.
    pub fn is_subtype(&self, sub: &str, ancestor: &str) -> bool {
        let mut current = sub;
        loop {
            if current == ancestor {
                return true;
            }
            match self
                .user_types
                .iter()
                .find(|t| t.name == current)
                .and_then(|t| t.parent.as_deref())
            {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Objects whose type is `ty` or a subtype of it, in declaration order.
    pub fn objects_of_type<'a>(&'a self, ty: &'a str) -> impl Iterator<Item = &'a Object> {
        self.objects.iter().filter(move |o| self.is_subtype(&o.ty, ty))
    }

    pub fn action(&self, id: ActionId) -> Result<&Action, ModelError> {
        self.actions
            .get(id.0 as usize)
            .ok_or(ModelError::UnknownAction(id.0))
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.actions.len() as u32).map(ActionId)
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn initial_values(&self) -> impl Iterator<Item = &(Expr, Expr)> {
        self.init.iter()
    }

    pub fn goals(&self) -> impl Iterator<Item = &Expr> {
        self.goals.iter()
    }

    pub fn timed_goals(&self) -> impl Iterator<Item = &(TimeInterval, Expr)> {
        self.timed_goals.iter()
    }

    pub fn timed_effects(&self) -> impl Iterator<Item = &(Timing, Effect)> {
        self.timed_effects.iter()
    }

    /// The cached kind descriptor of this problem.
    pub fn kind(&self) -> &ProblemKind {
        self.kind_cache.get_or_init(|| ProblemKind::of(self))
    }

    fn check_effect_target(&self, effect: &Effect) -> Result<(), ModelError> {
        self.check_fluent_head(&effect.fluent)
    }

    fn check_fluent_head(&self, expr: &Expr) -> Result<(), ModelError> {
        match expr {
            Expr::Fluent { name, .. } if self.fluent(name).is_some() => Ok(()),
            Expr::Fluent { name, .. } => Err(ModelError::UndeclaredFluent(name.clone())),
            other => Err(ModelError::UndeclaredFluent(other.to_string())),
        }
    }
}

// Equality ignores the kind cache: two problems with identical content
// compare equal whether or not their descriptors were computed.
impl PartialEq for Problem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.user_types == other.user_types
            && self.fluents == other.fluents
            && self.objects == other.objects
            && self.actions == other.actions
            && self.init == other.init
            && self.goals == other.goals
            && self.timed_goals == other.timed_goals
            && self.timed_effects == other.timed_effects
    }
}

impl Eq for Problem {}
