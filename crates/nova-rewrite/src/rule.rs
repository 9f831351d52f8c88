use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;
use crate::literal::LiteralValue;
use crate::signature::TypePattern;

/// Maps a decoded literal to its replacement value.
pub type LiteralTransform = Arc<dyn Fn(&LiteralValue) -> LiteralValue + Send + Sync>;

/// Which arguments an [`ArgumentRule`] applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentConstraint {
    /// Zero-based argument position.
    Position(usize),
    /// Qualified type pattern of the actual argument, e.g. `java.lang.String` or `String`.
    Type(String),
}

impl From<usize> for ArgumentConstraint {
    fn from(index: usize) -> Self {
        ArgumentConstraint::Position(index)
    }
}

impl From<&str> for ArgumentConstraint {
    fn from(pattern: &str) -> Self {
        ArgumentConstraint::Type(pattern.to_string())
    }
}

#[derive(Clone)]
pub struct ArgumentRule {
    constraint: ArgumentConstraint,
    type_pattern: Option<TypePattern>,
    literal_transform: Option<LiteralTransform>,
    move_to_last: bool,
}

impl ArgumentRule {
    pub fn new(constraint: ArgumentConstraint) -> Result<Self, RewriteError> {
        let type_pattern = match &constraint {
            ArgumentConstraint::Type(pattern) => Some(TypePattern::compile(pattern)?),
            ArgumentConstraint::Position(_) => None,
        };
        Ok(Self {
            constraint,
            type_pattern,
            literal_transform: None,
            move_to_last: false,
        })
    }

    pub fn with_literal_transform(mut self, transform: LiteralTransform) -> Self {
        self.literal_transform = Some(transform);
        self
    }

    pub fn with_move_to_last(mut self, move_to_last: bool) -> Self {
        self.move_to_last = move_to_last;
        self
    }

    pub fn constraint(&self) -> &ArgumentConstraint {
        &self.constraint
    }

    pub fn literal_transform(&self) -> Option<&LiteralTransform> {
        self.literal_transform.as_ref()
    }

    pub fn move_to_last(&self) -> bool {
        self.move_to_last
    }

    fn matches_position(&self, index: usize) -> bool {
        self.constraint == ArgumentConstraint::Position(index)
    }

    fn matches_type(&self, ty: Option<&str>) -> bool {
        match (&self.type_pattern, ty) {
            (Some(pattern), Some(ty)) => pattern.matches(ty),
            _ => false,
        }
    }
}

impl fmt::Debug for ArgumentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentRule")
            .field("constraint", &self.constraint)
            .field("literal_transform", &self.literal_transform.is_some())
            .field("move_to_last", &self.move_to_last)
            .finish()
    }
}

/// Argument rules in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ArgumentRules {
    rules: Vec<ArgumentRule>,
}

impl ArgumentRules {
    pub fn new(rules: Vec<ArgumentRule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: ArgumentRule) {
        self.rules.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgumentRule> {
        self.rules.iter()
    }

    /// Picks the rule for the argument at `index` whose resolved type is `ty`.
    ///
    /// A position rule for `index` wins over every type rule; among type rules the
    /// first declared match wins, even if a later one is more specific.
    pub fn resolve(&self, index: usize, ty: Option<&str>) -> Option<&ArgumentRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches_position(index))
            .or_else(|| self.rules.iter().find(|rule| rule.matches_type(ty)))
    }
}

/// One entry of a reorder specification: the parameter that should end up at the
/// entry's position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReorderKey {
    /// Declared parameter position.
    Position(usize),
    /// Declared parameter name.
    Name(String),
}

impl fmt::Display for ReorderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderKey::Position(index) => write!(f, "#{index}"),
            ReorderKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ReorderKey {
    fn from(name: &str) -> Self {
        ReorderKey::Name(name.to_string())
    }
}

impl From<String> for ReorderKey {
    fn from(name: String) -> Self {
        ReorderKey::Name(name)
    }
}

impl From<usize> for ReorderKey {
    fn from(index: usize) -> Self {
        ReorderKey::Position(index)
    }
}
