//! Declarative (TOML) form of a [`MethodRewrite`].
//!
//! ```toml
//! signature = "com.*.Util fetch(String, ..)"
//! rename = "load"
//! retarget_to_static = "com.acme.Loader"
//!
//! [[arguments]]
//! type = "String"
//! move_to_last = true
//! ```
//!
//! Literal transforms are functions and can only be attached in code, through
//! [`MethodRewriteBuilder::literal_transform_for`].

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;
use crate::rewrite::{MethodRewrite, MethodRewriteBuilder};
use crate::rule::{ArgumentConstraint, ReorderKey};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteConfig {
    pub signature: String,
    #[serde(default)]
    pub rename: Option<String>,
    /// Parameter names (strings) or declared positions (integers).
    #[serde(default)]
    pub reorder_arguments: Option<Vec<ReorderKey>>,
    #[serde(default)]
    pub arguments: Vec<ArgumentConfig>,
    #[serde(default)]
    pub retarget_to_static: Option<String>,
    #[serde(default)]
    pub retarget_to_variable: Option<String>,
}

/// Selects an argument by `position` or by `type`; exactly one must be set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentConfig {
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub move_to_last: bool,
}

impl ArgumentConfig {
    fn constraint(&self, signature: &str) -> Result<ArgumentConstraint, RewriteError> {
        match (self.position, &self.ty) {
            (Some(position), None) => Ok(ArgumentConstraint::Position(position)),
            (None, Some(ty)) => Ok(ArgumentConstraint::Type(ty.clone())),
            (Some(position), Some(ty)) => Err(RewriteError::ambiguous(
                signature,
                format!("argument rule sets both position {position} and type `{ty}`"),
            )),
            (None, None) => Err(RewriteError::ambiguous(
                signature,
                "argument rule sets neither a position nor a type".to_string(),
            )),
        }
    }
}

impl RewriteConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, RewriteError> {
        Ok(toml::from_str(text)?)
    }

    /// A builder preloaded with this configuration, ready for literal transforms.
    pub fn into_builder(self) -> Result<MethodRewriteBuilder, RewriteError> {
        let mut arguments = Vec::with_capacity(self.arguments.len());
        for argument in &self.arguments {
            arguments.push((argument.constraint(&self.signature)?, argument.move_to_last));
        }

        let mut builder = MethodRewrite::builder(self.signature);
        if let Some(name) = self.rename {
            builder = builder.rename(name);
        }
        if let Some(keys) = self.reorder_arguments {
            builder = builder.reorder_arguments(keys);
        }
        for (constraint, move_to_last) in arguments {
            builder = builder.arg(constraint);
            if move_to_last {
                builder = builder.move_to_last();
            }
        }
        if let Some(class) = self.retarget_to_static {
            builder = builder.retarget_to_static(class);
        }
        if let Some(variable) = self.retarget_to_variable {
            builder = builder.retarget_to_variable(variable);
        }
        Ok(builder)
    }

    pub fn build(self) -> Result<MethodRewrite, RewriteError> {
        self.into_builder()?.build()
    }
}
