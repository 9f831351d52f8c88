use thiserror::Error;

use crate::edit::{EditError, TextRange};

/// Errors that reject a rule or a whole file's fix list.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("malformed method signature `{signature}`: {reason}")]
    MalformedSignature { signature: String, reason: String },
    #[error("ambiguous rewrite configuration: {reason}")]
    AmbiguousConfiguration { reason: String },
    #[error("invalid rewrite configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
    #[error(transparent)]
    Edit(#[from] EditError),
}

impl RewriteError {
    pub(crate) fn malformed(signature: &str, reason: impl Into<String>) -> Self {
        RewriteError::MalformedSignature {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ambiguous(signature: &str, reason: String) -> Self {
        tracing::warn!(
            target = "nova.rewrite",
            signature,
            %reason,
            "rejecting rewrite configuration"
        );
        RewriteError::AmbiguousConfiguration { reason }
    }
}

/// A phase of a rule that could not be applied at one call site.
///
/// Conflicts never abort the scan: the affected phase contributes no edits and the
/// remaining phases (and call sites) still do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteConflict {
    #[error("no argument of the call at {call:?} is bound to reorder target `{target}`")]
    UnresolvedReorderTarget { call: TextRange, target: String },
    #[error("rule cannot be applied to the call at {call:?}: {reason}")]
    UnsupportedRuleCondition { call: TextRange, reason: String },
}

impl RewriteConflict {
    pub fn call(&self) -> TextRange {
        match self {
            RewriteConflict::UnresolvedReorderTarget { call, .. }
            | RewriteConflict::UnsupportedRuleCondition { call, .. } => *call,
        }
    }
}
