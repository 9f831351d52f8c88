//! Rule-driven rewriting of Java method invocations.
//!
//! A [`MethodRewrite`] selects call sites with a [`SignaturePattern`] such as
//! `com.*.MyClass foo(String, ..)` and describes what to change: the method name, the
//! argument order, literal arguments, or the receiver. The [`InvocationRewriter`]
//! turns each matched [`CallSite`] into byte-range [`TextEdit`]s over the original text,
//! splicing untouched text through verbatim so formatting and comments survive.
//!
//! Parsing, type resolution and import management belong to the host, which lowers
//! its syntax tree into the [`ast`] types.

pub mod ast;
mod compose;
mod config;
mod edit;
mod error;
mod literal;
mod rewrite;
mod rule;
mod signature;
mod source;

pub use compose::{compose, FixList};
pub use config::{ArgumentConfig, RewriteConfig};
pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit, TextRange};
pub use error::{RewriteConflict, RewriteError};
pub use literal::{literal_edit, LiteralValue};
pub use rewrite::{
    CallSiteRewrite, FileRewrite, InvocationRewriter, MethodRewrite, MethodRewriteBuilder,
    Retarget,
};
pub use rule::{ArgumentConstraint, ArgumentRule, ArgumentRules, LiteralTransform, ReorderKey};
pub use signature::{SignaturePattern, TypePattern};
pub use source::SourceText;

pub use ast::{CallSite, Callee, Expr, ExprKind, Ident, MethodSymbol, Parameter};
