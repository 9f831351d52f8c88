//! Rewriting method invocations that match a [`SignaturePattern`].
//!
//! A matched call site goes through four independent phases, in order:
//!
//! 1. rename the method name token,
//! 2. rewrite arguments, either by reordering them against the declared parameters or
//!    by applying per-argument literal transforms (and moving arguments to the end),
//! 3. retarget the call to a static owner type, or
//! 4. retarget it to a variable.
//!
//! A phase that cannot apply at a call site reports a [`RewriteConflict`] and
//! contributes nothing; the other phases still do.

use std::sync::Arc;

use crate::ast::{CallSite, Callee, Expr};
use crate::compose::{compose, FixList};
use crate::edit::{TextEdit, TextRange};
use crate::error::{RewriteConflict, RewriteError};
use crate::literal::{literal_edit, LiteralValue};
use crate::rule::{ArgumentConstraint, ArgumentRule, ArgumentRules, LiteralTransform, ReorderKey};
use crate::signature::SignaturePattern;
use crate::source::SourceText;

/// The new receiver of a retargeted call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Retarget {
    /// Fully qualified class name; calls are written against its simple name.
    Static(String),
    Variable(String),
}

impl Retarget {
    fn receiver_text(&self) -> String {
        match self {
            Retarget::Static(class) => {
                let simple = class.rsplit('.').next().unwrap_or(class);
                simple.replace('$', ".")
            }
            Retarget::Variable(name) => name.clone(),
        }
    }
}

/// A compiled method invocation rewrite rule.
///
/// Immutable once built; one rule can be shared by any number of scans.
#[derive(Clone, Debug)]
pub struct MethodRewrite {
    pattern: SignaturePattern,
    rename: Option<String>,
    reorder: Option<Vec<ReorderKey>>,
    arguments: ArgumentRules,
    retarget: Option<Retarget>,
}

impl MethodRewrite {
    pub fn builder(signature: impl Into<String>) -> MethodRewriteBuilder {
        MethodRewriteBuilder::new(signature)
    }

    pub fn pattern(&self) -> &SignaturePattern {
        &self.pattern
    }

    pub fn rename(&self) -> Option<&str> {
        self.rename.as_deref()
    }

    pub fn reorder(&self) -> Option<&[ReorderKey]> {
        self.reorder.as_deref()
    }

    pub fn arguments(&self) -> &ArgumentRules {
        &self.arguments
    }

    pub fn retarget(&self) -> Option<&Retarget> {
        self.retarget.as_ref()
    }
}

struct PendingArgument {
    constraint: ArgumentConstraint,
    literal_transform: Option<LiteralTransform>,
    move_to_last: bool,
}

/// Fluent configuration of a [`MethodRewrite`].
///
/// `literal_transform` and `move_to_last` refine the most recent `arg`.
/// Everything is validated by [`MethodRewriteBuilder::build`].
pub struct MethodRewriteBuilder {
    signature: String,
    rename: Option<String>,
    reorder: Option<Vec<ReorderKey>>,
    arguments: Vec<PendingArgument>,
    retarget_to_static: Option<String>,
    retarget_to_variable: Option<String>,
    dangling_modifier: Option<&'static str>,
}

impl MethodRewriteBuilder {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            rename: None,
            reorder: None,
            arguments: Vec::new(),
            retarget_to_static: None,
            retarget_to_variable: None,
            dangling_modifier: None,
        }
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn reorder_arguments<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ReorderKey>,
    {
        self.reorder = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Registers a rule for the argument at a position (`usize`) or of a type (`&str`).
    pub fn arg(mut self, constraint: impl Into<ArgumentConstraint>) -> Self {
        self.arguments.push(PendingArgument {
            constraint: constraint.into(),
            literal_transform: None,
            move_to_last: false,
        });
        self
    }

    pub fn literal_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&LiteralValue) -> LiteralValue + Send + Sync + 'static,
    {
        match self.arguments.last_mut() {
            Some(arg) => arg.literal_transform = Some(Arc::new(transform)),
            None => self.dangling_modifier = Some("literal_transform"),
        }
        self
    }

    /// Attaches a literal transform to the rule registered for `constraint`,
    /// registering the rule if there is none yet.
    pub fn literal_transform_for<F>(mut self, constraint: impl Into<ArgumentConstraint>, transform: F) -> Self
    where
        F: Fn(&LiteralValue) -> LiteralValue + Send + Sync + 'static,
    {
        let constraint = constraint.into();
        let transform: LiteralTransform = Arc::new(transform);
        match self.arguments.iter_mut().find(|arg| arg.constraint == constraint) {
            Some(arg) => arg.literal_transform = Some(transform),
            None => self.arguments.push(PendingArgument {
                constraint,
                literal_transform: Some(transform),
                move_to_last: false,
            }),
        }
        self
    }

    pub fn move_to_last(mut self) -> Self {
        match self.arguments.last_mut() {
            Some(arg) => arg.move_to_last = true,
            None => self.dangling_modifier = Some("move_to_last"),
        }
        self
    }

    pub fn retarget_to_static(mut self, class: impl Into<String>) -> Self {
        self.retarget_to_static = Some(class.into());
        self
    }

    pub fn retarget_to_variable(mut self, variable: impl Into<String>) -> Self {
        self.retarget_to_variable = Some(variable.into());
        self
    }

    pub fn build(self) -> Result<MethodRewrite, RewriteError> {
        let pattern = SignaturePattern::compile(&self.signature)?;

        if let Some(modifier) = self.dangling_modifier {
            return Err(RewriteError::ambiguous(
                &self.signature,
                format!("`{modifier}` was configured before any `arg`"),
            ));
        }

        let retarget = match (self.retarget_to_static, self.retarget_to_variable) {
            (Some(class), Some(variable)) => {
                return Err(RewriteError::ambiguous(
                    &self.signature,
                    format!("both a static owner (`{class}`) and a variable (`{variable}`) were given as the new call target"),
                ));
            }
            (Some(class), None) => Some(Retarget::Static(class)),
            (None, Some(variable)) => Some(Retarget::Variable(variable)),
            (None, None) => None,
        };

        let mut arguments = ArgumentRules::default();
        for pending in self.arguments {
            let mut rule = ArgumentRule::new(pending.constraint)?.with_move_to_last(pending.move_to_last);
            if let Some(transform) = pending.literal_transform {
                rule = rule.with_literal_transform(transform);
            }
            arguments.push(rule);
        }

        Ok(MethodRewrite {
            pattern,
            rename: self.rename,
            reorder: self.reorder,
            arguments,
            retarget,
        })
    }
}

/// Fixes proposed for one matched call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSiteRewrite {
    pub call: TextRange,
    /// Sorted by start offset, non-overlapping.
    pub edits: Vec<TextEdit>,
    pub conflicts: Vec<RewriteConflict>,
}

/// Fixes for every matched call site of one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileRewrite {
    /// Sorted by start offset, non-overlapping, ready for [`crate::apply_text_edits`].
    pub edits: Vec<TextEdit>,
    pub conflicts: Vec<RewriteConflict>,
    pub matched_calls: usize,
}

/// Applies one [`MethodRewrite`] to the call sites of one source file.
pub struct InvocationRewriter<'a> {
    rule: &'a MethodRewrite,
    source: SourceText<'a>,
}

impl<'a> InvocationRewriter<'a> {
    pub fn new(rule: &'a MethodRewrite, source: SourceText<'a>) -> Self {
        Self { rule, source }
    }

    /// Rewrites every matching call in `calls` and merges their fixes.
    ///
    /// A call site whose fixes overlap those of a call visited earlier (an argument
    /// rewrite of an outer call already covers a call nested inside it) contributes
    /// nothing and is reported as a conflict. Fails only if a fix does not fit the
    /// source text.
    pub fn rewrite_file<'c>(
        &self,
        calls: impl IntoIterator<Item = &'c CallSite>,
    ) -> Result<FileRewrite, RewriteError> {
        let mut fixes = FixList::new();
        let mut conflicts = Vec::new();
        let mut matched_calls = 0;
        for call in calls {
            let Some(rewrite) = self.rewrite_call_site(call) else {
                continue;
            };
            matched_calls += 1;
            conflicts.extend(rewrite.conflicts);
            if let Err(accepted) = fixes.try_extend(rewrite.edits) {
                tracing::debug!(
                    target = "nova.rewrite",
                    call = ?rewrite.call,
                    ?accepted,
                    "dropping fixes that overlap another call site"
                );
                conflicts.push(RewriteConflict::UnsupportedRuleCondition {
                    call: rewrite.call,
                    reason: format!("its fixes overlap the fix at {accepted:?} of another call"),
                });
            }
        }

        let edits = fixes.finish(&self.source)?;
        tracing::debug!(
            target = "nova.rewrite",
            signature = self.rule.pattern.as_str(),
            matched_calls,
            edits = edits.len(),
            conflicts = conflicts.len(),
            "rewrote method invocations"
        );
        Ok(FileRewrite {
            edits,
            conflicts,
            matched_calls,
        })
    }

    /// Returns `None` if the call does not match the rule's signature.
    pub fn rewrite_call_site(&self, call: &CallSite) -> Option<CallSiteRewrite> {
        if !self.rule.pattern.matches(call) {
            return None;
        }

        let mut edits = Vec::new();
        let mut conflicts = Vec::new();

        if let Some(name) = &self.rule.rename {
            edits.push(TextEdit::replace(call.callee.name().range, name.clone()));
        }

        if let Some(keys) = &self.rule.reorder {
            match self.reorder_arguments(call, keys) {
                Ok(reordered) => edits.extend(reordered),
                Err(conflict) => {
                    tracing::debug!(
                        target = "nova.rewrite",
                        %conflict,
                        "skipping argument reordering"
                    );
                    conflicts.push(conflict);
                }
            }
        } else if !self.rule.arguments.is_empty() {
            edits.extend(self.transform_arguments(call));
        }

        if let Some(retarget) = &self.rule.retarget {
            edits.push(self.retarget(call, retarget));
        }

        edits.sort_by_key(|e| (e.range.start, e.range.end));
        debug_assert!(
            edits.windows(2).all(|pair| pair[0].range.end <= pair[1].range.start),
            "overlapping fixes for one call site: {edits:?}"
        );

        Some(CallSiteRewrite {
            call: call.range,
            edits,
            conflicts,
        })
    }

    fn reorder_arguments(
        &self,
        call: &CallSite,
        keys: &[ReorderKey],
    ) -> Result<Vec<TextEdit>, RewriteConflict> {
        let Some(method) = &call.method else {
            return Err(RewriteConflict::UnsupportedRuleCondition {
                call: call.range,
                reason: "reordering arguments requires a resolved method symbol".to_string(),
            });
        };

        let mut edits = Vec::new();
        for (position, key) in keys.iter().enumerate() {
            let Some(arg) = call.arguments.get(position) else {
                tracing::trace!(
                    target = "nova.rewrite",
                    call = ?call.range,
                    "reorder specification is longer than the argument list"
                );
                break;
            };

            let unresolved = || RewriteConflict::UnresolvedReorderTarget {
                call: call.range,
                target: key.to_string(),
            };
            let source = match key {
                ReorderKey::Name(name) => method.parameter_index(name),
                ReorderKey::Position(index) => {
                    (*index < method.parameters.len()).then_some(*index)
                }
            }
            .ok_or_else(unresolved)?;
            if source == position {
                continue;
            }

            let swap = call.arguments.get(source).ok_or_else(unresolved)?;
            edits.push(TextEdit::replace(arg.range, self.argument_text(position, swap)));
        }
        Ok(edits)
    }

    fn transform_arguments(&self, call: &CallSite) -> Vec<TextEdit> {
        let args = &call.arguments;
        let moves_to_last = |index: usize| {
            self.rule
                .arguments
                .resolve(index, args[index].ty.as_deref())
                .is_some_and(ArgumentRule::move_to_last)
        };
        let (mut order, moved): (Vec<usize>, Vec<usize>) =
            (0..args.len()).partition(|&index| !moves_to_last(index));
        order.extend(moved);

        let mut edits = Vec::new();
        for (position, &from) in order.iter().enumerate() {
            let text = self.argument_text(from, &args[from]);
            let target = args[position].range;
            if text != self.source.slice(target) {
                edits.push(TextEdit::replace(target, text));
            }
        }
        edits
    }

    /// The argument's text after applying the literal transform of its rule.
    fn argument_text(&self, index: usize, arg: &Expr) -> String {
        self.transformed_argument(index, arg)
            .unwrap_or_else(|| self.source.slice(arg.range).to_string())
    }

    fn transformed_argument(&self, index: usize, arg: &Expr) -> Option<String> {
        let rule = self.rule.arguments.resolve(index, arg.ty.as_deref())?;
        let transform = rule.literal_transform()?;

        let sub_edits: Vec<TextEdit> = arg
            .literals()
            .into_iter()
            .filter_map(|(range, value)| literal_edit(&self.source, range, value, &**transform))
            .collect();
        let composed = compose(&self.source, arg.range, sub_edits)?;
        (composed != self.source.slice(arg.range)).then_some(composed)
    }

    fn retarget(&self, call: &CallSite, retarget: &Retarget) -> TextEdit {
        let receiver = retarget.receiver_text();
        match &call.callee {
            Callee::Qualified { receiver: old, .. } => TextEdit::replace(old.range, receiver),
            Callee::Bare { name } => TextEdit::insert(name.range.start, format!("{receiver}.")),
        }
    }
}
