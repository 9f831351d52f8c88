//! The slice of the host syntax tree the rewriter consumes.
//!
//! Parsing and type resolution happen in the host; it lowers each method invocation
//! it wants rewritten into a [`CallSite`] carrying byte ranges into the original
//! text and fully qualified type names (`java.lang.String`, `int`, `java.util.Map[]`).

use crate::edit::TextRange;
use crate::literal::LiteralValue;

/// A name token and where it sits in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub range: TextRange,
}

impl Ident {
    pub fn new(name: impl Into<String>, range: TextRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(LiteralValue),
    /// Any other expression; only its nested expressions matter to the rewriter.
    Other { children: Vec<Expr> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub range: TextRange,
    /// Resolved, qualified type of the expression, if the host knows it.
    pub ty: Option<String>,
    pub kind: ExprKind,
}

impl Expr {
    pub fn literal(range: TextRange, ty: impl Into<String>, value: LiteralValue) -> Self {
        Self {
            range,
            ty: Some(ty.into()),
            kind: ExprKind::Literal(value),
        }
    }

    pub fn other(range: TextRange, ty: Option<String>, children: Vec<Expr>) -> Self {
        Self {
            range,
            ty,
            kind: ExprKind::Other { children },
        }
    }

    /// All literal nodes in this expression (including itself), in source order.
    pub fn literals(&self) -> Vec<(TextRange, &LiteralValue)> {
        let mut out = Vec::new();
        self.collect_literals(&mut out);
        out.sort_by_key(|(range, _)| (range.start, range.end));
        out
    }

    fn collect_literals<'a>(&'a self, out: &mut Vec<(TextRange, &'a LiteralValue)>) {
        match &self.kind {
            ExprKind::Literal(value) => out.push((self.range, value)),
            ExprKind::Other { children } => {
                for child in children {
                    child.collect_literals(out);
                }
            }
        }
    }
}

/// How the invoked method is referenced at the call site.
#[derive(Clone, Debug, PartialEq)]
pub enum Callee {
    /// `receiver.name(..)`, where the receiver is a variable, a type, or any expression.
    Qualified { receiver: Box<Expr>, name: Ident },
    /// `name(..)`: a static import or a method in scope.
    Bare { name: Ident },
}

impl Callee {
    pub fn name(&self) -> &Ident {
        match self {
            Callee::Qualified { name, .. } | Callee::Bare { name } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// The resolved declaration of the invoked method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl MethodSymbol {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }
}

/// A method invocation expression.
#[derive(Clone, Debug, PartialEq)]
pub struct CallSite {
    pub range: TextRange,
    pub callee: Callee,
    pub arguments: Vec<Expr>,
    /// Statically resolved owning type of the callee, e.g. `com.bar.MyClass`.
    pub owner: Option<String>,
    pub method: Option<MethodSymbol>,
}

impl CallSite {
    /// Qualified argument types joined with `,`, or `None` if any is unresolved.
    pub fn argument_types(&self) -> Option<String> {
        let types: Option<Vec<&str>> = self.arguments.iter().map(|a| a.ty.as_deref()).collect();
        types.map(|types| types.join(","))
    }
}
