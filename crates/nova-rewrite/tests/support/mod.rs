//! Builds host call sites from Java snippets by locating their text, so tests never
//! spell byte offsets by hand.
#![allow(dead_code)]

use nova_rewrite::{
    apply_text_edits, CallSite, Callee, Expr, Ident, LiteralValue, MethodSymbol, Parameter,
    TextEdit, TextRange,
};

pub enum Arg {
    Literal {
        text: &'static str,
        ty: &'static str,
        value: LiteralValue,
    },
    Expr {
        text: &'static str,
        ty: Option<&'static str>,
        children: Vec<Arg>,
    },
}

pub fn lit(text: &'static str, ty: &'static str, value: LiteralValue) -> Arg {
    Arg::Literal { text, ty, value }
}

pub fn int(text: &'static str) -> Arg {
    lit(text, "int", LiteralValue::Int(text.parse().expect("int literal")))
}

pub fn string(text: &'static str) -> Arg {
    let value = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .expect("string literal");
    lit(text, "java.lang.String", LiteralValue::String(value.to_string()))
}

pub fn expr(text: &'static str, ty: &'static str) -> Arg {
    Arg::Expr {
        text,
        ty: Some(ty),
        children: Vec::new(),
    }
}

pub fn nested(text: &'static str, ty: &'static str, children: Vec<Arg>) -> Arg {
    Arg::Expr {
        text,
        ty: Some(ty),
        children,
    }
}

pub struct CallBuilder<'t> {
    text: &'t str,
    call: &'t str,
    nth: usize,
    owner: Option<String>,
    args: Vec<Arg>,
    method: Option<MethodSymbol>,
}

/// Starts describing the first occurrence of `call` in `text`.
pub fn call<'t>(text: &'t str, call: &'t str) -> CallBuilder<'t> {
    CallBuilder {
        text,
        call,
        nth: 0,
        owner: None,
        args: Vec::new(),
        method: None,
    }
}

impl<'t> CallBuilder<'t> {
    pub fn nth(mut self, nth: usize) -> Self {
        self.nth = nth;
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }

    pub fn method(mut self, name: &str, params: &[(&str, &str)]) -> Self {
        self.method = Some(MethodSymbol::new(
            name,
            params
                .iter()
                .map(|(name, ty)| Parameter::new(*name, *ty))
                .collect(),
        ));
        self
    }

    pub fn build(self) -> CallSite {
        let start = self
            .text
            .match_indices(self.call)
            .nth(self.nth)
            .map(|(idx, _)| idx)
            .unwrap_or_else(|| panic!("`{}` not found in fixture", self.call));
        let end = start + self.call.len();
        let open = start + self.call.find('(').expect("call has `(`");
        let close = start + self.call.rfind(')').expect("call has `)`");

        let head = &self.text[start..open];
        let callee = match head.rfind('.') {
            Some(dot) => Callee::Qualified {
                receiver: Box::new(Expr::other(
                    TextRange::new(start, start + dot),
                    None,
                    Vec::new(),
                )),
                name: Ident::new(&head[dot + 1..], TextRange::new(start + dot + 1, open)),
            },
            None => Callee::Bare {
                name: Ident::new(head, TextRange::new(start, open)),
            },
        };

        let mut cursor = open + 1;
        let arguments = self
            .args
            .into_iter()
            .map(|arg| locate(self.text, &mut cursor, close, arg))
            .collect();

        CallSite {
            range: TextRange::new(start, end),
            callee,
            arguments,
            owner: self.owner,
            method: self.method,
        }
    }
}

fn locate(text: &str, cursor: &mut usize, limit: usize, arg: Arg) -> Expr {
    let needle = match &arg {
        Arg::Literal { text, .. } | Arg::Expr { text, .. } => *text,
    };
    let found = text[*cursor..limit]
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found after offset {cursor}"));
    let range = TextRange::new(*cursor + found, *cursor + found + needle.len());
    *cursor = range.end;

    match arg {
        Arg::Literal { ty, value, .. } => Expr::literal(range, ty, value),
        Arg::Expr { ty, children, .. } => {
            let mut inner = range.start;
            let children = children
                .into_iter()
                .map(|child| locate(text, &mut inner, range.end, child))
                .collect();
            Expr::other(range, ty.map(str::to_string), children)
        }
    }
}

pub fn apply(text: &str, edits: &[TextEdit]) -> String {
    apply_text_edits(text, edits).expect("edits apply cleanly")
}
