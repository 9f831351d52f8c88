//! Method signature patterns.
//!
//! A signature is written `<type-pattern> <name-pattern>(<argument-patterns>)`:
//!
//! - `com.*.MyClass`: `*` stands for exactly one package segment; a leading `*..`
//!   stands for any (possibly empty) package prefix and `..` inside a path for any
//!   number of intermediate segments.
//! - `fo*`: `*` inside the method name matches any run of identifier characters. A
//!   bare `*` matches every name. A name that *starts* with `*` followed by more
//!   characters loses its leading star (the grammar gives that star to the type), so
//!   `*oo` only matches `oo`.
//! - `(String, .., int[])`: comma separated type patterns. `..` matches zero or more
//!   arguments of any type and may appear once. Unqualified names also match their
//!   `java.lang` form; `[]` suffixes match array types.
//!
//! Each part compiles to an anchored [`Regex`] over qualified type names; arguments
//! are matched against the call's argument types joined with `,`.

use regex::Regex;

use crate::ast::CallSite;
use crate::error::RewriteError;

const ANY_SEGMENTS: &str = r"(?:[^.,]+\.)*";
const ANY_ARGUMENTS: &str = r"(?:[^,]+(?:,[^,]+)*)?";

#[derive(Clone, Debug)]
pub struct SignaturePattern {
    signature: String,
    target_type: Regex,
    method_name: Regex,
    arguments: Regex,
}

impl SignaturePattern {
    pub fn compile(signature: &str) -> Result<Self, RewriteError> {
        let trimmed = signature.trim();
        let open = trimmed
            .find('(')
            .ok_or_else(|| RewriteError::malformed(signature, "missing `(`"))?;
        let args = trimmed[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| RewriteError::malformed(signature, "must end with `)`"))?;
        if args.contains(['(', ')']) {
            return Err(RewriteError::malformed(signature, "unbalanced parentheses"));
        }

        let head = trimmed[..open].trim_end();
        let (ty, name) = head
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| RewriteError::malformed(signature, "expected `<type> <name>(..)`"))?;

        let target_type =
            type_regex(ty.trim(), false).map_err(|reason| RewriteError::malformed(signature, reason))?;
        let method_name =
            name_regex(name).map_err(|reason| RewriteError::malformed(signature, reason))?;
        let arguments =
            arguments_regex(args).map_err(|reason| RewriteError::malformed(signature, reason))?;

        Ok(Self {
            signature: signature.to_string(),
            target_type: anchored(signature, &target_type)?,
            method_name: anchored(signature, &method_name)?,
            arguments: anchored(signature, &arguments)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.signature
    }

    pub fn matches_type(&self, qualified_type: &str) -> bool {
        self.target_type.is_match(qualified_type)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.method_name.is_match(name)
    }

    /// `argument_types` is the comma-joined list of qualified argument types.
    pub fn matches_args(&self, argument_types: &str) -> bool {
        self.arguments.is_match(argument_types)
    }

    pub fn matches(&self, call: &CallSite) -> bool {
        let Some(owner) = call.owner.as_deref() else {
            tracing::trace!(
                target = "nova.rewrite",
                call = ?call.range,
                "call has no resolved owner type"
            );
            return false;
        };
        let Some(argument_types) = call.argument_types() else {
            tracing::trace!(
                target = "nova.rewrite",
                call = ?call.range,
                "call has unresolved argument types"
            );
            return false;
        };

        self.matches_type(owner)
            && self.matches_name(&call.callee.name().name)
            && self.matches_args(&argument_types)
    }
}

/// A standalone qualified-type pattern, as used by type-constrained argument rules.
///
/// Same syntax as an element of a signature's argument list.
#[derive(Clone, Debug)]
pub struct TypePattern {
    pattern: String,
    regex: Regex,
}

impl TypePattern {
    pub fn compile(pattern: &str) -> Result<Self, RewriteError> {
        let regex = type_regex(pattern.trim(), true)
            .map_err(|reason| RewriteError::malformed(pattern, reason))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex: anchored(pattern, &regex)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, qualified_type: &str) -> bool {
        self.regex.is_match(qualified_type)
    }
}

fn anchored(signature: &str, pattern: &str) -> Result<Regex, RewriteError> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|err| RewriteError::malformed(signature, err.to_string()))
}

fn is_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '*'
}

fn type_regex(pattern: &str, implicit_java_lang: bool) -> Result<String, String> {
    let mut base = pattern;
    let mut dimensions = 0;
    while let Some(rest) = base.strip_suffix("[]") {
        base = rest.trim_end();
        dimensions += 1;
    }
    if base.is_empty() {
        return Err(format!("empty type pattern in `{pattern}`"));
    }

    let mut out = String::new();
    let mut rest = base;
    if let Some(stripped) = rest.strip_prefix("*..") {
        out.push_str(ANY_SEGMENTS);
        rest = stripped;
    } else if implicit_java_lang && !rest.contains(['.', '*']) {
        out.push_str(r"(?:java\.lang\.)?");
    }

    for (i, part) in rest.split("..").enumerate() {
        if i > 0 {
            out.push_str(r"\.");
            out.push_str(ANY_SEGMENTS);
        }
        for (j, segment) in part.split('.').enumerate() {
            if j > 0 {
                out.push_str(r"\.");
            }
            if segment.is_empty() {
                return Err(format!("empty segment in type pattern `{pattern}`"));
            }
            if !segment.chars().all(is_pattern_char) {
                return Err(format!("invalid character in type pattern `{pattern}`"));
            }
            if segment == "*" {
                out.push_str("[^.,]+");
                continue;
            }
            for (k, literal) in segment.split('*').enumerate() {
                if k > 0 {
                    out.push_str("[^.,]*");
                }
                out.push_str(&regex::escape(literal));
            }
        }
    }

    for _ in 0..dimensions {
        out.push_str(r"\[\]");
    }
    Ok(out)
}

fn name_regex(pattern: &str) -> Result<String, String> {
    if pattern == "*" {
        return Ok(".+".to_string());
    }
    let body = pattern.strip_prefix('*').unwrap_or(pattern);
    if body.is_empty() || !body.chars().all(is_pattern_char) {
        return Err(format!("invalid method name pattern `{pattern}`"));
    }

    let mut out = String::new();
    for (i, literal) in body.split('*').enumerate() {
        if i > 0 {
            out.push_str(r"[\w$]*");
        }
        out.push_str(&regex::escape(literal));
    }
    Ok(out)
}

fn arguments_regex(arguments: &str) -> Result<String, String> {
    let arguments = arguments.trim();
    if arguments.is_empty() {
        return Ok(String::new());
    }

    let elements: Vec<&str> = arguments.split(',').map(str::trim).collect();
    if elements.iter().filter(|e| **e == "..").count() > 1 {
        return Err("`..` may appear only once in the argument list".to_string());
    }
    if elements == [".."] {
        return Ok(ANY_ARGUMENTS.to_string());
    }

    let mut out = String::new();
    let mut need_separator = false;
    for (i, element) in elements.iter().enumerate() {
        match *element {
            "" => return Err("empty argument pattern".to_string()),
            ".." if i == 0 => out.push_str("(?:[^,]+,)*"),
            ".." => out.push_str("(?:,[^,]+)*"),
            ty => {
                if need_separator {
                    out.push(',');
                }
                out.push_str(&type_regex(ty, true)?);
                need_separator = true;
            }
        }
    }
    Ok(out)
}
