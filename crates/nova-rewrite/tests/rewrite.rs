mod support;

use nova_rewrite::{
    InvocationRewriter, LiteralValue, MethodRewrite, RewriteConflict, RewriteError,
    SourceText,
};
use pretty_assertions::assert_eq;

use support::{apply, call, expr, int, nested, string};

fn rewrite_one(rule: &MethodRewrite, text: &str, site: &nova_rewrite::CallSite) -> String {
    let rewriter = InvocationRewriter::new(rule, SourceText::new(text));
    let rewrite = rewriter
        .rewrite_call_site(site)
        .expect("call site should match");
    assert!(rewrite.conflicts.is_empty(), "{:?}", rewrite.conflicts);
    apply(text, &rewrite.edits)
}

fn upper(value: &LiteralValue) -> LiteralValue {
    match value {
        LiteralValue::String(s) => LiteralValue::String(s.to_uppercase()),
        other => other.clone(),
    }
}

#[test]
fn rename_qualified_call() {
    let text = "class T { void t() { obj.foo(1); } }";
    let site = call(text, "obj.foo(1)")
        .owner("com.bar.MyClass")
        .args(vec![int("1")])
        .build();
    let rule = MethodRewrite::builder("com.bar.MyClass foo(int)")
        .rename("bar")
        .build()
        .unwrap();

    assert_eq!(
        rewrite_one(&rule, text, &site),
        "class T { void t() { obj.bar(1); } }"
    );
}

#[test]
fn rename_bare_call() {
    let text = "foo(1, 2);";
    let site = call(text, "foo(1, 2)")
        .owner("A")
        .args(vec![int("1"), int("2")])
        .build();
    let rule = MethodRewrite::builder("A foo(..)").rename("bar").build().unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), "bar(1, 2);");
}

#[test]
fn reorder_arguments_by_parameter_name() {
    let text = "f(x, y);";
    let site = call(text, "f(x, y)")
        .owner("A")
        .args(vec![expr("x", "int"), expr("y", "int")])
        .method("f", &[("a", "int"), ("b", "int")])
        .build();
    let rule = MethodRewrite::builder("A f(int, int)")
        .reorder_arguments(["b", "a"])
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), "f(y, x);");
}

#[test]
fn reorder_arguments_by_position_keeps_formatting() {
    let text = "util.f( first , /* b */ second);";
    let site = call(text, "util.f( first , /* b */ second)")
        .owner("A")
        .args(vec![
            expr("first", "java.lang.String"),
            expr("second", "java.lang.String"),
        ])
        .method("f", &[("a", "java.lang.String"), ("b", "java.lang.String")])
        .build();
    let rule = MethodRewrite::builder("A f(String, String)")
        .reorder_arguments([1usize, 0])
        .build()
        .unwrap();

    assert_eq!(
        rewrite_one(&rule, text, &site),
        "util.f( second , /* b */ first);"
    );
}

#[test]
fn reorder_leaves_trailing_arguments_untouched() {
    let text = "f(x, y, z);";
    let site = call(text, "f(x, y, z)")
        .owner("A")
        .args(vec![expr("x", "int"), expr("y", "int"), expr("z", "int")])
        .method("f", &[("a", "int"), ("b", "int"), ("c", "int")])
        .build();
    let rule = MethodRewrite::builder("A f(..)")
        .reorder_arguments(["b", "a"])
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), "f(y, x, z);");
}

#[test]
fn reordered_argument_carries_its_literal_transform() {
    let text = r#"f("x", 1);"#;
    let site = call(text, r#"f("x", 1)"#)
        .owner("A")
        .args(vec![string(r#""x""#), int("1")])
        .method("f", &[("s", "java.lang.String"), ("n", "int")])
        .build();
    let rule = MethodRewrite::builder("A f(String, int)")
        .reorder_arguments(["n", "s"])
        .arg("String")
        .literal_transform(upper)
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), r#"f(1, "X");"#);
}

#[test]
fn reordered_argument_takes_the_position_rule_of_its_destination() {
    let text = r#"f("x", "y");"#;
    let site = call(text, r#"f("x", "y")"#)
        .owner("A")
        .args(vec![string(r#""x""#), string(r#""y""#)])
        .method("f", &[("a", "java.lang.String"), ("b", "java.lang.String")])
        .build();
    let rule = MethodRewrite::builder("A f(String, String)")
        .reorder_arguments(["b", "a"])
        .arg(1usize)
        .literal_transform(upper)
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), r#"f("y", "X");"#);
}

#[test]
fn reorder_without_method_symbol_is_unsupported_but_other_phases_apply() {
    let text = "f(x, y);";
    let site = call(text, "f(x, y)")
        .owner("A")
        .args(vec![expr("x", "int"), expr("y", "int")])
        .build();
    let rule = MethodRewrite::builder("A f(int, int)")
        .rename("g")
        .reorder_arguments(["b", "a"])
        .build()
        .unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    let rewrite = rewriter.rewrite_call_site(&site).unwrap();

    assert_eq!(apply(text, &rewrite.edits), "g(x, y);");
    assert!(matches!(
        rewrite.conflicts.as_slice(),
        [RewriteConflict::UnsupportedRuleCondition { .. }]
    ));
}

#[test]
fn unresolved_reorder_target_drops_the_whole_reorder_phase() {
    let text = "f(x, y);";
    let site = call(text, "f(x, y)")
        .owner("A")
        .args(vec![expr("x", "int"), expr("y", "int")])
        .method("f", &[("a", "int"), ("b", "int")])
        .build();
    let rule = MethodRewrite::builder("A f(int, int)")
        .reorder_arguments(["b", "missing"])
        .retarget_to_variable("other")
        .build()
        .unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    let rewrite = rewriter.rewrite_call_site(&site).unwrap();

    assert_eq!(apply(text, &rewrite.edits), "other.f(x, y);");
    assert_eq!(
        rewrite.conflicts,
        vec![RewriteConflict::UnresolvedReorderTarget {
            call: site.range,
            target: "missing".to_string(),
        }]
    );
}

#[test]
fn literal_transform_by_type_preserves_surrounding_text() {
    let text = r#"a.log( "warn" /* level */ + "ing" , 3);"#;
    let site = call(text, r#"a.log( "warn" /* level */ + "ing" , 3)"#)
        .owner("com.acme.Logger")
        .args(vec![
            nested(
                r#""warn" /* level */ + "ing""#,
                "java.lang.String",
                vec![string(r#""warn""#), string(r#""ing""#)],
            ),
            int("3"),
        ])
        .build();
    let rule = MethodRewrite::builder("*..Logger log(String, int)")
        .arg("String")
        .literal_transform(upper)
        .build()
        .unwrap();

    assert_eq!(
        rewrite_one(&rule, text, &site),
        r#"a.log( "WARN" /* level */ + "ING" , 3);"#
    );
}

#[test]
fn literal_transform_by_position() {
    let text = "a.sleep(10L, 20L);";
    let long = |t: &'static str, v: i64| support::lit(t, "long", LiteralValue::Long(v));
    let site = call(text, "a.sleep(10L, 20L)")
        .owner("A")
        .args(vec![long("10L", 10), long("20L", 20)])
        .build();
    let rule = MethodRewrite::builder("A sleep(long, long)")
        .arg(1usize)
        .literal_transform(|value| match value {
            LiteralValue::Long(ms) => LiteralValue::Long(ms * 1000),
            other => other.clone(),
        })
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), "a.sleep(10L, 20000L);");
}

#[test]
fn identity_literal_transform_emits_no_edits() {
    let text = r#"a.log("x");"#;
    let site = call(text, r#"a.log("x")"#)
        .owner("A")
        .args(vec![string(r#""x""#)])
        .build();
    let rule = MethodRewrite::builder("A log(String)")
        .arg(0usize)
        .literal_transform(|value| value.clone())
        .build()
        .unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    let rewrite = rewriter.rewrite_call_site(&site).unwrap();
    assert!(rewrite.edits.is_empty());
}

#[test]
fn move_to_last_moves_matching_arguments_behind_the_rest() {
    let text = r#"a.put(1, "key", 2);"#;
    let site = call(text, r#"a.put(1, "key", 2)"#)
        .owner("A")
        .args(vec![int("1"), string(r#""key""#), int("2")])
        .build();
    let rule = MethodRewrite::builder("A put(int, String, int)")
        .arg("String")
        .move_to_last()
        .literal_transform(upper)
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), r#"a.put(1, 2, "KEY");"#);
}

#[test]
fn retarget_qualified_call_to_static_owner() {
    let text = "helper.parse(s);";
    let site = call(text, "helper.parse(s)")
        .owner("com.acme.Helper")
        .args(vec![expr("s", "java.lang.String")])
        .build();
    let rule = MethodRewrite::builder("com.acme.Helper parse(String)")
        .retarget_to_static("com.acme.util.Parsers")
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), "Parsers.parse(s);");
}

#[test]
fn retarget_bare_call_to_static_nested_owner_and_rename() {
    let text = "parse(s);";
    let site = call(text, "parse(s)")
        .owner("com.acme.Helper")
        .args(vec![expr("s", "java.lang.String")])
        .build();
    let rule = MethodRewrite::builder("com.acme.Helper parse(String)")
        .rename("read")
        .retarget_to_static("com.acme.Outer$Parsers")
        .build()
        .unwrap();

    assert_eq!(rewrite_one(&rule, text, &site), "Outer.Parsers.read(s);");
}

#[test]
fn retarget_to_variable() {
    let text = "Helper.parse(s); parse(t);";
    let qualified = call(text, "Helper.parse(s)")
        .owner("com.acme.Helper")
        .args(vec![expr("s", "java.lang.String")])
        .build();
    let bare = call(text, "parse(t)")
        .owner("com.acme.Helper")
        .args(vec![expr("t", "java.lang.String")])
        .build();
    let rule = MethodRewrite::builder("com.acme.Helper parse(..)")
        .retarget_to_variable("parser")
        .build()
        .unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    let rewrite = rewriter.rewrite_file([&qualified, &bare]).unwrap();

    assert_eq!(rewrite.matched_calls, 2);
    assert_eq!(apply(text, &rewrite.edits), "parser.parse(s); parser.parse(t);");
}

#[test]
fn both_retargets_are_rejected_when_building() {
    let err = MethodRewrite::builder("A foo()")
        .retarget_to_static("B")
        .retarget_to_variable("b")
        .build()
        .unwrap_err();
    assert!(matches!(err, RewriteError::AmbiguousConfiguration { .. }));
}

#[test]
fn modifier_without_argument_is_rejected() {
    let err = MethodRewrite::builder("A foo()")
        .move_to_last()
        .build()
        .unwrap_err();
    assert!(matches!(err, RewriteError::AmbiguousConfiguration { .. }));
}

#[test]
fn malformed_signature_is_rejected() {
    let err = MethodRewrite::builder("foo(")
        .rename("bar")
        .build()
        .unwrap_err();
    assert!(matches!(err, RewriteError::MalformedSignature { .. }));
}

#[test]
fn non_matching_calls_produce_nothing() {
    let text = "a.foo(1); b.foo(\"s\");";
    let int_call = call(text, "a.foo(1)").owner("A").args(vec![int("1")]).build();
    let string_call = call(text, "b.foo(\"s\")")
        .owner("B")
        .args(vec![string("\"s\"")])
        .build();
    let rule = MethodRewrite::builder("B foo(int)").rename("bar").build().unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    assert!(rewriter.rewrite_call_site(&int_call).is_none());
    let rewrite = rewriter.rewrite_file([&int_call, &string_call]).unwrap();
    assert_eq!(rewrite.matched_calls, 0);
    assert!(rewrite.edits.is_empty());
}

#[test]
fn file_fixes_are_sorted_across_call_sites() {
    let text = "a.foo(1);\na.foo(2);\n";
    let first = call(text, "a.foo(1)").owner("A").args(vec![int("1")]).build();
    let second = call(text, "a.foo(2)").owner("A").args(vec![int("2")]).build();
    let rule = MethodRewrite::builder("A foo(int)")
        .rename("bar")
        .retarget_to_variable("b")
        .build()
        .unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    let rewrite = rewriter.rewrite_file([&second, &first]).unwrap();

    let starts: Vec<usize> = rewrite.edits.iter().map(|e| e.range.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert_eq!(apply(text, &rewrite.edits), "b.bar(1);\nb.bar(2);\n");
}

#[test]
fn overlapping_nested_call_is_skipped_without_losing_other_fixes() {
    let text = r#"a.f(a.f("x")); b.f("z");"#;
    let inner = call(text, r#"a.f("x")"#)
        .owner("A")
        .args(vec![string(r#""x""#)])
        .build();
    let outer = call(text, r#"a.f(a.f("x"))"#)
        .owner("A")
        .args(vec![nested(
            r#"a.f("x")"#,
            "java.lang.String",
            vec![string(r#""x""#)],
        )])
        .build();
    let other = call(text, r#"b.f("z")"#)
        .owner("A")
        .args(vec![string(r#""z""#)])
        .build();
    let rule = MethodRewrite::builder("A f(String)")
        .arg(0usize)
        .literal_transform(upper)
        .build()
        .unwrap();

    let rewriter = InvocationRewriter::new(&rule, SourceText::new(text));
    let rewrite = rewriter.rewrite_file([&outer, &inner, &other]).unwrap();

    assert_eq!(rewrite.matched_calls, 3);
    assert_eq!(apply(text, &rewrite.edits), r#"a.f(a.f("X")); b.f("Z");"#);
    assert_eq!(rewrite.conflicts.len(), 1);
    assert!(matches!(
        &rewrite.conflicts[0],
        RewriteConflict::UnsupportedRuleCondition { call: conflict, .. } if *conflict == inner.range
    ));
}
