//! Integration tests for the scenarios and testable properties described
//! for the declaration grammar: package/namespace precedence, alias
//! resolution, interface lists, trailing-optional parameters, and the
//! callable-body dependency scan.
//!
//! Each test builds its token stream by hand (no real tokenizer in this
//! workspace) and drives the parser against `RecordingBuilder`, then
//! asserts on the recorded structs directly — the same style
//! `mesh-typeck`'s registry tests use.

use declscan_common::{Token, TokenKind, VecTokenizer};
use declscan_parser::testutil::RecordingBuilder;
use declscan_parser::{Parser, DEFAULT_PACKAGE, PACKAGE_SEPARATOR};

fn run(tokens: Vec<Token>) -> RecordingBuilder {
    let tokenizer = VecTokenizer::new(tokens, "test.src");
    let mut parser = Parser::new(tokenizer, RecordingBuilder::new());
    parser.parse().expect("fixture should parse cleanly");
    parser.into_builder()
}

fn tok(kind: TokenKind, image: &str, line: u32) -> Token {
    Token::on_line(kind, image, line)
}

/// The qualified name a type gets when declared with no active namespace
/// and no `@package` annotation: the legacy `@package` separator joining
/// the default package and the local name.
fn default_fqn(local: &str) -> String {
    format!("{DEFAULT_PACKAGE}{PACKAGE_SEPARATOR}{local}")
}

/// A doc comment immediately after the open tag sets the file-wide doc
/// comment even though it is also immediately followed by the
/// declaration it documents — position, not lookahead, decides.
#[test]
fn s1_package_fallback_and_file_doc_comment() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::DocComment, "/** @package Foo */", 1),
        tok(TokenKind::Function, "function", 1),
        tok(TokenKind::String, "f", 1),
        tok(TokenKind::ParenOpen, "(", 1),
        tok(TokenKind::ParenClose, ")", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::CurlyClose, "}", 1),
    ];
    let b = run(tokens);

    assert_eq!(b.file_doc_comments.get("test.src").unwrap(), "/** @package Foo */");

    let pkg = b.packages.iter().find(|p| p.fqn == "Foo").expect("package Foo");
    assert_eq!(pkg.functions.len(), 1);
    assert_eq!(b.callables[pkg.functions[0].0 as usize].name.as_deref(), Some("f"));
}

/// A `namespace` declaration dominates the file's `@package` annotation
/// for where the function lands, but the file doc comment (set because
/// it directly followed the open tag) is unaffected by what comes after.
#[test]
fn s2_namespace_dominates_package_but_file_comment_still_set() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::DocComment, "/** @package Foo */", 1),
        tok(TokenKind::Namespace, "namespace", 2),
        tok(TokenKind::String, "A", 2),
        tok(TokenKind::Backslash, "\\", 2),
        tok(TokenKind::String, "B", 2),
        tok(TokenKind::Semicolon, ";", 2),
        tok(TokenKind::Function, "function", 3),
        tok(TokenKind::String, "f", 3),
        tok(TokenKind::ParenOpen, "(", 3),
        tok(TokenKind::ParenClose, ")", 3),
        tok(TokenKind::CurlyOpen, "{", 3),
        tok(TokenKind::CurlyClose, "}", 3),
    ];
    let b = run(tokens);

    assert_eq!(b.file_doc_comments.get("test.src").unwrap(), "/** @package Foo */");
    assert!(b.packages.iter().find(|p| p.fqn == "Foo").is_none());
    let pkg = b.packages.iter().find(|p| p.fqn == "A\\B").expect("package A\\B");
    assert_eq!(b.callables[pkg.functions[0].0 as usize].name.as_deref(), Some("f"));
}

/// An aliased `use` target is absolute: a class `extends`ing the alias
/// resolves through it to the alias's own fully-qualified name, not one
/// prefixed by the enclosing namespace.
#[test]
fn s3_use_alias_resolution_in_extends() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Namespace, "namespace", 1),
        tok(TokenKind::String, "X", 1),
        tok(TokenKind::Semicolon, ";", 1),
        tok(TokenKind::Use, "use", 2),
        tok(TokenKind::String, "Y", 2),
        tok(TokenKind::Backslash, "\\", 2),
        tok(TokenKind::String, "Z", 2),
        tok(TokenKind::As, "as", 2),
        tok(TokenKind::String, "Q", 2),
        tok(TokenKind::Semicolon, ";", 2),
        tok(TokenKind::Class, "class", 3),
        tok(TokenKind::String, "C", 3),
        tok(TokenKind::Extends, "extends", 3),
        tok(TokenKind::String, "Q", 3),
        tok(TokenKind::Backslash, "\\", 3),
        tok(TokenKind::String, "W", 3),
        tok(TokenKind::CurlyOpen, "{", 3),
        tok(TokenKind::CurlyClose, "}", 3),
    ];
    let b = run(tokens);

    let class = b.types.iter().find(|t| t.fqn == "X\\C").expect("class X\\C");
    let parent_ref = class.parent.expect("parent class reference");
    assert_eq!(b.class_refs[parent_ref.0 as usize], "Y\\Z\\W");
}

/// An interface's `extends` list and a class's `implements` list both
/// record interface references, in declaration order.
#[test]
fn s4_implements_list_and_interface_extends() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Interface, "interface", 1),
        tok(TokenKind::String, "I", 1),
        tok(TokenKind::Extends, "extends", 1),
        tok(TokenKind::String, "J", 1),
        tok(TokenKind::Comma, ",", 1),
        tok(TokenKind::String, "K", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::CurlyClose, "}", 1),
        tok(TokenKind::Class, "class", 2),
        tok(TokenKind::String, "C", 2),
        tok(TokenKind::Implements, "implements", 2),
        tok(TokenKind::String, "I", 2),
        tok(TokenKind::Comma, ",", 2),
        tok(TokenKind::String, "L", 2),
        tok(TokenKind::CurlyOpen, "{", 2),
        tok(TokenKind::CurlyClose, "}", 2),
    ];
    let b = run(tokens);

    // References in an `extends`/`implements` list resolve relative to
    // the active namespace only, never through the legacy `@package`
    // prefix that a declaration site gets — so these stay bare names even
    // though the declaring types above get the `+global::` prefix.
    let iface = b.types.iter().find(|t| t.fqn == default_fqn("I")).expect("interface I");
    assert!(iface.is_interface);
    let iface_names: Vec<&str> = iface
        .interfaces
        .iter()
        .map(|r| b.interface_refs[r.0 as usize].as_str())
        .collect();
    assert_eq!(iface_names, vec!["J", "K"]);

    let class = b.types.iter().find(|t| t.fqn == default_fqn("C")).expect("class C");
    assert!(!class.is_interface);
    let class_impl_names: Vec<&str> = class
        .interfaces
        .iter()
        .map(|r| b.interface_refs[r.0 as usize].as_str())
        .collect();
    assert_eq!(class_impl_names, vec!["I", "L"]);
}

/// Trailing-optional rule: a parameter is only optional if every
/// parameter after it also has a default. `$c` has none, so `$b`'s own
/// default does not make it optional either.
#[test]
fn s5_trailing_optional_rule_cascades_backward() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Function, "function", 1),
        tok(TokenKind::String, "f", 1),
        tok(TokenKind::ParenOpen, "(", 1),
        tok(TokenKind::Variable, "$a", 1),
        tok(TokenKind::Comma, ",", 1),
        tok(TokenKind::Variable, "$b", 1),
        tok(TokenKind::Equal, "=", 1),
        tok(TokenKind::LNumber, "1", 1),
        tok(TokenKind::Comma, ",", 1),
        tok(TokenKind::Variable, "$c", 1),
        tok(TokenKind::ParenClose, ")", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::CurlyClose, "}", 1),
    ];
    let b = run(tokens);

    let f = b.callables.iter().find(|c| c.name.as_deref() == Some("f")).expect("function f");
    assert_eq!(f.parameters.len(), 3);
    for p in &f.parameters {
        assert!(!b.parameters[p.0 as usize].optional, "{:?} should not be optional", b.parameters[p.0 as usize].name);
    }
}

/// The callable-body dependency scan extracts `new`, `instanceof`,
/// `catch`, and static-access references, but not names that only occur
/// inside a string literal.
#[test]
fn s6_body_reference_extraction() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Function, "function", 1),
        tok(TokenKind::String, "f", 1),
        tok(TokenKind::ParenOpen, "(", 1),
        tok(TokenKind::ParenClose, ")", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        // new A\B();
        tok(TokenKind::New, "new", 2),
        tok(TokenKind::String, "A", 2),
        tok(TokenKind::Backslash, "\\", 2),
        tok(TokenKind::String, "B", 2),
        tok(TokenKind::ParenOpen, "(", 2),
        tok(TokenKind::ParenClose, ")", 2),
        tok(TokenKind::Semicolon, ";", 2),
        // $x instanceof C;
        tok(TokenKind::Variable, "$x", 3),
        tok(TokenKind::Instanceof, "instanceof", 3),
        tok(TokenKind::String, "C", 3),
        tok(TokenKind::Semicolon, ";", 3),
        // try{} catch(D $e){}
        tok(TokenKind::Other, "try", 4),
        tok(TokenKind::CurlyOpen, "{", 4),
        tok(TokenKind::CurlyClose, "}", 4),
        tok(TokenKind::Catch, "catch", 4),
        tok(TokenKind::ParenOpen, "(", 4),
        tok(TokenKind::String, "D", 4),
        tok(TokenKind::Variable, "$e", 4),
        tok(TokenKind::ParenClose, ")", 4),
        tok(TokenKind::CurlyOpen, "{", 4),
        tok(TokenKind::CurlyClose, "}", 4),
        // E::X;
        tok(TokenKind::String, "E", 5),
        tok(TokenKind::DoubleColon, "::", 5),
        tok(TokenKind::String, "X", 5),
        tok(TokenKind::Semicolon, ";", 5),
        // a string literal is skipped opaquely and adds no dependency
        tok(TokenKind::DoubleQuote, "\"", 6),
        tok(TokenKind::Other, "$y", 6),
        tok(TokenKind::DoubleQuote, "\"", 6),
        tok(TokenKind::Semicolon, ";", 6),
        tok(TokenKind::CurlyClose, "}", 7),
    ];
    let b = run(tokens);

    let f = b.callables.iter().find(|c| c.name.as_deref() == Some("f")).expect("function f");
    let class_deps: Vec<&str> = f
        .class_dependencies
        .iter()
        .map(|r| b.class_refs[r.0 as usize].as_str())
        .collect();
    assert_eq!(class_deps, vec!["A\\B"]);

    let mut ci_deps: Vec<&str> = f
        .class_or_interface_dependencies
        .iter()
        .map(|r| b.class_or_interface_refs[r.0 as usize].as_str())
        .collect();
    ci_deps.sort();
    assert_eq!(ci_deps, vec!["C", "D", "E"]);
}

/// An inline `/* @var $x T */` comment immediately preceding use of `$x`
/// records a class-or-interface dependency on the non-scalar type.
#[test]
fn s7_inline_var_dependency() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Function, "function", 1),
        tok(TokenKind::String, "f", 1),
        tok(TokenKind::ParenOpen, "(", 1),
        tok(TokenKind::ParenClose, ")", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::Comment, "/* @var $o Foo\\Bar */", 2),
        tok(TokenKind::Variable, "$o", 2),
        tok(TokenKind::Other, "->", 2),
        tok(TokenKind::String, "m", 2),
        tok(TokenKind::ParenOpen, "(", 2),
        tok(TokenKind::ParenClose, ")", 2),
        tok(TokenKind::Semicolon, ";", 2),
        tok(TokenKind::CurlyClose, "}", 3),
    ];
    let b = run(tokens);

    let f = b.callables.iter().find(|c| c.name.as_deref() == Some("f")).expect("function f");
    let ci_deps: Vec<&str> = f
        .class_or_interface_dependencies
        .iter()
        .map(|r| b.class_or_interface_refs[r.0 as usize].as_str())
        .collect();
    assert_eq!(ci_deps, vec!["Foo\\Bar"]);
}

/// A `@var` (or `@return`) annotation naming only a scalar type produces
/// no dependency at all (testable property: scalar filtering).
#[test]
fn scalar_var_annotation_yields_no_property_reference() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Class, "class", 1),
        tok(TokenKind::String, "C", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::DocComment, "/** @var int */", 2),
        tok(TokenKind::Variable, "$count", 2),
        tok(TokenKind::Semicolon, ";", 2),
        tok(TokenKind::CurlyClose, "}", 3),
    ];
    let b = run(tokens);

    let class = b.types.iter().find(|t| t.fqn == default_fqn("C")).expect("class C");
    assert_eq!(class.properties.len(), 1);
    let prop = &b.properties[class.properties[0].0 as usize];
    assert_eq!(prop.name, "$count");
    assert!(prop.reference.is_none());
}

/// A forward reference (a class `extends`ing a name not yet declared)
/// resolves to a bare name, same as it would if the target were declared
/// first — reference resolution never depends on declaration order, and
/// a `build_class_reference` call is itself idempotent by name whether
/// the class exists yet or not.
#[test]
fn forward_reference_resolves_independent_of_declaration_order() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Class, "class", 1),
        tok(TokenKind::String, "Child", 1),
        tok(TokenKind::Extends, "extends", 1),
        tok(TokenKind::String, "Parent", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::CurlyClose, "}", 1),
        tok(TokenKind::Class, "class", 2),
        tok(TokenKind::String, "Parent", 2),
        tok(TokenKind::CurlyOpen, "{", 2),
        tok(TokenKind::CurlyClose, "}", 2),
    ];
    let b = run(tokens);

    let child = b.types.iter().find(|t| t.fqn == default_fqn("Child")).unwrap();
    let parent_ref = child.parent.unwrap();
    let parent_fqn = &b.class_refs[parent_ref.0 as usize];
    assert_eq!(parent_fqn, "Parent");

    let parent_type = b.types.iter().find(|t| t.fqn == default_fqn("Parent")).unwrap();
    assert!(!parent_type.is_interface);
}

/// A nested named function inside a callable body is attributed to the
/// enclosing package, as its own top-level declaration, rather than
/// becoming part of the outer callable in any way.
#[test]
fn nested_named_function_attributed_to_enclosing_package() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::DocComment, "/** @package Outer */", 1),
        tok(TokenKind::Function, "function", 1),
        tok(TokenKind::String, "outer", 1),
        tok(TokenKind::ParenOpen, "(", 1),
        tok(TokenKind::ParenClose, ")", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::Function, "function", 2),
        tok(TokenKind::String, "inner", 2),
        tok(TokenKind::ParenOpen, "(", 2),
        tok(TokenKind::ParenClose, ")", 2),
        tok(TokenKind::CurlyOpen, "{", 2),
        tok(TokenKind::CurlyClose, "}", 2),
        tok(TokenKind::CurlyClose, "}", 3),
    ];
    let b = run(tokens);

    // The nested function's own attach-to-package call completes while
    // still inside the outer function's body scan, before the outer
    // function's attach call runs after the scan returns — so `inner`
    // lands in the package's function list ahead of `outer`.
    let pkg = b.packages.iter().find(|p| p.fqn == "Outer").expect("package Outer");
    let names: Vec<&str> = pkg
        .functions
        .iter()
        .map(|c| b.callables[c.0 as usize].name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["inner", "outer"]);
}

/// `build_function` is idempotent by name (§4.6): two declarations of the
/// same function name resolve to the same `CallableId` rather than two
/// separate records.
#[test]
fn repeated_function_declaration_is_idempotent_by_name() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Function, "function", 1),
        tok(TokenKind::String, "f", 1),
        tok(TokenKind::ParenOpen, "(", 1),
        tok(TokenKind::ParenClose, ")", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::CurlyClose, "}", 1),
        tok(TokenKind::Function, "function", 2),
        tok(TokenKind::String, "f", 2),
        tok(TokenKind::ParenOpen, "(", 2),
        tok(TokenKind::ParenClose, ")", 2),
        tok(TokenKind::CurlyOpen, "{", 2),
        tok(TokenKind::CurlyClose, "}", 2),
    ];
    let b = run(tokens);

    assert_eq!(b.callables.len(), 1);
    let pkg = b.packages.iter().find(|p| p.fqn == DEFAULT_PACKAGE).expect("default package");
    assert_eq!(pkg.functions, vec![pkg.functions[0]; 2]);
}

/// `build_method` is likewise idempotent by name: two methods sharing a
/// name within the same type resolve to the same `CallableId`.
#[test]
fn repeated_method_declaration_is_idempotent_by_name() {
    let tokens = vec![
        tok(TokenKind::OpenTag, "<open>", 1),
        tok(TokenKind::Class, "class", 1),
        tok(TokenKind::String, "C", 1),
        tok(TokenKind::CurlyOpen, "{", 1),
        tok(TokenKind::Function, "function", 2),
        tok(TokenKind::String, "m", 2),
        tok(TokenKind::ParenOpen, "(", 2),
        tok(TokenKind::ParenClose, ")", 2),
        tok(TokenKind::CurlyOpen, "{", 2),
        tok(TokenKind::CurlyClose, "}", 2),
        tok(TokenKind::Function, "function", 3),
        tok(TokenKind::String, "m", 3),
        tok(TokenKind::ParenOpen, "(", 3),
        tok(TokenKind::ParenClose, ")", 3),
        tok(TokenKind::CurlyOpen, "{", 3),
        tok(TokenKind::CurlyClose, "}", 3),
        tok(TokenKind::CurlyClose, "}", 4),
    ];
    let b = run(tokens);

    assert_eq!(b.callables.len(), 1);
    let class = b.types.iter().find(|t| t.fqn == default_fqn("C")).expect("class C");
    assert_eq!(class.methods, vec![class.methods[0]; 2]);
}
