//! Symbolic evaluator contract tests.
//!
//! Fragments are obtained by scanning small snippets and taking the
//! recorded call's arguments, so the tests exercise the same lowering the
//! pipeline uses.

use rbsgen::eval::{self, Value};
use rbsgen::namespace::Namespace;
use rbsgen::scan;
use rbsgen::syntax::Node;

/// Arguments of the first macro call recorded in `source`.
fn args_of(source: &str) -> Vec<Node> {
    let index = scan::scan(source).unwrap();
    let scope = index.scopes().next().expect("a scope with calls").clone();
    index.calls_for(&scope)[0].args.clone()
}

fn first_value(source: &str) -> Value {
    let args = args_of(source);
    eval::eval(&args[0]).unwrap()
}

#[test]
fn literals_reduce_to_values() {
    assert_eq!(
        first_value("class F\n  cattr_accessor :name\nend\n"),
        Value::Sym("name".into())
    );
    assert_eq!(first_value("class F\n  cattr_accessor nil\nend\n"), Value::Nil);
    assert_eq!(first_value("class F\n  cattr_accessor true\nend\n"), Value::Bool(true));
    assert_eq!(first_value("class F\n  cattr_accessor 42\nend\n"), Value::Int(42));
    assert_eq!(first_value("class F\n  cattr_accessor 1.5\nend\n"), Value::Float(1.5));
    assert_eq!(
        first_value("class F\n  cattr_accessor \"text\"\nend\n"),
        Value::Str("text".into())
    );
}

#[test]
fn arrays_and_hashes_evaluate_element_wise() {
    assert_eq!(
        first_value("class F\n  cattr_accessor [1, :two]\nend\n"),
        Value::Array(vec![Value::Int(1), Value::Sym("two".into())])
    );
    assert_eq!(
        first_value("class F\n  cattr_accessor({ a: 1 })\nend\n"),
        Value::Hash(vec![(Value::Sym("a".into()), Value::Int(1))])
    );
}

#[test]
fn constant_paths_evaluate_to_namespaces() {
    assert_eq!(
        first_value("class F\n  include Foo::Bar\nend\n"),
        Value::Namespace(Namespace::parse("Foo::Bar"))
    );
    assert_eq!(
        first_value("class F\n  include ::Top\nend\n"),
        Value::Namespace(Namespace::parse("::Top"))
    );
}

#[test]
fn calls_and_lambdas_pass_through_opaquely() {
    let args = args_of("class F\n  cattr_accessor :a, default: -> { [] }\nend\n");
    let (_, options) = eval::args_with_options(&args).unwrap();
    assert!(matches!(options.get("default"), Some(Value::Opaque(_))));

    let args = args_of("class F\n  cattr_accessor :a, default: Config.load\nend\n");
    let (_, options) = eval::args_with_options(&args).unwrap();
    assert!(matches!(options.get("default"), Some(Value::Opaque(_))));
}

#[test]
fn unsupported_grammar_is_a_hard_error() {
    let args = args_of("class F\n  cattr_accessor :a, default: 1 + 2\nend\n");
    assert!(eval::args_with_options(&args).is_err());
}

#[test]
fn trailing_hash_splits_into_options() {
    let args = args_of("class F\n  delegate :size, :succ, to: :bar, prefix: true\nend\n");
    let (names, options) = eval::args_with_options(&args).unwrap();
    assert_eq!(names, vec![Value::Sym("size".into()), Value::Sym("succ".into())]);
    assert_eq!(options.get("to"), Some(&Value::Sym("bar".into())));
    assert_eq!(options.get("prefix"), Some(&Value::Bool(true)));
}

#[test]
fn absent_trailing_hash_yields_empty_options() {
    let args = args_of("class F\n  cattr_accessor :a, :b\nend\n");
    let (names, options) = eval::args_with_options(&args).unwrap();
    assert_eq!(names.len(), 2);
    assert_eq!(options, rbsgen::eval::Options::default());
}

#[test]
fn duplicate_hash_keys_keep_the_last_entry() {
    let args = args_of("class F\n  cattr_accessor :a, default: 1, default: 2\nend\n");
    let (_, options) = eval::args_with_options(&args).unwrap();
    assert_eq!(options.get("default"), Some(&Value::Int(2)));
}
