//! Macro scanner contract tests: per-scope grouping, ordering, visibility
//! tracking, method-body skipping, and deferred-block tagging.

use rbsgen::namespace::Namespace;
use rbsgen::scan::{self, MacroKind, ScanIndex};

fn scan(source: &str) -> ScanIndex {
    scan::scan(source).unwrap()
}

#[test]
fn groups_calls_by_scope_in_first_seen_order() {
    let index = scan(concat!(
        "class Alpha\n",
        "  cattr_accessor :a\n",
        "end\n",
        "module Beta\n",
        "  mattr_reader :b\n",
        "end\n",
    ));
    let scopes: Vec<String> = index.scopes().map(|ns| ns.to_string()).collect();
    assert_eq!(scopes, vec!["::Alpha", "::Beta"]);
    assert_eq!(index.calls_for(&Namespace::parse("::Alpha")).len(), 1);
    assert_eq!(index.calls_for(&Namespace::parse("::Beta"))[0].kind, MacroKind::MattrReader);
}

#[test]
fn preserves_source_order_within_a_scope() {
    let index = scan(concat!(
        "class Foo\n",
        "  class_attribute :bar\n",
        "  delegate :size, to: :bar\n",
        "  include Baz\n",
        "end\n",
    ));
    let kinds: Vec<MacroKind> = index
        .calls_for(&Namespace::parse("::Foo"))
        .iter()
        .map(|c| c.kind)
        .collect();
    assert_eq!(kinds, vec![MacroKind::ClassAttribute, MacroKind::Delegate, MacroKind::Include]);
}

#[test]
fn nested_scopes_get_qualified_names() {
    let index = scan(concat!(
        "module Outer\n",
        "  class Inner\n",
        "    cattr_accessor :x\n",
        "  end\n",
        "end\n",
        "class Compact::Name\n",
        "  cattr_accessor :y\n",
        "end\n",
    ));
    let scopes: Vec<String> = index.scopes().map(|ns| ns.to_string()).collect();
    assert_eq!(scopes, vec!["::Outer::Inner", "::Compact::Name"]);
}

#[test]
fn skips_calls_inside_method_bodies() {
    let index = scan(concat!(
        "class Foo\n",
        "  cattr_accessor :kept\n",
        "  def build\n",
        "    cattr_accessor :ignored\n",
        "  end\n",
        "  def self.configure\n",
        "    class_attribute :also_ignored\n",
        "  end\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Foo"));
    assert_eq!(calls.len(), 1);
}

#[test]
fn visibility_is_fixed_at_scan_time() {
    let index = scan(concat!(
        "class Foo\n",
        "  cattr_accessor :open\n",
        "  private\n",
        "  cattr_accessor :hidden\n",
        "  public\n",
        "  cattr_accessor :reopened\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Foo"));
    assert_eq!(
        calls.iter().map(|c| c.private).collect::<Vec<_>>(),
        vec![false, true, false]
    );
}

#[test]
fn visibility_resets_per_scope() {
    let index = scan(concat!(
        "class Foo\n",
        "  private\n",
        "  cattr_accessor :hidden\n",
        "  class Bar\n",
        "    cattr_accessor :open\n",
        "  end\n",
        "end\n",
    ));
    assert!(index.calls_for(&Namespace::parse("::Foo"))[0].private);
    assert!(!index.calls_for(&Namespace::parse("::Foo::Bar"))[0].private);
}

#[test]
fn tags_invocations_inside_included_blocks() {
    let index = scan(concat!(
        "module Taggable\n",
        "  cattr_accessor :outside\n",
        "  included do\n",
        "    class_attribute :inside\n",
        "    included do\n",
        "      class_attribute :nested\n",
        "    end\n",
        "    class_attribute :after_nested\n",
        "  end\n",
        "  cattr_accessor :outside_again\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Taggable"));
    assert_eq!(calls.len(), 5);
    assert_eq!(
        calls.iter().map(|c| c.included).collect::<Vec<_>>(),
        vec![false, true, true, true, false]
    );
}

#[test]
fn attaches_trailing_type_hints() {
    let index = scan(concat!(
        "class Foo\n",
        "  class_attribute :bar #: String\n",
        "  # standalone comment\n",
        "  class_attribute :baz\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Foo"));
    assert_eq!(calls[0].trailing_comment.as_deref(), Some("#: String"));
    assert_eq!(calls[1].trailing_comment, None);
}

#[test]
fn recognizes_parenthesized_and_bare_calls() {
    let index = scan(concat!(
        "class Foo\n",
        "  cattr_accessor(:a)\n",
        "  cattr_accessor :b, :c\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Foo"));
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].args.len(), 2);
}

#[test]
fn ignores_unrecognized_calls_and_receivers() {
    let index = scan(concat!(
        "class Foo\n",
        "  before_save :normalize\n",
        "  Config.include Bar\n",
        "  cattr_accessor :kept\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Foo"));
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, MacroKind::CattrAccessor);
}

#[test]
fn traverses_plain_blocks_transparently() {
    let index = scan(concat!(
        "class Foo\n",
        "  with_options presence: true do\n",
        "    cattr_accessor :inside_block\n",
        "  end\n",
        "end\n",
    ));
    let calls = index.calls_for(&Namespace::parse("::Foo"));
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].included);
}
