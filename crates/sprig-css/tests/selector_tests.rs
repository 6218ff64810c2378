//! Integration tests for stylesheet parsing and selector matching.

use sprig_css::{Selector, parse_selector, parse_stylesheet};
use sprig_dom::{DomTree, NodeId};
use sprig_html::parse;

/// All elements with the given tag, in document order.
fn elements(tree: &DomTree, tag: &str) -> Vec<NodeId> {
    tree.iter_all()
        .filter(|&id| tree.tag_name(id) == Some(tag))
        .collect()
}

#[test]
fn test_parse_rules_in_source_order() {
    let rules = parse_stylesheet("p { color: red; } div p { font-size: 12px; margin: 0 }");
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].selector, Selector::tag("p"));
    assert_eq!(rules[0].declarations["color"], "red");
    assert_eq!(rules[1].selector.to_string(), "div p");
    assert_eq!(rules[1].declarations["font-size"], "12px");
    assert_eq!(rules[1].declarations["margin"], "0");
}

#[test]
fn test_selectors_and_properties_case_folded() {
    let rules = parse_stylesheet("DIV { Background-Color: Red; }");
    assert_eq!(rules[0].selector, Selector::tag("div"));
    // Values keep their case.
    assert_eq!(rules[0].declarations["background-color"], "Red");
}

#[test]
fn test_malformed_rule_skipped() {
    let rules = parse_stylesheet("p { color: red; } >> junk { x: y } span { color: green; }");
    let selectors: Vec<String> = rules.iter().map(|r| r.selector.to_string()).collect();
    assert_eq!(selectors, vec!["p", "span"]);
}

#[test]
fn test_malformed_declaration_skipped() {
    let rules = parse_stylesheet("p { color: ; font-weight: bold; }");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].declarations.len(), 1);
    assert_eq!(rules[0].declarations["font-weight"], "bold");
}

#[test]
fn test_unterminated_rule_keeps_earlier_rules() {
    let rules = parse_stylesheet("a { color: blue; } b { font-weight: bold;");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].selector, Selector::tag("a"));
}

#[test]
fn test_priority_is_additive() {
    let a = Selector::tag("a");
    let ab = parse_selector("a b").unwrap();
    let abc = parse_selector("a b c").unwrap();
    assert_eq!(a.priority(), 1);
    assert_eq!(ab.priority(), 2);
    assert_eq!(abc.priority(), 3);

    let combined = Selector::descendant(ab.clone(), abc.clone());
    assert_eq!(combined.priority(), ab.priority() + abc.priority());
}

#[test]
fn test_tag_selector_matches_elements_only() {
    let tree = parse("<p>hello</p>");
    let p = elements(&tree, "p")[0];
    let text = tree.children(p)[0];

    let selector = Selector::tag("p");
    assert!(selector.matches(&tree, p));
    assert!(!selector.matches(&tree, text));
    assert!(!Selector::tag("div").matches(&tree, p));
}

#[test]
fn test_descendant_matches_any_ancestor() {
    let tree = parse("<div><section><p>x</p></section></div><p>y</p>");
    let ps = elements(&tree, "p");
    let selector = parse_selector("div p").unwrap();

    assert!(selector.matches(&tree, ps[0]));
    assert!(!selector.matches(&tree, ps[1]));
}

#[test]
fn test_descendant_requires_strict_ancestor() {
    let tree = parse("<div>x</div>");
    let div = elements(&tree, "div")[0];
    assert!(!parse_selector("div div").unwrap().matches(&tree, div));
}

#[test]
fn test_nested_descendant_chain() {
    let tree = parse("<ul><li><b>x</b></li></ul><li><b>y</b></li>");
    let bs = elements(&tree, "b");
    let selector = parse_selector("ul li b").unwrap();
    assert!(selector.matches(&tree, bs[0]));
    assert!(!selector.matches(&tree, bs[1]));
}
