//! Cascade and style computation
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//!
//! Each node's style is built in four steps, parent before children:
//!
//! 1. inherited properties, copied from the parent element (or their
//!    initial values at the top of the tree)
//! 2. matching rules, lowest priority first, so later and more specific
//!    rules overwrite earlier ones
//! 3. the element's `style` attribute, which always wins
//! 4. percentage font sizes, resolved against the parent's pixel size

use std::collections::HashMap;

use sprig_dom::{DomTree, NodeId};

use crate::parser::{Rule, parse_declarations};
use crate::style::{ComputedStyle, DEFAULT_FONT_SIZE_PX, INHERITED_PROPERTIES, parse_percentage};

/// Resolved styles for every element and text node, keyed by node.
pub type Styles = HashMap<NodeId, ComputedStyle>;

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Order `rules` by ascending selector priority. The sort is stable: rules
/// of equal priority keep source order, so the later one wins.
#[must_use]
pub fn cascade_order(rules: &[Rule]) -> Vec<&Rule> {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.selector.priority());
    ordered
}

/// Compute styles for the whole document.
///
/// `rules` is the full rule list in source order, default rules first.
/// The document node itself gets no entry.
#[must_use]
pub fn compute_styles(tree: &DomTree, rules: &[Rule]) -> Styles {
    let ordered = cascade_order(rules);
    let mut styles = Styles::new();
    for &child in tree.children(tree.root()) {
        style_node(tree, child, None, &ordered, &mut styles);
    }
    styles
}

fn style_node(
    tree: &DomTree,
    id: NodeId,
    parent: Option<&ComputedStyle>,
    rules: &[&Rule],
    styles: &mut Styles,
) {
    let mut style = ComputedStyle::new();

    // [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    for &(property, initial) in INHERITED_PROPERTIES {
        let value = parent.and_then(|p| p.get(property)).unwrap_or(initial);
        style.set(property, value);
    }

    if tree.as_element(id).is_some() {
        for rule in rules {
            if rule.selector.matches(tree, id) {
                style.apply(&rule.declarations);
            }
        }

        // [§ 6.4 Style attribute](https://www.w3.org/TR/css-style-attr/)
        if let Some(inline) = tree.attribute(id, "style") {
            style.apply(&parse_declarations(inline));
        }
    }

    resolve_font_size(&mut style, parent);

    for &child in tree.children(id) {
        style_node(tree, child, Some(&style), rules, styles);
    }
    let _ = styles.insert(id, style);
}

/// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "Percentages: refer to parent element's font size"
fn resolve_font_size(style: &mut ComputedStyle, parent: Option<&ComputedStyle>) {
    let Some(ratio) = style.get("font-size").and_then(parse_percentage) else {
        return;
    };
    let parent_px = parent.map_or(DEFAULT_FONT_SIZE_PX, ComputedStyle::font_size_px);
    style.set("font-size", format!("{}px", ratio * parent_px));
}
