//! Tag and descendant selectors.

use std::fmt;

use sprig_dom::{DomTree, NodeId};

/// A parsed selector.
///
/// Only two forms exist: a bare tag name, and a descendant combination of
/// two selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements with this (case-folded) tag name.
    Tag(String),
    /// Matches nodes matching the second selector that have a strict
    /// ancestor matching the first.
    Descendant(Box<Self>, Box<Self>),
}

impl Selector {
    /// A tag selector.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// `ancestor descendant`.
    #[must_use]
    pub fn descendant(ancestor: Self, descendant: Self) -> Self {
        Self::Descendant(Box::new(ancestor), Box::new(descendant))
    }

    /// Cascade weight: 1 per tag name in the selector.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Self::Tag(_) => 1,
            Self::Descendant(ancestor, descendant) => ancestor.priority() + descendant.priority(),
        }
    }

    /// Whether the node `id` in `tree` matches. Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.tag_name(id) == Some(tag.as_str()),
            Self::Descendant(ancestor, descendant) => {
                descendant.matches(tree, id)
                    && tree.ancestors(id).any(|a| ancestor.matches(tree, a))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Descendant(ancestor, descendant) => write!(f, "{ancestor} {descendant}"),
        }
    }
}
