use std::fmt::Write as _;

use sprig_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Void elements: attached to the current element without being pushed on
/// the stack of unfinished elements.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that belong in `head`. Seeing one of these while only `html`
/// is open synthesizes a `head` instead of a `body`.
pub const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// Parse markup into a node tree.
///
/// Never fails: malformed input is repaired structurally.
#[must_use]
pub fn parse(body: &str) -> DomTree {
    HtmlParser::new(body).parse()
}

/// Builds a [`DomTree`] from markup.
///
/// The parser keeps a stack of unfinished elements. An opened element is
/// only linked into its parent when it is closed (explicitly, or by
/// [`HtmlParser::finish`]), so the children of every element end up in
/// document order.
pub struct HtmlParser<'a> {
    body: &'a str,
    tree: DomTree,
    /// Stack of open elements; the bottom entry is the `html` element.
    unfinished: Vec<NodeId>,
}

impl<'a> HtmlParser<'a> {
    /// Create a parser over `body`.
    #[must_use]
    pub fn new(body: &'a str) -> Self {
        Self {
            body,
            tree: DomTree::new(),
            unfinished: Vec::new(),
        }
    }

    /// Scan the whole input and return the finished tree.
    #[must_use]
    pub fn parse(mut self) -> DomTree {
        let mut buffer = String::new();
        let mut in_tag = false;

        for c in self.body.chars() {
            match c {
                '<' => {
                    in_tag = true;
                    if !buffer.is_empty() {
                        self.add_text(&buffer);
                    }
                    buffer.clear();
                }
                '>' if in_tag => {
                    in_tag = false;
                    self.add_tag(&buffer);
                    buffer.clear();
                }
                _ => buffer.push(c),
            }
        }

        // An unterminated tag at end of input is dropped.
        if !in_tag && !buffer.is_empty() {
            self.add_text(&buffer);
        }

        self.finish()
    }

    /// Handle a run of character data.
    ///
    /// Whitespace-only runs are dropped. Otherwise the skeleton is repaired
    /// and a text node is appended to the innermost open element.
    pub fn add_text(&mut self, text: &str) {
        if text.chars().all(char::is_whitespace) {
            return;
        }

        self.implicit_tags(None);

        let node = self.tree.alloc(NodeType::Text(text.to_string()));
        if let Some(&parent) = self.unfinished.last() {
            self.tree.append_child(parent, node);
        }
    }

    /// Handle the raw contents of a tag (everything between `<` and `>`).
    pub fn add_tag(&mut self, raw: &str) {
        let Some((tag, attributes)) = split_tag(raw) else {
            return;
        };

        // Comments and doctypes.
        if tag.starts_with('!') {
            return;
        }

        self.implicit_tags(Some(tag.as_str()));

        if tag.starts_with('/') {
            // `html` and `body` stay open until `finish`; only `</head>`
            // may close a skeleton element early.
            let closes_head = tag == "/head" && self.stack_is(&["html", "head"]);
            if self.unfinished.len() <= 2 && !closes_head {
                return;
            }
            self.close_current();
        } else if SELF_CLOSING_TAGS.contains(&tag.as_str()) {
            let node = self
                .tree
                .alloc(NodeType::Element(ElementData::new(tag, attributes)));
            if let Some(&parent) = self.unfinished.last() {
                self.tree.append_child(parent, node);
            }
        } else {
            self.open_element(tag, attributes);
        }
    }

    /// Close everything still open, innermost last-in-first-out, and return
    /// the tree with the `html` element attached under the document node.
    #[must_use]
    pub fn finish(mut self) -> DomTree {
        if self.unfinished.is_empty() {
            self.open_element("html".to_string(), AttributesMap::new());
        }

        while self.unfinished.len() > 1 {
            self.close_current();
        }

        if let Some(root) = self.unfinished.pop() {
            self.tree.append_child(NodeId::ROOT, root);
        }
        self.tree
    }

    /// Synthesize the `html` / `head` / `body` skeleton that `tag` (or text,
    /// when `tag` is `None`) requires.
    fn implicit_tags(&mut self, tag: Option<&str>) {
        loop {
            if self.unfinished.is_empty() && tag != Some("html") {
                self.open_element("html".to_string(), AttributesMap::new());
            } else if self.stack_is(&["html"])
                && !matches!(tag, Some("body" | "/html"))
                && !(tag == Some("head") && !self.head_closed())
            {
                let wants_head = tag.is_some_and(|t| HEAD_TAGS.contains(&t));
                let synthesized = if wants_head && !self.head_closed() {
                    "head"
                } else {
                    "body"
                };
                self.open_element(synthesized.to_string(), AttributesMap::new());
            } else if self.stack_is(&["html", "head"])
                && tag != Some("/head")
                && !tag.is_some_and(|t| HEAD_TAGS.contains(&t))
            {
                self.close_current();
            } else {
                break;
            }
        }
    }

    /// Whether the open-element stack holds exactly `tags`, bottom first.
    fn stack_is(&self, tags: &[&str]) -> bool {
        self.unfinished.len() == tags.len()
            && self
                .unfinished
                .iter()
                .zip(tags)
                .all(|(&id, &tag)| self.tree.tag_name(id) == Some(tag))
    }

    /// Whether `html` already holds a finished `head`.
    fn head_closed(&self) -> bool {
        self.unfinished.first().is_some_and(|&html| {
            self.tree
                .children(html)
                .iter()
                .any(|&c| self.tree.tag_name(c) == Some("head"))
        })
    }

    fn open_element(&mut self, tag: String, attributes: AttributesMap) {
        let node = self
            .tree
            .alloc(NodeType::Element(ElementData::new(tag, attributes)));
        self.unfinished.push(node);
    }

    /// Pop the innermost open element and link it under the new top.
    fn close_current(&mut self) {
        if let Some(node) = self.unfinished.pop()
            && let Some(&parent) = self.unfinished.last()
        {
            self.tree.append_child(parent, node);
        }
    }
}

/// Split raw tag contents into a case-folded tag name and its attributes.
///
/// `key=value` pairs become attributes (one layer of quotes is stripped
/// when the value is longer than two characters and starts with a quote);
/// bare words become attributes with an empty value. A trailing `/` on a
/// void element (`<br/>`, `<br />`) is ignored. Returns `None` for an empty
/// tag (`<>`).
#[must_use]
pub fn split_tag(raw: &str) -> Option<(String, AttributesMap)> {
    let mut parts = raw.split_whitespace();
    let first = parts.next()?;
    let mut tag = first.to_lowercase();
    if tag.len() > 1 && !tag.starts_with('/') && tag.ends_with('/') {
        let _ = tag.pop();
    }

    let mut attributes = AttributesMap::new();
    for pair in parts {
        if pair == "/" {
            continue;
        }
        match pair.split_once('=') {
            Some((key, value)) => {
                let _ = attributes.insert(key.to_lowercase(), strip_quotes(value).to_string());
            }
            None => {
                let _ = attributes.insert(pair.to_lowercase(), String::new());
            }
        }
    }
    Some((tag, attributes))
}

fn strip_quotes(value: &str) -> &str {
    let quoted = value.starts_with('"') || value.starts_with('\'');
    if quoted && value.chars().count() > 2 {
        let mut chars = value.chars();
        let _ = chars.next();
        let _ = chars.next_back();
        chars.as_str()
    } else {
        value
    }
}

/// Render the subtree under `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let pad = " ".repeat(indent);
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{pad}#document"),
        NodeType::Element(data) => {
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            let attrs: String = attrs
                .into_iter()
                .map(|(k, v)| format!(" {k}=\"{v}\""))
                .collect();
            writeln!(out, "{pad}<{}{attrs}>", data.tag_name)
        }
        NodeType::Text(text) => writeln!(out, "{pad}{text:?}"),
    };
    for &child in &node.children {
        write_node(tree, child, indent + 2, out);
    }
}
