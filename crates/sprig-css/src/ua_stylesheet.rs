//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! The default rules come first in every document's rule list, so a
//! document rule of equal priority overrides them.

use std::sync::OnceLock;

use crate::parser::{Rule, parse_stylesheet};

/// Default rules for the elements sprig renders specially.
///
/// The stylesheet grammar has no comments, so none appear here.
const UA_CSS: &str = r"
head { display: none; }
script { display: none; }
style { display: none; }
title { display: none; }

pre { background-color: gray; }
a { color: blue; }
i { font-style: italic; }
b { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }

input {
    font-size: 16px;
    font-weight: normal;
    font-style: normal;
    background-color: lightblue;
}
button {
    font-size: 16px;
    font-weight: normal;
    font-style: normal;
    background-color: orange;
}
";

/// The parsed default rules, parsed on first use and shared process-wide.
#[must_use]
pub fn ua_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| parse_stylesheet(UA_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_rule_parses() {
        let rules = ua_rules();
        assert_eq!(rules.len(), 12);
        let input = rules
            .iter()
            .find(|r| r.selector.to_string() == "input")
            .unwrap();
        assert_eq!(input.declarations.len(), 4);
    }
}
